use serde_json::json;

use crate::common::{TestApp, routes};

mod submission {
    use super::*;

    #[tokio::test]
    async fn authenticated_user_can_submit_a_resume() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("li_lei", "securepass").await;

        let res = app
            .post_with_token(
                routes::RESUMES,
                &json!({
                    "username": "Li Lei",
                    "city": "Beijing",
                    "phone": "13800138000",
                    "bachelor_school": "Tsinghua University",
                    "degree": "Master",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "Li Lei");
    }

    #[tokio::test]
    async fn resume_is_bound_to_the_submitting_account() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("li_lei", "securepass").await;
        let my_id = app.user_id_of("li_lei").await;

        let res = app
            .post_with_token(routes::RESUMES, &json!({"username": "Li Lei"}), &token)
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["applicant_user_id"], my_id);
    }

    #[tokio::test]
    async fn submission_requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::RESUMES, &json!({"username": "Li Lei"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn applicant_name_is_required() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("li_lei", "securepass").await;

        let res = app
            .post_with_token(routes::RESUMES, &json!({"username": ""}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod my_resumes {
    use super::*;

    #[tokio::test]
    async fn listing_shows_only_the_callers_resumes() {
        let app = TestApp::spawn().await;
        let li = app.create_authenticated_user("li_lei", "securepass").await;
        let han = app.create_authenticated_user("han_mei", "securepass").await;

        app.create_resume(&li, "Li Lei", "13800138000").await;
        app.create_resume(&han, "Han Meimei", "13900139000").await;

        let res = app.get_with_token(routes::MY_RESUMES, &li).await;

        assert_eq!(res.status, 200);
        let resumes = res.body.as_array().expect("resume list should be an array");
        assert_eq!(resumes.len(), 1);
        assert_eq!(resumes[0]["username"], "Li Lei");
    }

    #[tokio::test]
    async fn newest_resume_comes_first() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("li_lei", "securepass").await;

        app.create_resume(&token, "Li Lei", "13800138000").await;
        let newer = app.create_resume(&token, "Li Lei", "13800138000").await;

        let res = app.get_with_token(routes::MY_RESUMES, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body[0]["id"], newer);
    }
}

mod visibility {
    use super::*;

    #[tokio::test]
    async fn owner_can_view_their_resume() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("li_lei", "securepass").await;
        let id = app.create_resume(&token, "Li Lei", "13800138000").await;

        let res = app.get_with_token(&routes::resume(id), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "Li Lei");
    }

    #[tokio::test]
    async fn another_applicant_cannot_view_it() {
        let app = TestApp::spawn().await;
        let li = app.create_authenticated_user("li_lei", "securepass").await;
        let han = app.create_authenticated_user("han_mei", "securepass").await;
        let id = app.create_resume(&li, "Li Lei", "13800138000").await;

        let res = app.get_with_token(&routes::resume(id), &han).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn hr_member_can_view_any_resume() {
        let app = TestApp::spawn().await;
        let li = app.create_authenticated_user("li_lei", "securepass").await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let id = app.create_resume(&li, "Li Lei", "13800138000").await;

        let res = app.get_with_token(&routes::resume(id), &hr).await;

        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn interviewer_can_view_any_resume() {
        let app = TestApp::spawn().await;
        let li = app.create_authenticated_user("li_lei", "securepass").await;
        let interviewer = app
            .create_user_with_groups("wang_wei", "securepass", &["interviewer"])
            .await;
        let id = app.create_resume(&li, "Li Lei", "13800138000").await;

        let res = app.get_with_token(&routes::resume(id), &interviewer).await;

        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn missing_resume_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("li_lei", "securepass").await;

        let res = app.get_with_token(&routes::resume(9999), &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod files {
    use super::*;

    const PDF_BYTES: &[u8] = b"%PDF-1.4 minimal resume document";

    #[tokio::test]
    async fn owner_can_attach_a_file() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("li_lei", "securepass").await;
        let id = app.create_resume(&token, "Li Lei", "13800138000").await;

        let res = app
            .upload_with_token(
                &routes::resume_upload(id),
                "attachment",
                "resume.pdf",
                PDF_BYTES.to_vec(),
                "application/pdf",
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "upload failed: {}", res.text);
        assert_eq!(res.body["kind"], "attachment");
        assert_eq!(res.body["filename"], "resume.pdf");
        assert!(res.body["hash"].is_string());
    }

    #[tokio::test]
    async fn attached_file_round_trips_on_download() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("li_lei", "securepass").await;
        let id = app.create_resume(&token, "Li Lei", "13800138000").await;

        app.upload_with_token(
            &routes::resume_upload(id),
            "attachment",
            "resume.pdf",
            PDF_BYTES.to_vec(),
            "application/pdf",
            &token,
        )
        .await;

        let res = app
            .client
            .get(app.url(&routes::resume_file(id, "attachment")))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send download request");

        assert_eq!(res.status().as_u16(), 200);
        let disposition = res
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.starts_with("attachment;"));
        assert!(disposition.contains("resume.pdf"));

        let bytes = res.bytes().await.expect("Failed to read file body");
        assert_eq!(bytes.as_ref(), PDF_BYTES);
    }

    #[tokio::test]
    async fn pictures_are_served_inline() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("li_lei", "securepass").await;
        let id = app.create_resume(&token, "Li Lei", "13800138000").await;

        app.upload_with_token(
            &routes::resume_upload(id),
            "picture",
            "portrait.png",
            vec![0x89, b'P', b'N', b'G'],
            "image/png",
            &token,
        )
        .await;

        let res = app
            .client
            .get(app.url(&routes::resume_file(id, "picture")))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send download request");

        assert_eq!(res.status().as_u16(), 200);
        let disposition = res
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.starts_with("inline;"));
    }

    #[tokio::test]
    async fn download_honors_if_none_match() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("li_lei", "securepass").await;
        let id = app.create_resume(&token, "Li Lei", "13800138000").await;

        app.upload_with_token(
            &routes::resume_upload(id),
            "attachment",
            "resume.pdf",
            PDF_BYTES.to_vec(),
            "application/pdf",
            &token,
        )
        .await;

        let first = app
            .client
            .get(app.url(&routes::resume_file(id, "attachment")))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send download request");
        let etag = first
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .expect("download should carry an ETag")
            .to_string();

        let second = app
            .client
            .get(app.url(&routes::resume_file(id, "attachment")))
            .header("Authorization", format!("Bearer {token}"))
            .header("If-None-Match", etag)
            .send()
            .await
            .expect("Failed to send conditional request");

        assert_eq!(second.status().as_u16(), 304);
    }

    #[tokio::test]
    async fn downloading_an_empty_slot_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("li_lei", "securepass").await;
        let id = app.create_resume(&token, "Li Lei", "13800138000").await;

        let res = app
            .get_with_token(&routes::resume_file(id, "attachment"), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn unknown_file_kind_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("li_lei", "securepass").await;
        let id = app.create_resume(&token, "Li Lei", "13800138000").await;

        let res = app
            .get_with_token(&routes::resume_file(id, "archive"), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn only_the_owner_can_attach_files() {
        let app = TestApp::spawn().await;
        let li = app.create_authenticated_user("li_lei", "securepass").await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let id = app.create_resume(&li, "Li Lei", "13800138000").await;

        let res = app
            .upload_with_token(
                &routes::resume_upload(id),
                "attachment",
                "resume.pdf",
                PDF_BYTES.to_vec(),
                "application/pdf",
                &hr,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn unknown_multipart_field_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("li_lei", "securepass").await;
        let id = app.create_resume(&token, "Li Lei", "13800138000").await;

        let res = app
            .upload_with_token(
                &routes::resume_upload(id),
                "document",
                "resume.pdf",
                PDF_BYTES.to_vec(),
                "application/pdf",
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn hr_member_can_download_an_applicants_file() {
        let app = TestApp::spawn().await;
        let li = app.create_authenticated_user("li_lei", "securepass").await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let id = app.create_resume(&li, "Li Lei", "13800138000").await;

        app.upload_with_token(
            &routes::resume_upload(id),
            "attachment",
            "resume.pdf",
            PDF_BYTES.to_vec(),
            "application/pdf",
            &li,
        )
        .await;

        let res = app
            .get_with_token(&routes::resume_file(id, "attachment"), &hr)
            .await;

        assert_eq!(res.status, 200);
    }
}
