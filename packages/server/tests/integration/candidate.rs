use serde_json::json;

use crate::common::{TestApp, routes};

mod listing {
    use super::*;

    #[tokio::test]
    async fn hr_member_sees_every_candidate() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;

        app.create_candidate(&hr, &json!({"username": "Li Lei"})).await;
        app.create_candidate(&hr, &json!({"username": "Han Meimei"}))
            .await;

        let res = app.get_with_token(routes::CANDIDATES, &hr).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 2);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn superuser_sees_every_candidate() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let root = app.create_superuser("root", "securepass").await;

        app.create_candidate(&hr, &json!({"username": "Li Lei"})).await;

        let res = app.get_with_token(routes::CANDIDATES, &root).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn interviewer_sees_only_their_assigned_candidates() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let interviewer = app
            .create_user_with_groups("wang_wei", "securepass", &["interviewer"])
            .await;
        let interviewer_id = app.user_id_of("wang_wei").await;

        let mine = app
            .create_candidate(
                &hr,
                &json!({"username": "Li Lei", "first_interviewer_user_id": interviewer_id}),
            )
            .await;
        app.create_candidate(&hr, &json!({"username": "Han Meimei"}))
            .await;

        let res = app.get_with_token(routes::CANDIDATES, &interviewer).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["data"][0]["id"], mine);
    }

    #[tokio::test]
    async fn second_interviewer_assignment_also_grants_row_access() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let interviewer = app
            .create_user_with_groups("wang_wei", "securepass", &["interviewer"])
            .await;
        let interviewer_id = app.user_id_of("wang_wei").await;

        let mine = app
            .create_candidate(
                &hr,
                &json!({"username": "Li Lei", "second_interviewer_user_id": interviewer_id}),
            )
            .await;

        let res = app.get_with_token(routes::CANDIDATES, &interviewer).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["data"][0]["id"], mine);
    }

    #[tokio::test]
    async fn staff_without_candidate_view_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("li_lei", "securepass").await;

        let res = app.get_with_token(routes::CANDIDATES, &token).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn listing_without_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::CANDIDATES).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn rows_link_the_lowest_id_resume_sharing_the_phone() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let applicant = app.create_authenticated_user("li_lei", "securepass").await;

        let first_resume = app.create_resume(&applicant, "Li Lei", "13800138000").await;
        app.create_resume(&applicant, "Li Lei", "13800138000").await;

        let with_resume = app
            .create_candidate(
                &hr,
                &json!({"username": "Li Lei", "phone": "13800138000"}),
            )
            .await;
        let without_resume = app
            .create_candidate(&hr, &json!({"username": "Han Meimei"}))
            .await;

        let res = app.get_with_token(routes::CANDIDATES, &hr).await;
        assert_eq!(res.status, 200);

        let data = res.body["data"].as_array().unwrap();
        let row_with = data
            .iter()
            .find(|r| r["id"] == with_resume)
            .expect("candidate with resume should be listed");
        assert_eq!(row_with["resume_id"], first_resume);

        let row_without = data
            .iter()
            .find(|r| r["id"] == without_resume)
            .expect("candidate without resume should be listed");
        assert!(row_without["resume_id"].is_null());
    }

    #[tokio::test]
    async fn candidates_can_be_filtered_by_city_and_result() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;

        app.create_candidate(
            &hr,
            &json!({"username": "Li Lei", "city": "Beijing", "first_result": "advance"}),
        )
        .await;
        app.create_candidate(
            &hr,
            &json!({"username": "Han Meimei", "city": "Shanghai", "first_result": "reject"}),
        )
        .await;

        let by_city = app
            .get_with_token(&format!("{}?city=Beijing", routes::CANDIDATES), &hr)
            .await;
        assert_eq!(by_city.status, 200);
        assert_eq!(by_city.body["pagination"]["total"], 1);
        assert_eq!(by_city.body["data"][0]["username"], "Li Lei");

        let by_result = app
            .get_with_token(
                &format!("{}?first_result=reject", routes::CANDIDATES),
                &hr,
            )
            .await;
        assert_eq!(by_result.status, 200);
        assert_eq!(by_result.body["pagination"]["total"], 1);
        assert_eq!(by_result.body["data"][0]["username"], "Han Meimei");
    }

    #[tokio::test]
    async fn search_matches_bachelor_school_case_insensitively() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;

        app.create_candidate(
            &hr,
            &json!({"username": "Li Lei", "bachelor_school": "Tsinghua University"}),
        )
        .await;
        app.create_candidate(
            &hr,
            &json!({"username": "Han Meimei", "bachelor_school": "Peking University"}),
        )
        .await;

        let res = app
            .get_with_token(&format!("{}?search=tsinghua", routes::CANDIDATES), &hr)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["data"][0]["username"], "Li Lei");
    }

    #[tokio::test]
    async fn default_order_puts_decided_candidates_before_pending_ones() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;

        let pending = app
            .create_candidate(&hr, &json!({"username": "Han Meimei"}))
            .await;
        let decided = app
            .create_candidate(
                &hr,
                &json!({"username": "Li Lei", "hr_result": "hire"}),
            )
            .await;

        let res = app.get_with_token(routes::CANDIDATES, &hr).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"][0]["id"], decided);
        assert_eq!(res.body["data"][1]["id"], pending);
    }

    #[tokio::test]
    async fn listing_is_paginated() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;

        for i in 0..3 {
            app.create_candidate(&hr, &json!({"username": format!("Candidate {i}")}))
                .await;
        }

        let res = app
            .get_with_token(
                &format!("{}?page=2&per_page=2&sort_by=created_at", routes::CANDIDATES),
                &hr,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 3);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_sort_column_is_rejected() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;

        let res = app
            .get_with_token(&format!("{}?sort_by=phone", routes::CANDIDATES), &hr)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn hr_member_can_create_a_candidate() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;

        let res = app
            .post_with_token(
                routes::CANDIDATES,
                &json!({
                    "username": "Li Lei",
                    "city": "Beijing",
                    "degree": "Master",
                    "test_score_of_general_ability": 85.5,
                }),
                &hr,
            )
            .await;

        assert_eq!(res.status, 201);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "Li Lei");
        assert_eq!(res.body["creator"], "hr_zhang");
        assert_eq!(res.body["test_score_of_general_ability"], 85.5);
    }

    #[tokio::test]
    async fn interviewer_cannot_create_candidates() {
        let app = TestApp::spawn().await;
        let interviewer = app
            .create_user_with_groups("wang_wei", "securepass", &["interviewer"])
            .await;

        let res = app
            .post_with_token(routes::CANDIDATES, &json!({"username": "Li Lei"}), &interviewer)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn candidate_name_is_required() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;

        let res = app
            .post_with_token(routes::CANDIDATES, &json!({"username": "   "}), &hr)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_result_value_is_rejected() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;

        let res = app
            .post_with_token(
                routes::CANDIDATES,
                &json!({"username": "Li Lei", "first_result": "maybe"}),
                &hr,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_hr_grade_is_rejected() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;

        let res = app
            .post_with_token(
                routes::CANDIDATES,
                &json!({"username": "Li Lei", "hr_score": "D"}),
                &hr,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod detail {
    use super::*;

    #[tokio::test]
    async fn hr_member_sees_all_four_fieldsets() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let id = app
            .create_candidate(&hr, &json!({"username": "Li Lei"}))
            .await;

        let res = app.get_with_token(&routes::candidate(id), &hr).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["candidate"]["username"], "Li Lei");

        let fieldsets = res.body["fieldsets"].as_array().unwrap();
        assert_eq!(fieldsets.len(), 4);
        assert!(fieldsets[0]["title"].is_null());
        assert_eq!(fieldsets[1]["title"], "First interview");
        assert_eq!(fieldsets[3]["title"], "HR interview");
        assert_eq!(res.body["readonly_fields"], json!([]));
    }

    #[tokio::test]
    async fn first_interviewer_sees_only_basic_and_first_stage_fields() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let interviewer = app
            .create_user_with_groups("wang_wei", "securepass", &["interviewer"])
            .await;
        let interviewer_id = app.user_id_of("wang_wei").await;
        let id = app
            .create_candidate(
                &hr,
                &json!({"username": "Li Lei", "first_interviewer_user_id": interviewer_id}),
            )
            .await;

        let res = app.get_with_token(&routes::candidate(id), &interviewer).await;

        assert_eq!(res.status, 200);
        let fieldsets = res.body["fieldsets"].as_array().unwrap();
        assert_eq!(fieldsets.len(), 2);
        assert_eq!(fieldsets[1]["title"], "First interview");

        let first_fields = fieldsets[1]["fields"].as_array().unwrap();
        assert!(first_fields.contains(&json!("first_score")));
        assert!(!first_fields.contains(&json!("hr_score")));

        let readonly = res.body["readonly_fields"].as_array().unwrap();
        assert!(readonly.contains(&json!("first_interviewer_user_id")));
    }

    #[tokio::test]
    async fn second_interviewer_sees_second_stage_instead_of_first() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let interviewer = app
            .create_user_with_groups("wang_wei", "securepass", &["interviewer"])
            .await;
        let interviewer_id = app.user_id_of("wang_wei").await;
        let id = app
            .create_candidate(
                &hr,
                &json!({"username": "Li Lei", "second_interviewer_user_id": interviewer_id}),
            )
            .await;

        let res = app.get_with_token(&routes::candidate(id), &interviewer).await;

        assert_eq!(res.status, 200);
        let fieldsets = res.body["fieldsets"].as_array().unwrap();
        assert_eq!(fieldsets.len(), 2);
        assert_eq!(fieldsets[1]["title"], "Second interview");
    }

    #[tokio::test]
    async fn interviewer_cannot_fetch_an_unassigned_candidate() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let interviewer = app
            .create_user_with_groups("wang_wei", "securepass", &["interviewer"])
            .await;
        let id = app
            .create_candidate(&hr, &json!({"username": "Li Lei"}))
            .await;

        let res = app.get_with_token(&routes::candidate(id), &interviewer).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn missing_candidate_is_not_found() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;

        let res = app.get_with_token(&routes::candidate(9999), &hr).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod editing {
    use super::*;

    #[tokio::test]
    async fn first_interviewer_can_record_their_stage() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let interviewer = app
            .create_user_with_groups("wang_wei", "securepass", &["interviewer"])
            .await;
        let interviewer_id = app.user_id_of("wang_wei").await;
        let id = app
            .create_candidate(
                &hr,
                &json!({"username": "Li Lei", "first_interviewer_user_id": interviewer_id}),
            )
            .await;

        let res = app
            .patch_with_token(
                &routes::candidate(id),
                &json!({"first_score": 4.5, "first_result": "advance"}),
                &interviewer,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["first_score"], 4.5);
        assert_eq!(res.body["first_result"], "advance");
    }

    #[tokio::test]
    async fn first_interviewer_cannot_touch_second_stage_fields() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let interviewer = app
            .create_user_with_groups("wang_wei", "securepass", &["interviewer"])
            .await;
        let interviewer_id = app.user_id_of("wang_wei").await;
        let id = app
            .create_candidate(
                &hr,
                &json!({"username": "Li Lei", "first_interviewer_user_id": interviewer_id}),
            )
            .await;

        let res = app
            .patch_with_token(
                &routes::candidate(id),
                &json!({"second_score": 4.0}),
                &interviewer,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
        assert!(res.body["message"].as_str().unwrap().contains("second_score"));
    }

    #[tokio::test]
    async fn interviewer_cannot_reassign_the_record() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let interviewer = app
            .create_user_with_groups("wang_wei", "securepass", &["interviewer"])
            .await;
        let interviewer_id = app.user_id_of("wang_wei").await;
        let id = app
            .create_candidate(
                &hr,
                &json!({"username": "Li Lei", "first_interviewer_user_id": interviewer_id}),
            )
            .await;

        let res = app
            .patch_with_token(
                &routes::candidate(id),
                &json!({"first_interviewer_user_id": interviewer_id}),
                &interviewer,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn hr_member_can_edit_every_stage_and_reassign() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let interviewer_id = {
            app.create_user_with_groups("wang_wei", "securepass", &["interviewer"])
                .await;
            app.user_id_of("wang_wei").await
        };
        let id = app
            .create_candidate(&hr, &json!({"username": "Li Lei"}))
            .await;

        let res = app
            .patch_with_token(
                &routes::candidate(id),
                &json!({
                    "hr_score": "A",
                    "hr_result": "hire",
                    "first_interviewer_user_id": interviewer_id,
                }),
                &hr,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["hr_score"], "A");
        assert_eq!(res.body["hr_result"], "hire");
        assert_eq!(res.body["first_interviewer_user_id"], interviewer_id);
    }

    #[tokio::test]
    async fn edits_stamp_the_last_editor() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let id = app
            .create_candidate(&hr, &json!({"username": "Li Lei"}))
            .await;

        let res = app
            .patch_with_token(&routes::candidate(id), &json!({"city": "Shenzhen"}), &hr)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["last_editor"], "hr_zhang");
    }

    #[tokio::test]
    async fn empty_patch_returns_the_record_unchanged() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let id = app
            .create_candidate(&hr, &json!({"username": "Li Lei"}))
            .await;

        let res = app
            .patch_with_token(&routes::candidate(id), &json!({}), &hr)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "Li Lei");
        assert!(res.body["last_editor"].is_null());
    }

    #[tokio::test]
    async fn invalid_result_value_is_rejected() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let id = app
            .create_candidate(&hr, &json!({"username": "Li Lei"}))
            .await;

        let res = app
            .patch_with_token(
                &routes::candidate(id),
                &json!({"hr_result": "maybe"}),
                &hr,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn editing_an_unassigned_candidate_is_not_found() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let interviewer = app
            .create_user_with_groups("wang_wei", "securepass", &["interviewer"])
            .await;
        let id = app
            .create_candidate(&hr, &json!({"username": "Li Lei"}))
            .await;

        let res = app
            .patch_with_token(
                &routes::candidate(id),
                &json!({"first_score": 3.0}),
                &interviewer,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod export {
    use super::*;

    #[tokio::test]
    async fn hr_member_can_export_selected_candidates_as_csv() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;

        let a = app
            .create_candidate(
                &hr,
                &json!({"username": "Li Lei", "city": "Beijing", "hr_result": "hire"}),
            )
            .await;
        let b = app
            .create_candidate(&hr, &json!({"username": "Han Meimei"}))
            .await;

        let res = app
            .client
            .post(app.url(routes::CANDIDATES_EXPORT))
            .header("Authorization", format!("Bearer {hr}"))
            .json(&json!({"candidate_ids": [a, b]}))
            .send()
            .await
            .expect("Failed to send export request");

        assert_eq!(res.status().as_u16(), 200);
        let content_type = res
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/csv"));

        let disposition = res
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=recruitment-candidates-list-"));
        assert!(disposition.ends_with(".csv"));

        let text = res.text().await.expect("Failed to read CSV body");
        let lines: Vec<&str> = text.trim_end().lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Username,City,Phone,Bachelor School"));
        assert!(text.contains("Li Lei"));
        assert!(text.contains("Han Meimei"));
    }

    #[tokio::test]
    async fn interviewer_cannot_export() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let interviewer = app
            .create_user_with_groups("wang_wei", "securepass", &["interviewer"])
            .await;
        let id = app
            .create_candidate(&hr, &json!({"username": "Li Lei"}))
            .await;

        let res = app
            .post_with_token(
                routes::CANDIDATES_EXPORT,
                &json!({"candidate_ids": [id]}),
                &interviewer,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn export_drops_rows_outside_the_callers_scope() {
        use sea_orm::{EntityTrait, Set};
        use server::entity::group_permission;

        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;

        // Grant the interviewer group export rights for this scenario.
        group_permission::Entity::insert(group_permission::ActiveModel {
            group_name: Set("interviewer".to_string()),
            permission: Set("candidate:export".to_string()),
        })
        .exec_without_returning(&app.db)
        .await
        .expect("Failed to grant export permission");

        let interviewer = app
            .create_user_with_groups("wang_wei", "securepass", &["interviewer"])
            .await;
        let interviewer_id = app.user_id_of("wang_wei").await;

        let assigned = app
            .create_candidate(
                &hr,
                &json!({"username": "Li Lei", "first_interviewer_user_id": interviewer_id}),
            )
            .await;
        let unassigned = app
            .create_candidate(&hr, &json!({"username": "Han Meimei"}))
            .await;

        let res = app
            .post_with_token(
                routes::CANDIDATES_EXPORT,
                &json!({"candidate_ids": [assigned, unassigned]}),
                &interviewer,
            )
            .await;

        assert_eq!(res.status, 200);
        let lines: Vec<&str> = res.text.trim_end().lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(res.text.contains("Li Lei"));
        assert!(!res.text.contains("Han Meimei"));
    }

    #[tokio::test]
    async fn export_requires_a_selection() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;

        let res = app
            .post_with_token(routes::CANDIDATES_EXPORT, &json!({"candidate_ids": []}), &hr)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod notification {
    use super::*;

    #[tokio::test]
    async fn hr_member_can_notify_first_interviewers() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let interviewer_id = {
            app.create_user_with_groups("wang_wei", "securepass", &["interviewer"])
                .await;
            app.user_id_of("wang_wei").await
        };
        let id = app
            .create_candidate(
                &hr,
                &json!({"username": "Li Lei", "first_interviewer_user_id": interviewer_id}),
            )
            .await;

        let res = app
            .post_with_token(
                routes::NOTIFY_INTERVIEWER,
                &json!({"candidate_ids": [id]}),
                &hr,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Notification sent");
        assert_eq!(res.body["notified"], 1);
    }

    #[tokio::test]
    async fn candidates_without_a_first_interviewer_are_skipped() {
        let app = TestApp::spawn().await;
        let hr = app
            .create_user_with_groups("hr_zhang", "securepass", &["hr"])
            .await;
        let id = app
            .create_candidate(&hr, &json!({"username": "Li Lei"}))
            .await;

        let res = app
            .post_with_token(
                routes::NOTIFY_INTERVIEWER,
                &json!({"candidate_ids": [id]}),
                &hr,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["notified"], 0);
    }

    #[tokio::test]
    async fn interviewer_cannot_send_notifications() {
        let app = TestApp::spawn().await;
        let interviewer = app
            .create_user_with_groups("wang_wei", "securepass", &["interviewer"])
            .await;

        let res = app
            .post_with_token(
                routes::NOTIFY_INTERVIEWER,
                &json!({"candidate_ids": [1]}),
                &interviewer,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}
