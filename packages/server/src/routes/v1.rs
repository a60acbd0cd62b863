use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/candidates", candidate_routes())
        .nest("/jobs", job_routes())
        .nest("/resumes", resume_routes(config))
        .nest("/users", user_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn candidate_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::candidate::list_candidates,
            handlers::candidate::create_candidate
        ))
        .routes(routes!(
            handlers::candidate::get_candidate,
            handlers::candidate::update_candidate
        ))
        .routes(routes!(handlers::candidate::export_candidates))
        .routes(routes!(handlers::candidate::notify_interviewer))
}

fn job_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::job::list_jobs, handlers::job::create_job))
        .routes(routes!(
            handlers::job::get_job,
            handlers::job::update_job,
            handlers::job::delete_job
        ))
}

fn resume_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let crud = OpenApiRouter::new()
        .routes(routes!(handlers::resume::create_resume))
        .routes(routes!(handlers::resume::list_my_resumes))
        .routes(routes!(handlers::resume::get_resume))
        .routes(routes!(handlers::resume::download_resume_file));

    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::resume::upload_resume_file))
        .layer(handlers::resume::upload_body_limit(
            config.storage.max_upload_size,
        ));

    crud.merge(upload)
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::user::list_users))
        .routes(routes!(handlers::user::set_user_groups))
}
