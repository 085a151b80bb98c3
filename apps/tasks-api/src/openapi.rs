use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Tasks API",
        version = "0.1.0",
        description = "API for tracking tasks"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/tasks", api = domain_tasks::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
