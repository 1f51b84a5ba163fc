use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::file::upload_file))
        .layer(handlers::file::upload_body_limit());

    let download = OpenApiRouter::new().routes(routes!(handlers::file::download_file));

    upload.merge(download)
}
