//! Administrative endpoint listing databases and their collections.

use actix_web::{HttpResponse, web};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /clusters/
pub async fn list_clusters(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let clusters = state.posts.list_clusters().await?;
    Ok(HttpResponse::Ok().json(clusters))
}
