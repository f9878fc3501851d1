use axum::http::StatusCode;
use axum::response::IntoResponse;

pub async fn page_not_found_handler() -> impl IntoResponse {
    (StatusCode::IM_A_TEAPOT, "No stalls down this road, teapot")
}
