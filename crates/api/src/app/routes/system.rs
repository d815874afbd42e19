use axum::http::StatusCode;

pub async fn root() -> &'static str {
    "Servidor corriendo"
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}
