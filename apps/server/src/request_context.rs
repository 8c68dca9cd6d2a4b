//! Per-request context shared through axum extensions.

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}
