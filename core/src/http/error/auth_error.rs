use actix_web::{error, http::StatusCode, HttpResponse, HttpResponseBuilder};
use derive_more::{Display, Error};

/// Errors surfaced to HTTP clients by the security layer.
#[derive(Debug, Display, Error)]
pub enum AuthError {
    #[display("unauthorized")]
    Unauthorized,
    #[display("forbidden")]
    Forbidden,
    /// A storage fault during user lookup. Never folded into the
    /// login-failure redirect.
    #[display("user lookup failed")]
    Lookup,
}

impl error::ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Lookup => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponseBuilder::new(self.status_code()).body(self.to_string())
    }
}
