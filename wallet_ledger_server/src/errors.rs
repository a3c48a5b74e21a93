use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use thiserror::Error;
use wallet_ledger_engine::LedgerError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("{0}")]
    InvalidWebhook(String),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("Authentication Error. {0}")]
    AuthenticationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("{0}")]
    LedgerError(#[from] LedgerError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidWebhook(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::LedgerError(e) => match e {
                LedgerError::ValidationError(_) => StatusCode::BAD_REQUEST,
                LedgerError::WrongEntryKind { .. } => StatusCode::BAD_REQUEST,
                LedgerError::WalletNotFound(_) => StatusCode::NOT_FOUND,
                LedgerError::RecipientNotFound(_) => StatusCode::NOT_FOUND,
                LedgerError::UnknownReference(_) => StatusCode::NOT_FOUND,
                LedgerError::InsufficientBalance { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                LedgerError::PermissionDenied(_) => StatusCode::FORBIDDEN,
                LedgerError::DuplicateReference(_) => StatusCode::CONFLICT,
                LedgerError::LockTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
                LedgerError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                LedgerError::GatewayError(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ {self}");
        }
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}
