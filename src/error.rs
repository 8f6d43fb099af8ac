use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::receipt::ReceiptError;
use crate::schemas::ExpenseError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("expense {index} is invalid: {source}")]
    InvalidExpense { index: usize, source: ExpenseError },
    #[error("invalid receipt: {0}")]
    InvalidReceipt(#[from] ReceiptError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody(_) | ApiError::InvalidExpense { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidReceipt(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
