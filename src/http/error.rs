use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use database::{consts::consts::EntityId, store::StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::validation::ValidationError;

/// Body of every non-2xx response
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Corpo da requisição inválido")]
    InvalidBody,

    #[error("CPF já cadastrado")]
    DuplicateId(EntityId),

    #[error("Erro interno")]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateId(id) => ApiError::DuplicateId(id),
            err => ApiError::Store(err),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::DuplicateId(_) => StatusCode::CONFLICT,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Store(err) => log::error!("Store operation failed: {}", err),
            ApiError::DuplicateId(id) => log::warn!("Rejected duplicate record [id: {}]", id),
            ApiError::Validation(_) | ApiError::InvalidBody => {}
        }

        HttpResponse::build(self.status_code()).json(ErrorMessage {
            message: self.to_string(),
        })
    }
}
