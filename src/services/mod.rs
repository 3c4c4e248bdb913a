//! Service layer shared by the HTTP routes and the admin store.

use serde::Serialize;
use thiserror::Error;

use crate::repository::errors::RepositoryError;
use crate::validation::ValidationReport;

pub mod account;
pub mod dashboard;
pub mod mock;
pub mod site;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found")]
    NotFound,

    #[error("Form error: {0}")]
    Form(String),

    #[error("Form validation failed")]
    Validation(ValidationReport),

    #[error("Type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ValidationError(message) => ServiceError::Form(message),
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            RepositoryError::StorageError(message) | RepositoryError::Unexpected(message) => {
                ServiceError::Internal(message)
            }
        }
    }
}

/// One page of results returned by a list fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> From<(usize, Vec<T>)> for ListPage<T> {
    fn from((total, items): (usize, Vec<T>)) -> Self {
        Self { items, total }
    }
}
