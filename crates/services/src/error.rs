//! Shared error types for the services crate.

use thiserror::Error;

use trivia_core::model::QuestionError;

/// Errors emitted by a [`QuestionProvider`](crate::provider::QuestionProvider).
///
/// The kinds stay distinct for diagnostics; the presentation layer collapses
/// all of them into one generic message with a retry affordance.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("could not construct request URL")]
    InvalidRequest(#[from] url::ParseError),
    #[error("trivia endpoint returned status {0}")]
    InvalidResponse(reqwest::StatusCode),
    #[error("could not decode trivia payload")]
    Decode(#[from] serde_json::Error),
    #[error("malformed question item")]
    Schema(#[from] QuestionError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by [`QuizService`](crate::quiz_service::QuizService).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
