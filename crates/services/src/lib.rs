#![forbid(unsafe_code)]

pub mod error;
pub mod provider;
pub mod quiz_service;

pub use trivia_core::Clock;

pub use error::{ProviderError, QuizServiceError};
pub use provider::{DEFAULT_QUESTION_AMOUNT, OpenTdbProvider, QuestionProvider};
pub use quiz_service::{LoadStamp, QuizService};
