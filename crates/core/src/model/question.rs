use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Every question carries exactly this many answer options.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("expected {OPTION_COUNT} options, got {len}")]
    WrongOptionCount { len: usize },

    #[error("correct option index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },

    #[error("selected option index {index} is out of range for {len} options")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("question has already been answered")]
    AlreadyAnswered,
}

/// One trivia prompt with a fixed set of options and a known correct option.
///
/// The option order is decided once at construction (the provider shuffles
/// before building the question) and never changes afterwards. The answer,
/// once recorded, is immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_index: usize,
    selected_index: Option<usize>,
}

impl Question {
    /// Creates a question, validating the option count and the correct index.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::WrongOptionCount` unless exactly
    /// [`OPTION_COUNT`] options are given, and
    /// `QuestionError::CorrectIndexOutOfRange` if `correct_index` does not
    /// point into them.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
    ) -> Result<Self, QuestionError> {
        if options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount { len: options.len() });
        }
        if correct_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
                len: options.len(),
            });
        }

        Ok(Self {
            id: QuestionId::new(),
            text: text.into(),
            options,
            correct_index,
            selected_index: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.selected_index.is_some()
    }

    /// True when the recorded answer matches the correct option.
    ///
    /// Always false for an unanswered question.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.selected_index == Some(self.correct_index)
    }

    /// Record the selected option and return whether it was correct.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::AlreadyAnswered` on a second call; the first
    /// answer stays untouched. Returns `QuestionError::OptionOutOfRange` for
    /// an index outside the options.
    pub fn record_answer(&mut self, index: usize) -> Result<bool, QuestionError> {
        if self.is_answered() {
            return Err(QuestionError::AlreadyAnswered);
        }
        if index >= self.options.len() {
            return Err(QuestionError::OptionOutOfRange {
                index,
                len: self.options.len(),
            });
        }

        self.selected_index = Some(index);
        Ok(index == self.correct_index)
    }
}
