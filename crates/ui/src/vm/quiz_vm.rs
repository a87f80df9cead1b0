use chrono::{DateTime, Utc};

use services::QuizService;
use trivia_core::model::{AnswerOutcome, QuizSession};

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizOutcome {
    Continue,
    Completed,
}

/// Read model over a [`QuizSession`] for the quiz screen.
///
/// Plain struct on purpose: unit tests drive it without a UI runtime. The
/// view holds it in a signal and replaces it wholesale on restart.
pub struct QuizVm {
    session: QuizSession,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn question_text(&self) -> Option<&str> {
        self.session.current_question().map(|q| q.text())
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        self.session
            .current_question()
            .map_or(&[], |q| q.options())
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.session
            .current_question()
            .is_some_and(|q| q.is_answered())
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.session
            .current_question()
            .is_some_and(|q| q.is_correct())
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.session.current_question().and_then(|q| q.selected_index())
    }

    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        self.session.current_question().map(|q| q.correct_index())
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.session.score()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.session.total_questions()
    }

    /// 1-based position for the "Question i of N" label.
    #[must_use]
    pub fn question_number(&self) -> usize {
        self.session.current_index() + 1
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.session.progress().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    /// Answer the current question.
    ///
    /// Returns `None` when the selection is rejected (already answered,
    /// completed, index out of range) so duplicate click events fall through
    /// quietly without double-scoring.
    pub fn answer_current(
        &mut self,
        service: &QuizService,
        index: usize,
    ) -> Option<AnswerOutcome> {
        service.answer_current(&mut self.session, index).ok()
    }

    /// Fire the deferred advance at its recorded deadline.
    pub fn advance(&mut self, at: DateTime<Utc>) -> QuizOutcome {
        self.session.advance_if_due(at);
        if self.session.is_complete() {
            QuizOutcome::Completed
        } else {
            QuizOutcome::Continue
        }
    }
}

/// # Errors
///
/// Returns `ViewError::NoQuestions` when the fetch succeeds with an empty
/// batch, and `ViewError::LoadFailed` for every provider failure.
pub async fn start_quiz(service: &QuizService) -> Result<QuizVm, ViewError> {
    let session = service
        .load_session()
        .await
        .map_err(|_| ViewError::LoadFailed)?;

    if session.is_empty() {
        return Err(ViewError::NoQuestions);
    }

    Ok(QuizVm::new(session))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use async_trait::async_trait;
    use services::{ProviderError, QuestionProvider};
    use trivia_core::model::Question;
    use trivia_core::time::fixed_clock;

    struct StubProvider {
        batch: Vec<usize>,
        fail: bool,
    }

    #[async_trait]
    impl QuestionProvider for StubProvider {
        async fn fetch_questions(&self, _amount: u8) -> Result<Vec<Question>, ProviderError> {
            if self.fail {
                return Err(decode_failure());
            }
            Ok(self
                .batch
                .iter()
                .map(|&correct| {
                    Question::new(
                        "Q",
                        vec!["A".into(), "B".into(), "C".into(), "D".into()],
                        correct,
                    )
                    .unwrap()
                })
                .collect())
        }
    }

    fn decode_failure() -> ProviderError {
        let err = serde_json::from_str::<u8>("not json").unwrap_err();
        ProviderError::Decode(err)
    }

    fn service(batch: Vec<usize>, fail: bool) -> QuizService {
        QuizService::new(Arc::new(StubProvider { batch, fail }), fixed_clock())
    }

    #[tokio::test]
    async fn start_quiz_maps_empty_batch_to_no_questions() {
        let err = start_quiz(&service(Vec::new(), false)).await.unwrap_err();
        assert_eq!(err, ViewError::NoQuestions);
    }

    #[tokio::test]
    async fn start_quiz_maps_provider_failure_to_load_failed() {
        let err = start_quiz(&service(Vec::new(), true)).await.unwrap_err();
        assert_eq!(err, ViewError::LoadFailed);
    }

    #[tokio::test]
    async fn answer_then_advance_steps_to_completion() {
        let service = service(vec![2], false);
        let mut vm = start_quiz(&service).await.unwrap();
        assert_eq!(vm.question_number(), 1);
        assert_eq!(vm.total_questions(), 1);

        let outcome = vm.answer_current(&service, 2).unwrap();
        assert!(outcome.correct);
        assert!(vm.is_answered());
        assert_eq!(vm.score(), 1);

        assert_eq!(vm.advance(outcome.advance_at), QuizOutcome::Completed);
        assert!(vm.is_complete());
    }

    #[tokio::test]
    async fn duplicate_answer_is_a_quiet_no_op() {
        let service = service(vec![0], false);
        let mut vm = start_quiz(&service).await.unwrap();

        vm.answer_current(&service, 0).unwrap();
        assert!(vm.answer_current(&service, 1).is_none());
        assert_eq!(vm.selected_index(), Some(0));
        assert_eq!(vm.score(), 1);
    }
}
