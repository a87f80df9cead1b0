use chrono::{DateTime, Duration, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::question::{Question, QuestionError};

/// How long correctness feedback stays on screen before the session advances.
pub const REVEAL_DELAY_SECS: i64 = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available")]
    Empty,
    #[error("quiz already completed")]
    Completed,
    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// Outcome of answering the current question.
///
/// `advance_at` is the deadline of the deferred advance: the session moves on
/// only once [`QuizSession::advance_if_due`] is called at or after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub advance_at: DateTime<Utc>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one play-through of a question batch.
///
/// Owns its questions exclusively; callers observe through read accessors and
/// mutate only via [`select_answer`](Self::select_answer) and
/// [`advance_if_due`](Self::advance_if_due). A restart replaces the whole
/// session rather than mutating this one.
#[derive(Clone, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    score: usize,
    completed: bool,
    pending_advance: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Creates a session over a freshly fetched batch.
    ///
    /// An empty batch is allowed: it is the distinct "no questions available"
    /// condition, not an error and not a completed run.
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current: 0,
            score: 0,
            completed: false,
            pending_advance: None,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.completed {
            return None;
        }
        self.questions.get(self.current)
    }

    /// Deadline of the armed deferred advance, if an answer is being revealed.
    #[must_use]
    pub fn pending_advance_at(&self) -> Option<DateTime<Utc>> {
        self.pending_advance
    }

    /// Fraction of the run reached so far: `(current + 1) / total`.
    ///
    /// Returns `None` for an empty session, where the fraction is undefined.
    #[must_use]
    pub fn progress(&self) -> Option<f32> {
        if self.questions.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some((self.current + 1) as f32 / self.questions.len() as f32)
    }

    /// Answer the current question and arm the deferred advance.
    ///
    /// The score goes up by one iff the selected option is the correct one.
    /// The advance itself is deferred by [`REVEAL_DELAY_SECS`] so correctness
    /// feedback can be shown; it fires via [`advance_if_due`](Self::advance_if_due).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when there are no questions,
    /// `SessionError::Completed` after the run has finished, and passes
    /// through `QuestionError::AlreadyAnswered` / `OptionOutOfRange` without
    /// mutating anything, so duplicate UI events cannot double-score.
    pub fn select_answer(
        &mut self,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        if self.questions.is_empty() {
            return Err(SessionError::Empty);
        }
        if self.completed {
            return Err(SessionError::Completed);
        }

        let question = self
            .questions
            .get_mut(self.current)
            .ok_or(SessionError::Completed)?;
        let correct = question.record_answer(index)?;

        if correct {
            self.score += 1;
        }

        let advance_at = now + Duration::seconds(REVEAL_DELAY_SECS);
        self.pending_advance = Some(advance_at);

        Ok(AnswerOutcome {
            correct,
            advance_at,
        })
    }

    /// Fire the deferred advance once its deadline has passed.
    ///
    /// One-shot: the first due call moves to the next question, or marks the
    /// session completed when the last question was answered. Returns whether
    /// the session state changed.
    pub fn advance_if_due(&mut self, now: DateTime<Utc>) -> bool {
        let Some(deadline) = self.pending_advance else {
            return false;
        };
        if now < deadline {
            return false;
        }

        self.pending_advance = None;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        } else {
            self.completed = true;
        }
        true
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("completed", &self.completed)
            .field("pending_advance", &self.pending_advance)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn build_question(correct_index: usize) -> Question {
        Question::new(
            "Q",
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_index,
        )
        .unwrap()
    }

    fn past_deadline(outcome: AnswerOutcome) -> DateTime<Utc> {
        outcome.advance_at + Duration::seconds(1)
    }

    #[test]
    fn empty_session_is_distinct_from_completed() {
        let mut session = QuizSession::new(Vec::new());
        assert!(session.is_empty());
        assert!(!session.is_complete());
        assert_eq!(session.progress(), None);
        assert_eq!(
            session.select_answer(0, fixed_now()).unwrap_err(),
            SessionError::Empty
        );
    }

    #[test]
    fn correct_answer_scores_and_completes_single_question_run() {
        let mut session = QuizSession::new(vec![build_question(2)]);
        let now = fixed_now();

        let outcome = session.select_answer(2, now).unwrap();
        assert!(outcome.correct);
        assert_eq!(session.score(), 1);
        assert!(session.current_question().unwrap().is_answered());

        // Not due yet: the reveal window is still open.
        assert!(!session.advance_if_due(now));
        assert!(!session.is_complete());

        assert!(session.advance_if_due(past_deadline(outcome)));
        assert!(session.is_complete());
        assert!(session.current_question().is_none());
    }

    #[test]
    fn wrong_answer_leaves_score_untouched() {
        let mut session = QuizSession::new(vec![build_question(2)]);
        let outcome = session.select_answer(0, fixed_now()).unwrap();
        assert!(!outcome.correct);
        assert_eq!(session.score(), 0);
        assert!(session.questions()[0].is_answered());
    }

    #[test]
    fn double_select_is_rejected_without_mutation() {
        let mut session = QuizSession::new(vec![build_question(1)]);
        session.select_answer(1, fixed_now()).unwrap();
        let deadline = session.pending_advance_at();

        let err = session.select_answer(0, fixed_now()).unwrap_err();
        assert_eq!(
            err,
            SessionError::Question(QuestionError::AlreadyAnswered)
        );
        assert_eq!(session.score(), 1);
        assert_eq!(session.questions()[0].selected_index(), Some(1));
        assert_eq!(session.pending_advance_at(), deadline);
    }

    #[test]
    fn advance_fires_once_per_answer() {
        let mut session = QuizSession::new(vec![build_question(0), build_question(0)]);
        let outcome = session.select_answer(0, fixed_now()).unwrap();
        let due = past_deadline(outcome);

        assert!(session.advance_if_due(due));
        assert_eq!(session.current_index(), 1);
        // Second firing with no armed advance is a no-op.
        assert!(!session.advance_if_due(due));
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn session_steps_through_all_questions_and_counts_score() {
        let mut session = QuizSession::new(vec![
            build_question(0),
            build_question(3),
            build_question(1),
        ]);
        let mut now = fixed_now();

        for answer in [0, 2, 1] {
            let outcome = session.select_answer(answer, now).unwrap();
            now = outcome.advance_at + Duration::seconds(1);
            assert!(session.advance_if_due(now));
        }

        assert!(session.is_complete());
        assert_eq!(session.score(), 2);
        let correct = session
            .questions()
            .iter()
            .filter(|question| question.is_correct())
            .count();
        assert_eq!(session.score(), correct);
    }

    #[test]
    fn progress_spans_first_question_to_completion() {
        let mut session = QuizSession::new(vec![build_question(0), build_question(0)]);
        assert_eq!(session.progress(), Some(0.5));

        let outcome = session.select_answer(0, fixed_now()).unwrap();
        session.advance_if_due(past_deadline(outcome));
        assert_eq!(session.progress(), Some(1.0));
    }

    #[test]
    fn answer_after_completion_is_rejected() {
        let mut session = QuizSession::new(vec![build_question(0)]);
        let outcome = session.select_answer(0, fixed_now()).unwrap();
        session.advance_if_due(past_deadline(outcome));

        let err = session.select_answer(0, fixed_now()).unwrap_err();
        assert_eq!(err, SessionError::Completed);
    }
}
