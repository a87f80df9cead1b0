use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Duration;

use trivia_core::Clock;
use trivia_core::model::{AnswerOutcome, QuizSession, REVEAL_DELAY_SECS, SessionError};

use crate::error::QuizServiceError;
use crate::provider::{DEFAULT_QUESTION_AMOUNT, QuestionProvider};

/// Identity of one load request.
///
/// Stamps are monotonically increasing; a completion whose stamp is no longer
/// the latest must be discarded, so overlapping loads resolve as
/// "latest request wins".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStamp(u64);

/// Orchestrates quiz sessions over an injected provider and clock.
///
/// Stateless apart from the load sequence counter; all session state lives in
/// the [`QuizSession`] owned by the caller, so a restart is simply a new
/// stamp plus a fresh [`load_session`](Self::load_session) whose result
/// replaces the old session wholesale.
pub struct QuizService {
    provider: Arc<dyn QuestionProvider>,
    clock: Clock,
    amount: u8,
    load_seq: AtomicU64,
}

impl QuizService {
    #[must_use]
    pub fn new(provider: Arc<dyn QuestionProvider>, clock: Clock) -> Self {
        Self {
            provider,
            clock,
            amount: DEFAULT_QUESTION_AMOUNT,
            load_seq: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn with_amount(mut self, amount: u8) -> Self {
        self.amount = amount;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// How long an answered question is revealed before advancing.
    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        Duration::seconds(REVEAL_DELAY_SECS)
    }

    /// Stamp a new load attempt, invalidating every earlier stamp.
    pub fn begin_load(&self) -> LoadStamp {
        LoadStamp(self.load_seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True while no newer load has been stamped after this one.
    #[must_use]
    pub fn is_latest(&self, stamp: LoadStamp) -> bool {
        stamp.0 == self.load_seq.load(Ordering::SeqCst)
    }

    /// Fetch a fresh batch and build a new session over it.
    ///
    /// An empty batch yields an empty session; distinguishing "no questions
    /// available" from an error is the caller's concern.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Provider` when the fetch fails; no partial
    /// batch survives a failure.
    pub async fn load_session(&self) -> Result<QuizSession, QuizServiceError> {
        let questions = self.provider.fetch_questions(self.amount).await?;
        Ok(QuizSession::new(questions))
    }

    /// Answer the current question, stamping the reveal deadline from the
    /// service clock.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError`]; an already-answered question is rejected
    /// without mutation.
    pub fn answer_current(
        &self,
        session: &mut QuizSession,
        index: usize,
    ) -> Result<AnswerOutcome, SessionError> {
        session.select_answer(index, self.clock.now())
    }

    /// Fire the deferred advance if its deadline has passed on the service
    /// clock. Returns whether the session state changed.
    pub fn advance_if_due(&self, session: &mut QuizSession) -> bool {
        session.advance_if_due(self.clock.now())
    }
}
