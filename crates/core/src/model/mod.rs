mod ids;
mod question;
mod session;

pub use ids::QuestionId;
pub use question::{OPTION_COUNT, Question, QuestionError};
pub use session::{AnswerOutcome, QuizSession, REVEAL_DELAY_SECS, SessionError};
