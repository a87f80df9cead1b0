mod quiz_vm;

pub use quiz_vm::{QuizOutcome, QuizVm, start_quiz};
