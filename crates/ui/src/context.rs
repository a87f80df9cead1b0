use std::sync::Arc;

use services::QuizService;

pub trait UiApp: Send + Sync {
    fn quiz(&self) -> Arc<QuizService>;
}

#[derive(Clone)]
pub struct AppContext {
    quiz: Arc<QuizService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self { quiz: app.quiz() }
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
