use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};

use services::{Clock, OpenTdbProvider, QuizService};
use ui::{App, UiApp, build_app_context};

struct DesktopApp {
    quiz: Arc<QuizService>,
}

impl UiApp for DesktopApp {
    fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }
}

fn main() {
    pretty_env_logger::init();
    log::info!("starting quiz app");

    // Composition root: the provider is constructed here and injected, so the
    // rest of the app never touches a global.
    let provider = Arc::new(OpenTdbProvider::new());
    let quiz = Arc::new(QuizService::new(provider, Clock::default_clock()));

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { quiz });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Quiz App")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
}
