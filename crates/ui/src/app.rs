use dioxus::prelude::*;

use crate::views::QuizView;

#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "Quiz App" }

        // Single-screen app: the quiz view is the whole surface.
        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                QuizView {}
            }
        }
    }
}
