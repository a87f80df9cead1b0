use dioxus::prelude::*;

use services::LoadStamp;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizOutcome, QuizVm, start_quiz};

/// The single screen of the app: loading, error, empty, question and
/// completion states all render here, driven by the quiz view model.
#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz = ctx.quiz();

    let vm = use_signal(|| None::<QuizVm>);
    let stamp = use_signal(|| None::<LoadStamp>);

    let quiz_for_resource = quiz.clone();
    let resource = use_resource(move || {
        let quiz = quiz_for_resource.clone();
        let mut vm = vm;
        let mut stamp = stamp;

        async move {
            // Stamp before fetching: a restart issued mid-flight supersedes us.
            let load = quiz.begin_load();
            stamp.set(Some(load));
            vm.set(None);

            let started = start_quiz(&quiz).await?;
            if quiz.is_latest(load) {
                vm.set(Some(started));
            }
            Ok::<_, ViewError>(())
        }
    });

    let state = view_state_from_resource(&resource);

    let dispatch_answer = {
        let quiz = quiz.clone();
        use_callback(move |index: usize| {
            let quiz = quiz.clone();
            let mut vm = vm;
            let stamp = stamp;

            spawn(async move {
                let outcome = vm
                    .write()
                    .as_mut()
                    .and_then(|vm| vm.answer_current(&quiz, index));
                // Rejected selections (duplicate clicks) fall through quietly.
                let Some(outcome) = outcome else { return };
                let Some(armed) = stamp() else { return };

                // Keep the correctness feedback on screen for the reveal window.
                let delay = quiz.reveal_delay().to_std().unwrap_or_default();
                tokio::time::sleep(delay).await;

                // A restart during the reveal window owns the session now.
                if !quiz.is_latest(armed) {
                    return;
                }
                if let Some(vm) = vm.write().as_mut() {
                    // Completion is observed through the view model on re-render.
                    let _outcome: QuizOutcome = vm.advance(outcome.advance_at);
                }
            });
        })
    };

    let on_restart = use_callback(move |()| {
        let mut resource = resource;
        resource.restart();
    });

    let vm_guard = vm.read();
    let completed = vm_guard.as_ref().is_some_and(QuizVm::is_complete);
    let question_text = vm_guard
        .as_ref()
        .and_then(|vm| vm.question_text().map(str::to_string));
    let options: Vec<String> = vm_guard
        .as_ref()
        .map(|vm| vm.options().to_vec())
        .unwrap_or_default();
    let is_answered = vm_guard.as_ref().is_some_and(QuizVm::is_answered);
    let is_correct = vm_guard.as_ref().is_some_and(QuizVm::is_correct);
    let selected_index = vm_guard.as_ref().and_then(QuizVm::selected_index);
    let correct_index = vm_guard.as_ref().and_then(QuizVm::correct_index);
    let (score, total) = vm_guard
        .as_ref()
        .map_or((0, 0), |vm| (vm.score(), vm.total_questions()));
    let progress_pct = vm_guard.as_ref().map_or(0.0, QuizVm::progress) * 100.0;
    let counter_label = vm_guard
        .as_ref()
        .map(|vm| format!("Question {} of {}", vm.question_number(), vm.total_questions()));

    rsx! {
        div { class: "page quiz-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { class: "quiz-loading", "Loading questions..." }
                },
                ViewState::Error(err) => rsx! {
                    if err == ViewError::NoQuestions {
                        p { class: "quiz-empty", "{err.message()}" }
                    } else {
                        div { class: "quiz-error",
                            p { "{err.message()}" }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| on_restart.call(()),
                                "Try Again"
                            }
                        }
                    }
                },
                ViewState::Ready(()) => rsx! {
                    if completed {
                        CompletedView { score, total, on_restart }
                    } else if let Some(text) = question_text {
                        div { class: "quiz-progress-track",
                            div {
                                class: "quiz-progress-fill",
                                style: "width: {progress_pct}%",
                            }
                        }
                        h2 { class: "quiz-question", "{text}" }
                        div { class: "quiz-options",
                            for (index, option) in options.iter().enumerate() {
                                AnswerButton {
                                    key: "{index}",
                                    text: option.clone(),
                                    index,
                                    is_selected: selected_index == Some(index),
                                    is_correct_option: correct_index == Some(index),
                                    is_answered,
                                    on_select: dispatch_answer,
                                }
                            }
                        }
                        if is_answered {
                            p {
                                class: if is_correct { "quiz-feedback quiz-feedback--correct" } else { "quiz-feedback quiz-feedback--wrong" },
                                if is_correct {
                                    "Correct! 🎉"
                                } else {
                                    "Wrong! The correct answer is highlighted in green"
                                }
                            }
                        }
                        if let Some(label) = counter_label {
                            p { class: "quiz-counter", "{label}" }
                        }
                    } else {
                        p { class: "quiz-loading", "Loading questions..." }
                    }
                },
            }
        }
    }
}

#[component]
fn AnswerButton(
    text: String,
    index: usize,
    is_selected: bool,
    is_correct_option: bool,
    is_answered: bool,
    on_select: EventHandler<usize>,
) -> Element {
    // Once answered: the correct option goes green, a wrong selection red,
    // everything else stays neutral.
    let class = if !is_answered {
        "answer-btn"
    } else if is_correct_option {
        "answer-btn answer-btn--correct"
    } else if is_selected {
        "answer-btn answer-btn--wrong"
    } else {
        "answer-btn answer-btn--neutral"
    };

    rsx! {
        button {
            class: "{class}",
            r#type: "button",
            disabled: is_answered,
            onclick: move |_| {
                if !is_answered {
                    on_select.call(index);
                }
            },
            "{text}"
        }
    }
}

#[component]
fn CompletedView(score: usize, total: usize, on_restart: EventHandler<()>) -> Element {
    rsx! {
        div { class: "quiz-complete",
            h2 { class: "quiz-complete__title", "Quiz Completed!" }
            p { class: "quiz-complete__score", "Your score: {score}/{total}" }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| on_restart.call(()),
                "Restart Quiz"
            }
        }
    }
}
