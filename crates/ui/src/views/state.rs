use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// Fetch failed for any reason; every provider error kind lands here so
    /// the user sees one generic message with a retry affordance.
    LoadFailed,
    /// The fetch succeeded but the batch was empty. Distinct from an error
    /// and from normal completion.
    NoQuestions,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::LoadFailed => "Failed to load questions. Please try again.",
            ViewError::NoQuestions => "No questions available",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::LoadFailed),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
