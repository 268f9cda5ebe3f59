// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ApplicationRecord, SortKey, SortSpec, TableView};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data from api";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Error(String),
    Ready(TableView),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn view(&self) -> Option<&TableView> {
        match self {
            Self::Ready(view) => Some(view),
            Self::Loading | Self::Error(_) => None,
        }
    }

    fn view_mut(&mut self) -> Option<&mut TableView> {
        match self {
            Self::Ready(view) => Some(view),
            Self::Loading | Self::Error(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub load: LoadState,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            load: LoadState::Loading,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// The error carries the underlying cause; the state only keeps
    /// [`FETCH_FAILED_MESSAGE`].
    LoadFinished(Result<Vec<ApplicationRecord>, String>),
    ApplyQuery(String),
    SortBy(SortKey),
    SelectPage(usize),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Loaded { records: usize },
    LoadFailed,
    QueryApplied { matches: usize },
    Sorted(SortSpec),
    PageChanged(usize),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::LoadFinished(result) => self.finish_load(result),
            AppCommand::ApplyQuery(query) => {
                let Some(view) = self.load.view_mut() else {
                    return Vec::new();
                };
                if !view.apply_query(&query) {
                    return Vec::new();
                }
                vec![AppEvent::QueryApplied {
                    matches: view.derived().len(),
                }]
            }
            AppCommand::SortBy(key) => {
                let Some(view) = self.load.view_mut() else {
                    return Vec::new();
                };
                let direction = view.sort_by(key);
                vec![AppEvent::Sorted(SortSpec { key, direction })]
            }
            AppCommand::SelectPage(page) => {
                let Some(view) = self.load.view_mut() else {
                    return Vec::new();
                };
                let before = view.page();
                let selected = view.select_page(page);
                if selected == before {
                    return Vec::new();
                }
                vec![AppEvent::PageChanged(selected)]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn finish_load(&mut self, result: Result<Vec<ApplicationRecord>, String>) -> Vec<AppEvent> {
        if !self.load.is_loading() {
            tracing::debug!("ignoring load result after the initial load settled");
            return Vec::new();
        }

        match result {
            Ok(records) => {
                let count = records.len();
                self.load = LoadState::Ready(TableView::new(records));
                vec![AppEvent::Loaded { records: count }]
            }
            Err(_) => {
                self.load = LoadState::Error(FETCH_FAILED_MESSAGE.to_owned());
                vec![AppEvent::LoadFailed]
            }
        }
    }

    fn set_status(&mut self, message: String) -> AppEvent {
        self.status_line = Some(message.clone());
        AppEvent::StatusUpdated(message)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState, FETCH_FAILED_MESSAGE, LoadState};
    use crate::{ApplicationRecord, FieldValue, SortDirection, SortKey, SortSpec};

    fn named(name: &str) -> ApplicationRecord {
        ApplicationRecord {
            applicant_name: Some(FieldValue::text(name)),
            ..ApplicationRecord::default()
        }
    }

    fn ready_state(count: usize) -> AppState {
        let mut state = AppState::default();
        let records = (0..count).map(|index| named(&format!("Student {index}"))).collect();
        state.dispatch(AppCommand::LoadFinished(Ok(records)));
        state
    }

    #[test]
    fn starts_loading() {
        let state = AppState::default();
        assert_eq!(state.load, LoadState::Loading);
        assert!(state.load.view().is_none());
    }

    #[test]
    fn successful_load_becomes_ready() {
        let mut state = AppState::default();
        let events = state.dispatch(AppCommand::LoadFinished(Ok(vec![named("Ali")])));
        assert_eq!(events, vec![AppEvent::Loaded { records: 1 }]);
        let view = state.load.view().expect("ready view");
        assert_eq!(view.raw().len(), 1);
        assert_eq!(view.derived().len(), 1);
    }

    #[test]
    fn failed_load_keeps_only_the_fixed_message() {
        let mut state = AppState::default();
        let events = state.dispatch(AppCommand::LoadFinished(Err(
            "server returned 500".to_owned(),
        )));
        assert_eq!(events, vec![AppEvent::LoadFailed]);
        assert_eq!(state.load, LoadState::Error(FETCH_FAILED_MESSAGE.to_owned()));
        assert!(!state.load.is_loading());
    }

    #[test]
    fn empty_load_is_ready_not_an_error() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::LoadFinished(Ok(Vec::new())));
        let view = state.load.view().expect("ready view");
        assert!(view.current_rows().is_empty());
        assert_eq!(view.last_page(), 1);
    }

    #[test]
    fn second_load_result_is_ignored() {
        let mut state = ready_state(3);
        let events = state.dispatch(AppCommand::LoadFinished(Err("late".to_owned())));
        assert!(events.is_empty());
        assert_eq!(state.load.view().map(|view| view.raw().len()), Some(3));
    }

    #[test]
    fn view_commands_are_ignored_until_ready() {
        let mut state = AppState::default();
        assert!(state.dispatch(AppCommand::ApplyQuery("x".to_owned())).is_empty());
        assert!(state.dispatch(AppCommand::SortBy(SortKey::ApplicationNo)).is_empty());
        assert!(state.dispatch(AppCommand::SelectPage(2)).is_empty());
        assert_eq!(state.load, LoadState::Loading);
    }

    #[test]
    fn query_sort_and_page_transitions() {
        let mut state = ready_state(25);

        assert_eq!(
            state.dispatch(AppCommand::SelectPage(3)),
            vec![AppEvent::PageChanged(3)]
        );
        assert!(state.dispatch(AppCommand::SelectPage(3)).is_empty());

        assert_eq!(
            state.dispatch(AppCommand::SortBy(SortKey::ApplicantName)),
            vec![AppEvent::Sorted(SortSpec {
                key: SortKey::ApplicantName,
                direction: SortDirection::Asc,
            })]
        );

        assert_eq!(
            state.dispatch(AppCommand::ApplyQuery("student 2".to_owned())),
            vec![AppEvent::QueryApplied { matches: 6 }]
        );
        let view = state.load.view().expect("ready view");
        assert_eq!(view.page(), 1);
        assert!(!view.is_sort_applied());

        assert_eq!(
            state.dispatch(AppCommand::SortBy(SortKey::ApplicantName)),
            vec![AppEvent::Sorted(SortSpec {
                key: SortKey::ApplicantName,
                direction: SortDirection::Desc,
            })]
        );
    }

    #[test]
    fn status_set_and_clear() {
        let mut state = AppState::default();
        assert_eq!(
            state.dispatch(AppCommand::SetStatus("sort unavailable".to_owned())),
            vec![AppEvent::StatusUpdated("sort unavailable".to_owned())]
        );
        assert_eq!(state.status_line.as_deref(), Some("sort unavailable"));
        assert_eq!(
            state.dispatch(AppCommand::ClearStatus),
            vec![AppEvent::StatusCleared]
        );
        assert_eq!(state.status_line, None);
    }
}
