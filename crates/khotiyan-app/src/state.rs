// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — reactive signals for the Dioxus UI.

use khotiyan_core::{AppConfig, OutputRecord};

use crate::services::app_services::AppServices;

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Application settings; each tool page starts from these.
    pub config: AppConfig,
    /// Results saved during this session, newest first.
    pub history: Vec<OutputRecord>,
}

impl AppState {
    /// Create initial state from the backend services.
    pub fn new(svc: &AppServices) -> Self {
        Self {
            config: svc.config(),
            history: Vec::new(),
        }
    }

    /// Remember a saved output, if history is enabled.
    pub fn record(&mut self, record: OutputRecord) {
        if self.config.keep_history {
            self.history.insert(0, record);
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use khotiyan_core::ToolKind;

    fn record(name: &str) -> OutputRecord {
        OutputRecord::new(ToolKind::Compress, name.into(), 10, "00".into())
    }

    #[test]
    fn newest_first() {
        let mut state = AppState::default();
        state.record(record("a.png"));
        state.record(record("b.png"));
        let names: Vec<_> = state.history.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, ["b.png", "a.png"]);
        state.clear_history();
        assert!(state.history.is_empty());
    }

    #[test]
    fn history_can_be_disabled() {
        let mut state = AppState::default();
        state.config.keep_history = false;
        state.record(record("a.png"));
        assert!(state.history.is_empty());
    }
}
