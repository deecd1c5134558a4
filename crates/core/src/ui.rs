// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing output sink

#[cfg(any(test, feature = "test-support"))]
use std::sync::{Arc, Mutex};

/// Channel for messages meant for the person running the build.
///
/// `say` carries progress, `error` carries failures. Every halting
/// condition is reported through `error` before the pipeline stops.
pub trait Ui: Send + Sync {
    fn say(&self, message: &str);

    fn error(&self, message: &str);
}

/// Recorded UI message
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiMessage {
    Say(String),
    Error(String),
}

/// UI that records every message for assertions
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct RecordingUi {
    messages: Arc<Mutex<Vec<UiMessage>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded messages
    pub fn messages(&self) -> Vec<UiMessage> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Messages sent through the error channel
    pub fn errors(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                UiMessage::Error(text) => Some(text),
                UiMessage::Say(_) => None,
            })
            .collect()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Ui for RecordingUi {
    fn say(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(UiMessage::Say(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(UiMessage::Error(message.to_string()));
    }
}
