// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal UI for build progress

use anka_core::Ui;

const PREFIX: &str = "==> anka:";

/// Prints build messages as `==> anka: <message>` lines.
///
/// Errors always go to stderr. Progress goes to stdout unless the command
/// output needs stdout to itself.
pub struct ConsoleUi {
    progress_on_stdout: bool,
}

impl ConsoleUi {
    pub fn new(progress_on_stdout: bool) -> Self {
        Self { progress_on_stdout }
    }
}

fn line(message: &str) -> String {
    format!("{} {}", PREFIX, message)
}

impl Ui for ConsoleUi {
    fn say(&self, message: &str) {
        if self.progress_on_stdout {
            println!("{}", line(message));
        } else {
            eprintln!("{}", line(message));
        }
    }

    fn error(&self, message: &str) {
        eprintln!("{}", line(message));
    }
}
