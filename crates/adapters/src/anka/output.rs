// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decoding of `anka --machine-readable` output.
//!
//! Every command prints a JSON envelope on stdout:
//!
//! ```text
//! {"status": "OK", "body": {...}, "message": ""}
//! {"status": "ERROR", "code": 2, "message": "VM not found"}
//! ```
//!
//! A command succeeds only when it exits zero and the envelope says `OK`.

use anka_core::ClientError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    body: Value,
    #[serde(default)]
    message: String,
}

/// Turn a finished invocation into its response body or a client error
pub(crate) fn parse(
    command: &str,
    exit_code: Option<i32>,
    stdout: &[u8],
    stderr: &[u8],
) -> Result<Value, ClientError> {
    let success = exit_code == Some(0);
    let stdout = String::from_utf8_lossy(stdout);
    let stdout = stdout.trim();
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();

    let failed = |message: String| ClientError::CommandFailed {
        command: command.to_string(),
        message,
    };
    let exit_message = || match exit_code {
        Some(code) => format!("exited with status {}", code),
        None => "terminated by signal".to_string(),
    };

    if stdout.is_empty() {
        if success {
            return Ok(Value::Null);
        }
        return Err(failed(non_empty(stderr).unwrap_or_else(exit_message)));
    }

    match serde_json::from_str::<Envelope>(stdout) {
        Ok(envelope) if success && envelope.status.eq_ignore_ascii_case("ok") => Ok(envelope.body),
        Ok(envelope) => Err(failed(
            non_empty(&envelope.message)
                .or_else(|| non_empty(stderr))
                .unwrap_or_else(|| format!("status {}", envelope.status)),
        )),
        Err(_) if !success => Err(failed(non_empty(stderr).unwrap_or_else(|| stdout.to_string()))),
        Err(e) => Err(ClientError::InvalidOutput {
            command: command.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Deserialize a response body into a typed response
pub(crate) fn decode<T: DeserializeOwned>(command: &str, body: Value) -> Result<T, ClientError> {
    serde_json::from_value(body).map_err(|e| ClientError::InvalidOutput {
        command: command.to_string(),
        message: e.to_string(),
    })
}

/// Extract the image ID from a `create-disk` body.
///
/// Older releases print the bare ID, newer ones an object.
pub(crate) fn image_id(command: &str, body: Value) -> Result<String, ClientError> {
    let id = match &body {
        Value::String(id) => Some(id.clone()),
        Value::Object(fields) => fields
            .get("image_id")
            .or_else(|| fields.get("uuid"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };

    id.filter(|id| !id.is_empty())
        .ok_or_else(|| ClientError::InvalidOutput {
            command: command.to_string(),
            message: format!("no image id in {}", body),
        })
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
