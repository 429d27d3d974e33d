//! Output discipline for every command, success and failure alike.
//!
//! Under `--json`, stdout carries exactly one envelope: `{"ok": true, "data"}`
//! or `{"ok": false, "error": {code, message}}`. In text mode, successes print
//! rows on stdout and failures print a titled, recoverable notification on
//! stderr; raw errors and stack traces never reach the terminal.

use serde::Serialize;

use crate::domain::models::{ErrorBody, ErrorOut, JsonOut};
use crate::services::gateway::GatewayError;
use crate::wizard::WizardError;

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

/// Stable machine-readable code for a failed command.
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(g) = err.downcast_ref::<GatewayError>() {
        return g.code();
    }
    if let Some(w) = err.downcast_ref::<WizardError>() {
        return match w {
            WizardError::StepRejected { .. } => "VALIDATION_FAILED",
            WizardError::StepOutOfRange(..) => "STEP_OUT_OF_RANGE",
            WizardError::UndeclaredField { .. } => "SCHEMA_MISMATCH",
        };
    }
    "UNKNOWN"
}

fn failure_envelope(err: &anyhow::Error) -> ErrorOut {
    ErrorOut {
        ok: false,
        error: ErrorBody {
            code: error_code(err).to_string(),
            message: format!("{:#}", err),
        },
    }
}

fn failure_text(err: &anyhow::Error) -> String {
    match err.downcast_ref::<GatewayError>() {
        Some(g) => format!("{}: {}", g.title(), g.description()),
        None => format!("error: {:#}", err),
    }
}

pub fn print_fail(json: bool, err: &anyhow::Error) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&failure_envelope(err))
                .unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
    } else {
        eprintln!("{}", failure_text(err));
    }
}
