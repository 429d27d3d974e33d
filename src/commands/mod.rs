//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `runtime.rs` — intake/profile/builder/roi/jobs/cert/doc/onboarding/auth.
//! - `admin.rs` — the `train` command tree (chat streaming, feedback, corrections).
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod admin;
pub mod runtime;

pub use admin::handle_train_commands;
pub use runtime::handle_runtime_commands;

use crate::cli::Cli;
use crate::services::api::{ApiClient, Session, DEFAULT_API_BASE, DEFAULT_TIMEOUT_MS};
use crate::services::storage::ConfigFile;

/// Resolve the API client for a command: explicit `--api` wins, then
/// config.toml, then the hosted default.
pub(crate) fn api_client(
    cli: &Cli,
    config: &ConfigFile,
    session: &Session,
) -> anyhow::Result<ApiClient> {
    let base = cli
        .api
        .clone()
        .or_else(|| config.api_base.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let timeout = config.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
    ApiClient::new(&base, session.clone(), timeout)
}
