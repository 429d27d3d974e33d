use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub ok: bool,
    pub error: ErrorBody,
}

/// Locally persisted client state. `flags` carries the onboarding sentinels
/// (`onboarding_skipped_<user>` / `onboarding_completed_<user>` -> "true").
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct State {
    #[serde(default)]
    pub flags: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct OnboardingReport {
    pub user: String,
    pub status: String,
}

/// Result of validating one wizard step through the CLI.
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub flow: String,
    pub step: usize,
    pub title: String,
    pub check: crate::wizard::StepCheck,
}

/// Where a draft's cursor landed after an `intake next`/`back` move.
/// `step` is 1-based to match the rendered wizard; `check` is the outcome of
/// the step that gated the move (always ok for `back`).
#[derive(Debug, Serialize)]
pub struct CursorReport {
    pub flow: String,
    pub step: usize,
    pub title: String,
    pub at_end: bool,
    pub check: crate::wizard::StepCheck,
}

#[derive(Debug, Serialize)]
pub struct SubmissionReport {
    pub id: String,
    pub next: String,
}

#[derive(Debug, Serialize)]
pub struct AuthRedirect {
    pub provider: String,
    pub redirect_url: String,
}

/// Certification payloads for the talent profile endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificationPayload {
    pub name: String,
    pub issuer: String,
    pub year: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub name: String,
    pub url: String,
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackPayload {
    pub log_id: String,
    pub verdict: String,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CorrectionPayload {
    pub log_id: String,
    pub corrected_response: String,
}
