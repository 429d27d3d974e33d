//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `api.rs` — authenticated HTTP client + read-through response cache.
//! - `gateway.rs` — submission boundary: one POST, failure taxonomy, receipts.
//! - `derive.rs` — proposal derivation engine (keyword rules, sizing, clamp).
//! - `roi.rs` — ROI calculator over role lines and outsource split.
//! - `stream.rs` — SSE consumption for the training chat.
//! - `storage.rs` — local state/drafts/config persistence + audit log.
//! - `output.rs` — success and failure envelopes, JSON and text forms.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod api;
pub mod derive;
pub mod gateway;
pub mod output;
pub mod roi;
pub mod storage;
pub mod stream;
