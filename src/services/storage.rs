use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

use crate::domain::models::State;

pub fn audit(action: &str, data: serde_json::Value) {
    let home = match std::env::var("HOME") {
        Ok(h) => h,
        Err(_) => return,
    };
    let path = PathBuf::from(home).join(".config/workbridge/audit.jsonl");
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let event = serde_json::json!({
        "ts": unix_now(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}

fn unix_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    ts.to_string()
}

fn config_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/workbridge"))
}

fn state_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("state.json"))
}

fn drafts_dir() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("drafts"))
}

pub fn cache_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".cache/workbridge"))
}

pub fn load_state() -> anyhow::Result<State> {
    let p = state_path()?;
    if !p.exists() {
        return Ok(State::default());
    }
    let raw = std::fs::read_to_string(p)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_state(s: &State) -> anyhow::Result<()> {
    let p = state_path()?;
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(p, serde_json::to_string_pretty(s)?)?;
    Ok(())
}

// Onboarding flags keep the upstream web client's localStorage contract:
// "true" string sentinels keyed by user id.

pub fn onboarding_flag(state: &State, kind: &str, user: &str) -> bool {
    state
        .flags
        .get(&format!("onboarding_{}_{}", kind, user))
        .map(|v| v == "true")
        .unwrap_or(false)
}

pub fn set_onboarding_flag(state: &mut State, kind: &str, user: &str) {
    state
        .flags
        .insert(format!("onboarding_{}_{}", kind, user), "true".to_string());
}

pub fn clear_onboarding_flags(state: &mut State, user: &str) {
    let suffix = format!("_{}", user);
    let keys: Vec<String> = state
        .flags
        .keys()
        .filter(|k| k.starts_with("onboarding_") && k.ends_with(&suffix))
        .cloned()
        .collect();
    for k in keys {
        state.flags.remove(&k);
    }
}

/// A saved wizard draft: the answers plus the step the user left off at.
/// Older drafts without a `step` resume at the first step.
#[derive(Debug, serde::Deserialize, Serialize)]
pub struct Draft<T> {
    pub form: T,
    #[serde(default)]
    pub step: usize,
}

pub fn save_draft<T: Serialize>(flow: &str, form: &T) -> anyhow::Result<PathBuf> {
    let dir = drafts_dir()?;
    std::fs::create_dir_all(&dir)?;
    let p = dir.join(format!("{}.json", flow));
    std::fs::write(&p, serde_json::to_string_pretty(form)?)?;
    Ok(p)
}

pub fn load_draft<T: DeserializeOwned>(flow: &str) -> anyhow::Result<Option<T>> {
    let p = drafts_dir()?.join(format!("{}.json", flow));
    if !p.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(p)?;
    Ok(Some(serde_json::from_str(&raw)?))
}

pub fn discard_draft(flow: &str) -> anyhow::Result<bool> {
    let p = drafts_dir()?.join(format!("{}.json", flow));
    if p.exists() {
        std::fs::remove_file(p)?;
        return Ok(true);
    }
    Ok(false)
}

#[derive(Debug, serde::Deserialize, Default)]
#[serde(default)]
pub struct ConfigFile {
    pub api_base: Option<String>,
    pub timeout_ms: Option<u64>,
    pub default_user: Option<String>,
    pub token: Option<String>,
}

pub fn load_config() -> anyhow::Result<ConfigFile> {
    let path = config_dir()?.join("config.toml");
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}
