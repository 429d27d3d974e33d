use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Duration;

use crate::services::gateway::{classify_response, classify_transport, GatewayError};
use crate::services::storage::cache_dir;

pub const DEFAULT_API_BASE: &str = "https://api.workbridge.io";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Explicit session value threaded from `main` into every handler that talks
/// to the API. No ambient globals; a command either receives a session or
/// cannot authenticate.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: String,
    pub token: Option<String>,
}

pub struct ApiClient {
    base: String,
    http: Client,
    session: Session,
}

impl ApiClient {
    pub fn new(base: &str, session: Session, timeout_ms: u64) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn read_json(resp: Response) -> Result<Value, GatewayError> {
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| GatewayError::Unknown(e.to_string()))?;
        if (200..300).contains(&status) {
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&body)
                .map_err(|e| GatewayError::Unknown(format!("malformed response body: {}", e)))
        } else {
            Err(classify_response(status, &body))
        }
    }

    pub fn post_json<T: Serialize>(&self, path: &str, payload: &T) -> Result<Value, GatewayError> {
        let resp = self
            .authed(self.http.post(self.url(path)).json(payload))
            .send()
            .map_err(|e| classify_transport(&e))?;
        Self::read_json(resp)
    }

    pub fn put_json<T: Serialize>(&self, path: &str, payload: &T) -> Result<Value, GatewayError> {
        let resp = self
            .authed(self.http.put(self.url(path)).json(payload))
            .send()
            .map_err(|e| classify_transport(&e))?;
        Self::read_json(resp)
    }

    pub fn delete(&self, path: &str) -> Result<Value, GatewayError> {
        let resp = self
            .authed(self.http.delete(self.url(path)))
            .send()
            .map_err(|e| classify_transport(&e))?;
        Self::read_json(resp)
    }

    /// GET with a read-through cache keyed by logical resource name. A fresh
    /// response refreshes the cache; a transport failure is served from the
    /// cache when one exists so list views degrade instead of erroring.
    /// Query encoding is reqwest's; `resource` is only a cache identity.
    pub fn get_cached(
        &self,
        resource: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, GatewayError> {
        match self.authed(self.http.get(self.url(path)).query(query)).send() {
            Ok(resp) => {
                let value = Self::read_json(resp)?;
                if let Ok(cache) = resource_cache_path(resource) {
                    if let Some(parent) = cache.parent() {
                        let _ = std::fs::create_dir_all(parent);
                    }
                    let _ = std::fs::write(cache, value.to_string());
                }
                Ok(value)
            }
            Err(e) => match read_cached(resource) {
                Some(value) => Ok(value),
                None => Err(classify_transport(&e)),
            },
        }
    }

    /// Drop the cached copy of a resource after a successful mutation so the
    /// next read re-fetches.
    pub fn invalidate(&self, resource: &str) {
        if let Ok(cache) = resource_cache_path(resource) {
            let _ = std::fs::remove_file(cache);
        }
    }

    pub fn raw_post<T: Serialize>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, GatewayError> {
        let resp = self
            .authed(self.http.post(self.url(path)).json(payload))
            .send()
            .map_err(|e| classify_transport(&e))?;
        let status = resp.status().as_u16();
        if (200..300).contains(&status) {
            Ok(resp)
        } else {
            let body = resp.text().unwrap_or_default();
            Err(classify_response(status, &body))
        }
    }
}

fn resource_cache_path(resource: &str) -> anyhow::Result<PathBuf> {
    let mut hasher = Sha256::new();
    hasher.update(resource.as_bytes());
    let id = hex::encode(hasher.finalize());
    Ok(cache_dir()?.join(format!("{}.json", id)))
}

fn read_cached(resource: &str) -> Option<Value> {
    let path = resource_cache_path(resource).ok()?;
    let raw = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}
