use std::io::{BufRead, BufReader};

use crate::services::api::ApiClient;
use crate::services::gateway::GatewayError;

/// One parsed server-sent event from the training chat stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SsePart {
    Token(String),
    Done,
}

/// Parse a single SSE line. Only `data: ` lines carry payload; the payload is
/// JSON with a `text` field, except the literal `[DONE]` terminator.
/// Anything malformed is skipped rather than fatal.
pub fn parse_sse_line(line: &str) -> Option<SsePart> {
    let payload = line.strip_prefix("data: ")?;
    if payload == "[DONE]" {
        return Some(SsePart::Done);
    }
    let value: serde_json::Value = serde_json::from_str(payload).ok()?;
    let text = value.get("text")?.as_str()?;
    Some(SsePart::Token(text.to_string()))
}

/// Drain an SSE body into a transcript, invoking `on_token` for each token in
/// arrival order. Stops at `[DONE]` or end of stream.
pub fn consume<R: BufRead>(
    reader: R,
    mut on_token: impl FnMut(&str),
) -> std::io::Result<String> {
    let mut transcript = String::new();
    for line in reader.lines() {
        let line = line?;
        match parse_sse_line(&line) {
            Some(SsePart::Done) => break,
            Some(SsePart::Token(text)) => {
                on_token(&text);
                transcript.push_str(&text);
            }
            None => continue,
        }
    }
    Ok(transcript)
}

/// POST a chat message to the training endpoint and stream the reply.
pub fn stream_chat(
    api: &ApiClient,
    message: &str,
    on_token: impl FnMut(&str),
) -> Result<String, GatewayError> {
    let payload = serde_json::json!({ "message": message });
    let resp = api.raw_post("/api/train/chat/stream", &payload)?;
    consume(BufReader::new(resp), on_token).map_err(|e| GatewayError::Network(e.to_string()))
}
