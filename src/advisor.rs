//! Optional column-mapping hint from a hosted model.
//!
//! Advisory only: the pipeline never depends on the result, the call is
//! timeout-bounded, and every failure path degrades to `None` with a logged
//! warning. Callers that want a different advisor can ignore this module and
//! map headers themselves.

use crate::headers::CANONICAL_FIELDS;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

const API_KEY_VAR: &str = "GEMINI_API_KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

fn load_env() {
    let _ = dotenvy::dotenv();
}

/// Suggested surface-header -> canonical-field mapping with a confidence score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingHint {
    pub column_mapping: HashMap<String, String>,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Ask the configured model how the given surface headers map onto the
/// canonical fields. Returns `None` when no API key is configured, the call
/// fails or times out, or the response is not usable.
pub fn suggest_column_mapping(headers: &[String]) -> Option<MappingHint> {
    load_env();
    let key = match std::env::var(API_KEY_VAR) {
        Ok(k) if !k.trim().is_empty() => k,
        _ => {
            log::debug!("{} not set; skipping mapping advisor", API_KEY_VAR);
            return None;
        }
    };

    let client = match Client::builder().timeout(REQUEST_TIMEOUT).build() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Mapping advisor client build failed: {}", e);
            return None;
        }
    };

    let prompt = format!(
        "Given spreadsheet column headers {:?}, return JSON with a \
         \"column_mapping\" object mapping each header to one of {:?}, \
         plus a numeric \"confidence\" and a short \"reasoning\".",
        headers, CANONICAL_FIELDS
    );
    let body = serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    });

    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key={}",
        key
    );
    let response = match client.post(&url).json(&body).send() {
        Ok(r) => r,
        Err(e) => {
            log::warn!("Mapping advisor request failed: {}", e);
            return None;
        }
    };
    if !response.status().is_success() {
        log::warn!("Mapping advisor returned HTTP {}", response.status());
        return None;
    }
    let payload: serde_json::Value = match response.json() {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Mapping advisor sent invalid JSON: {}", e);
            return None;
        }
    };

    let text = payload
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())?;

    parse_hint(text)
}

/// Pull a `MappingHint` out of model output. Tolerates surrounding prose and
/// markdown fences by scanning for the outermost JSON object.
fn parse_hint(text: &str) -> Option<MappingHint> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(&text[start..=end]).ok()?;

    let mapping = value.get("column_mapping")?.as_object()?;
    let column_mapping: HashMap<String, String> = mapping
        .iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect();
    if column_mapping.is_empty() {
        return None;
    }
    Some(MappingHint {
        column_mapping,
        confidence: value.get("confidence").and_then(|c| c.as_f64()).unwrap_or(0.0),
        reasoning: value
            .get("reasoning")
            .and_then(|r| r.as_str())
            .map(|s| s.to_string()),
    })
}
