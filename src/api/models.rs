//! Wire types for the content and UGC endpoints.
//!
//! Responses are narrowed from `serde_json::Value` by hand: the content
//! endpoints have no contract the client can rely on, so anything that does
//! not look like the expected shape collapses to an empty list.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A compound reference as returned by the content lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peptide {
    pub slug: String,
    pub title: String,
}

impl Peptide {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
        }
    }

    /// `Title (slug)`, the form used in submission text.
    pub fn label(&self) -> String {
        format!("{} ({})", self.title, self.slug)
    }
}

impl fmt::Display for Peptide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The `type` field of a UGC submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Peptide,
    Blend,
    Stack,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Peptide => "peptide",
            EntityType::Blend => "blend",
            EntityType::Stack => "stack",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "peptide" => Ok(EntityType::Peptide),
            "blend" => Ok(EntityType::Blend),
            "stack" => Ok(EntityType::Stack),
            other => Err(format!("unknown entity type '{}'", other)),
        }
    }
}

/// Body of `POST /api/ugc/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub slug: String,
    pub username: String,
    pub text: String,
    pub ack_no_dosing: bool,
}

/// Error codes the moderation endpoint reports on rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionCode {
    ContainsDosingOrProtocol,
    AckRequired,
    Other(String),
}

impl RejectionCode {
    pub const FALLBACK: &'static str = "submit_failed";

    pub fn from_code(code: &str) -> Self {
        match code {
            "contains_dosing_or_protocol" => RejectionCode::ContainsDosingOrProtocol,
            "ack_required" => RejectionCode::AckRequired,
            other => RejectionCode::Other(other.to_string()),
        }
    }

    /// Reads the `error` field of a rejection body. Bodies that are not JSON,
    /// or carry no string code, map to the generic fallback.
    pub fn from_body(body: &[u8]) -> Self {
        let code = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| Self::FALLBACK.to_string());
        Self::from_code(&code)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RejectionCode::ContainsDosingOrProtocol => "contains_dosing_or_protocol",
            RejectionCode::AckRequired => "ack_required",
            RejectionCode::Other(code) => code,
        }
    }
}

/// An approved community note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: String,
    pub username: String,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Narrows a `GET /api/content/peptides` body to a peptide list.
pub fn parse_peptides(body: &Value) -> Vec<Peptide> {
    let Some(items) = body.get("peptides").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let slug = non_empty_str(item, "slug")?;
            let title = non_empty_str(item, "title").unwrap_or(slug);
            Some(Peptide::new(slug, title))
        })
        .collect()
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .filter(|ms| *ms > 0)
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

/// Narrows a `GET /api/ugc/list` body to the approved posts it carries.
pub fn parse_posts(body: &Value) -> Vec<CommunityPost> {
    let Some(items) = body.get("posts").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let id = non_empty_str(item, "id")?;
            let username = non_empty_str(item, "username")?;
            let text = non_empty_str(item, "text")?;
            let created_at = item
                .get("createdAt")
                .or_else(|| item.get("created_at"))
                .and_then(parse_timestamp);
            Some(CommunityPost {
                id: id.to_string(),
                username: username.to_string(),
                text: text.to_string(),
                created_at,
            })
        })
        .collect()
}
