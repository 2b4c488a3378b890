//! Reddit API response shapes

use chrono::{DateTime, TimeZone, Utc};
use scrub_core::comment::Comment;
use scrub_core::error::{Result, ScrubError};
use serde::Deserialize;
use serde_json::Value;

/// Kind prefix of comment fullnames
pub const COMMENT_KIND: &str = "t1";

/// `t1_<id>` fullname for a bare comment id
pub fn fullname(id: &str) -> String {
    if id.starts_with("t1_") {
        id.to_string()
    } else {
        format!("{}_{}", COMMENT_KIND, id)
    }
}

/// `/api/v1/access_token` response. Reddit reports bad credentials with
/// a 200 status and an `error` field, which may be a string or a number.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
    pub error: Option<Value>,
}

/// `/api/v1/me` response
#[derive(Debug, Deserialize)]
pub struct MeResponse {
    pub name: String,
}

/// A listing envelope
#[derive(Debug, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
pub struct ListingData<T> {
    pub after: Option<String>,
    pub children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Thing<T> {
    pub kind: String,
    pub data: T,
}

/// Comment fields we use from a `t1` thing
#[derive(Debug, Deserialize)]
pub struct CommentData {
    pub id: String,
    #[serde(default)]
    pub body: String,
    pub created_utc: f64,
    #[serde(default)]
    pub subreddit: String,
}

impl CommentData {
    pub fn created_at(&self) -> Result<DateTime<Utc>> {
        Utc.timestamp_opt(self.created_utc as i64, 0)
            .single()
            .ok_or_else(|| {
                ScrubError::Validation(format!(
                    "comment {} has invalid timestamp {}",
                    self.id, self.created_utc
                ))
            })
    }

    pub fn into_comment(self) -> Result<Comment> {
        let created_at = self.created_at()?;
        Ok(Comment::new(self.id, self.body, created_at, self.subreddit))
    }
}

/// `api_type=json` envelope returned by write endpoints
#[derive(Debug, Default, Deserialize)]
pub struct JsonEnvelope {
    #[serde(default)]
    pub json: JsonErrors,
}

#[derive(Debug, Default, Deserialize)]
pub struct JsonErrors {
    #[serde(default)]
    pub errors: Vec<Vec<Value>>,
}

impl JsonEnvelope {
    /// Error messages joined into one line, if any
    pub fn error_message(&self) -> Option<String> {
        if self.json.errors.is_empty() {
            return None;
        }

        let messages: Vec<String> = self
            .json
            .errors
            .iter()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(": ")
            })
            .collect();
        Some(messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fullname() {
        assert_eq!(fullname("abc"), "t1_abc");
        assert_eq!(fullname("t1_abc"), "t1_abc");
    }

    #[test]
    fn test_parse_listing() {
        let json = r#"{
            "kind": "Listing",
            "data": {
                "after": "t1_b",
                "children": [
                    {"kind": "t1", "data": {"id": "a", "name": "t1_a", "body": "hello", "created_utc": 1700000000.0, "subreddit": "rust"}}
                ]
            }
        }"#;
        let listing: Listing<CommentData> = serde_json::from_str(json).unwrap();
        assert_eq!(listing.data.after.as_deref(), Some("t1_b"));
        assert_eq!(listing.data.children[0].kind, "t1");

        let comment = listing
            .data
            .children
            .into_iter()
            .next()
            .unwrap()
            .data
            .into_comment()
            .unwrap();
        assert_eq!(comment.id.as_str(), "a");
        assert_eq!(comment.forum, "rust");
        assert_eq!(comment.created_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_token_error_as_number_or_string() {
        let t: TokenResponse = serde_json::from_str(r#"{"error": "invalid_grant"}"#).unwrap();
        assert!(t.access_token.is_none());
        assert_eq!(t.error.unwrap().as_str(), Some("invalid_grant"));

        let t: TokenResponse =
            serde_json::from_str(r#"{"message": "Unauthorized", "error": 401}"#).unwrap();
        assert_eq!(t.error.unwrap().as_u64(), Some(401));
    }

    #[test]
    fn test_json_envelope_errors() {
        let ok: JsonEnvelope = serde_json::from_str(r#"{"json": {"errors": []}}"#).unwrap();
        assert_eq!(ok.error_message(), None);

        let empty: JsonEnvelope = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.error_message(), None);

        let err: JsonEnvelope = serde_json::from_str(
            r#"{"json": {"errors": [["TOO_LONG", "this is too long", "text"]]}}"#,
        )
        .unwrap();
        assert_eq!(
            err.error_message().as_deref(),
            Some("TOO_LONG: this is too long: text")
        );
    }
}
