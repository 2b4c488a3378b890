//! Reddit OAuth client
//!
//! Script-app password grant against `www.reddit.com`, then bearer-token
//! calls against `oauth.reddit.com`. Blocking, one request at a time.

use crate::models::{fullname, CommentData, JsonEnvelope, Listing, MeResponse, TokenResponse};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use scrub_core::comment::Comment;
use scrub_core::config::RedditConfig;
use scrub_core::error::{Result, ScrubError};
use scrub_core::platform::CommentPlatform;
use scrub_core::types::{CommentId, Identity};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Page size for listing requests (Reddit maximum)
pub const PAGE_SIZE: u32 = 100;

/// Refresh the token this long before Reddit says it expires
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Longest response body quoted in error messages
const MAX_ERROR_BODY: usize = 200;

struct AccessToken {
    value: String,
    expires_at: Option<Instant>,
}

impl AccessToken {
    fn is_expired(&self) -> bool {
        self.expires_at
            .map(|at| Instant::now() + TOKEN_REFRESH_MARGIN >= at)
            .unwrap_or(false)
    }
}

/// Authenticated Reddit client
pub struct RedditClient {
    http: Client,
    config: RedditConfig,
    identity: Identity,
    token: RefCell<AccessToken>,
}

impl RedditClient {
    /// Log in with the configured script-app credentials and resolve the account name
    pub fn authenticate(config: &RedditConfig) -> Result<Self> {
        config.validate_credentials()?;

        let http = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| ScrubError::Http(format!("failed to build HTTP client: {}", e)))?;

        let token = request_token(&http, config)?;
        let mut client = Self {
            http,
            config: config.clone(),
            identity: Identity::new(config.username.clone()),
            token: RefCell::new(token),
        };

        let me: MeResponse = client.get("/api/v1/me", &[])?;
        info!("Authenticated as {}", me.name);
        client.identity = Identity::new(me.name);

        Ok(client)
    }

    fn api(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn bearer(&self) -> Result<String> {
        if self.token.borrow().is_expired() {
            debug!("Access token expired, re-authenticating");
            let fresh = request_token(&self.http, &self.config)?;
            *self.token.borrow_mut() = fresh;
        }
        Ok(self.token.borrow().value.clone())
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        debug!("GET {} {:?}", path, query);
        let response = self
            .http
            .get(self.api(path))
            .bearer_auth(self.bearer()?)
            .query(query)
            .send()
            .map_err(|e| ScrubError::Http(e.to_string()))?;

        let body = read_body(response)?;
        Ok(serde_json::from_str(&body)?)
    }

    fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<String> {
        debug!("POST {}", path);
        let response = self
            .http
            .post(self.api(path))
            .bearer_auth(self.bearer()?)
            .form(form)
            .send()
            .map_err(|e| ScrubError::Http(e.to_string()))?;

        read_body(response)
    }

    /// Fetch one page of a user's comments, newest first
    fn comment_page(&self, user: &str, after: Option<&str>) -> Result<Listing<CommentData>> {
        let mut query = vec![
            ("limit", PAGE_SIZE.to_string()),
            ("sort", "new".to_string()),
            ("raw_json", "1".to_string()),
        ];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }
        self.get(&format!("/user/{}/comments", user), &query)
    }
}

impl CommentPlatform for RedditClient {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Follows `after` cursors until the listing runs out. Reddit caps any
    /// listing at roughly 1000 items.
    fn list_comments(&self, user: &Identity) -> Result<Vec<Comment>> {
        let mut comments = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let page = self.comment_page(&user.name, after.as_deref())?;
            let count = page.data.children.len();

            for thing in page.data.children {
                if thing.kind == crate::models::COMMENT_KIND {
                    comments.push(thing.data.into_comment()?);
                }
            }
            debug!("Fetched page of {} ({} total)", count, comments.len());

            match page.data.after {
                Some(next) if count > 0 && after.as_deref() != Some(next.as_str()) => {
                    after = Some(next);
                }
                _ => break,
            }
        }

        Ok(comments)
    }

    fn edit(&self, id: &CommentId, text: &str) -> Result<()> {
        let thing_id = fullname(id.as_str());
        let body = self.post_form(
            "/api/editusertext",
            &[
                ("api_type", "json"),
                ("thing_id", thing_id.as_str()),
                ("text", text),
            ],
        )?;

        let envelope: JsonEnvelope = if body.trim().is_empty() {
            JsonEnvelope::default()
        } else {
            serde_json::from_str(&body)?
        };
        match envelope.error_message() {
            Some(message) => Err(ScrubError::Rejected(message)),
            None => Ok(()),
        }
    }

    fn delete(&self, id: &CommentId) -> Result<()> {
        let thing_id = fullname(id.as_str());
        self.post_form("/api/del", &[("id", thing_id.as_str())])?;
        Ok(())
    }
}

fn request_token(http: &Client, config: &RedditConfig) -> Result<AccessToken> {
    let url = format!(
        "{}/api/v1/access_token",
        config.auth_url.trim_end_matches('/')
    );
    debug!("Requesting access token for {}", config.username);

    let response = http
        .post(url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[
            ("grant_type", "password"),
            ("username", config.username.as_str()),
            ("password", config.password.as_str()),
        ])
        .send()
        .map_err(|e| ScrubError::Http(e.to_string()))?;

    let body = read_body(response).map_err(|e| match e {
        ScrubError::Api { status, message } if status == 401 || status == 403 => {
            ScrubError::Auth(format!("client id or secret rejected ({}): {}", status, message))
        }
        other => other,
    })?;

    let token: TokenResponse = serde_json::from_str(&body)?;
    if let Some(error) = token.error {
        let reason = error
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| error.to_string());
        return Err(ScrubError::Auth(reason));
    }

    let value = token
        .access_token
        .ok_or_else(|| ScrubError::Auth("no access token in response".to_string()))?;
    Ok(AccessToken {
        value,
        expires_at: token
            .expires_in
            .map(|secs| Instant::now() + Duration::from_secs(secs)),
    })
}

/// Map non-success statuses to errors and return the body text
fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    if let Some(remaining) = response.headers().get("x-ratelimit-remaining") {
        debug!("Rate limit remaining: {:?}", remaining);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let reset = response
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .map(|v| format!("resets in {}s", v))
            .unwrap_or_else(|| "too many requests".to_string());
        return Err(ScrubError::RateLimited(reset));
    }

    let body = response
        .text()
        .map_err(|e| ScrubError::Http(e.to_string()))?;

    if !status.is_success() {
        let message: String = body.chars().take(MAX_ERROR_BODY).collect();
        return Err(ScrubError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn config(server: &MockServer) -> RedditConfig {
        RedditConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            username: "someone".to_string(),
            password: "hunter2".to_string(),
            user_agent: Some("comment-scrub tests".to_string()),
            auth_url: server.base_url(),
            api_url: server.base_url(),
            timeout_secs: 5,
        }
    }

    fn mock_login(server: &MockServer) {
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/access_token")
                .body_includes("grant_type=password")
                .body_includes("username=someone");
            then.status(200).json_body(json!({
                "access_token": "tok",
                "token_type": "bearer",
                "expires_in": 86400,
                "scope": "*"
            }));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/me")
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!({ "name": "Someone" }));
        });
    }

    fn comment_json(id: &str, body: &str, created_utc: f64) -> serde_json::Value {
        json!({
            "kind": "t1",
            "data": {
                "id": id,
                "name": format!("t1_{}", id),
                "body": body,
                "created_utc": created_utc,
                "subreddit": "rust"
            }
        })
    }

    #[test]
    fn test_authenticate_resolves_identity() {
        let server = MockServer::start();
        mock_login(&server);

        let client = RedditClient::authenticate(&config(&server)).unwrap();
        assert_eq!(client.identity().name, "Someone");
    }

    #[test]
    fn test_authenticate_invalid_grant() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/v1/access_token");
            then.status(200).json_body(json!({ "error": "invalid_grant" }));
        });

        let err = RedditClient::authenticate(&config(&server)).err().unwrap();
        assert!(matches!(err, ScrubError::Auth(ref reason) if reason == "invalid_grant"));
    }

    #[test]
    fn test_authenticate_bad_client_secret() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/v1/access_token");
            then.status(401)
                .json_body(json!({ "message": "Unauthorized", "error": 401 }));
        });

        let err = RedditClient::authenticate(&config(&server)).err().unwrap();
        assert!(matches!(err, ScrubError::Auth(_)));
    }

    #[test]
    fn test_authenticate_requires_credentials() {
        let server = MockServer::start();
        let token = server.mock(|when, then| {
            when.method(POST).path("/api/v1/access_token");
            then.status(200).json_body(json!({ "access_token": "tok" }));
        });
        let mut config = config(&server);
        config.password = String::new();

        let err = RedditClient::authenticate(&config).err().unwrap();
        assert!(matches!(err, ScrubError::Config(_)));
        token.assert_calls(0);
    }

    #[test]
    fn test_short_lived_token_is_refreshed() {
        let server = MockServer::start();
        let token = server.mock(|when, then| {
            when.method(POST).path("/api/v1/access_token");
            then.status(200)
                .json_body(json!({ "access_token": "tok", "expires_in": 30 }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/me");
            then.status(200).json_body(json!({ "name": "Someone" }));
        });
        let del = server.mock(|when, then| {
            when.method(POST)
                .path("/api/del")
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!({}));
        });

        // 30s is inside the refresh margin, so every call fetches a new token
        let client = RedditClient::authenticate(&config(&server)).unwrap();
        token.assert_calls(2);

        client.delete(&CommentId::from("abc")).unwrap();
        token.assert_calls(3);
        del.assert_calls(1);
    }

    #[test]
    fn test_long_lived_token_is_reused() {
        let server = MockServer::start();
        let token = server.mock(|when, then| {
            when.method(POST).path("/api/v1/access_token");
            then.status(200)
                .json_body(json!({ "access_token": "tok", "expires_in": 3600 }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/me");
            then.status(200).json_body(json!({ "name": "Someone" }));
        });
        server.mock(|when, then| {
            when.method(POST).path("/api/del");
            then.status(200).json_body(json!({}));
        });

        let client = RedditClient::authenticate(&config(&server)).unwrap();
        client.delete(&CommentId::from("abc")).unwrap();
        client.delete(&CommentId::from("def")).unwrap();
        token.assert_calls(1);
    }

    #[test]
    fn test_list_comments_follows_pagination() {
        let server = MockServer::start();
        mock_login(&server);
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/user/Someone/comments")
                .query_param("limit", "100")
                .query_param("sort", "new")
                .query_param_missing("after");
            then.status(200).json_body(json!({
                "kind": "Listing",
                "data": {
                    "after": "t1_b",
                    "children": [
                        comment_json("a", "newest", 1_700_000_300.0),
                        comment_json("b", "middle", 1_700_000_200.0),
                        { "kind": "t3", "data": { "id": "p", "body": "", "created_utc": 0.0 } }
                    ]
                }
            }));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/user/Someone/comments")
                .query_param("after", "t1_b");
            then.status(200).json_body(json!({
                "kind": "Listing",
                "data": {
                    "after": null,
                    "children": [comment_json("c", "oldest", 1_700_000_100.0)]
                }
            }));
        });

        let client = RedditClient::authenticate(&config(&server)).unwrap();
        let comments = client.list_comments(client.identity()).unwrap();

        let ids: Vec<_> = comments.iter().map(|c| c.id.to_string()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(comments[2].body, "oldest");
        first.assert_calls(1);
        second.assert_calls(1);
    }

    #[test]
    fn test_edit_posts_fullname_and_text() {
        let server = MockServer::start();
        mock_login(&server);
        let edit = server.mock(|when, then| {
            when.method(POST)
                .path("/api/editusertext")
                .header("authorization", "Bearer tok")
                .body_includes("thing_id=t1_abc")
                .body_includes("text=F")
                .body_includes("api_type=json");
            then.status(200)
                .json_body(json!({ "json": { "errors": [], "data": {} } }));
        });

        let client = RedditClient::authenticate(&config(&server)).unwrap();
        client.edit(&CommentId::from("abc"), "F").unwrap();
        edit.assert_calls(1);
    }

    #[test]
    fn test_edit_rejected() {
        let server = MockServer::start();
        mock_login(&server);
        server.mock(|when, then| {
            when.method(POST).path("/api/editusertext");
            then.status(200).json_body(json!({
                "json": { "errors": [["DELETED_COMMENT", "that comment has been deleted", "parent"]] }
            }));
        });

        let client = RedditClient::authenticate(&config(&server)).unwrap();
        let err = client.edit(&CommentId::from("abc"), "F").unwrap_err();
        assert!(matches!(err, ScrubError::Rejected(ref m) if m.contains("DELETED_COMMENT")));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_delete_posts_fullname() {
        let server = MockServer::start();
        mock_login(&server);
        let del = server.mock(|when, then| {
            when.method(POST)
                .path("/api/del")
                .body_includes("id=t1_abc");
            then.status(200).json_body(json!({}));
        });

        let client = RedditClient::authenticate(&config(&server)).unwrap();
        client.delete(&CommentId::from("abc")).unwrap();
        del.assert_calls(1);
    }

    #[test]
    fn test_rate_limited_is_transient() {
        let server = MockServer::start();
        mock_login(&server);
        server.mock(|when, then| {
            when.method(POST).path("/api/del");
            then.status(429).header("x-ratelimit-reset", "42").body("slow down");
        });

        let client = RedditClient::authenticate(&config(&server)).unwrap();
        let err = client.delete(&CommentId::from("abc")).unwrap_err();
        assert!(matches!(err, ScrubError::RateLimited(ref m) if m.contains("42")));
        assert!(err.is_transient());
    }

    #[test]
    fn test_server_error_maps_to_api() {
        let server = MockServer::start();
        mock_login(&server);
        server.mock(|when, then| {
            when.method(POST).path("/api/del");
            then.status(503).body("upstream unavailable");
        });

        let client = RedditClient::authenticate(&config(&server)).unwrap();
        let err = client.delete(&CommentId::from("abc")).unwrap_err();
        assert!(matches!(err, ScrubError::Api { status: 503, .. }));
    }
}
