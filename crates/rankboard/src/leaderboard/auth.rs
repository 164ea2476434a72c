use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Mutex;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;

/// In-memory session registry for the admin API.
///
/// Tokens are opaque 16-byte hex strings and live until the process exits;
/// there is no expiry or refresh.
#[derive(Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<String, Session>>,
}

#[derive(Debug, Clone, Copy)]
struct Session {
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

impl SessionManager {
    /// Mints a new session token.
    pub fn issue(&self) -> String {
        let mut bytes = [0u8; 16];
        OsRng.fill_bytes(&mut bytes);
        let token = bytes.iter().fold(String::new(), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        });

        let mut sessions = self.sessions.lock().expect("session mutex poisoned");
        sessions.insert(
            token.clone(),
            Session {
                created_at: Utc::now(),
            },
        );
        token
    }

    pub fn is_valid(&self, token: &str) -> bool {
        let sessions = self.sessions.lock().expect("session mutex poisoned");
        sessions.contains_key(token)
    }
}

/// Extracts the session token from `Authorization: Bearer ...` or the
/// `x-session-token` fallback header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    headers
        .get("x-session-token")
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}
