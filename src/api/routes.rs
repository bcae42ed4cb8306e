//! Endpoint paths for the two backend layouts.
//!
//! The standalone server mounts everything at the root (`/check-user/{u}`,
//! `/detect-mood`, ...). The serverless deployment groups routes under
//! `/api/auth`, `/api/mood` and `/api/chat`, and renames a few of them.
//! Both expose the same contract, so only the paths differ.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::types::OpaqueId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RouteStyle {
    /// Root-mounted routes: `/check-user`, `/detect-mood`, `/mood-history`.
    #[default]
    Flat,
    /// `/api`-prefixed routes: `/api/auth/check-user`, `/api/mood/detect`.
    Prefixed,
}

impl RouteStyle {
    pub fn label(self) -> &'static str {
        match self {
            RouteStyle::Flat => "flat",
            RouteStyle::Prefixed => "prefixed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flat" => Some(RouteStyle::Flat),
            "prefixed" => Some(RouteStyle::Prefixed),
            _ => None,
        }
    }

    /// Path segments for `endpoint`, unencoded. The client percent-encodes
    /// each segment when it appends them to the base URL.
    pub fn segments(self, endpoint: &Endpoint<'_>) -> Vec<String> {
        let fixed = |parts: &[&str]| parts.iter().map(|p| p.to_string()).collect::<Vec<_>>();
        let with_tail = |parts: &[&str], tail: String| {
            let mut segs = fixed(parts);
            segs.push(tail);
            segs
        };

        match (self, endpoint) {
            (RouteStyle::Flat, Endpoint::Health) => Vec::new(),
            (RouteStyle::Prefixed, Endpoint::Health) => fixed(&["api", "health"]),

            (RouteStyle::Flat, Endpoint::CheckUser(u)) => with_tail(&["check-user"], u.to_string()),
            (RouteStyle::Prefixed, Endpoint::CheckUser(u)) => {
                with_tail(&["api", "auth", "check-user"], u.to_string())
            }

            (RouteStyle::Flat, Endpoint::Signup) => fixed(&["signup"]),
            (RouteStyle::Prefixed, Endpoint::Signup) => fixed(&["api", "auth", "signup"]),

            (RouteStyle::Flat, Endpoint::Login) => fixed(&["login"]),
            (RouteStyle::Prefixed, Endpoint::Login) => fixed(&["api", "auth", "login"]),

            (RouteStyle::Flat, Endpoint::DetectMood) => fixed(&["detect-mood"]),
            (RouteStyle::Prefixed, Endpoint::DetectMood) => fixed(&["api", "mood", "detect"]),

            (RouteStyle::Flat, Endpoint::MoodHistory(u)) => {
                with_tail(&["mood-history"], u.to_string())
            }
            (RouteStyle::Prefixed, Endpoint::MoodHistory(u)) => {
                with_tail(&["api", "mood", "history"], u.to_string())
            }

            (style, Endpoint::ChatStart) => chat(style, &["start"]),
            (style, Endpoint::ChatMessage) => chat(style, &["message"]),
            (style, Endpoint::ChatEnd(id)) => with_chat_tail(style, "end", id.to_string()),
            (style, Endpoint::ChatHistory(id)) => with_chat_tail(style, "history", id.to_string()),
            (style, Endpoint::ChatSessions(u)) => with_chat_tail(style, "sessions", u.to_string()),
        }
    }
}

fn chat(style: RouteStyle, parts: &[&str]) -> Vec<String> {
    let mut segs: Vec<String> = match style {
        RouteStyle::Flat => vec!["chat".to_string()],
        RouteStyle::Prefixed => vec!["api".to_string(), "chat".to_string()],
    };
    segs.extend(parts.iter().map(|p| p.to_string()));
    segs
}

fn with_chat_tail(style: RouteStyle, action: &str, tail: String) -> Vec<String> {
    let mut segs = chat(style, &[action]);
    segs.push(tail);
    segs
}

/// Every backend endpoint the client calls.
#[derive(Debug, Clone, Copy)]
pub enum Endpoint<'a> {
    Health,
    CheckUser(&'a str),
    Signup,
    Login,
    DetectMood,
    MoodHistory(&'a str),
    ChatStart,
    ChatMessage,
    ChatEnd(&'a OpaqueId),
    ChatHistory(&'a OpaqueId),
    ChatSessions(&'a str),
}
