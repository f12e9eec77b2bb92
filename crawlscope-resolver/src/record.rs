use serde::{Deserialize, Serialize};

/// HTTP status codes that declare a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedirectStatus {
    MovedPermanently,
    Found,
    TemporaryRedirect,
    PermanentRedirect,
}

impl RedirectStatus {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            301 => Some(RedirectStatus::MovedPermanently),
            302 => Some(RedirectStatus::Found),
            307 => Some(RedirectStatus::TemporaryRedirect),
            308 => Some(RedirectStatus::PermanentRedirect),
            _ => None,
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            RedirectStatus::MovedPermanently => 301,
            RedirectStatus::Found => 302,
            RedirectStatus::TemporaryRedirect => 307,
            RedirectStatus::PermanentRedirect => 308,
        }
    }
}

/// One crawled URL that answered with a redirect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectRecord {
    pub source_url: String,
    pub target_url: String,
    /// `None` when the export carried a status the resolver does not recognize.
    pub status: Option<RedirectStatus>,
    pub response_time_seconds: f64,
}

impl RedirectRecord {
    pub fn new(source_url: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            target_url: target_url.into(),
            status: Some(RedirectStatus::MovedPermanently),
            response_time_seconds: 0.0,
        }
    }

    pub fn with_status_code(mut self, code: u16) -> Self {
        self.status = RedirectStatus::from_code(code);
        self
    }

    pub fn with_response_time(mut self, seconds: f64) -> Self {
        self.response_time_seconds = seconds;
        self
    }

    pub fn is_temporary(&self) -> bool {
        self.status == Some(RedirectStatus::Found)
    }
}
