//! Pageview data structures

use serde::{Deserialize, Serialize, Serializer};

/// One observed request, as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageviewData {
    pub url: String,
    pub method: String,
    pub status: i64,
    /// Milliseconds spent handling the request
    pub duration: f64,
    pub user_agent: Option<String>,
    #[serde(rename = "ref")]
    pub referer: Option<String>,
    pub ip: Option<String>,
}

impl PageviewData {
    pub fn new(url: impl Into<String>, method: impl Into<String>, status: i64, duration: f64) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            status,
            duration,
            user_agent: None,
            referer: None,
            ip: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }
}

/// Bounded record ready to be serialized as the request body
///
/// Absent optional fields serialize as `null`, never omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanitizedPageview {
    pub url: String,
    pub method: String,
    pub status: u16,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: f64,
    #[serde(rename = "userAgent")]
    pub user_agent: Option<String>,
    #[serde(rename = "ref")]
    pub referer: Option<String>,
    pub ip: Option<String>,
    pub sdk: String,
    pub sdk_version: String,
    pub integration_type: String,
}

/// Whole milliseconds go out as JSON integers, fractional ones as floats
fn serialize_millis<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && *value >= 0.0 && *value <= u64::MAX as f64 {
        serializer.serialize_u64(*value as u64)
    } else {
        serializer.serialize_f64(*value)
    }
}
