use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Template-shaped payload: one or more direct protocol checks.
///
/// All collections default to empty so this struct can be flattened into the
/// input alongside the workflow payload; shape detection happens in the
/// catalogue, never here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns: Vec<DnsRequest>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub http: Vec<HttpRequest>,

    /// Legacy alias for `http`, kept so older template files keep loading.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<HttpRequest>,
}

impl Template {
    /// True when no request collection is populated.
    pub fn is_empty(&self) -> bool {
        self.dns.is_empty() && self.http.is_empty() && self.requests.is_empty()
    }
}

/// A single DNS probe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DnsRequest {
    /// Hostname to query; placeholders like `{{FQDN}}` are substituted at
    /// execution time, outside this crate.
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: String,

    #[serde(default = "default_dns_class")]
    pub class: String,

    #[serde(default)]
    pub recursion: bool,

    #[serde(default)]
    pub retries: u32,
}

fn default_dns_class() -> String {
    "inet".to_string()
}

// Default construction must agree with deserialization defaults, so a
// programmatically built request is as compilable as a decoded one.
impl Default for DnsRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            record_type: String::new(),
            class: default_dns_class(),
            recursion: false,
            retries: 0,
        }
    }
}

/// A single HTTP probe, either path-based or a raw request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raw: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Payload name -> file reference; resolved through the resolver at
    /// compile time and inlined line-by-line.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub payloads: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matchers: Vec<Matcher>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl Default for HttpRequest {
    fn default() -> Self {
        Self {
            method: default_method(),
            path: Vec::new(),
            raw: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
            payloads: BTreeMap::new(),
            matchers: Vec::new(),
        }
    }
}

/// Response matcher attached to an HTTP request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Matcher {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<u16>,
}
