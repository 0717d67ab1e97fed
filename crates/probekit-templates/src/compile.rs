//! The template sub-compiler: validates requests and resolves payload
//! references into a ready-to-execute form. No network I/O happens here.

use crate::model::{DnsRequest, HttpRequest, Matcher, Template};
use camino::{Utf8Path, Utf8PathBuf};
use probekit_types::{Info, Resolver};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Configuration bundle handed to [`Template::compile`] by the dispatcher.
pub struct TemplateCompileOptions<'a> {
    pub id: &'a str,
    pub info: &'a Info,
    /// Path of the definition file, also the base for payload resolution.
    pub path: &'a Utf8Path,
    pub resolver: &'a dyn Resolver,
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template has no requests")]
    Empty,

    #[error("dns request {index}: unknown record type `{record_type}`")]
    UnknownRecordType { index: usize, record_type: String },

    #[error("http request {index}: unknown method `{method}`")]
    UnknownMethod { index: usize, method: String },

    #[error("http request {index}: needs at least one of `path` or `raw`")]
    EmptyRequest { index: usize },

    #[error("http request {index}: unknown matcher type `{kind}`")]
    UnknownMatcherKind { index: usize, kind: String },

    #[error("http request {index}: matcher has no words or status codes")]
    EmptyMatcher { index: usize },

    #[error("http request {index}: could not resolve payload `{name}`")]
    Payload {
        index: usize,
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            "PATCH" => Ok(Method::Patch),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Ptr,
    Soa,
    Txt,
}

impl FromStr for RecordType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "CNAME" => Ok(RecordType::Cname),
            "MX" => Ok(RecordType::Mx),
            "NS" => Ok(RecordType::Ns),
            "PTR" => Ok(RecordType::Ptr),
            "SOA" => Ok(RecordType::Soa),
            "TXT" => Ok(RecordType::Txt),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatcherKind {
    Word,
    Status,
}

/// A template after validation and payload resolution.
#[derive(Debug)]
pub struct CompiledTemplate {
    pub id: String,
    pub info: Info,
    pub path: Utf8PathBuf,
    pub dns: Vec<CompiledDnsRequest>,
    pub http: Vec<CompiledHttpRequest>,
}

#[derive(Debug)]
pub struct CompiledDnsRequest {
    pub name: String,
    pub record_type: RecordType,
    pub class: String,
    pub recursion: bool,
    pub retries: u32,
}

#[derive(Debug)]
pub struct CompiledHttpRequest {
    pub method: Method,
    pub path: Vec<String>,
    pub raw: Vec<String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    /// Payload name -> resolved content lines.
    pub payloads: BTreeMap<String, Vec<String>>,
    pub matchers: Vec<CompiledMatcher>,
}

#[derive(Debug)]
pub struct CompiledMatcher {
    pub kind: MatcherKind,
    pub part: String,
    pub words: Vec<String>,
    pub status: Vec<u16>,
}

impl Template {
    /// Compile every request collection. The legacy `requests` collection is
    /// appended after `http`, preserving file order within each.
    pub fn compile(
        &self,
        opts: TemplateCompileOptions<'_>,
    ) -> Result<CompiledTemplate, TemplateError> {
        if self.is_empty() {
            return Err(TemplateError::Empty);
        }

        let dns = self
            .dns
            .iter()
            .enumerate()
            .map(|(index, req)| compile_dns(index, req))
            .collect::<Result<Vec<_>, _>>()?;

        let http = self
            .http
            .iter()
            .chain(self.requests.iter())
            .enumerate()
            .map(|(index, req)| compile_http(index, req, &opts))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledTemplate {
            id: opts.id.to_string(),
            info: opts.info.clone(),
            path: opts.path.to_path_buf(),
            dns,
            http,
        })
    }
}

fn compile_dns(index: usize, req: &DnsRequest) -> Result<CompiledDnsRequest, TemplateError> {
    let record_type =
        req.record_type
            .parse()
            .map_err(|()| TemplateError::UnknownRecordType {
                index,
                record_type: req.record_type.clone(),
            })?;
    Ok(CompiledDnsRequest {
        name: req.name.clone(),
        record_type,
        class: req.class.clone(),
        recursion: req.recursion,
        retries: req.retries,
    })
}

fn compile_http(
    index: usize,
    req: &HttpRequest,
    opts: &TemplateCompileOptions<'_>,
) -> Result<CompiledHttpRequest, TemplateError> {
    let method = req.method.parse().map_err(|()| TemplateError::UnknownMethod {
        index,
        method: req.method.clone(),
    })?;

    if req.path.is_empty() && req.raw.is_empty() {
        return Err(TemplateError::EmptyRequest { index });
    }

    let mut payloads = BTreeMap::new();
    for (name, reference) in &req.payloads {
        let content = opts
            .resolver
            .resolve(reference, opts.path)
            .map_err(|source| TemplateError::Payload {
                index,
                name: name.clone(),
                source,
            })?;
        let lines = content.lines().map(str::to_string).collect();
        payloads.insert(name.clone(), lines);
    }

    let matchers = req
        .matchers
        .iter()
        .map(|m| compile_matcher(index, m))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledHttpRequest {
        method,
        path: req.path.clone(),
        raw: req.raw.clone(),
        headers: req.headers.clone(),
        body: req.body.clone(),
        payloads,
        matchers,
    })
}

fn compile_matcher(index: usize, matcher: &Matcher) -> Result<CompiledMatcher, TemplateError> {
    let kind = match matcher.kind.as_str() {
        "word" => MatcherKind::Word,
        "status" => MatcherKind::Status,
        other => {
            return Err(TemplateError::UnknownMatcherKind {
                index,
                kind: other.to_string(),
            });
        }
    };
    if matcher.words.is_empty() && matcher.status.is_empty() {
        return Err(TemplateError::EmptyMatcher { index });
    }
    Ok(CompiledMatcher {
        kind,
        part: matcher.part.clone().unwrap_or_else(|| "body".to_string()),
        words: matcher.words.clone(),
        status: matcher.status.clone(),
    })
}
