//! Shared test fixtures for the probekit workspace.
//!
//! Builders for minimal-but-valid definition documents, plus a helper to lay
//! them out in a directory. Kept as a crate (not `#[cfg(test)]` modules) so
//! both the catalogue tests and the CLI integration tests reuse them.

#![forbid(unsafe_code)]

use camino::Utf8PathBuf;
use std::fs;
use std::path::Path;

/// Minimal valid template document with one HTTP request.
pub fn template_yaml(id: &str) -> String {
    format!(
        r#"id: {id}
info:
  name: x
  author: y
  severity: info
http:
  - method: GET
    path: ["/"]
"#
    )
}

/// Minimal valid template document with one DNS request.
pub fn dns_template_yaml(id: &str) -> String {
    format!(
        r#"id: {id}
info:
  name: x
  author: y
  severity: low
dns:
  - name: "{{{{FQDN}}}}"
    type: A
"#
    )
}

/// Minimal valid workflow document with one step referencing `template_ref`.
pub fn workflow_yaml(id: &str, template_ref: &str) -> String {
    format!(
        r#"id: {id}
info:
  name: x
  author: y
  severity: info
workflows:
  - template: {template_ref}
"#
    )
}

/// Document populating neither shape; classification must reject it.
pub fn shapeless_yaml(id: &str) -> String {
    format!(
        r#"id: {id}
info:
  name: x
  author: y
  severity: info
"#
    )
}

/// Document populating both shapes; classification must reject it.
pub fn ambiguous_yaml(id: &str) -> String {
    format!(
        r#"id: {id}
info:
  name: x
  author: y
  severity: info
http:
  - path: ["/"]
workflows:
  - template: t1.yaml
"#
    )
}

/// Write `contents` as `name` under `dir`, returning the file's path.
pub fn write_input(dir: &Path, name: &str, contents: &str) -> Utf8PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(&path, contents).expect("write fixture");
    Utf8PathBuf::from_path_buf(path).expect("fixture path is utf-8")
}
