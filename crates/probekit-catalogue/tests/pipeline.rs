//! End-to-end pipeline tests: read, classify, and compile real files laid out
//! in temporary directories.

use camino::{Utf8Path, Utf8PathBuf};
use probekit_catalogue::{
    parse_input, read_input, Catalogue, CompileError, CompiledInput, ReadError,
};
use probekit_schema::Schema;
use probekit_test_util::{
    ambiguous_yaml, dns_template_yaml, shapeless_yaml, template_yaml, workflow_yaml, write_input,
};
use probekit_types::Resolver;
use probekit_workflows::{CompiledStep, Compiler};
use tempfile::TempDir;

fn schema() -> Schema {
    Schema::compile().unwrap()
}

struct NoopResolver;

impl Resolver for NoopResolver {
    fn resolve(&self, _reference: &str, _base: &Utf8Path) -> anyhow::Result<String> {
        Ok(String::new())
    }
}

#[derive(Debug)]
struct StubCompiled;

impl CompiledStep for StubCompiled {}

struct StubCompiler;

impl Compiler for StubCompiler {
    fn compile(&self, _reference: &str, _base: &Utf8Path) -> anyhow::Result<Box<dyn CompiledStep>> {
        Ok(Box::new(StubCompiled))
    }
}

#[test]
fn template_file_compiles_into_template_artifact() {
    let schema = schema();
    let dir = TempDir::new().unwrap();
    let path = write_input(dir.path(), "t1.yaml", &template_yaml("t1"));

    let catalogue = Catalogue::new(&schema, path.parent().unwrap());
    let compiled = catalogue.compile_path(&path).unwrap();

    assert_eq!(compiled.kind().to_string(), "template");
    let template = compiled.as_template().expect("template payload populated");
    assert_eq!(template.id, "t1");
    assert_eq!(template.http.len(), 1);
    assert!(compiled.as_workflow().is_none());
}

#[test]
fn dns_template_file_compiles() {
    let schema = schema();
    let dir = TempDir::new().unwrap();
    let path = write_input(dir.path(), "d1.yaml", &dns_template_yaml("d1"));

    let catalogue = Catalogue::new(&schema, path.parent().unwrap());
    let compiled = catalogue.compile_path(&path).unwrap();
    let template = compiled.as_template().unwrap();
    assert_eq!(template.dns.len(), 1);
}

#[test]
fn workflow_file_compiles_nested_templates_recursively() {
    let schema = schema();
    let dir = TempDir::new().unwrap();
    write_input(dir.path(), "t1.yaml", &template_yaml("t1"));
    let wf_path = write_input(dir.path(), "w1.yaml", &workflow_yaml("w1", "t1.yaml"));

    let catalogue = Catalogue::new(&schema, wf_path.parent().unwrap());
    let compiled = catalogue.compile_path(&wf_path).unwrap();

    let workflow = compiled.as_workflow().expect("workflow payload populated");
    assert_eq!(workflow.id, "w1");
    assert_eq!(workflow.steps.len(), 1);
    assert_eq!(workflow.steps[0].template, "t1.yaml");
    assert!(compiled.as_template().is_none());
}

#[test]
fn workflow_referencing_missing_template_fails_without_panicking() {
    let schema = schema();
    let dir = TempDir::new().unwrap();
    let wf_path = write_input(dir.path(), "w1.yaml", &workflow_yaml("w1", "gone.yaml"));

    let catalogue = Catalogue::new(&schema, wf_path.parent().unwrap());
    let err = catalogue.compile_path(&wf_path).unwrap_err();
    let rendered = format!("{err:#}");
    assert!(rendered.contains("could not compile workflow"), "{rendered}");
    assert!(rendered.contains("gone.yaml"), "{rendered}");
}

#[test]
fn self_referencing_workflow_hits_the_depth_guard() {
    let schema = schema();
    let dir = TempDir::new().unwrap();
    let wf_path = write_input(dir.path(), "loop.yaml", &workflow_yaml("loop", "loop.yaml"));

    let catalogue = Catalogue::new(&schema, wf_path.parent().unwrap());
    let err = catalogue.compile_path(&wf_path).unwrap_err();
    assert!(format!("{err:#}").contains("nesting depth"));
}

#[test]
fn shapeless_file_fails_classification() {
    let schema = schema();
    let dir = TempDir::new().unwrap();
    let path = write_input(dir.path(), "none.yaml", &shapeless_yaml("none"));

    let catalogue = Catalogue::new(&schema, path.parent().unwrap());
    let err = catalogue.compile_path(&path).unwrap_err();
    assert!(format!("{err:#}").contains("neither a template nor a workflow"));
}

#[test]
fn ambiguous_file_fails_classification() {
    let schema = schema();
    let dir = TempDir::new().unwrap();
    let path = write_input(dir.path(), "both.yaml", &ambiguous_yaml("both"));

    let catalogue = Catalogue::new(&schema, path.parent().unwrap());
    let err = catalogue.compile_path(&path).unwrap_err();
    assert!(format!("{err:#}").contains("mixes template and workflow fields"));
}

#[test]
fn template_compile_failure_wraps_but_preserves_the_cause() {
    let schema = schema();
    let doc = r#"id: t1
info:
  name: x
  author: y
  severity: info
http:
  - method: TELEPORT
    path: ["/"]
"#;
    let input = parse_input(doc, &schema).unwrap();
    let err = input
        .compile(Utf8Path::new("t1.yaml"), &NoopResolver, &StubCompiler)
        .unwrap_err();

    assert!(err.to_string().contains("could not compile template"));
    let CompileError::Template(cause) = &err else {
        panic!("expected template branch, got {err:?}");
    };
    assert!(cause.to_string().contains("TELEPORT"));
}

#[test]
fn template_compile_with_noop_resolver_succeeds() {
    let schema = schema();
    let input = parse_input(&template_yaml("t1"), &schema).unwrap();
    let compiled = input
        .compile(Utf8Path::new("t1.yaml"), &NoopResolver, &StubCompiler)
        .unwrap();
    assert!(matches!(compiled, CompiledInput::Template(_)));
}

#[test]
fn rereading_the_same_file_produces_independent_artifacts() {
    let schema = schema();
    let dir = TempDir::new().unwrap();
    let path = write_input(dir.path(), "t1.yaml", &template_yaml("t1"));

    let catalogue = Catalogue::new(&schema, path.parent().unwrap());
    let first = catalogue.compile_path(&path).unwrap();
    let second = catalogue.compile_path(&path).unwrap();

    let (a, b) = (first.as_template().unwrap(), second.as_template().unwrap());
    assert_eq!(a.id, b.id);
    // Distinct allocations: owning both simultaneously is only possible if
    // nothing is shared.
    assert_ne!(a as *const _, b as *const _);
}

#[test]
fn payloads_resolve_against_catalogue_roots() {
    let schema = schema();
    let dir = TempDir::new().unwrap();
    write_input(dir.path(), "payloads/users.txt", "admin\nguest\n");
    let doc = r#"id: t1
info:
  name: x
  author: y
  severity: info
http:
  - method: POST
    path: ["/login"]
    payloads:
      user: payloads/users.txt
"#;
    let path = write_input(dir.path(), "t1.yaml", doc);

    let catalogue = Catalogue::new(&schema, path.parent().unwrap());
    let compiled = catalogue.compile_path(&path).unwrap();
    let template = compiled.as_template().unwrap();
    assert_eq!(template.http[0].payloads["user"], vec!["admin", "guest"]);
}

#[test]
fn workflow_variables_resolve_through_the_catalogue() {
    let schema = schema();
    let dir = TempDir::new().unwrap();
    write_input(dir.path(), "t1.yaml", &template_yaml("t1"));
    write_input(dir.path(), "vars.txt", "target=example.com\n");
    let doc = r#"id: w1
info:
  name: x
  author: y
  severity: info
variables: vars.txt
workflows:
  - template: t1.yaml
"#;
    let wf_path = write_input(dir.path(), "w1.yaml", doc);

    let catalogue = Catalogue::new(&schema, wf_path.parent().unwrap());
    let compiled = catalogue.compile_path(&wf_path).unwrap();
    let workflow = compiled.as_workflow().unwrap();
    assert_eq!(workflow.variables["target"], "example.com");
}

#[test]
fn extra_roots_are_searched_for_references() {
    let schema = schema();
    let shared = TempDir::new().unwrap();
    write_input(shared.path(), "t1.yaml", &template_yaml("t1"));
    let dir = TempDir::new().unwrap();
    let wf_path = write_input(dir.path(), "w1.yaml", &workflow_yaml("w1", "t1.yaml"));

    let roots = vec![
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap(),
        Utf8PathBuf::from_path_buf(shared.path().to_path_buf()).unwrap(),
    ];
    let catalogue = Catalogue::with_roots(&schema, roots);
    let compiled = catalogue.compile_path(&wf_path).unwrap();
    assert_eq!(compiled.as_workflow().unwrap().steps.len(), 1);
}

#[test]
fn schema_failure_short_circuits_before_decode() {
    let schema = schema();
    let dir = TempDir::new().unwrap();
    let path = write_input(dir.path(), "bad.yaml", "id: t1\nhttp: []\n");

    let err = read_input(&path, &schema).unwrap_err();
    assert!(matches!(err, ReadError::Schema { .. }));
}
