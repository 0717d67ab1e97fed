//! The concrete catalogue: a directory-backed reference resolver plus the
//! recursive compiler workflows use for nested steps.

use crate::input::CompiledInput;
use crate::read::read_input;
use anyhow::{bail, Context};
use camino::{Utf8Path, Utf8PathBuf};
use probekit_schema::Schema;
use probekit_types::Resolver;
use probekit_workflows::{CompiledStep, Compiler};
use std::fs;

/// Nested compilation stops here rather than overflowing on workflow cycles.
const MAX_COMPILE_DEPTH: usize = 8;

impl CompiledStep for CompiledInput {}

/// A set of directories definitions are resolved against, bound to the shared
/// schema handle. Stateless across calls; safe to share between threads.
pub struct Catalogue<'s> {
    schema: &'s Schema,
    roots: Vec<Utf8PathBuf>,
}

impl<'s> Catalogue<'s> {
    pub fn new(schema: &'s Schema, root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            schema,
            roots: vec![root.into()],
        }
    }

    pub fn with_roots(schema: &'s Schema, roots: Vec<Utf8PathBuf>) -> Self {
        Self { schema, roots }
    }

    /// Resolve a reference to a concrete file path: absolute references are
    /// taken as-is, otherwise the referencing file's directory is searched
    /// first, then each catalogue root in order.
    pub fn resolve_path(&self, reference: &str, base: &Utf8Path) -> anyhow::Result<Utf8PathBuf> {
        let direct = Utf8Path::new(reference);
        if direct.is_absolute() {
            if direct.is_file() {
                return Ok(direct.to_path_buf());
            }
            bail!("reference `{reference}` does not exist");
        }

        let mut candidates = Vec::new();
        if let Some(parent) = base.parent() {
            candidates.push(parent.join(reference));
        }
        for root in &self.roots {
            candidates.push(root.join(reference));
        }

        for candidate in &candidates {
            if candidate.is_file() {
                return Ok(candidate.clone());
            }
        }
        bail!("could not resolve reference `{reference}` against {base}");
    }

    /// Run the whole pipeline on the definition at `path`: read, classify,
    /// and compile, recursing into workflow steps as needed.
    pub fn compile_path(&self, path: &Utf8Path) -> anyhow::Result<CompiledInput> {
        self.compile_at_depth(path, 0)
    }

    fn compile_at_depth(&self, path: &Utf8Path, depth: usize) -> anyhow::Result<CompiledInput> {
        if depth > MAX_COMPILE_DEPTH {
            bail!("compilation of {path} exceeds nesting depth {MAX_COMPILE_DEPTH}");
        }
        let input = read_input(path, self.schema).with_context(|| format!("read {path}"))?;
        let nested = NestedCompiler {
            catalogue: self,
            depth: depth + 1,
        };
        let compiled = input.compile(path, self, &nested)?;
        Ok(compiled)
    }
}

impl Resolver for Catalogue<'_> {
    fn resolve(&self, reference: &str, base: &Utf8Path) -> anyhow::Result<String> {
        let path = self.resolve_path(reference, base)?;
        fs::read_to_string(&path).with_context(|| format!("read {path}"))
    }
}

/// Compiler handed to workflow compilation; tracks recursion depth so each
/// nesting level gets a fresh, incremented view of the same catalogue.
struct NestedCompiler<'a, 's> {
    catalogue: &'a Catalogue<'s>,
    depth: usize,
}

impl Compiler for NestedCompiler<'_, '_> {
    fn compile(&self, reference: &str, base: &Utf8Path) -> anyhow::Result<Box<dyn CompiledStep>> {
        let path = self.catalogue.resolve_path(reference, base)?;
        let compiled = self.catalogue.compile_at_depth(&path, self.depth)?;
        Ok(Box::new(compiled))
    }
}
