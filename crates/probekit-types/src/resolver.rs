use camino::Utf8Path;

/// Capability to resolve a reference (a payload file, a variables file, or a
/// nested template path) to its underlying content.
///
/// Implemented by the catalogue; sub-compilers only ever see this interface.
pub trait Resolver {
    /// Resolve `reference` against the file at `base` and return the
    /// referenced content.
    fn resolve(&self, reference: &str, base: &Utf8Path) -> anyhow::Result<String>;
}
