//! CLI entry point for probekit.
//!
//! This module is intentionally thin: argument parsing, batch iteration, and
//! exit codes. The pipeline itself lives in `probekit-catalogue`.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use probekit_catalogue::Catalogue;
use probekit_schema::{Schema, INPUT_SCHEMA};
use serde::Serialize;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "probekit",
    version,
    about = "Compile and validate declarative security-check definitions"
)]
struct Cli {
    /// Extra directories searched when resolving template references.
    #[arg(long = "templates-dir")]
    templates_dirs: Vec<Utf8PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read, classify, and compile each definition; report per-file results.
    ///
    /// A failing file is reported and skipped, never aborting the batch.
    Check {
        /// Definition files, or directories scanned for *.yaml / *.yml.
        paths: Vec<Utf8PathBuf>,

        /// Emit the per-file report as JSON on stdout.
        #[arg(long)]
        json: bool,
    },

    /// Print the embedded input-definition schema document.
    Schema,
}

#[derive(Debug, Serialize)]
struct FileReport {
    path: Utf8PathBuf,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Check { ref paths, json } => {
            let failed = cmd_check(&cli, paths, json)?;
            if failed > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Schema => {
            print!("{INPUT_SCHEMA}");
            Ok(())
        }
    }
}

/// Run the pipeline over every file; returns how many failed.
fn cmd_check(cli: &Cli, paths: &[Utf8PathBuf], json: bool) -> anyhow::Result<usize> {
    let schema = Schema::compile().context("compile input schema")?;

    let files = collect_files(paths);
    let mut reports = Vec::with_capacity(files.len());

    for file in &files {
        let mut roots = Vec::new();
        if let Some(parent) = file.parent() {
            roots.push(parent.to_path_buf());
        }
        roots.extend(cli.templates_dirs.iter().cloned());
        let catalogue = Catalogue::with_roots(&schema, roots);

        let report = match catalogue.compile_path(file) {
            Ok(compiled) => FileReport {
                path: file.clone(),
                ok: true,
                kind: Some(compiled.kind().to_string()),
                error: None,
            },
            Err(err) => FileReport {
                path: file.clone(),
                ok: false,
                kind: None,
                error: Some(format!("{err:#}")),
            },
        };
        if !json {
            match &report {
                FileReport {
                    ok: true,
                    kind: Some(kind),
                    ..
                } => println!("ok   {file} ({kind})"),
                FileReport {
                    error: Some(error), ..
                } => eprintln!("fail {file}: {error}"),
                _ => unreachable!("report is either ok with a kind or failed with an error"),
            }
        }
        reports.push(report);
    }

    let failed = reports.iter().filter(|r| !r.ok).count();
    if json {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &reports)
            .context("write json report")?;
        println!();
    } else {
        println!("{} ok, {} failed, {} total", files.len() - failed, failed, files.len());
    }
    Ok(failed)
}

/// Expand arguments into a flat, sorted file list; directories are walked for
/// YAML files. Unreadable entries are reported and skipped, never aborting
/// the batch.
fn collect_files(paths: &[Utf8PathBuf]) -> Vec<Utf8PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        eprintln!("skip {path}: {err}");
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                let Some(file) = Utf8Path::from_path(entry.path()) else {
                    continue;
                };
                if matches!(file.extension(), Some("yaml" | "yml")) {
                    files.push(file.to_path_buf());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files
}
