//! # Xchg CLI Application
//!
//! Exports a structural model (JSON) to the interchange XML format.
//!
//! ```text
//! xchg_cli --demo --out demo.xml --definitions
//! RUST_LOG=debug xchg_cli --model model.json --settings export.json
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use xchg_core::adapters::{load_group_container, material_container};
use xchg_core::assembler::DEFINITION_EXTENSION;
use xchg_core::model::{
    Face, LoadCase, LoadGroup, Material, MaterialKind, ModelData, Node, PointLoad, Support, SurfaceLoad,
};
use xchg_core::observe::TracingObserver;
use xchg_core::settings::{load_settings, ExportSettings};
use xchg_core::{write_document, Document, DocumentAssembler, ExportError, ExportResult, FileLock};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "xchg_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Export a structural model to interchange XML")]
struct Cli {
    /// Model file (JSON)
    #[arg(short, long, conflicts_with = "demo", required_unless_present = "demo")]
    model: Option<PathBuf>,

    /// Export a small built-in plate model instead of reading one
    #[arg(long)]
    demo: bool,

    /// Export settings file (JSON)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Output path, defaults to the target file name from the settings
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Also write the property definition sidecar (`<out>.def`)
    #[arg(long)]
    definitions: bool,

    /// Hold a lock on the output for this user while writing
    #[arg(long)]
    user: Option<String>,
}

fn demo_model() -> ModelData {
    let mut model = ModelData {
        nodes: vec![
            Node::new(1, [0.0, 0.0, 0.0]),
            Node::new(2, [6.0, 0.0, 0.0]),
            Node::new(3, [6.0, 4.0, 0.0]),
            Node::new(4, [0.0, 4.0, 0.0]),
        ],
        faces: vec![Face::new(1, vec![1, 2, 3, 4], 0.25, "C30/37")],
        supports: vec![Support::fixed(1), Support::pinned(2), Support::pinned(3), Support::pinned(4)],
        load_cases: vec![
            LoadCase::new("LC1").with_surface_load(SurfaceLoad::new(1, -2500.0)),
            LoadCase::new("LC2").with_point_load(PointLoad::new(3, [0.0, 0.0, -10000.0])),
        ],
        ..Default::default()
    };
    model
        .materials
        .insert("C30/37".to_string(), Material::new(MaterialKind::Concrete, 3.3e10, 0.2, 2500.0));
    model.load_groups.insert(1, LoadGroup::permanent());
    model.load_groups.insert(2, LoadGroup::variable());
    model
}

fn read_model(path: &Path) -> ExportResult<ModelData> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| ExportError::file_error("read model", path.display().to_string(), e.to_string()))?;
    ModelData::from_json_str(&json)
}

fn run(cli: &Cli) -> ExportResult<()> {
    let settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => ExportSettings::default(),
    };

    let model = match &cli.model {
        Some(path) => read_model(path)?,
        None => demo_model(),
    };

    let document = DocumentAssembler::new(&settings)
        .with_library(material_container(&model.materials)?)
        .with_library(load_group_container(&model.load_groups, &settings.prefixes.load_group)?)
        .assemble(&model)?;

    let out = cli
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.target_file_name));
    write_outputs(&document, &out, cli.definitions, cli.user.as_deref(), settings.indent)
}

fn definition_path(out: &Path) -> PathBuf {
    let mut path = out.as_os_str().to_os_string();
    path.push(format!(".{}", DEFINITION_EXTENSION));
    PathBuf::from(path)
}

/// Write the document and, when asked, its definition sidecar.
fn write_outputs(
    document: &Document,
    out: &Path,
    definitions: bool,
    user: Option<&str>,
    indent: usize,
) -> ExportResult<()> {
    // One lock on the target covers both the document and its sidecar
    let _lock = match user {
        Some(user) => Some(FileLock::acquire(out, user)?),
        None => None,
    };

    write_document(document, out, indent, &TracingObserver)?;
    info!(path = %out.display(), containers = document.containers().len(), "export complete");

    if definitions {
        let def_path = definition_path(out);
        write_document(&document.definitions(), &def_path, indent, &TracingObserver)?;
        info!(path = %def_path.display(), "definitions written");
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let json = serde_json::to_string_pretty(&e).unwrap_or_else(|_| e.to_string());
            eprintln!("Export failed [{}]: {}", e.error_code(), e);
            eprintln!("{}", json);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_document() -> Document {
        let model = demo_model();
        let settings = ExportSettings::default();
        DocumentAssembler::new(&settings)
            .with_library(material_container(&model.materials).unwrap())
            .assemble(&model)
            .unwrap()
    }

    #[test]
    fn test_definition_path_appends_extension() {
        assert_eq!(definition_path(Path::new("out/plate.xml")), PathBuf::from("out/plate.xml.def"));
    }

    #[test]
    fn test_locked_export_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plate.xml");

        write_outputs(&demo_document(), &out, true, Some("a@example.com"), 0).unwrap();
        assert!(out.exists());
        assert!(definition_path(&out).exists());
        assert!(FileLock::check(&out).is_none());
    }

    #[test]
    fn test_held_lock_blocks_document_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plate.xml");
        let holder = FileLock::acquire(&out, "holder@example.com").unwrap();

        let err = write_outputs(&demo_document(), &out, true, Some("b@example.com"), 0).unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        assert!(!out.exists());
        assert!(!definition_path(&out).exists());

        drop(holder);
        write_outputs(&demo_document(), &out, true, Some("b@example.com"), 0).unwrap();
        assert!(definition_path(&out).exists());
    }
}
