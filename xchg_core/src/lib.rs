//! # xchg_core - Structural Model Exchange Encoder
//!
//! `xchg_core` turns an in-memory structural analysis model (nodes, plate
//! faces, supports, load cases) into an interchange XML document that
//! structural design packages can import. It builds an owned document tree,
//! validates it, then serializes it in one deterministic pass.
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: The same model always yields byte-identical XML
//! - **Typed Tree**: Containers, tables and rows are plain Rust values, emitted once
//! - **Rich Errors**: Structured error types, not just strings
//! - **JSON-First Input**: Models and settings deserialize with serde
//!
//! ## Quick Start
//!
//! ```rust
//! use xchg_core::assembler::DocumentAssembler;
//! use xchg_core::model::{ModelData, Node, Support};
//! use xchg_core::observe::NullObserver;
//! use xchg_core::settings::ExportSettings;
//!
//! let model = ModelData {
//!     nodes: vec![Node::new(1, [0.0, 0.0, 0.0])],
//!     supports: vec![Support::fixed(1)],
//!     ..Default::default()
//! };
//!
//! let settings = ExportSettings::default();
//! let document = DocumentAssembler::new(&settings).assemble(&model)?;
//! let xml = document.to_xml(2, &NullObserver)?;
//! assert!(xml.contains("EP_DSG_Elements.EP_StructNode.1"));
//! # Ok::<(), xchg_core::errors::ExportError>(())
//! ```
//!
//! ## Modules
//!
//! - [`document`] - Containers, tables, rows and property definitions
//! - [`xml`] - Owned element tree and serializer
//! - [`schema`] - Fixed target schema: ids, prog ids and columns per entity kind
//! - [`model`] - Structural model input types
//! - [`adapters`] - Entity to container conversion
//! - [`assembler`] - Document assembly in fixed container order
//! - [`settings`] - Export configuration
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic writes and file locking

pub mod adapters;
pub mod assembler;
pub mod document;
pub mod errors;
pub mod file_io;
pub mod model;
pub mod observe;
pub mod schema;
pub mod settings;
pub mod xml;

// Re-export commonly used types at crate root for convenience
pub use assembler::{Document, DocumentAssembler};
pub use errors::{ExportError, ExportResult};
pub use file_io::{export_locked, write_document, FileLock};
pub use model::{ModelData, StructuralModel};
pub use settings::ExportSettings;
