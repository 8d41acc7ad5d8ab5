//! # Document Assembly
//!
//! Composes the containers of one export in a fixed order:
//!
//! ```text
//! library containers (as registered)
//! → structural nodes → 2D members → supports
//! → for each load case, sorted by name:
//!       point forces   (only if the case has any)
//!       surface loads  (only if the case has any)
//! ```
//!
//! The resulting [`Document`] renders to a single `project` root element
//! carrying the declared namespace.
//!
//! ## Example
//!
//! ```rust
//! use xchg_core::assembler::DocumentAssembler;
//! use xchg_core::model::{LoadCase, ModelData, Node, PointLoad};
//! use xchg_core::observe::NullObserver;
//! use xchg_core::settings::ExportSettings;
//!
//! let mut model = ModelData::default();
//! model.nodes.push(Node::new(1, [0.0, 0.0, 0.0]));
//! model.load_cases.push(LoadCase::new("LC1").with_point_load(PointLoad::new(1, [0.0, 0.0, -1.0])));
//! model.load_cases.push(LoadCase::new("Empty"));
//!
//! let settings = ExportSettings::default();
//! let document = DocumentAssembler::new(&settings).assemble(&model).unwrap();
//! // nodes, faces, supports, one point-force container; the empty case adds nothing
//! assert_eq!(document.containers().len(), 4);
//!
//! let xml = document.to_xml(0, &NullObserver).unwrap();
//! assert!(xml.contains(r#"<project xmlns="http://www.scia.cz">"#));
//! ```

use std::collections::HashSet;

use tracing::debug;

use crate::adapters;
use crate::document::{ensure_unique_ids, Container, Emit, Table};
use crate::errors::{ExportError, ExportResult};
use crate::model::{self, LoadCase, StructuralModel};
use crate::observe::EmitObserver;
use crate::schema;
use crate::settings::ExportSettings;
use crate::xml::{to_xml_string, XmlElement};

/// Root element name
pub const PROJECT_TAG: &str = "project";

/// Extension appended to the target file name for the definition document
pub const DEFINITION_EXTENSION: &str = "def";

/// One exported document: namespace, target file and ordered containers.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub namespace_uri: String,
    pub target_file_name: String,
    containers: Vec<Container>,
}

impl Document {
    pub fn new(namespace_uri: impl Into<String>, target_file_name: impl Into<String>) -> Self {
        Document {
            namespace_uri: namespace_uri.into(),
            target_file_name: target_file_name.into(),
            containers: Vec::new(),
        }
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// Check container id uniqueness, then every container's own invariants.
    pub fn validate(&self) -> ExportResult<()> {
        ensure_unique_ids("document", &self.containers)?;
        for container in &self.containers {
            container.validate()?;
        }
        Ok(())
    }

    /// Build the element tree, reporting each container to `observer`.
    pub fn render(&self, observer: &dyn EmitObserver) -> XmlElement {
        let mut root = XmlElement::new(PROJECT_TAG);
        root.set_attr("xmlns", self.namespace_uri.as_str());
        for container in &self.containers {
            container.emit(&mut root);
            observer.container_emitted(&container.uid, container.table_count());
        }
        root
    }

    /// Render and serialize to XML text.
    pub fn to_xml(&self, indent: usize, observer: &dyn EmitObserver) -> ExportResult<String> {
        to_xml_string(&self.render(observer), indent)
    }

    /// The companion definition document describing every container kind
    /// present here, in first-appearance order.
    ///
    /// Containers whose prog id has no schema entry are skipped.
    pub fn definitions(&self) -> Document {
        let mut seen = HashSet::new();
        let mut definitions = Document::new(
            self.namespace_uri.as_str(),
            format!("{}.{}", self.target_file_name, DEFINITION_EXTENSION),
        );
        for container in &self.containers {
            if !seen.insert(container.prog_id.as_str()) {
                continue;
            }
            if let Some(entry) = schema::by_prog_id(&container.prog_id) {
                definitions
                    .containers
                    .push(entry.container().with_table(Table::Property(entry.definition.clone())));
            }
        }
        definitions
    }
}

/// Builds a [`Document`] from a structural model in the fixed export order.
pub struct DocumentAssembler<'a> {
    settings: &'a ExportSettings,
    library: Vec<Container>,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(settings: &'a ExportSettings) -> Self {
        DocumentAssembler {
            settings,
            library: Vec::new(),
        }
    }

    /// Register a library container (materials, load groups) to precede the
    /// model containers. Library containers keep registration order.
    pub fn with_library(mut self, container: Container) -> Self {
        self.library.push(container);
        self
    }

    /// Assemble the document.
    ///
    /// With `settings.validate` set, model references are checked first and
    /// the finished document is checked for duplicate ids.
    pub fn assemble<M: StructuralModel + ?Sized>(self, model: &M) -> ExportResult<Document> {
        let settings = self.settings;
        let prefixes = &settings.prefixes;

        if settings.validate {
            model::validate_references(model)?;
        }

        let mut document = Document::new(settings.namespace_uri.as_str(), settings.target_file_name.as_str());
        debug!(count = self.library.len(), "library containers");
        document.containers.extend(self.library);

        debug!("nodes and topology");
        document.containers.push(adapters::node_container(model.nodes(), prefixes)?);
        document.containers.push(adapters::face_container(model.faces(), prefixes)?);

        debug!("supports");
        document.containers.push(adapters::support_container(model.supports(), prefixes)?);

        for case in sorted_load_cases(model.load_cases())? {
            debug!(
                case = case.name.as_str(),
                point_loads = case.point_loads.len(),
                surface_loads = case.surface_loads.len(),
                "load case"
            );
            if !case.point_loads.is_empty() {
                document.containers.push(adapters::node_load_container(&case, prefixes)?);
            }
            if !case.surface_loads.is_empty() {
                document.containers.push(adapters::element_load_container(&case, prefixes)?);
            }
        }

        if settings.validate {
            document.validate()?;
        }
        debug!(containers = document.containers.len(), "document assembled");
        Ok(document)
    }
}

/// Sort load cases by name, rejecting duplicate names.
fn sorted_load_cases(mut cases: Vec<LoadCase>) -> ExportResult<Vec<LoadCase>> {
    cases.sort_by(|a, b| a.name.cmp(&b.name));
    if let Some(pair) = cases.windows(2).find(|w| w[0].name == w[1].name) {
        return Err(ExportError::duplicate_id("load cases", pair[0].name.as_str()));
    }
    Ok(cases)
}
