//! Containers: the top-level named groups of tables, one per modeling concern.

use super::table::Table;
use super::{ensure_unique_ids, Emit, Identified};
use crate::errors::ExportResult;
use crate::xml::XmlElement;

/// Element name for a container
pub const CONTAINER_TAG: &str = "container";

/// An ordered collection of tables identified by a container id and prog id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    pub uid: String,
    pub prog_id: String,
    pub tables: Vec<Table>,
}

impl Container {
    pub fn new(uid: impl Into<String>, prog_id: impl Into<String>) -> Self {
        Container {
            uid: uid.into(),
            prog_id: prog_id.into(),
            tables: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn push(&mut self, table: Table) {
        self.tables.push(table);
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Total number of data rows across all data tables
    pub fn row_count(&self) -> usize {
        self.tables
            .iter()
            .filter_map(Table::as_data)
            .map(|t| t.len())
            .sum()
    }

    /// Check table id uniqueness, then each table's own invariants.
    pub fn validate(&self) -> ExportResult<()> {
        let scope = format!("container '{}'", self.uid);
        ensure_unique_ids(&scope, &self.tables)?;
        for table in &self.tables {
            table.validate()?;
        }
        Ok(())
    }
}

impl Identified for Container {
    fn id(&self) -> &str {
        &self.uid
    }

    fn type_tag(&self) -> &str {
        &self.prog_id
    }
}

impl Emit for Container {
    fn emit<'a>(&self, parent: &'a mut XmlElement) -> &'a mut XmlElement {
        let el = parent.append(XmlElement::new(CONTAINER_TAG));
        el.set_attr("id", self.uid.as_str());
        el.set_attr_opt("progid", Some(&self.prog_id));

        for table in &self.tables {
            table.emit(el);
        }
        el
    }
}
