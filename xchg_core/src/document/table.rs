//! Data tables, their descriptive headers, and the table sum type held by
//! containers.

use super::object::Object;
use super::property::{PropertyTable, TABLE_TAG};
use super::{ensure_unique_ids, non_empty, Emit, Identified};
use crate::errors::ExportResult;
use crate::xml::XmlElement;

/// Element name for a data table header
pub const HEADER_TAG: &str = "h";

/// One documented column of a data table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderColumn {
    pub name: String,
    pub type_name: Option<String>,
}

impl HeaderColumn {
    pub fn new(name: impl Into<String>) -> Self {
        HeaderColumn {
            name: name.into(),
            type_name: None,
        }
    }

    pub fn typed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        HeaderColumn {
            name: name.into(),
            type_name: non_empty(type_name),
        }
    }
}

/// Column documentation for a data table.
///
/// Purely descriptive: rows are serialized the same way with or without it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub columns: Vec<HeaderColumn>,
}

impl Header {
    pub fn new(columns: Vec<HeaderColumn>) -> Self {
        Header { columns }
    }
}

impl Emit for Header {
    fn emit<'a>(&self, parent: &'a mut XmlElement) -> &'a mut XmlElement {
        let el = parent.append(XmlElement::new(HEADER_TAG));
        for (position, column) in self.columns.iter().enumerate() {
            let col = el.append(XmlElement::new(format!("{}{}", HEADER_TAG, position)));
            col.set_attr("t", column.name.as_str());
            col.set_attr_opt("type", column.type_name.as_deref());
        }
        el
    }
}

/// An ordered collection of data rows under one schema concern.
///
/// Rows are emitted in insertion order; adapters sort before pushing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    pub uid: String,
    pub type_tag: String,
    pub display_name: String,
    pub header: Option<Header>,
    pub rows: Vec<Object>,
}

impl DataTable {
    pub fn new(uid: impl Into<String>, type_tag: impl Into<String>, display_name: impl Into<String>) -> Self {
        DataTable {
            uid: uid.into(),
            type_tag: type_tag.into(),
            display_name: display_name.into(),
            header: None,
            rows: Vec::new(),
        }
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.header = Some(header);
        self
    }

    pub fn push(&mut self, row: Object) {
        self.rows.push(row);
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = Object>) {
        self.rows.extend(rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check that no two rows share an id, then each row's nested structure
    pub fn validate(&self) -> ExportResult<()> {
        let scope = format!("table '{}'", self.display_name);
        ensure_unique_ids(&scope, &self.rows)?;
        for row in &self.rows {
            row.validate()?;
        }
        Ok(())
    }
}

impl Identified for DataTable {
    fn id(&self) -> &str {
        &self.uid
    }

    fn type_tag(&self) -> &str {
        &self.type_tag
    }
}

impl Emit for DataTable {
    fn emit<'a>(&self, parent: &'a mut XmlElement) -> &'a mut XmlElement {
        let el = parent.append(XmlElement::new(TABLE_TAG));
        el.set_attr("id", self.uid.as_str());
        el.set_attr_opt("type", Some(&self.type_tag));
        el.set_attr_opt("name", Some(&self.display_name));

        if let Some(header) = &self.header {
            header.emit(el);
        }
        for row in &self.rows {
            row.emit(el);
        }
        el
    }
}

/// Either kind of table a container can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Table {
    Property(PropertyTable),
    Data(DataTable),
}

impl Table {
    pub fn validate(&self) -> ExportResult<()> {
        match self {
            Table::Property(table) => table.validate(),
            Table::Data(table) => table.validate(),
        }
    }

    pub fn as_data(&self) -> Option<&DataTable> {
        match self {
            Table::Data(table) => Some(table),
            Table::Property(_) => None,
        }
    }
}

impl Identified for Table {
    fn id(&self) -> &str {
        match self {
            Table::Property(table) => table.id(),
            Table::Data(table) => table.id(),
        }
    }

    fn type_tag(&self) -> &str {
        match self {
            Table::Property(table) => table.type_tag(),
            Table::Data(table) => table.type_tag(),
        }
    }
}

impl Emit for Table {
    fn emit<'a>(&self, parent: &'a mut XmlElement) -> &'a mut XmlElement {
        match self {
            Table::Property(table) => table.emit(parent),
            Table::Data(table) => table.emit(parent),
        }
    }
}
