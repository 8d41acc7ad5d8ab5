//! # Document Model
//!
//! The node types of an interchange document. Each node owns its children
//! exclusively and knows how to append itself to a growing [`XmlElement`]
//! tree.
//!
//! ## Structure
//!
//! ```text
//! Container
//! └── Table
//!     ├── PropertyTable ── PropertyDescriptor ── enumeration values
//!     └── DataTable ── Header
//!                  └── Object (row) ── ObjectItem p0..pN
//!                                      └── nested PropertyTable | nested rows
//! ```
//!
//! Metadata tables describe what a property is; data tables carry object
//! instances with property values.
//!
//! ## Example
//!
//! ```rust
//! use xchg_core::document::{Container, DataTable, Emit, Object, ObjectItem, Table};
//! use xchg_core::xml::XmlElement;
//!
//! let mut table = DataTable::new("{T}", "Demo.Type.1", "Demo");
//! table.push(Object::row2("1", ObjectItem::value("A"), ObjectItem::value("0.5")));
//!
//! let container = Container::new("{C}", "Demo.Type.1").with_table(Table::Data(table));
//!
//! let mut root = XmlElement::new("project");
//! let el = container.emit(&mut root);
//! assert_eq!(el.name(), "container");
//! ```

pub mod container;
pub mod object;
pub mod property;
pub mod table;

pub use container::Container;
pub use object::{Nested, Object, ObjectItem};
pub use property::{EnumValue, Layout, PropertyDescriptor, PropertyTable};
pub use table::{DataTable, Header, HeaderColumn, Table};

use std::collections::HashSet;

use crate::errors::{ExportError, ExportResult};
use crate::xml::XmlElement;

/// A node carrying an identifier and a schema type discriminator.
pub trait Identified {
    /// Identifier, unique among siblings of the same parent
    fn id(&self) -> &str;

    /// Schema tag naming what kind of node this is
    fn type_tag(&self) -> &str;
}

/// Recursive emission into an element tree.
pub trait Emit {
    /// Append this node (and its descendants) to `parent`, returning the new element.
    fn emit<'a>(&self, parent: &'a mut XmlElement) -> &'a mut XmlElement;
}

/// Normalise an optional text field: empty strings mean absent.
pub(crate) fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Fail on the first id that appears twice in `nodes`.
pub fn ensure_unique_ids<'a, T, I>(scope: &str, nodes: I) -> ExportResult<()>
where
    T: Identified + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.id()) {
            return Err(ExportError::duplicate_id(scope, node.id()));
        }
    }
    Ok(())
}
