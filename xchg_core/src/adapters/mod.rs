//! # Domain Adapters
//!
//! Translate model records into containers of rows, one container per schema
//! concern. Every adapter sorts its input before building rows, so the
//! emitted document only depends on the model's content, never on the order
//! a map or list happened to be filled in.
//!
//! ## Adapters
//!
//! - [`mesh`] - structural nodes and 2D member topology
//! - [`supports`] - nodal boundary conditions
//! - [`loads`] - per-load-case point forces and surface loads
//! - [`library`] - load groups and materials
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use xchg_core::adapters::load_group_container;
//! use xchg_core::model::LoadGroup;
//!
//! let groups: HashMap<u32, LoadGroup> =
//!     [(2, LoadGroup::variable()), (1, LoadGroup::permanent())].into_iter().collect();
//!
//! let container = load_group_container(&groups, "LG").unwrap();
//! let rows = &container.tables[0].as_data().unwrap().rows;
//! assert_eq!(rows[0].id, "1");
//! assert_eq!(rows[1].name.as_deref(), Some("LG2"));
//! ```

pub mod library;
pub mod loads;
pub mod mesh;
pub mod supports;

pub use library::{load_group_container, material_container};
pub use loads::{element_load_container, node_load_container};
pub use mesh::{face_container, node_container};
pub use supports::support_container;

use std::cmp::Ordering;

use crate::document::ObjectItem;
use crate::errors::{ExportError, ExportResult};
use crate::schema::{self, SchemaKind};

/// Format a number with the shortest representation that round-trips.
///
/// `-0` is written as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// An item holding a finite number; NaN and infinities are rejected.
pub(crate) fn number_item(field: &str, value: f64) -> ExportResult<ObjectItem> {
    if !value.is_finite() {
        return Err(ExportError::invalid_input(field, value.to_string(), "Value must be finite"));
    }
    Ok(ObjectItem::value(format_number(value)))
}

/// An item holding an enumeration code plus its single-entry selection table.
pub(crate) fn enum_item(kind: SchemaKind, column: &str, code: &str) -> ExportResult<ObjectItem> {
    ObjectItem::value(code).with_table(schema::enum_selection(kind, column, code)?)
}

/// Total order over float triples, for deterministic tie-breaking.
pub(crate) fn cmp_components(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-10000.0), "-10000");
        assert_eq!(format_number(2.1e11), "210000000000");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_number_item_rejects_non_finite() {
        assert_eq!(number_item("Fx", 2.0).unwrap().value.as_deref(), Some("2"));
        assert_eq!(number_item("Fx", f64::NAN).unwrap_err().error_code(), "INVALID_INPUT");
        assert!(number_item("Fx", f64::INFINITY).is_err());
    }

    #[test]
    fn test_cmp_components() {
        assert_eq!(cmp_components(&[1.0, 2.0], &[1.0, 3.0]), Ordering::Less);
        assert_eq!(cmp_components(&[1.0, 2.0], &[1.0, 2.0]), Ordering::Equal);
        assert_eq!(cmp_components(&[-0.0], &[0.0]), Ordering::Less);
    }
}
