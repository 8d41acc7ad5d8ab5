//! Nodal boundary conditions.

use super::enum_item;
use crate::document::{Container, Object, ObjectItem, Table};
use crate::errors::ExportResult;
use crate::model::{Support, DOF_NAMES};
use crate::schema::{self, SchemaKind};
use crate::settings::{record_name, NamePrefixes};

/// Build the support container, rows sorted by supported node tag, then fixity.
///
/// `p0` is the support name, `p1` the node it sits on, and `p2..p7` the
/// fixity of each DOF as an enumeration (`0` free, `1` rigid).
pub fn support_container(
    supports: impl IntoIterator<Item = Support>,
    prefixes: &NamePrefixes,
) -> ExportResult<Container> {
    let mut supports: Vec<Support> = supports.into_iter().collect();
    supports.sort_by_key(|s| (s.node_tag, s.fixity));

    let schema = schema::entry(SchemaKind::Support);
    let mut table = schema.data_table();
    for support in &supports {
        let name = record_name(&prefixes.support, support.node_tag);
        let mut row = Object::new(support.node_tag.to_string()).with_name(name.as_str());
        row.push(ObjectItem::value(name));
        row.push(ObjectItem::value(record_name(&prefixes.node, support.node_tag)));
        for (dof, restrained) in DOF_NAMES.iter().zip(support.fixity) {
            let code = schema::fixity_value(restrained).code;
            row.push(enum_item(SchemaKind::Support, dof, &code)?);
        }
        table.push(row);
    }

    Ok(schema.container().with_table(Table::Data(table)))
}
