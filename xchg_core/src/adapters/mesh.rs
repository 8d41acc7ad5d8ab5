//! Structural nodes and 2D member (face) topology.

use super::{cmp_components, number_item};
use crate::document::{Container, Object, ObjectItem, Table};
use crate::errors::ExportResult;
use crate::model::{Face, Node};
use crate::schema::{self, SchemaKind};
use crate::settings::{record_name, NamePrefixes};

/// Build the structural node container, rows sorted by node tag.
///
/// Repeated tags (only reachable with validation off) are ordered by
/// coordinate, so the output never depends on input order.
///
/// Row `id` is the tag; `p0` the generated name, `p1..p3` the coordinates.
pub fn node_container(nodes: impl IntoIterator<Item = Node>, prefixes: &NamePrefixes) -> ExportResult<Container> {
    let mut nodes: Vec<Node> = nodes.into_iter().collect();
    nodes.sort_by(|a, b| a.tag.cmp(&b.tag).then_with(|| cmp_components(&a.coordinate, &b.coordinate)));

    let schema = schema::entry(SchemaKind::Node);
    let mut table = schema.data_table();
    for node in &nodes {
        let name = record_name(&prefixes.node, node.tag);
        let [x, y, z] = node.coordinate;
        table.push(
            Object::row4(
                node.tag.to_string(),
                ObjectItem::value(name.as_str()),
                number_item("Coord X", x)?,
                number_item("Coord Y", y)?,
                number_item("Coord Z", z)?,
            )
            .with_name(name),
        );
    }

    Ok(schema.container().with_table(Table::Data(table)))
}

/// Build the 2D member container, rows sorted by face tag, then by node
/// list, thickness and material.
///
/// The node list keeps the face's own winding order and is written as a
/// nested table of rows under `p3`.
pub fn face_container(faces: impl IntoIterator<Item = Face>, prefixes: &NamePrefixes) -> ExportResult<Container> {
    let mut faces: Vec<Face> = faces.into_iter().collect();
    faces.sort_by(|a, b| {
        a.tag
            .cmp(&b.tag)
            .then_with(|| a.node_tags.cmp(&b.node_tags))
            .then_with(|| a.thickness.total_cmp(&b.thickness))
            .then_with(|| a.material.cmp(&b.material))
    });

    let schema = schema::entry(SchemaKind::Face);
    let mut table = schema.data_table();
    for face in &faces {
        let name = record_name(&prefixes.face, face.tag);
        let corners = face
            .node_tags
            .iter()
            .enumerate()
            .map(|(k, tag)| {
                Object::from_items(
                    (k + 1).to_string(),
                    [ObjectItem::value(record_name(&prefixes.node, tag))],
                )
            })
            .collect();

        table.push(
            Object::row4(
                face.tag.to_string(),
                ObjectItem::value(name.as_str()),
                ObjectItem::value(face.material.as_str()),
                number_item("Thickness", face.thickness)?,
                ObjectItem::empty().with_rows(corners)?,
            )
            .with_name(name),
        );
    }

    Ok(schema.container().with_table(Table::Data(table)))
}
