//! Library containers: load groups and materials.
//!
//! Both are dictionaries in the model. The adapters take any `(key, value)`
//! iterator and sort by key internally, so a `HashMap` can be passed as is.

use std::borrow::Borrow;
use std::fmt::Display;

use super::{enum_item, number_item};
use crate::document::{Container, Object, ObjectItem, Table};
use crate::errors::ExportResult;
use crate::model::{LoadGroup, Material};
use crate::schema::{self, SchemaKind};
use crate::settings::record_name;

fn sorted_by_key<K: Ord, V>(entries: impl IntoIterator<Item = (K, V)>) -> Vec<(K, V)> {
    let mut entries: Vec<(K, V)> = entries.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

/// Build the load group container from a group-number dictionary.
///
/// Row `id` is the group number and its name is `prefix + number`. `p0`
/// repeats the name; `p1` is the classification code with a nested
/// single-entry enumeration (`0` Permanent, `1` Variable).
pub fn load_group_container<K, G, I>(groups: I, prefix: &str) -> ExportResult<Container>
where
    K: Ord + Display,
    G: Borrow<LoadGroup>,
    I: IntoIterator<Item = (K, G)>,
{
    let schema = schema::entry(SchemaKind::LoadGroup);
    let mut table = schema.data_table();
    for (key, group) in sorted_by_key(groups) {
        let name = record_name(prefix, &key);
        let group: &LoadGroup = group.borrow();
        let kind = group.kind;
        table.push(
            Object::row2(
                key.to_string(),
                ObjectItem::value(name.as_str()),
                enum_item(SchemaKind::LoadGroup, "Load", kind.code())?,
            )
            .with_name(name),
        );
    }

    Ok(schema.container().with_table(Table::Data(table)))
}

/// Build the material container from a name-keyed dictionary.
///
/// Rows are numbered from 1 in name order and named after the material.
pub fn material_container<K, M, I>(materials: I) -> ExportResult<Container>
where
    K: Ord + Display,
    M: Borrow<Material>,
    I: IntoIterator<Item = (K, M)>,
{
    let schema = schema::entry(SchemaKind::Material);
    let mut table = schema.data_table();
    for (k, (name, material)) in sorted_by_key(materials).into_iter().enumerate() {
        let material: &Material = material.borrow();
        let name = name.to_string();
        table.push(
            Object::from_items(
                (k + 1).to_string(),
                [
                    ObjectItem::value(name.as_str()),
                    enum_item(SchemaKind::Material, "Material type", material.kind.code())?,
                    number_item("E modulus", material.e_modulus)?,
                    number_item("Poisson coeff.", material.poisson)?,
                    number_item("Unit mass", material.density)?,
                ],
            )
            .with_name(name),
        );
    }

    Ok(schema.container().with_table(Table::Data(table)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    use crate::document::Emit;
    use crate::model::MaterialKind;
    use crate::xml::XmlElement;

    fn row_ids(container: &Container) -> Vec<&str> {
        container.tables[0]
            .as_data()
            .unwrap()
            .rows
            .iter()
            .map(|r| r.id.as_str())
            .collect()
    }

    #[test]
    fn test_load_groups_sorted_regardless_of_input_order() {
        let input = vec![
            (3, LoadGroup::variable()),
            (1, LoadGroup::permanent()),
            (2, LoadGroup::variable()),
        ];
        let container = load_group_container(input, "LG").unwrap();
        assert_eq!(row_ids(&container), vec!["1", "2", "3"]);

        let map: HashMap<u32, LoadGroup> = [
            (2, LoadGroup::variable()),
            (3, LoadGroup::variable()),
            (1, LoadGroup::permanent()),
        ]
        .into_iter()
        .collect();
        assert_eq!(load_group_container(&map, "LG").unwrap(), container);
    }

    #[test]
    fn test_load_group_rows() {
        let groups = BTreeMap::from([(1u32, LoadGroup::permanent()), (2u32, LoadGroup::variable())]);
        let container = load_group_container(&groups, "LG").unwrap();

        let mut root = XmlElement::new("project");
        let el = container.emit(&mut root);
        let rows: Vec<&XmlElement> = el.child("table").unwrap().children_named("row").collect();
        assert_eq!(rows.len(), 2);

        for (row, (name, label)) in rows.iter().zip([("LG1", "Permanent"), ("LG2", "Variable")]) {
            assert_eq!(row.attr("nm"), Some(name));
            assert_eq!(row.child("p0").unwrap().attr("v"), Some(name));
            let selected = row
                .child("p1")
                .and_then(|p| p.child("table"))
                .and_then(|t| t.child("def_property"))
                .and_then(|d| d.child("enum"))
                .map(|e| e.children().iter().map(|i| i.attr("n").unwrap()).collect::<Vec<_>>());
            assert_eq!(selected, Some(vec![label]));
        }
    }

    #[test]
    fn test_materials_numbered_in_name_order() {
        let materials: HashMap<String, Material> = [
            ("S355".to_string(), Material::new(MaterialKind::Steel, 2.1e11, 0.3, 7850.0)),
            ("C30/37".to_string(), Material::new(MaterialKind::Concrete, 3.3e10, 0.2, 2500.0)),
        ]
        .into_iter()
        .collect();
        let container = material_container(&materials).unwrap();
        let rows = &container.tables[0].as_data().unwrap().rows;
        assert_eq!(rows[0].id, "1");
        assert_eq!(rows[0].name.as_deref(), Some("C30/37"));
        assert_eq!(rows[1].items[1].value.as_deref(), Some("1"));
        assert_eq!(rows[1].items[2].value.as_deref(), Some("210000000000"));
    }
}
