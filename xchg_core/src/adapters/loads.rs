//! Per-load-case point forces and surface loads.
//!
//! Each load case gets its own container. The container id is derived from
//! the schema container id and the load case name, so it is stable across
//! exports and distinct between cases.

use super::{cmp_components, number_item};
use crate::document::{Container, Object, ObjectItem, Table};
use crate::errors::ExportResult;
use crate::model::{LoadCase, PointLoad, SurfaceLoad};
use crate::schema::{self, SchemaEntry, SchemaKind};
use crate::settings::{record_name, NamePrefixes};

fn case_container(schema: &SchemaEntry, case: &LoadCase) -> Container {
    Container::new(schema::scoped_uid(schema.container_uid, &case.name), schema.prog_id)
}

/// Build the point-force container for one load case.
///
/// Loads are ordered by node tag, ties broken by force components.
pub fn node_load_container(case: &LoadCase, prefixes: &NamePrefixes) -> ExportResult<Container> {
    let mut loads: Vec<PointLoad> = case.point_loads.clone();
    loads.sort_by(|a, b| a.node_tag.cmp(&b.node_tag).then_with(|| cmp_components(&a.force, &b.force)));

    let schema = schema::entry(SchemaKind::PointLoad);
    let mut table = schema.data_table();
    for (k, load) in loads.iter().enumerate() {
        let id = k + 1;
        let name = record_name(&prefixes.point_load, format!("{}_{}", id, case.name));
        let [fx, fy, fz] = load.force;
        table.push(
            Object::from_items(
                id.to_string(),
                [
                    ObjectItem::value(name.as_str()),
                    ObjectItem::value(case.name.as_str()),
                    ObjectItem::value(record_name(&prefixes.node, load.node_tag)),
                    number_item("Fx", fx)?,
                    number_item("Fy", fy)?,
                    number_item("Fz", fz)?,
                ],
            )
            .with_name(name),
        );
    }

    Ok(case_container(schema, case).with_table(Table::Data(table)))
}

/// Build the surface-load container for one load case.
///
/// Loads are ordered by element tag, ties broken by pressure.
pub fn element_load_container(case: &LoadCase, prefixes: &NamePrefixes) -> ExportResult<Container> {
    let mut loads: Vec<SurfaceLoad> = case.surface_loads.clone();
    loads.sort_by(|a, b| {
        a.element_tag
            .cmp(&b.element_tag)
            .then_with(|| a.pressure.total_cmp(&b.pressure))
    });

    let schema = schema::entry(SchemaKind::SurfaceLoad);
    let mut table = schema.data_table();
    for (k, load) in loads.iter().enumerate() {
        let id = k + 1;
        let name = record_name(&prefixes.surface_load, format!("{}_{}", id, case.name));
        table.push(
            Object::row4(
                id.to_string(),
                ObjectItem::value(name.as_str()),
                ObjectItem::value(case.name.as_str()),
                ObjectItem::value(record_name(&prefixes.face, load.element_tag)),
                number_item("Value", load.pressure)?,
            )
            .with_name(name),
        );
    }

    Ok(case_container(schema, case).with_table(Table::Data(table)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(row: &Object) -> Vec<&str> {
        row.items.iter().map(|i| i.value.as_deref().unwrap_or("")).collect()
    }

    #[test]
    fn test_point_loads_sorted() {
        let case = LoadCase::new("LC1")
            .with_point_load(PointLoad::new(4, [0.0, 0.0, -5.0]))
            .with_point_load(PointLoad::new(2, [1.0, 0.0, 0.0]))
            .with_point_load(PointLoad::new(4, [0.0, 0.0, -7.5]));
        let container = node_load_container(&case, &NamePrefixes::default()).unwrap();
        let rows = &container.tables[0].as_data().unwrap().rows;

        assert_eq!(values(&rows[0]), vec!["PF1_LC1", "LC1", "N2", "1", "0", "0"]);
        assert_eq!(values(&rows[1])[2..].to_vec(), vec!["N4", "0", "0", "-7.5"]);
        assert_eq!(values(&rows[2])[5], "-5");
        assert_eq!(rows[2].id, "3");
    }

    #[test]
    fn test_surface_loads_sorted() {
        let case = LoadCase::new("Snow")
            .with_surface_load(SurfaceLoad::new(9, -800.0))
            .with_surface_load(SurfaceLoad::new(3, -800.0));
        let container = element_load_container(&case, &NamePrefixes::default()).unwrap();
        let rows = &container.tables[0].as_data().unwrap().rows;
        assert_eq!(values(&rows[0]), vec!["SF1_Snow", "Snow", "F3", "-800"]);
        assert_eq!(rows[1].name.as_deref(), Some("SF2_Snow"));
    }

    #[test]
    fn test_case_containers_have_distinct_stable_ids() {
        let prefixes = NamePrefixes::default();
        let a = node_load_container(&LoadCase::new("LC1"), &prefixes).unwrap();
        let b = node_load_container(&LoadCase::new("LC2"), &prefixes).unwrap();
        let a_again = node_load_container(&LoadCase::new("LC1"), &prefixes).unwrap();
        assert_ne!(a.uid, b.uid);
        assert_eq!(a.uid, a_again.uid);
        assert_eq!(a.prog_id, schema::entry(SchemaKind::PointLoad).prog_id);

        let surface = element_load_container(&LoadCase::new("LC1"), &prefixes).unwrap();
        assert_ne!(a.uid, surface.uid);
    }
}
