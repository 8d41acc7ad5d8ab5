//! # Schema Metadata
//!
//! Static description of every container kind the exporter writes: ids,
//! prog ids, and the ordered columns of each data table. The metadata is
//! built once per process and shared by the adapters (headers, enumeration
//! selections) and by the definition document.
//!
//! ## Example
//!
//! ```rust
//! use xchg_core::schema::{self, SchemaKind};
//!
//! let nodes = schema::entry(SchemaKind::Node);
//! assert_eq!(nodes.columns[0].name, "Name");
//! assert_eq!(nodes.definition.size(), nodes.columns.len());
//! assert!(std::ptr::eq(schema::by_prog_id(nodes.prog_id).unwrap(), nodes));
//! ```

use once_cell::sync::Lazy;
use uuid::Uuid;

use crate::document::{
    Container, DataTable, EnumValue, Header, HeaderColumn, Layout, PropertyDescriptor, PropertyTable,
};
use crate::errors::{ExportError, ExportResult};
use crate::model::{LoadGroupKind, MaterialKind, DOF_NAMES};

/// Namespace for ids derived with UUID v5
const XCHG_NAMESPACE: Uuid = Uuid::from_u128(0x2a46a5247d394ec797fb13c0a226cc11);

/// Bit set on key columns
const FLAG_KEY: &str = "1";

/// Every container kind, in the order definitions are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Material,
    LoadGroup,
    Node,
    Face,
    Support,
    PointLoad,
    SurfaceLoad,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 7] = [
        SchemaKind::Material,
        SchemaKind::LoadGroup,
        SchemaKind::Node,
        SchemaKind::Face,
        SchemaKind::Support,
        SchemaKind::PointLoad,
        SchemaKind::SurfaceLoad,
    ];
}

/// One column of a data table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub type_name: &'static str,
    pub flag: &'static str,
    pub values: Vec<EnumValue>,
}

impl Column {
    fn new(name: &'static str, type_name: &'static str) -> Self {
        Column {
            name,
            type_name,
            flag: "",
            values: Vec::new(),
        }
    }

    fn key(name: &'static str) -> Self {
        Column {
            flag: FLAG_KEY,
            ..Column::new(name, "string")
        }
    }

    fn enumeration(name: &'static str, values: Vec<EnumValue>) -> Self {
        Column {
            values,
            ..Column::new(name, "enum")
        }
    }
}

/// Static metadata for one container kind
#[derive(Debug, Clone)]
pub struct SchemaEntry {
    pub kind: SchemaKind,
    pub container_uid: &'static str,
    pub prog_id: &'static str,
    pub table_uid: &'static str,
    pub display_name: &'static str,
    pub columns: Vec<Column>,
    /// Property table describing `columns`, built once
    pub definition: PropertyTable,
}

impl SchemaEntry {
    fn new(
        kind: SchemaKind,
        container_uid: &'static str,
        prog_id: &'static str,
        table_uid: &'static str,
        display_name: &'static str,
        columns: Vec<Column>,
    ) -> Self {
        let mut definition = PropertyTable::new(table_uid)
            .with_layout(Layout::Vertical)
            .with_class_id(container_uid)
            .with_prog_id(prog_id);
        for (ordinal, column) in columns.iter().enumerate() {
            definition.descriptors.push(descriptor_for(table_uid, ordinal, column, column.values.clone()));
        }

        SchemaEntry {
            kind,
            container_uid,
            prog_id,
            table_uid,
            display_name,
            columns,
            definition,
        }
    }

    /// Column documentation for this kind's data table
    pub fn header(&self) -> Header {
        Header::new(
            self.columns
                .iter()
                .map(|c| HeaderColumn::typed(c.name, c.type_name))
                .collect(),
        )
    }

    /// An empty data table with this kind's ids and header
    pub fn data_table(&self) -> DataTable {
        DataTable::new(self.table_uid, self.prog_id, self.display_name).with_header(self.header())
    }

    /// An empty container with this kind's ids
    pub fn container(&self) -> Container {
        Container::new(self.container_uid, self.prog_id)
    }

    pub fn column(&self, name: &str) -> Option<(usize, &Column)> {
        self.columns.iter().enumerate().find(|(_, c)| c.name == name)
    }
}

fn descriptor_for(table_uid: &str, ordinal: usize, column: &Column, values: Vec<EnumValue>) -> PropertyDescriptor {
    PropertyDescriptor::new(
        ordinal.to_string(),
        column.name,
        column.type_name,
        scoped_uid(table_uid, column.name),
    )
    .with_flag(column.flag)
    .with_enum_values(values)
}

fn load_group_values() -> Vec<EnumValue> {
    LoadGroupKind::ALL
        .iter()
        .map(|k| EnumValue::new(k.code(), k.label()))
        .collect()
}

fn material_values() -> Vec<EnumValue> {
    MaterialKind::ALL
        .iter()
        .map(|k| EnumValue::new(k.code(), k.label()))
        .collect()
}

/// Fixity codes for a support DOF
pub fn fixity_value(restrained: bool) -> EnumValue {
    if restrained {
        EnumValue::new("1", "Rigid")
    } else {
        EnumValue::new("0", "Free")
    }
}

static ENTRIES: Lazy<Vec<SchemaEntry>> = Lazy::new(|| {
    let fixity = || vec![fixity_value(false), fixity_value(true)];
    let mut support_columns = vec![Column::key("Name"), Column::new("Reference node", "ref")];
    support_columns.extend(DOF_NAMES.iter().map(|dof| Column::enumeration(*dof, fixity())));

    vec![
        SchemaEntry::new(
            SchemaKind::Material,
            "{2EA7753C-CE8A-4B4F-A7AD-5252DC130A4C}",
            "EP_Material.EP_Material.1",
            "{8383E404-81B0-4B18-930B-D8A21FE8B26B}",
            "Materials",
            vec![
                Column::key("Name"),
                Column::enumeration("Material type", material_values()),
                Column::new("E modulus", "real"),
                Column::new("Poisson coeff.", "real"),
                Column::new("Unit mass", "real"),
            ],
        ),
        SchemaEntry::new(
            SchemaKind::LoadGroup,
            "{C8357173-DFFD-45A0-B13A-8DF0B87C81F4}",
            "EP_LoadCase.EP_LoadGroup.1",
            "{4F333749-682F-4432-91AB-90DCD08D9480}",
            "Load groups",
            vec![Column::key("Name"), Column::enumeration("Load", load_group_values())],
        ),
        SchemaEntry::new(
            SchemaKind::Node,
            "{91C6811C-3927-40E2-A311-C832162930A7}",
            "EP_DSG_Elements.EP_StructNode.1",
            "{C584BEC3-C393-462F-9966-282BF1F549DC}",
            "Structural nodes",
            vec![
                Column::key("Name"),
                Column::new("Coord X", "real"),
                Column::new("Coord Y", "real"),
                Column::new("Coord Z", "real"),
            ],
        ),
        SchemaEntry::new(
            SchemaKind::Face,
            "{8F02F232-608E-4BC0-B050-1152C8E4B809}",
            "EP_DSG_Elements.EP_Plane.1",
            "{6242C7BC-3F77-420F-80F5-9D7939B9B275}",
            "2D members",
            vec![
                Column::key("Name"),
                Column::new("Material", "ref"),
                Column::new("Thickness", "real"),
                Column::new("Nodes", "table"),
            ],
        ),
        SchemaEntry::new(
            SchemaKind::Support,
            "{5C2ED6A6-7521-4ACC-BC97-A29872C0B400}",
            "EP_DSG_Elements.EP_PointSupportPoint.1",
            "{22C4DD7A-7A92-4B1C-B588-407DEE5512EC}",
            "Supports in node",
            support_columns,
        ),
        SchemaEntry::new(
            SchemaKind::PointLoad,
            "{05A2F45A-DA3A-423F-AE81-DADA05E65CDA}",
            "EP_DSG_Loads.EP_PointForcePoint.1",
            "{A3EC545A-9C8B-4C0A-936F-3DB28AF03C3F}",
            "Point forces in node",
            vec![
                Column::key("Name"),
                Column::new("Load case", "ref"),
                Column::new("Reference node", "ref"),
                Column::new("Fx", "real"),
                Column::new("Fy", "real"),
                Column::new("Fz", "real"),
            ],
        ),
        SchemaEntry::new(
            SchemaKind::SurfaceLoad,
            "{58DE9FD2-6258-454D-86C3-4086E54D2170}",
            "EP_DSG_Loads.EP_SurfaceForceSurface.1",
            "{74C08AF7-61E5-4749-8128-CF2CBDD86B46}",
            "Surface loads",
            vec![
                Column::key("Name"),
                Column::new("Load case", "ref"),
                Column::new("Reference 2D member", "ref"),
                Column::new("Value", "real"),
            ],
        ),
    ]
});

/// Metadata for one kind
pub fn entry(kind: SchemaKind) -> &'static SchemaEntry {
    // ENTRIES follows SchemaKind declaration order
    &ENTRIES[kind as usize]
}

/// Look up metadata by a container's prog id
pub fn by_prog_id(prog_id: &str) -> Option<&'static SchemaEntry> {
    ENTRIES.iter().find(|e| e.prog_id == prog_id)
}

/// The PropertyTable describing one kind's columns
pub fn definition_table(kind: SchemaKind) -> PropertyTable {
    entry(kind).definition.clone()
}

/// A single-entry enumeration table selecting `code` for `column`.
///
/// Used as the nested value of an item whose value is an enumeration code.
pub fn enum_selection(kind: SchemaKind, column: &str, code: &str) -> ExportResult<PropertyTable> {
    let schema = entry(kind);
    let (ordinal, col) = schema.column(column).ok_or_else(|| {
        ExportError::invalid_input("column", column, format!("No such column in {}", schema.display_name))
    })?;
    let value = col.values.iter().find(|v| v.code == code).cloned().ok_or_else(|| {
        ExportError::invalid_input(column, code, "Code is not part of the enumeration")
    })?;

    Ok(PropertyTable::new("").with_descriptor(descriptor_for(schema.table_uid, ordinal, col, vec![value])))
}

/// Derive a stable id for `scope` under `base`, formatted `{XXXXXXXX-...}`.
pub fn scoped_uid(base: &str, scope: &str) -> String {
    let uid = Uuid::new_v5(&XCHG_NAMESPACE, format!("{}/{}", base, scope).as_bytes());
    format!("{{{}}}", uid.hyphenated().to_string().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_entries_cover_every_kind_in_order() {
        assert_eq!(ENTRIES.len(), SchemaKind::ALL.len());
        for kind in SchemaKind::ALL {
            assert_eq!(entry(kind).kind, kind);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids = HashSet::new();
        for e in ENTRIES.iter() {
            assert!(ids.insert(e.container_uid));
            assert!(ids.insert(e.table_uid));
            assert!(ids.insert(e.prog_id));
        }
    }

    #[test]
    fn test_definition_tables_validate() {
        for kind in SchemaKind::ALL {
            let table = definition_table(kind);
            assert!(table.validate().is_ok(), "{:?}", kind);
            assert_eq!(table.size(), entry(kind).columns.len());
            assert_eq!(table.descriptors[0].ordinal.as_deref(), Some("0"));
            assert_eq!(table.descriptors[0].flag.as_deref(), Some(FLAG_KEY));
        }
    }

    #[test]
    fn test_support_columns_include_every_dof() {
        let support = entry(SchemaKind::Support);
        assert_eq!(support.columns.len(), 2 + DOF_NAMES.len());
        assert_eq!(support.column("Rz").map(|(i, _)| i), Some(7));
    }

    #[test]
    fn test_enum_selection() {
        let table = enum_selection(SchemaKind::LoadGroup, "Load", "1").unwrap();
        assert_eq!(table.size(), 1);
        let descriptor = &table.descriptors[0];
        assert_eq!(descriptor.ordinal.as_deref(), Some("1"));
        assert_eq!(descriptor.enum_values, vec![EnumValue::new("1", "Variable")]);
        assert_eq!(
            descriptor.uid,
            entry(SchemaKind::LoadGroup).definition.descriptors[1].uid
        );
    }

    #[test]
    fn test_enum_selection_rejects_unknown_code_or_column() {
        assert_eq!(
            enum_selection(SchemaKind::LoadGroup, "Load", "7").unwrap_err().error_code(),
            "INVALID_INPUT"
        );
        assert!(enum_selection(SchemaKind::Node, "Load", "0").is_err());
    }

    #[test]
    fn test_scoped_uid_is_stable_and_distinct() {
        let a = scoped_uid("{C}", "LC1");
        assert_eq!(a, scoped_uid("{C}", "LC1"));
        assert_ne!(a, scoped_uid("{C}", "LC2"));
        assert!(a.starts_with('{') && a.ends_with('}'));
        assert_eq!(a.len(), 38);
        assert_eq!(a, a.to_uppercase());
    }
}
