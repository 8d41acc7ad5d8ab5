//! Data records: objects (rows) and their positional items.
//!
//! An item's emitted label `p{k}` comes from its position in the parent
//! [`Object`], never from a field on the item itself.

use super::property::PropertyTable;
use super::{ensure_unique_ids, non_empty, Emit, Identified};
use crate::errors::{ExportError, ExportResult};
use crate::xml::XmlElement;

/// Element name for one data record
pub const ROW_TAG: &str = "row";

/// Nested structure carried by an item.
///
/// An item holds at most one: an enumeration selection / metadata table, or
/// a sub-table of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nested {
    Table(PropertyTable),
    Rows(Vec<Object>),
}

/// One property value of one object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectItem {
    pub value: Option<String>,
    pub index: Option<String>,
    pub name: Option<String>,
    pub type_override: Option<String>,
    pub nested: Option<Nested>,
}

impl ObjectItem {
    /// An item carrying just a value
    pub fn value(value: impl Into<String>) -> Self {
        ObjectItem {
            value: non_empty(value),
            ..Default::default()
        }
    }

    /// An item with no attributes at all
    pub fn empty() -> Self {
        ObjectItem::default()
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = non_empty(index);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(name);
        self
    }

    pub fn with_type(mut self, type_override: impl Into<String>) -> Self {
        self.type_override = non_empty(type_override);
        self
    }

    /// Attach a nested property table (e.g. an enumeration selection).
    ///
    /// Fails if the item already carries nested rows.
    pub fn with_table(self, table: PropertyTable) -> ExportResult<Self> {
        self.nest(Nested::Table(table))
    }

    /// Attach nested rows (a table-valued property).
    ///
    /// Fails if the item already carries a nested table.
    pub fn with_rows(self, rows: Vec<Object>) -> ExportResult<Self> {
        self.nest(Nested::Rows(rows))
    }

    fn nest(mut self, nested: Nested) -> ExportResult<Self> {
        let conflict = matches!(
            (&self.nested, &nested),
            (Some(Nested::Table(_)), Nested::Rows(_)) | (Some(Nested::Rows(_)), Nested::Table(_))
        );
        if conflict {
            return Err(ExportError::ConflictingNestedValue {
                value: self.value.unwrap_or_default(),
            });
        }
        self.nested = Some(nested);
        Ok(self)
    }

    /// Append this item to `parent` labelled `p{position}`.
    pub fn emit_at<'a>(&self, parent: &'a mut XmlElement, position: usize) -> &'a mut XmlElement {
        let el = parent.append(XmlElement::new(format!("p{}", position)));
        el.set_attr_opt("v", self.value.as_deref());
        el.set_attr_opt("i", self.index.as_deref());
        el.set_attr_opt("n", self.name.as_deref());
        el.set_attr_opt("t", self.type_override.as_deref());

        match &self.nested {
            Some(Nested::Table(table)) => {
                table.emit(el);
            }
            Some(Nested::Rows(rows)) => {
                for row in rows {
                    row.emit(el);
                }
            }
            None => {}
        }
        el
    }
}

/// One data record: an id, an optional display name and positional items.
///
/// # Example
///
/// ```rust
/// use xchg_core::document::{Emit, Object, ObjectItem};
/// use xchg_core::xml::XmlElement;
///
/// let row = Object::row3("7", ObjectItem::value("a"), ObjectItem::value("b"), ObjectItem::value("c"))
///     .with_name("N7");
///
/// let mut table = XmlElement::new("table");
/// let el = row.emit(&mut table);
/// let labels: Vec<&str> = el.children().iter().map(|c| c.name()).collect();
/// assert_eq!(labels, vec!["p0", "p1", "p2"]);
/// assert_eq!(el.attr("nm"), Some("N7"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object {
    pub id: String,
    pub name: Option<String>,
    pub items: Vec<ObjectItem>,
}

impl Object {
    pub fn new(id: impl Into<String>) -> Self {
        Object {
            id: id.into(),
            name: None,
            items: Vec::new(),
        }
    }

    /// Build an object from items in positional order
    pub fn from_items(id: impl Into<String>, items: impl IntoIterator<Item = ObjectItem>) -> Self {
        Object {
            id: id.into(),
            name: None,
            items: items.into_iter().collect(),
        }
    }

    pub fn row2(id: impl Into<String>, p0: ObjectItem, p1: ObjectItem) -> Self {
        Object::from_items(id, [p0, p1])
    }

    pub fn row3(id: impl Into<String>, p0: ObjectItem, p1: ObjectItem, p2: ObjectItem) -> Self {
        Object::from_items(id, [p0, p1, p2])
    }

    pub fn row4(id: impl Into<String>, p0: ObjectItem, p1: ObjectItem, p2: ObjectItem, p3: ObjectItem) -> Self {
        Object::from_items(id, [p0, p1, p2, p3])
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(name);
        self
    }

    /// Append an item to the end
    pub fn push(&mut self, item: ObjectItem) {
        self.items.push(item);
    }

    /// Place an item at an explicit position, which must be the next free slot.
    pub fn push_at(&mut self, position: usize, item: ObjectItem) -> ExportResult<()> {
        if position != self.items.len() {
            return Err(ExportError::position_mismatch(&self.id, self.items.len(), position));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn item(&self, position: usize) -> Option<&ObjectItem> {
        self.items.get(position)
    }

    pub fn arity(&self) -> usize {
        self.items.len()
    }

    /// Check nested structure below this row.
    ///
    /// Nested rows must have unique ids within their item and are checked
    /// recursively; nested property tables run their own validation.
    pub fn validate(&self) -> ExportResult<()> {
        for (position, item) in self.items.iter().enumerate() {
            match &item.nested {
                Some(Nested::Table(table)) => table.validate()?,
                Some(Nested::Rows(rows)) => {
                    let scope = format!("row '{}' p{}", self.id, position);
                    ensure_unique_ids(&scope, rows)?;
                    for row in rows {
                        row.validate()?;
                    }
                }
                None => {}
            }
        }
        Ok(())
    }
}

impl Identified for Object {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_tag(&self) -> &str {
        ROW_TAG
    }
}

impl Emit for Object {
    fn emit<'a>(&self, parent: &'a mut XmlElement) -> &'a mut XmlElement {
        let el = parent.append(XmlElement::new(ROW_TAG));
        el.set_attr("id", self.id.as_str());
        el.set_attr_opt("nm", self.name.as_deref());

        for (position, item) in self.items.iter().enumerate() {
            item.emit_at(el, position);
        }
        el
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::property::{EnumValue, PropertyDescriptor};

    fn emit_row(row: &Object) -> XmlElement {
        let mut parent = XmlElement::new("table");
        row.emit(&mut parent).clone()
    }

    fn labels(el: &XmlElement) -> Vec<&str> {
        el.children().iter().map(|c| c.name()).collect()
    }

    #[test]
    fn test_positional_labels_independent_of_arity() {
        let a = || ObjectItem::value("a");
        assert_eq!(labels(&emit_row(&Object::row2("1", a(), a()))), vec!["p0", "p1"]);
        assert_eq!(labels(&emit_row(&Object::row3("1", a(), a(), a()))), vec!["p0", "p1", "p2"]);
        assert_eq!(
            labels(&emit_row(&Object::row4("1", a(), a(), a(), a()))),
            vec!["p0", "p1", "p2", "p3"]
        );
        let wide = Object::from_items("1", (0..12).map(|k| ObjectItem::value(k.to_string())));
        let el = emit_row(&wide);
        assert_eq!(el.children()[11].name(), "p11");
        assert_eq!(el.children()[11].attr("v"), Some("11"));
    }

    #[test]
    fn test_row_id_always_present() {
        let el = emit_row(&Object::new(""));
        assert_eq!(el.attr("id"), Some(""));
        assert_eq!(el.attr("nm"), None);
    }

    #[test]
    fn test_item_attributes_omitted_when_empty() {
        let mut parent = XmlElement::new("row");
        let item = ObjectItem::value("").with_index("").with_name("").with_type("");
        let el = item.emit_at(&mut parent, 0);
        assert!(el.attributes().is_empty());

        let mut parent = XmlElement::new("row");
        let item = ObjectItem::value("12.5").with_index("3").with_name("Fx").with_type("real");
        let el = item.emit_at(&mut parent, 4);
        assert_eq!(el.name(), "p4");
        let attrs: Vec<(&str, &str)> = el.attributes().iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(attrs, vec![("v", "12.5"), ("i", "3"), ("n", "Fx"), ("t", "real")]);
    }

    #[test]
    fn test_item_nested_table() {
        let selection = PropertyTable::new("").with_descriptor(
            PropertyDescriptor::new("0", "Type", "enum", "")
                .with_enum_values(vec![EnumValue::new("1", "Variable")]),
        );
        let item = ObjectItem::value("1").with_table(selection).unwrap();
        let mut parent = XmlElement::new("row");
        let el = item.emit_at(&mut parent, 1);
        let label = el
            .child("table")
            .and_then(|t| t.child("def_property"))
            .and_then(|d| d.child("enum"))
            .and_then(|e| e.child("item"))
            .and_then(|i| i.attr("n"));
        assert_eq!(label, Some("Variable"));
    }

    #[test]
    fn test_item_nested_rows() {
        let rows = vec![
            Object::row2("1", ObjectItem::value("N1"), ObjectItem::value("0")),
            Object::row2("2", ObjectItem::value("N2"), ObjectItem::value("1")),
        ];
        let item = ObjectItem::empty().with_rows(rows).unwrap();
        let mut parent = XmlElement::new("row");
        let el = item.emit_at(&mut parent, 3);
        let ids: Vec<&str> = el.children_named("row").map(|r| r.attr("id").unwrap()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_item_rejects_conflicting_nested_values() {
        let err = ObjectItem::value("x")
            .with_rows(vec![Object::new("1")])
            .unwrap()
            .with_table(PropertyTable::new("{T}"))
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFLICTING_NESTED_VALUE");

        let err = ObjectItem::value("x")
            .with_table(PropertyTable::new("{T}"))
            .unwrap()
            .with_rows(Vec::new())
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFLICTING_NESTED_VALUE");
    }

    #[test]
    fn test_validate_nested_rows() {
        let corners = vec![
            Object::row2("1", ObjectItem::value("N1"), ObjectItem::value("0")),
            Object::row2("1", ObjectItem::value("N2"), ObjectItem::value("0")),
        ];
        let row = Object::row2("7", ObjectItem::value("F7"), ObjectItem::empty().with_rows(corners).unwrap());
        assert_eq!(row.validate(), Err(ExportError::duplicate_id("row '7' p1", "1")));

        let deep = Object::row2(
            "1",
            ObjectItem::value("a"),
            ObjectItem::empty().with_rows(vec![row]).unwrap(),
        );
        assert_eq!(deep.validate().unwrap_err().error_code(), "DUPLICATE_ID");

        let unique = Object::from_items(
            "7",
            [ObjectItem::empty()
                .with_rows(vec![Object::new("1"), Object::new("2")])
                .unwrap()],
        );
        assert!(unique.validate().is_ok());
    }

    #[test]
    fn test_validate_nested_property_table() {
        let selection = PropertyTable::new("{T}")
            .with_descriptor(PropertyDescriptor::new("0", "A", "enum", "{A}"))
            .with_descriptor(PropertyDescriptor::new("1", "B", "enum", "{A}"));
        let row = Object::row2("1", ObjectItem::value("x"), ObjectItem::value("0").with_table(selection).unwrap());
        assert_eq!(row.validate(), Err(ExportError::duplicate_id("property table '{T}'", "{A}")));
    }

    #[test]
    fn test_push_at_requires_next_slot() {
        let mut row = Object::new("9");
        row.push_at(0, ObjectItem::value("a")).unwrap();
        row.push(ObjectItem::value("b"));
        assert_eq!(
            row.push_at(3, ObjectItem::value("d")),
            Err(ExportError::position_mismatch("9", 2, 3))
        );
        row.push_at(2, ObjectItem::value("c")).unwrap();
        assert_eq!(row.arity(), 3);
        assert_eq!(row.item(2).and_then(|i| i.value.as_deref()), Some("c"));
    }
}
