//! Property metadata: descriptors and the tables that group them.
//!
//! A [`PropertyDescriptor`] describes, once, the shape of a property that many
//! [`ObjectItem`](super::ObjectItem)s later instantiate.

use super::{ensure_unique_ids, non_empty, Emit, Identified};
use crate::errors::ExportResult;
use crate::xml::XmlElement;

/// Element name for a property definition
pub const DEF_PROPERTY_TAG: &str = "def_property";
/// Element name for both table kinds
pub const TABLE_TAG: &str = "table";
/// Element name wrapping enumeration values
pub const ENUM_TAG: &str = "enum";
/// Element name of one enumeration value
pub const ENUM_ITEM_TAG: &str = "item";

/// One `(code, label)` pair of an enumerated value set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub code: String,
    pub label: String,
}

impl EnumValue {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        EnumValue {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// A named, typed metadata slot.
///
/// # Example
///
/// ```rust
/// use xchg_core::document::{Emit, EnumValue, PropertyDescriptor};
/// use xchg_core::xml::XmlElement;
///
/// let descriptor = PropertyDescriptor::new("1", "Type", "enum", "{A1}")
///     .with_enum_values(vec![EnumValue::new("0", "Permanent"), EnumValue::new("1", "Variable")]);
///
/// let mut parent = XmlElement::new("table");
/// let el = descriptor.emit(&mut parent);
/// assert_eq!(el.attr("x"), Some("1"));
/// assert_eq!(el.attr("flag"), None);
/// assert_eq!(el.child("enum").unwrap().children().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub ordinal: Option<String>,
    pub name: Option<String>,
    pub type_name: Option<String>,
    /// Schema-wide unique identifier, stable across application versions
    pub uid: Option<String>,
    pub flag: Option<String>,
    pub enum_values: Vec<EnumValue>,
}

impl PropertyDescriptor {
    pub fn new(
        ordinal: impl Into<String>,
        name: impl Into<String>,
        type_name: impl Into<String>,
        uid: impl Into<String>,
    ) -> Self {
        PropertyDescriptor {
            ordinal: non_empty(ordinal),
            name: non_empty(name),
            type_name: non_empty(type_name),
            uid: non_empty(uid),
            flag: None,
            enum_values: Vec::new(),
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = non_empty(flag);
        self
    }

    pub fn with_enum_values(mut self, values: Vec<EnumValue>) -> Self {
        self.enum_values = values;
        self
    }
}

impl Identified for PropertyDescriptor {
    fn id(&self) -> &str {
        self.uid.as_deref().unwrap_or_default()
    }

    fn type_tag(&self) -> &str {
        DEF_PROPERTY_TAG
    }
}

impl Emit for PropertyDescriptor {
    fn emit<'a>(&self, parent: &'a mut XmlElement) -> &'a mut XmlElement {
        let el = parent.append(XmlElement::new(DEF_PROPERTY_TAG));
        el.set_attr_opt("x", self.ordinal.as_deref());
        el.set_attr_opt("name", self.name.as_deref());
        el.set_attr_opt("type", self.type_name.as_deref());
        el.set_attr_opt("id", self.uid.as_deref());
        el.set_attr_opt("flag", self.flag.as_deref());

        if !self.enum_values.is_empty() {
            let list = el.append(XmlElement::new(ENUM_TAG));
            for value in &self.enum_values {
                let item = list.append(XmlElement::new(ENUM_ITEM_TAG));
                item.set_attr_opt("v", Some(&value.code));
                item.set_attr_opt("n", Some(&value.label));
            }
        }
        el
    }
}

/// Layout hint for how the consuming application presents a property table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Vertical,
    Horizontal,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Vertical => "vertical",
            Layout::Horizontal => "horizontal",
        }
    }
}

/// An ordered collection of property descriptors.
///
/// The emitted `size` attribute always equals the descriptor count, including 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyTable {
    pub uid: Option<String>,
    pub layout: Option<Layout>,
    pub class_id: Option<String>,
    pub prog_id: Option<String>,
    pub descriptors: Vec<PropertyDescriptor>,
}

impl PropertyTable {
    pub fn new(uid: impl Into<String>) -> Self {
        PropertyTable {
            uid: non_empty(uid),
            ..Default::default()
        }
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_class_id(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = non_empty(class_id);
        self
    }

    pub fn with_prog_id(mut self, prog_id: impl Into<String>) -> Self {
        self.prog_id = non_empty(prog_id);
        self
    }

    pub fn with_descriptor(mut self, descriptor: PropertyDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn size(&self) -> usize {
        self.descriptors.len()
    }

    /// Check that no two descriptors share a uid.
    ///
    /// Descriptors without a uid are not compared.
    pub fn validate(&self) -> ExportResult<()> {
        let scope = format!("property table '{}'", self.id());
        ensure_unique_ids(&scope, self.descriptors.iter().filter(|d| d.uid.is_some()))
    }
}

impl Identified for PropertyTable {
    fn id(&self) -> &str {
        self.uid.as_deref().unwrap_or_default()
    }

    fn type_tag(&self) -> &str {
        self.class_id.as_deref().unwrap_or_default()
    }
}

impl Emit for PropertyTable {
    fn emit<'a>(&self, parent: &'a mut XmlElement) -> &'a mut XmlElement {
        let el = parent.append(XmlElement::new(TABLE_TAG));
        el.set_attr_opt("id", self.uid.as_deref());
        el.set_attr_opt("type", self.layout.map(|l| l.as_str()));
        el.set_attr_opt("clsid", self.class_id.as_deref());
        el.set_attr_opt("progid", self.prog_id.as_deref());
        el.set_attr("size", self.size().to_string());

        for descriptor in &self.descriptors {
            descriptor.emit(el);
        }
        el
    }
}
