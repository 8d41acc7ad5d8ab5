//! # XML Element Tree
//!
//! A minimal owned element tree. Document nodes emit into it, and the
//! finished tree is written out with `quick-xml` in a single linear pass.
//!
//! Attributes keep insertion order, so two trees built by the same sequence
//! of calls serialize to identical bytes. Attribute values are escaped on
//! write: markup characters become entities, tab/LF/CR become character
//! references, and characters outside the XML 1.0 range fail the write.
//!
//! ## Example
//!
//! ```rust
//! use xchg_core::xml::{to_xml_string, XmlElement};
//!
//! let mut root = XmlElement::new("project");
//! root.set_attr("xmlns", "urn:example");
//! let row = root.append(XmlElement::new("row"));
//! row.set_attr("id", "1");
//! row.set_attr_opt("nm", None::<&str>);
//!
//! let xml = to_xml_string(&root, 0).unwrap();
//! assert!(xml.ends_with(r#"<project xmlns="urn:example"><row id="1"/></project>"#));
//! ```

use std::borrow::Cow;
use std::io::Write;

use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::errors::{ExportError, ExportResult};

/// One element of the output tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set an attribute, replacing an existing value with the same key in place.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Set an attribute only when a non-empty value is given.
    ///
    /// Absent and empty values are omitted entirely; `key=""` is never written.
    pub fn set_attr_opt<S: AsRef<str>>(&mut self, key: &str, value: Option<S>) {
        if let Some(value) = value {
            let value = value.as_ref();
            if !value.is_empty() {
                self.set_attr(key, value);
            }
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Append a child and return a mutable handle to it.
    pub fn append(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// First child with the given element name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given element name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Write this element and its descendants as XML events.
    pub fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> ExportResult<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            let escaped = escape_attribute(key, value)?;
            // Raw byte pairs are pushed as-is, the value is already escaped
            start.push_attribute((key.as_bytes(), escaped.as_bytes()));
        }

        if self.children.is_empty() {
            return writer
                .write_event(Event::Empty(start))
                .map_err(|e| ExportError::serialization(e.to_string()));
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| ExportError::serialization(e.to_string()))?;
        for child in &self.children {
            child.write_to(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(|e| ExportError::serialization(e.to_string()))
    }
}

/// Characters allowed by the XML 1.0 `Char` production
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escape one attribute value for output.
///
/// Tab, LF and CR are written as `&#9;`, `&#10;` and `&#13;` so parsers do not
/// normalise them to spaces. Any other character outside the XML 1.0 range is
/// rejected with `InvalidInput`.
pub fn escape_attribute<'a>(key: &str, value: &'a str) -> ExportResult<Cow<'a, str>> {
    if let Some(c) = value.chars().find(|c| !is_xml_char(*c)) {
        return Err(ExportError::invalid_input(
            format!("attribute '{}'", key),
            value.escape_debug().to_string(),
            format!("U+{:04X} is not allowed in XML", c as u32),
        ));
    }

    let escaped = escape(value);
    if !escaped.contains(|c: char| matches!(c, '\t' | '\n' | '\r')) {
        return Ok(escaped);
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c => out.push(c),
        }
    }
    Ok(Cow::Owned(out))
}

/// Serialize a tree to a UTF-8 string with an XML declaration.
///
/// `indent` is the number of spaces per nesting level; 0 writes the document
/// on a single line.
pub fn to_xml_string(root: &XmlElement, indent: usize) -> ExportResult<String> {
    let mut writer = if indent > 0 {
        Writer::new_with_indent(Vec::new(), b' ', indent)
    } else {
        Writer::new(Vec::new())
    };

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| ExportError::serialization(e.to_string()))?;
    root.write_to(&mut writer)?;

    String::from_utf8(writer.into_inner()).map_err(|e| ExportError::serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut el = XmlElement::new("p0");
        el.set_attr("v", "1");
        el.set_attr("n", "name");
        el.set_attr("v", "2");
        assert_eq!(
            el.attributes(),
            &[("v".to_string(), "2".to_string()), ("n".to_string(), "name".to_string())]
        );
    }

    #[test]
    fn test_set_attr_opt_omits_empty() {
        let mut el = XmlElement::new("p0");
        el.set_attr_opt("v", Some(""));
        el.set_attr_opt("i", None::<String>);
        el.set_attr_opt("n", Some("N1"));
        assert_eq!(el.attr("v"), None);
        assert_eq!(el.attr("i"), None);
        assert_eq!(el.attr("n"), Some("N1"));
    }

    #[test]
    fn test_escaping() {
        let mut root = XmlElement::new("row");
        root.set_attr("nm", "a<b & \"c\"");
        let xml = to_xml_string(&root, 0).unwrap();
        assert!(xml.contains("a&lt;b &amp; &quot;c&quot;"));
    }

    #[test]
    fn test_whitespace_written_as_character_references() {
        let mut root = XmlElement::new("row");
        root.set_attr("nm", "a\tb\nc\rd");
        let xml = to_xml_string(&root, 0).unwrap();
        assert!(xml.ends_with(r#"<row nm="a&#9;b&#10;c&#13;d"/>"#));
    }

    #[test]
    fn test_forbidden_characters_rejected() {
        for value in ["LC\u{1}", "\u{0}", "x\u{1F}", "\u{FFFE}", "end\u{FFFF}"] {
            let mut root = XmlElement::new("row");
            root.set_attr("nm", value);
            let err = to_xml_string(&root, 0).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_INPUT", "{:?}", value);
        }
    }

    #[test]
    fn test_forbidden_character_in_nested_element() {
        let mut root = XmlElement::new("project");
        root.append(XmlElement::new("row")).set_attr("id", "1\u{7}");
        assert!(to_xml_string(&root, 2).is_err());
    }

    #[test]
    fn test_escape_attribute_borrows_plain_values() {
        assert!(matches!(escape_attribute("v", "N12").unwrap(), Cow::Borrowed("N12")));
        assert_eq!(escape_attribute("v", "LC1\nwind & rain").unwrap(), "LC1&#10;wind &amp; rain");
        assert_eq!(escape_attribute("v", "é ✓ 𝄞").unwrap(), "é ✓ 𝄞");
    }

    #[test]
    fn test_indented_output() {
        let mut root = XmlElement::new("container");
        root.append(XmlElement::new("table"));
        let xml = to_xml_string(&root, 2).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<container>\n  <table/>\n</container>"));
    }

    #[test]
    fn test_child_lookup() {
        let mut root = XmlElement::new("row");
        root.append(XmlElement::new("p0"));
        root.append(XmlElement::new("p1"));
        root.append(XmlElement::new("p1"));
        assert!(root.child("p0").is_some());
        assert!(root.child("p2").is_none());
        assert_eq!(root.children_named("p1").count(), 2);
    }
}
