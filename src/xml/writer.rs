use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use crate::core::{DddError, Element};

fn xml_io(e: std::io::Error) -> DddError {
    DddError::Xml(format!("XML write error: {e}"))
}

/// Indenting XML writer producing a UTF-8 string.
struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    fn new() -> Result<Self, DddError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    fn into_string(self) -> Result<String, DddError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| DddError::Xml(format!("XML UTF-8 error: {e}")))
    }

    fn end_element(&mut self, name: &str) -> Result<&mut Self, DddError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    fn text(&mut self, text: &str) -> Result<&mut Self, DddError> {
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        Ok(self)
    }

    /// Write an element tree. The element namespace is declared as default
    /// namespace wherever it changes; namespaced attributes get generated
    /// `a0`, `a1`, ... prefixes.
    fn element(&mut self, element: &Element) -> Result<&mut Self, DddError> {
        self.write_tree(element, "")?;
        Ok(self)
    }

    fn write_tree(&mut self, element: &Element, default_ns: &str) -> Result<(), DddError> {
        let name = element.local_name();
        let mut attrs: Vec<(String, String)> = Vec::new();
        if element.namespace_uri() != default_ns {
            attrs.push(("xmlns".to_string(), element.namespace_uri().to_string()));
        }
        let mut prefixes: Vec<&str> = Vec::new();
        for attr in element.attributes() {
            if attr.namespace_uri.is_empty() {
                attrs.push((attr.local_name.clone(), attr.value.clone()));
                continue;
            }
            let index = match prefixes.iter().position(|ns| *ns == attr.namespace_uri) {
                Some(i) => i,
                None => {
                    prefixes.push(&attr.namespace_uri);
                    let i = prefixes.len() - 1;
                    attrs.push((format!("xmlns:a{i}"), attr.namespace_uri.clone()));
                    i
                }
            };
            attrs.push((format!("a{index}:{}", attr.local_name), attr.value.clone()));
        }

        let mut start = BytesStart::new(name);
        for (k, v) in &attrs {
            start.push_attribute((k.as_str(), v.as_str()));
        }

        if element.text().is_empty() && element.children().is_empty() {
            self.writer
                .write_event(Event::Empty(start))
                .map_err(xml_io)?;
            return Ok(());
        }

        self.writer
            .write_event(Event::Start(start))
            .map_err(xml_io)?;
        if !element.text().is_empty() {
            self.text(element.text())?;
        }
        for child in element.children() {
            self.write_tree(child, element.namespace_uri())?;
        }
        self.end_element(name)?;
        Ok(())
    }
}

/// Serialize an element tree as a standalone XML document.
pub fn write_document(root: &Element) -> Result<String, DddError> {
    let mut w = XmlWriter::new()?;
    w.element(root)?;
    w.into_string()
}
