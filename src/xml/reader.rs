use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use crate::core::{DddError, Element};

fn xml_err(e: impl std::fmt::Display) -> DddError {
    DddError::Xml(format!("XML parse error: {e}"))
}

fn utf8(bytes: &[u8]) -> Result<&str, DddError> {
    std::str::from_utf8(bytes).map_err(xml_err)
}

fn resolve_namespace(resolved: ResolveResult<'_>) -> Result<String, DddError> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(utf8(ns.as_ref())?.to_string()),
        ResolveResult::Unbound => Ok(String::new()),
        ResolveResult::Unknown(prefix) => Err(DddError::Xml(format!(
            "unbound namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

/// Parse an XML document into an [`Element`] tree with resolved namespaces.
///
/// Character data is kept as written, except that whitespace-only text of
/// elements with children is dropped. Comments, processing instructions and
/// the doctype are skipped.
pub fn parse_document(xml: &str) -> Result<Element, DddError> {
    let mut reader = NsReader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (resolved, event) = reader.read_resolved_event().map_err(xml_err)?;
        let ns = resolve_namespace(resolved)?;
        match event {
            Event::Start(ref e) => {
                let element = start_element(&reader, ns, e)?;
                stack.push(element);
            }
            Event::Empty(ref e) => {
                let element = start_element(&reader, ns, e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| DddError::Xml("unexpected end tag".into()))?;
                element.discard_layout_whitespace();
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(ref t) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(&t.unescape().map_err(xml_err)?);
                }
            }
            Event::CData(ref c) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(utf8(c)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(DddError::Xml("unexpected end of document".into()));
    }
    root.ok_or_else(|| DddError::Xml("document has no root element".into()))
}

fn start_element(
    reader: &NsReader<&[u8]>,
    namespace_uri: String,
    start: &BytesStart<'_>,
) -> Result<Element, DddError> {
    let local_name = utf8(start.local_name().as_ref())?.to_string();
    let mut element = Element::new(namespace_uri, local_name);
    for attr in start.attributes() {
        let attr = attr.map_err(xml_err)?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, local) = reader.resolve_attribute(attr.key);
        let ns = resolve_namespace(resolved)?;
        let value = attr.unescape_value().map_err(xml_err)?;
        element.push_attribute(ns, utf8(local.as_ref())?, value);
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), DddError> {
    match stack.last_mut() {
        Some(parent) => parent.push_child(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(DddError::Xml("document has more than one root element".into())),
    }
    Ok(())
}
