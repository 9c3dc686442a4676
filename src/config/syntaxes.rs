use crate::core::{ConfigError, DddError, Element, SourceField};
use crate::syntax::{NamespaceContext, Syntax, SyntaxRegistry};
use crate::xml::parse_document;

use super::{required_attribute, required_child};

/// Load a `<SyntaxList>` document.
///
/// ```
/// let registry = docdet::config::parse_syntax_list(r#"
///   <SyntaxList>
///     <Syntax id="my-order">
///       <Name>My Order</Name>
///       <Version>1.0</Version>
///       <RootElement namespace="urn:example:order" localName="Order"/>
///       <Namespace prefix="o" uri="urn:example:order"/>
///       <Get id="CustomizationID">/o:Order/o:Profile</Get>
///       <Get id="SenderIDValue">/o:Order/o:Buyer/o:ID</Get>
///     </Syntax>
///   </SyntaxList>"#).unwrap();
/// assert!(registry.find_syntax("urn:example:order", "Order").is_some());
/// ```
pub fn parse_syntax_list(xml: &str) -> Result<SyntaxRegistry, DddError> {
    let root = parse_document(xml)?;
    Ok(load_syntax_list(&root)?)
}

/// Build a registry from an already parsed `<SyntaxList>` element.
pub fn load_syntax_list(root: &Element) -> Result<SyntaxRegistry, ConfigError> {
    if root.local_name() != "SyntaxList" {
        return Err(ConfigError::Malformed(format!(
            "expected <SyntaxList>, found <{}>",
            root.local_name()
        )));
    }
    let mut registry = SyntaxRegistry::new();
    for el in root.children_by_local_name("Syntax") {
        registry.register(load_syntax(el)?)?;
    }
    tracing::debug!(syntaxes = registry.len(), "syntax list loaded");
    Ok(registry)
}

fn load_syntax(el: &Element) -> Result<Syntax, ConfigError> {
    let id = required_attribute(el, "id")?;
    let name = el
        .child_by_local_name("Name")
        .map(|n| n.text().trim())
        .unwrap_or(id);
    let root = required_child(el, "RootElement")?;
    let namespace_uri = root.attribute("", "namespace").unwrap_or("");
    let local_name = required_attribute(root, "localName")?;

    let mut namespaces = NamespaceContext::new();
    for ns in el.children_by_local_name("Namespace") {
        namespaces.insert(required_attribute(ns, "prefix")?, required_attribute(ns, "uri")?);
    }

    let mut builder = Syntax::builder(id, name, namespace_uri, local_name);
    if let Some(version) = el.child_by_local_name("Version") {
        builder = builder.version(version.text().trim());
    }
    for get in el.children_by_local_name("Get") {
        let field_id = required_attribute(get, "id")?;
        let field = SourceField::from_id(field_id)
            .ok_or_else(|| ConfigError::UnknownSourceField(field_id.to_string()))?;
        builder = builder.path(field, get.text().trim(), &namespaces)?;
    }
    builder.build()
}
