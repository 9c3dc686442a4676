/// An attribute of an [`Element`]. Namespace declarations are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Namespace URI, empty for unqualified attributes.
    pub namespace_uri: String,
    pub local_name: String,
    pub value: String,
}

/// A namespace-resolved XML element: the document root handed to getters.
///
/// Only what field extraction needs is modelled: names, attributes, the
/// element's own character data and its child elements in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    namespace_uri: String,
    local_name: String,
    attributes: Vec<Attribute>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Create an element. Pass `""` as namespace for an unqualified element.
    pub fn new(namespace_uri: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace_uri: namespace_uri.into(),
            local_name: local_name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(
        mut self,
        namespace_uri: impl Into<String>,
        local_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.push_attribute(namespace_uri, local_name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(&text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_attribute(
        &mut self,
        namespace_uri: impl Into<String>,
        local_name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.attributes.push(Attribute {
            namespace_uri: namespace_uri.into(),
            local_name: local_name.into(),
            value: value.into(),
        });
    }

    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Drop the character data of an element with children when it is only
    /// whitespace (indentation between child elements).
    pub fn discard_layout_whitespace(&mut self) {
        if !self.children.is_empty() && self.text.trim().is_empty() {
            self.text.clear();
        }
    }

    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Character data directly inside this element.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character data of this element and all descendants, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }

    pub fn is_named(&self, namespace_uri: &str, local_name: &str) -> bool {
        self.namespace_uri == namespace_uri && self.local_name == local_name
    }

    pub fn attribute(&self, namespace_uri: &str, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace_uri == namespace_uri && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Children with the given local name, in any namespace.
    pub fn children_by_local_name<'a>(
        &'a self,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.local_name == local_name)
    }

    /// First child with the given local name, in any namespace.
    pub fn child_by_local_name(&self, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local_name == local_name)
    }
}
