use std::collections::BTreeMap;
use std::fmt;

use super::getter::{FieldGetter, NamespaceContext, PathGetter};
use crate::core::{ConfigError, SourceField};

/// A recognized document syntax, identified by its root element.
pub struct Syntax {
    id: String,
    name: String,
    namespace_uri: String,
    local_name: String,
    version: Option<String>,
    getters: BTreeMap<SourceField, Vec<Box<dyn FieldGetter>>>,
}

impl fmt::Debug for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Syntax")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("namespace_uri", &self.namespace_uri)
            .field("local_name", &self.local_name)
            .field("version", &self.version)
            .field("getters", &self.getters)
            .finish()
    }
}

impl Syntax {
    pub fn builder(
        id: impl Into<String>,
        name: impl Into<String>,
        namespace_uri: impl Into<String>,
        local_name: impl Into<String>,
    ) -> SyntaxBuilder {
        SyntaxBuilder::new(id, name, namespace_uri, local_name)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Syntax version used when no selector tree overrides it.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Getters for `field`, in the order they are tried.
    pub fn getters(&self, field: SourceField) -> &[Box<dyn FieldGetter>] {
        self.getters.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_getter(&self, field: SourceField) -> bool {
        !self.getters(field).is_empty()
    }

    pub fn matches_root(&self, namespace_uri: &str, local_name: &str) -> bool {
        self.namespace_uri == namespace_uri && self.local_name == local_name
    }
}

/// Builder for [`Syntax`].
///
/// ```
/// use docdet::core::SourceField;
/// use docdet::syntax::{NamespaceContext, Syntax};
///
/// let ns = NamespaceContext::new()
///     .bind("ubl", "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2")
///     .bind("cbc", "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2");
/// let syntax = Syntax::builder(
///     "ubl2-invoice",
///     "UBL 2 Invoice",
///     "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2",
///     "Invoice",
/// )
/// .version("2.1")
/// .path(SourceField::CustomizationId, "/ubl:Invoice/cbc:CustomizationID", &ns)
/// .unwrap()
/// .build()
/// .unwrap();
/// assert!(syntax.has_getter(SourceField::CustomizationId));
/// ```
pub struct SyntaxBuilder {
    id: String,
    name: String,
    namespace_uri: String,
    local_name: String,
    version: Option<String>,
    getters: BTreeMap<SourceField, Vec<Box<dyn FieldGetter>>>,
}

impl SyntaxBuilder {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        namespace_uri: impl Into<String>,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            namespace_uri: namespace_uri.into(),
            local_name: local_name.into(),
            version: None,
            getters: BTreeMap::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Append a getter to the fallback list of `field`.
    pub fn getter(mut self, field: SourceField, getter: impl FieldGetter + 'static) -> Self {
        self.getters.entry(field).or_default().push(Box::new(getter));
        self
    }

    /// Compile `expression` and append it to the fallback list of `field`.
    pub fn path(
        self,
        field: SourceField,
        expression: &str,
        namespaces: &NamespaceContext,
    ) -> Result<Self, ConfigError> {
        let getter = PathGetter::compile(expression, namespaces)?;
        Ok(self.getter(field, getter))
    }

    pub fn build(self) -> Result<Syntax, ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::Malformed("syntax id must not be empty".into()));
        }
        if self.local_name.trim().is_empty() {
            return Err(ConfigError::Malformed(format!(
                "syntax '{}' has no root element local name",
                self.id
            )));
        }
        for field in SourceField::ALL {
            if field.is_syntax_required() && !self.getters.contains_key(&field) {
                return Err(ConfigError::MissingGetter {
                    syntax_id: self.id,
                    field,
                });
            }
        }
        Ok(Syntax {
            id: self.id,
            name: self.name,
            namespace_uri: self.namespace_uri,
            local_name: self.local_name,
            version: self.version,
            getters: self.getters,
        })
    }
}

/// All known syntaxes, in registration order.
#[derive(Debug, Default)]
pub struct SyntaxRegistry {
    syntaxes: Vec<Syntax>,
}

impl SyntaxRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a syntax. Ids and root elements must be unique.
    pub fn register(&mut self, syntax: Syntax) -> Result<(), ConfigError> {
        if self.get(&syntax.id).is_some() {
            return Err(ConfigError::DuplicateSyntaxId(syntax.id));
        }
        if let Some(existing) = self.find_syntax(&syntax.namespace_uri, &syntax.local_name) {
            return Err(ConfigError::DuplicateRootElement {
                existing: existing.id.clone(),
                syntax_id: syntax.id,
                namespace_uri: syntax.namespace_uri,
                local_name: syntax.local_name,
            });
        }
        self.syntaxes.push(syntax);
        Ok(())
    }

    /// Find the syntax for a document root. `None` means the document type is
    /// not supported, which is not an error.
    pub fn find_syntax(&self, namespace_uri: &str, local_name: &str) -> Option<&Syntax> {
        self.syntaxes
            .iter()
            .find(|s| s.matches_root(namespace_uri, local_name))
    }

    pub fn get(&self, id: &str) -> Option<&Syntax> {
        self.syntaxes.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Syntax> {
        self.syntaxes.iter()
    }

    pub fn len(&self) -> usize {
        self.syntaxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syntaxes.is_empty()
    }
}
