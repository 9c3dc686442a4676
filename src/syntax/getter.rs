//! Field getters: how a syntax reads one value out of a document.
//!
//! The built-in getter is [`PathGetter`], a compiled absolute path over the
//! [`Element`] tree. Supported grammar:
//!
//! ```text
//! path      := ('/' step)+ ('/' '@' name)?
//! step      := name-test predicate*
//! name-test := prefix ':' local | local | '*'
//! predicate := '[' integer ']'                (1-based position)
//!            | '[' '@' name '=' literal ']'   (attribute equals)
//!            | '[' name-test '=' literal ']'  (child text equals)
//! ```
//!
//! Unprefixed names match elements/attributes without namespace. The value
//! of a path is the trimmed text content of the first selected element (or
//! the first selected attribute); an empty value counts as absent.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::core::{ConfigError, Element};

/// A getter failed against a particular document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct GetterError(pub String);

/// Reads a single source field value from a document root.
pub trait FieldGetter: Send + Sync + fmt::Debug {
    /// `Ok(None)` means the document does not carry the value.
    fn get(&self, root: &Element) -> Result<Option<String>, GetterError>;

    /// Human-readable form used in extraction error reports.
    fn description(&self) -> String;
}

/// Prefix to namespace URI bindings used when compiling path expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceContext {
    bindings: BTreeMap<String, String>,
}

impl NamespaceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.insert(prefix, uri);
        self
    }

    pub fn insert(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.bindings.insert(prefix.into(), uri.into());
    }

    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Name {
        namespace_uri: String,
        local_name: String,
    },
}

impl NameTest {
    fn matches(&self, e: &Element) -> bool {
        match self {
            Self::Any => true,
            Self::Name {
                namespace_uri,
                local_name,
            } => e.is_named(namespace_uri, local_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Position(usize),
    Attribute {
        namespace_uri: String,
        local_name: String,
        value: String,
    },
    Child { test: NameTest, value: String },
}

impl Predicate {
    fn filter<'a>(&self, candidates: Vec<&'a Element>) -> Vec<&'a Element> {
        match self {
            Self::Position(n) => candidates.get(n - 1).copied().into_iter().collect(),
            Self::Attribute {
                namespace_uri,
                local_name,
                value,
            } => candidates
                .into_iter()
                .filter(|e| e.attribute(namespace_uri, local_name) == Some(value.as_str()))
                .collect(),
            Self::Child { test, value } => candidates
                .into_iter()
                .filter(|e| {
                    e.children()
                        .iter()
                        .any(|c| test.matches(c) && c.text_content().trim() == value.as_str())
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    test: NameTest,
    predicates: Vec<Predicate>,
}

impl Step {
    fn select<'a>(&self, candidates: impl Iterator<Item = &'a Element>) -> Vec<&'a Element> {
        let mut selected: Vec<&Element> = candidates.filter(|e| self.test.matches(e)).collect();
        for p in &self.predicates {
            selected = p.filter(selected);
        }
        selected
    }
}

/// A compiled absolute path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGetter {
    expression: String,
    steps: Vec<Step>,
    attribute: Option<(String, String)>,
}

impl PathGetter {
    /// Compile `expression`, resolving prefixes against `namespaces`.
    pub fn compile(expression: &str, namespaces: &NamespaceContext) -> Result<Self, ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidGetter {
            expression: expression.to_string(),
            message: message.to_string(),
        };

        let trimmed = expression.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Err(invalid("path must be absolute"));
        };
        if rest.starts_with('/') {
            return Err(invalid("descendant axis '//' is not supported"));
        }

        let raw_steps = split_steps(rest).map_err(|m| invalid(&m))?;
        let mut steps = Vec::new();
        let mut attribute = None;
        let count = raw_steps.len();
        for (i, raw) in raw_steps.iter().enumerate() {
            if raw.is_empty() {
                return Err(invalid("empty step"));
            }
            if let Some(attr) = raw.strip_prefix('@') {
                if i + 1 != count {
                    return Err(invalid("attribute step must be last"));
                }
                if steps.is_empty() {
                    return Err(invalid("attribute step needs an element step before it"));
                }
                attribute = Some(resolve_name(attr, namespaces).map_err(|m| invalid(&m))?);
                continue;
            }
            steps.push(parse_step(raw, namespaces).map_err(|m| invalid(&m))?);
        }

        Ok(Self {
            expression: trimmed.to_string(),
            steps,
            attribute,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The first selected value, without trimming or emptiness handling.
    fn select_raw(&self, root: &Element) -> Option<String> {
        let mut steps = self.steps.iter();
        let first = steps.next()?;
        let mut current = first.select(std::iter::once(root));
        for step in steps {
            if current.is_empty() {
                return None;
            }
            current = step.select(current.into_iter().flat_map(|e| e.children().iter()));
        }

        match &self.attribute {
            Some((ns, local)) => current
                .iter()
                .find_map(|e| e.attribute(ns, local))
                .map(str::to_string),
            None => current.first().map(|e| e.text_content()),
        }
    }
}

impl FieldGetter for PathGetter {
    fn get(&self, root: &Element) -> Result<Option<String>, GetterError> {
        Ok(self
            .select_raw(root)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    fn description(&self) -> String {
        self.expression.clone()
    }
}

/// A getter backed by a closure, for fields no path expression can express.
pub struct FnGetter<F> {
    name: String,
    f: F,
}

impl<F> FnGetter<F>
where
    F: Fn(&Element) -> Result<Option<String>, GetterError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnGetter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnGetter").field("name", &self.name).finish()
    }
}

impl<F> FieldGetter for FnGetter<F>
where
    F: Fn(&Element) -> Result<Option<String>, GetterError> + Send + Sync,
{
    fn get(&self, root: &Element) -> Result<Option<String>, GetterError> {
        (self.f)(root)
    }

    fn description(&self) -> String {
        self.name.clone()
    }
}

// ---------------------------------------------------------------------------
// Expression parsing
// ---------------------------------------------------------------------------

/// Split at `/` outside of predicates and quoted literals.
fn split_steps(path: &str) -> Result<Vec<String>, String> {
    let mut steps = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in path.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                current.push(c);
            }
            (None, '[') => {
                depth += 1;
                current.push(c);
            }
            (None, ']') => {
                depth = depth.checked_sub(1).ok_or("unbalanced ']'")?;
                current.push(c);
            }
            (None, '/') if depth == 0 => steps.push(std::mem::take(&mut current)),
            (None, c) => current.push(c),
        }
    }
    if quote.is_some() {
        return Err("unterminated string literal".into());
    }
    if depth != 0 {
        return Err("unbalanced '['".into());
    }
    steps.push(current);
    Ok(steps)
}

fn parse_step(raw: &str, ns: &NamespaceContext) -> Result<Step, String> {
    let (name, mut rest) = match raw.find('[') {
        Some(pos) => (&raw[..pos], &raw[pos..]),
        None => (raw, ""),
    };
    let test = parse_name_test(name.trim(), ns)?;

    let mut predicates = Vec::new();
    while !rest.is_empty() {
        let body_end = find_predicate_end(rest)?;
        predicates.push(parse_predicate(rest[1..body_end].trim(), ns)?);
        rest = rest[body_end + 1..].trim_start();
        if !rest.is_empty() && !rest.starts_with('[') {
            return Err(format!("unexpected '{rest}' after predicate"));
        }
    }
    Ok(Step { test, predicates })
}

/// Index of the `]` closing the predicate that starts at `s[0] == '['`.
fn find_predicate_end(s: &str) -> Result<usize, String> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => return Err("nested predicates are not supported".into()),
            (None, ']') => return Ok(i),
            _ => {}
        }
    }
    Err("unterminated predicate".into())
}

fn parse_predicate(body: &str, ns: &NamespaceContext) -> Result<Predicate, String> {
    if body.is_empty() {
        return Err("empty predicate".into());
    }
    if body.chars().all(|c| c.is_ascii_digit()) {
        let n: usize = body.parse().map_err(|_| format!("invalid position '{body}'"))?;
        if n == 0 {
            return Err("positions start at 1".into());
        }
        return Ok(Predicate::Position(n));
    }

    let (lhs, rhs) = body
        .split_once('=')
        .ok_or_else(|| format!("unsupported predicate '{body}'"))?;
    let value = parse_literal(rhs.trim())?;
    let lhs = lhs.trim();
    if let Some(attr) = lhs.strip_prefix('@') {
        let (namespace_uri, local_name) = resolve_name(attr, ns)?;
        Ok(Predicate::Attribute {
            namespace_uri,
            local_name,
            value,
        })
    } else {
        Ok(Predicate::Child {
            test: parse_name_test(lhs, ns)?,
            value,
        })
    }
}

fn parse_literal(s: &str) -> Result<String, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && (open == '\'' || open == '"') => {
            Ok(s[1..s.len() - 1].to_string())
        }
        _ => Err(format!("expected quoted literal, found '{s}'")),
    }
}

fn parse_name_test(name: &str, ns: &NamespaceContext) -> Result<NameTest, String> {
    if name == "*" {
        return Ok(NameTest::Any);
    }
    let (namespace_uri, local_name) = resolve_name(name, ns)?;
    Ok(NameTest::Name {
        namespace_uri,
        local_name,
    })
}

fn resolve_name(name: &str, ns: &NamespaceContext) -> Result<(String, String), String> {
    let (prefix, local) = match name.split_once(':') {
        Some((p, l)) => (Some(p), l),
        None => (None, name),
    };
    if local.is_empty() || !local.chars().all(is_name_char) {
        return Err(format!("invalid name '{name}'"));
    }
    let namespace_uri = match prefix {
        Some(p) => ns
            .resolve(p)
            .ok_or_else(|| format!("unbound namespace prefix '{p}'"))?
            .to_string(),
        None => String::new(),
    };
    Ok((namespace_uri, local.to_string()))
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    const UBL: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2";
    const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
    const CAC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";

    fn ns() -> NamespaceContext {
        NamespaceContext::new()
            .bind("ubl", UBL)
            .bind("cbc", CBC)
            .bind("cac", CAC)
    }

    fn party(endpoint: &str, scheme: &str, name: &str) -> Element {
        Element::new(CAC, "Party")
            .with_child(
                Element::new(CBC, "EndpointID")
                    .with_attribute("", "schemeID", scheme)
                    .with_text(endpoint),
            )
            .with_child(
                Element::new(CAC, "PartyName").with_child(Element::new(CBC, "Name").with_text(name)),
            )
    }

    fn invoice() -> Element {
        Element::new(UBL, "Invoice")
            .with_child(Element::new(CBC, "CustomizationID").with_text("  urn:cust  "))
            .with_child(Element::new(CBC, "ID").with_text(""))
            .with_child(Element::new(CBC, "Note").with_text("first"))
            .with_child(Element::new(CBC, "Note").with_text("second"))
            .with_child(
                Element::new(CAC, "AccountingSupplierParty").with_child(party("123", "0088", "Seller")),
            )
            .with_child(
                Element::new(CAC, "AccountingCustomerParty").with_child(party("456", "9930", "Buyer")),
            )
    }

    fn get(expr: &str) -> Option<String> {
        PathGetter::compile(expr, &ns()).unwrap().get(&invoice()).unwrap()
    }

    #[test]
    fn simple_path_trims_text() {
        assert_eq!(get("/ubl:Invoice/cbc:CustomizationID").as_deref(), Some("urn:cust"));
    }

    #[test]
    fn empty_value_is_absent() {
        assert_eq!(get("/ubl:Invoice/cbc:ID"), None);
        assert_eq!(get("/ubl:Invoice/cbc:Missing"), None);
    }

    #[test]
    fn root_must_match_first_step() {
        assert_eq!(get("/ubl:CreditNote/cbc:CustomizationID"), None);
    }

    #[test]
    fn attribute_step() {
        assert_eq!(
            get("/ubl:Invoice/cac:AccountingSupplierParty/cac:Party/cbc:EndpointID/@schemeID")
                .as_deref(),
            Some("0088")
        );
        assert_eq!(
            get("/ubl:Invoice/cac:AccountingCustomerParty/cac:Party/cbc:EndpointID").as_deref(),
            Some("456")
        );
    }

    #[test]
    fn position_and_value_predicates() {
        assert_eq!(get("/ubl:Invoice/cbc:Note[2]").as_deref(), Some("second"));
        assert_eq!(get("/ubl:Invoice/cbc:Note").as_deref(), Some("first"));
        assert_eq!(get("/ubl:Invoice/cbc:Note[3]"), None);
        assert_eq!(
            get("/ubl:Invoice/*/cac:Party[cbc:EndpointID='456']/cac:PartyName/cbc:Name").as_deref(),
            Some("Buyer")
        );
        assert_eq!(
            get("/ubl:Invoice/*/cac:Party/cbc:EndpointID[@schemeID='9930']").as_deref(),
            Some("456")
        );
    }

    #[test]
    fn wildcard_step() {
        assert_eq!(
            get("/*/cac:AccountingSupplierParty/cac:Party/cac:PartyName/cbc:Name").as_deref(),
            Some("Seller")
        );
    }

    #[test]
    fn literal_may_contain_slash() {
        let root = Element::new("", "a").with_child(
            Element::new("", "b")
                .with_attribute("", "k", "x/y")
                .with_text("hit"),
        );
        let g = PathGetter::compile("/a/b[@k='x/y']", &NamespaceContext::new()).unwrap();
        assert_eq!(g.get(&root).unwrap().as_deref(), Some("hit"));
    }

    #[test]
    fn compile_errors() {
        for bad in [
            "ubl:Invoice",
            "//cbc:ID",
            "/ubl:Invoice//cbc:ID",
            "/foo:Invoice",
            "/ubl:Invoice/@a/cbc:ID",
            "/@a",
            "/ubl:Invoice/cbc:Note[0]",
            "/ubl:Invoice/cbc:Note[",
            "/ubl:Invoice/cbc:Note[@a=unquoted]",
            "/ubl:Invoice/cbc:Note[@a='x']junk",
            "/ubl:Invoice/cbc:Note[@a='x",
        ] {
            let err = PathGetter::compile(bad, &ns()).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidGetter { .. }),
                "expected InvalidGetter for {bad}"
            );
        }
    }

    #[test]
    fn fn_getter_reports_errors() {
        let g = FnGetter::new("always-fails", |_: &Element| {
            Err(GetterError("not supported".into()))
        });
        assert_eq!(g.description(), "always-fails");
        assert_eq!(
            g.get(&invoice()).unwrap_err(),
            GetterError("not supported".into())
        );
    }
}
