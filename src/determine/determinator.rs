use std::sync::Arc;

use super::observer::{DeterminationObserver, TracingObserver};
use crate::core::{
    DeterminedField, DocumentDetails, Element, ExtractionError, Identifier, IdentifierFactory,
    SchemeIdentifierFactory, SourceField, document_type_value,
};
use crate::selector::ValueProviderList;
use crate::syntax::{ExtractedFields, Syntax, SyntaxRegistry, extract_fields};

/// Flag requesting that sender and receiver be exchanged. Consumed by the
/// determinator, never part of the resulting flags.
pub const FLAG_SWAP_SENDER_RECEIVER: &str = "swap-sender-receiver";

/// The immutable configuration a determinator works with.
///
/// Built once and shared through an [`Arc`]; to reload, build a new one and
/// hand it to [`Determinator::with_config`].
#[derive(Debug, Default)]
pub struct DeterminationConfig {
    syntaxes: SyntaxRegistry,
    value_providers: ValueProviderList,
}

impl DeterminationConfig {
    pub fn new(syntaxes: SyntaxRegistry, value_providers: ValueProviderList) -> Self {
        for provider in value_providers.iter() {
            if syntaxes.get(provider.syntax_id()).is_none() {
                tracing::warn!(
                    syntax = provider.syntax_id(),
                    "value provider references an unknown syntax"
                );
            }
        }
        Self {
            syntaxes,
            value_providers,
        }
    }

    pub fn syntaxes(&self) -> &SyntaxRegistry {
        &self.syntaxes
    }

    pub fn value_providers(&self) -> &ValueProviderList {
        &self.value_providers
    }
}

/// Outcome of one determination including non-fatal extraction errors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Determination {
    /// `None` if the document type is unsupported.
    pub details: Option<DocumentDetails>,
    /// Getter failures; the affected fields were treated as absent.
    pub errors: Vec<ExtractionError>,
}

/// Determines [`DocumentDetails`] for document roots.
///
/// ```no_run
/// use std::sync::Arc;
/// use docdet::determine::{DeterminationConfig, Determinator};
///
/// let config = Arc::new(DeterminationConfig::builtin().unwrap());
/// let determinator = Determinator::new(config);
/// let xml = std::fs::read_to_string("invoice.xml").unwrap();
/// if let Some(details) = determinator.determine_xml(&xml).unwrap() {
///     println!("{:?}", details.vesid());
/// }
/// ```
#[derive(Clone)]
pub struct Determinator {
    config: Arc<DeterminationConfig>,
    identifiers: Arc<dyn IdentifierFactory>,
    fallback_sender: Option<Identifier>,
    fallback_receiver: Option<Identifier>,
    observer: Arc<dyn DeterminationObserver>,
}

impl std::fmt::Debug for Determinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Determinator")
            .field("syntaxes", &self.config.syntaxes.len())
            .field("value_providers", &self.config.value_providers.len())
            .field("fallback_sender", &self.fallback_sender)
            .field("fallback_receiver", &self.fallback_receiver)
            .finish_non_exhaustive()
    }
}

impl Determinator {
    /// A determinator with Peppol identifier schemes, no fallbacks and
    /// `tracing` output.
    pub fn new(config: Arc<DeterminationConfig>) -> Self {
        DeterminatorBuilder::new(config).build()
    }

    pub fn builder(config: Arc<DeterminationConfig>) -> DeterminatorBuilder {
        DeterminatorBuilder::new(config)
    }

    pub fn config(&self) -> &Arc<DeterminationConfig> {
        &self.config
    }

    /// Same hooks, different configuration.
    pub fn with_config(&self, config: Arc<DeterminationConfig>) -> Self {
        Self {
            config,
            ..self.clone()
        }
    }

    /// Determine the details of a document. `None` if its root element
    /// matches no syntax or the syntax has no value provider.
    pub fn determine(&self, root: &Element) -> Option<DocumentDetails> {
        self.determine_full(root).details
    }

    /// Like [`determine`](Self::determine), also returning getter failures.
    pub fn determine_full(&self, root: &Element) -> Determination {
        let Some(syntax) = self
            .config
            .syntaxes
            .find_syntax(root.namespace_uri(), root.local_name())
        else {
            self.observer.error(&format!(
                "no syntax found for root element {{{}}}{}",
                root.namespace_uri(),
                root.local_name()
            ));
            return Determination::default();
        };

        let Some(provider) = self.config.value_providers.get(syntax.id()) else {
            self.observer.error(&format!(
                "no value provider configured for syntax '{}'",
                syntax.id()
            ));
            return Determination::default();
        };

        tracing::debug!(syntax = syntax.id(), "document syntax detected");

        let extracted = extract_fields(syntax, root);
        for e in extracted.errors() {
            self.observer.warn(&format!("failed to extract field: {e}"));
        }

        let determined = provider.evaluate(|f| extracted.get(f));
        if determined.is_empty() {
            self.observer.info(&format!(
                "no rule of syntax '{}' matched the document",
                syntax.id()
            ));
        }
        let (fields, mut flags) = determined.into_parts();

        let mut sender = self.participant(
            &extracted,
            SourceField::SenderIdScheme,
            SourceField::SenderIdValue,
        );
        if sender.is_none() {
            if let Some(fallback) = &self.fallback_sender {
                self.observer
                    .warn(&format!("no sender found in document, using fallback {fallback}"));
                sender = Some(fallback.clone());
            }
        }
        let mut receiver = self.participant(
            &extracted,
            SourceField::ReceiverIdScheme,
            SourceField::ReceiverIdValue,
        );
        if receiver.is_none() {
            if let Some(fallback) = &self.fallback_receiver {
                self.observer.warn(&format!(
                    "no receiver found in document, using fallback {fallback}"
                ));
                receiver = Some(fallback.clone());
            }
        }

        let syntax_version = fields
            .get(&DeterminedField::SyntaxVersion)
            .cloned()
            .or_else(|| syntax.version().map(str::to_string));
        let process = fields
            .get(&DeterminedField::ProcessId)
            .map(String::as_str)
            .or_else(|| extracted.get(SourceField::ProcessId));

        let document_type_id = self.document_type(syntax, &extracted, syntax_version.as_deref());
        let process_id = process.and_then(|p| self.identifiers.process_id(p));

        let mut sender_name = extracted.get(SourceField::SenderName).map(str::to_string);
        let mut sender_country = extracted
            .get(SourceField::SenderCountryCode)
            .map(str::to_string);
        let mut receiver_name = extracted.get(SourceField::ReceiverName).map(str::to_string);
        let mut receiver_country = extracted
            .get(SourceField::ReceiverCountryCode)
            .map(str::to_string);

        if flags.remove(FLAG_SWAP_SENDER_RECEIVER) {
            tracing::debug!(syntax = syntax.id(), "swapping sender and receiver");
            std::mem::swap(&mut sender, &mut receiver);
            std::mem::swap(&mut sender_name, &mut receiver_name);
            std::mem::swap(&mut sender_country, &mut receiver_country);
        }

        let details = DocumentDetails::builder()
            .maybe_syntax_id(Some(syntax.id().to_string()))
            .maybe_syntax_version(syntax_version)
            .maybe_sender_id(sender)
            .maybe_receiver_id(receiver)
            .maybe_document_type_id(document_type_id)
            .maybe_process_id(process_id)
            .maybe_customization_id(
                extracted.get(SourceField::CustomizationId).map(str::to_string),
            )
            .maybe_business_document_id(
                extracted.get(SourceField::BusinessDocumentId).map(str::to_string),
            )
            .maybe_sender_name(sender_name)
            .maybe_sender_country_code(sender_country)
            .maybe_receiver_name(receiver_name)
            .maybe_receiver_country_code(receiver_country)
            .maybe_vesid(fields.get(&DeterminedField::Vesid).cloned())
            .maybe_profile_name(fields.get(&DeterminedField::ProfileName).cloned())
            .flags(flags)
            .build();

        Determination {
            details: Some(details),
            errors: extracted.into_parts().1,
        }
    }

    fn participant(
        &self,
        extracted: &ExtractedFields,
        scheme: SourceField,
        value: SourceField,
    ) -> Option<Identifier> {
        let value = extracted.get(value)?;
        self.identifiers
            .participant_id(extracted.get(scheme), value)
    }

    fn document_type(
        &self,
        syntax: &Syntax,
        extracted: &ExtractedFields,
        syntax_version: Option<&str>,
    ) -> Option<Identifier> {
        let customization = extracted.get(SourceField::CustomizationId)?;
        let version = syntax_version?;
        self.identifiers.document_type_id(&document_type_value(
            syntax.namespace_uri(),
            syntax.local_name(),
            customization,
            version,
        ))
    }
}

#[cfg(feature = "xml")]
impl Determinator {
    /// Parse `xml` and determine its details.
    pub fn determine_xml(&self, xml: &str) -> Result<Option<DocumentDetails>, crate::core::DddError> {
        let root = crate::xml::parse_document(xml)?;
        Ok(self.determine(&root))
    }
}

/// Builder for [`Determinator`].
pub struct DeterminatorBuilder {
    config: Arc<DeterminationConfig>,
    identifiers: Arc<dyn IdentifierFactory>,
    fallback_sender: Option<Identifier>,
    fallback_receiver: Option<Identifier>,
    observer: Arc<dyn DeterminationObserver>,
}

impl DeterminatorBuilder {
    pub fn new(config: Arc<DeterminationConfig>) -> Self {
        Self {
            config,
            identifiers: Arc::new(SchemeIdentifierFactory::default()),
            fallback_sender: None,
            fallback_receiver: None,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn identifier_factory(mut self, factory: impl IdentifierFactory + 'static) -> Self {
        self.identifiers = Arc::new(factory);
        self
    }

    /// Sender used when the document yields none.
    pub fn fallback_sender(mut self, id: Identifier) -> Self {
        self.fallback_sender = Some(id);
        self
    }

    /// Receiver used when the document yields none.
    pub fn fallback_receiver(mut self, id: Identifier) -> Self {
        self.fallback_receiver = Some(id);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn DeterminationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn build(self) -> Determinator {
        Determinator {
            config: self.config,
            identifiers: self.identifiers,
            fallback_sender: self.fallback_sender,
            fallback_receiver: self.fallback_receiver,
            observer: self.observer,
        }
    }
}
