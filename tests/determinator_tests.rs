//! End-to-end determination against the built-in configuration and
//! hand-built trees.
//!
//! Run with: `cargo test --test determinator_tests`

#![cfg(feature = "xml")]

use std::sync::Arc;

use docdet::core::*;
use docdet::determine::*;
use docdet::selector::{If, Outcome, Select, SelectorTree, ValueProvider, ValueProviderList};
use docdet::syntax::{FnGetter, GetterError, NamespaceContext, Syntax, SyntaxRegistry};
use docdet::xml::parse_document;

const PEPPOL_BILLING: &str =
    "urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:billing:3.0";
const PEPPOL_SELFBILLING: &str =
    "urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:selfbilling:3.0";
const XRECHNUNG: &str = "urn:cen.eu:en16931:2017#compliant#urn:xeinkauf.de:kosit:xrechnung_3.0";
const BILLING_PROCESS: &str = "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0";
const SELFBILLING_PROCESS: &str = "urn:fdc:peppol.eu:2017:poacc:selfbilling:01:1.0";

fn builtin() -> Arc<DeterminationConfig> {
    Arc::new(DeterminationConfig::builtin().unwrap())
}

fn ubl_invoice(customization: &str, profile: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Invoice xmlns="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2"
         xmlns:cac="urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2"
         xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
  <cbc:CustomizationID>{customization}</cbc:CustomizationID>
  <cbc:ProfileID>{profile}</cbc:ProfileID>
  <cbc:ID>RE-2024-001</cbc:ID>
  <cbc:IssueDate>2024-06-15</cbc:IssueDate>
  <cac:AccountingSupplierParty>
    <cac:Party>
      <cbc:EndpointID schemeID="0088">5790000435968</cbc:EndpointID>
      <cac:PartyName><cbc:Name>ACME Trading</cbc:Name></cac:PartyName>
      <cac:PostalAddress>
        <cac:Country><cbc:IdentificationCode>DK</cbc:IdentificationCode></cac:Country>
      </cac:PostalAddress>
      <cac:PartyLegalEntity><cbc:RegistrationName>ACME A/S</cbc:RegistrationName></cac:PartyLegalEntity>
    </cac:Party>
  </cac:AccountingSupplierParty>
  <cac:AccountingCustomerParty>
    <cac:Party>
      <cbc:EndpointID schemeID="9930">DE123456789</cbc:EndpointID>
      <cac:PartyName><cbc:Name>Kunde AG</cbc:Name></cac:PartyName>
      <cac:PostalAddress>
        <cac:Country><cbc:IdentificationCode>DE</cbc:IdentificationCode></cac:Country>
      </cac:PostalAddress>
    </cac:Party>
  </cac:AccountingCustomerParty>
</Invoice>"#
    )
}

fn cii_invoice(customization: &str) -> String {
    format!(
        r#"<rsm:CrossIndustryInvoice
    xmlns:rsm="urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100"
    xmlns:ram="urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100">
  <rsm:ExchangedDocumentContext>
    <ram:GuidelineSpecifiedDocumentContextParameter>
      <ram:ID>{customization}</ram:ID>
    </ram:GuidelineSpecifiedDocumentContextParameter>
  </rsm:ExchangedDocumentContext>
  <rsm:ExchangedDocument><ram:ID>CII-7</ram:ID></rsm:ExchangedDocument>
  <rsm:SupplyChainTradeTransaction>
    <ram:ApplicableHeaderTradeAgreement>
      <ram:SellerTradeParty>
        <ram:Name>Verkäufer GmbH</ram:Name>
        <ram:PostalTradeAddress><ram:CountryID>DE</ram:CountryID></ram:PostalTradeAddress>
        <ram:URIUniversalCommunication><ram:URIID schemeID="EM">seller@example.de</ram:URIID></ram:URIUniversalCommunication>
      </ram:SellerTradeParty>
      <ram:BuyerTradeParty>
        <ram:Name>Käufer AG</ram:Name>
      </ram:BuyerTradeParty>
    </ram:ApplicableHeaderTradeAgreement>
  </rsm:SupplyChainTradeTransaction>
</rsm:CrossIndustryInvoice>"#
    )
}

// ---------------------------------------------------------------------------
// Built-in configuration
// ---------------------------------------------------------------------------

#[test]
fn peppol_invoice_gets_vesid_and_identifiers() {
    let d = Determinator::new(builtin());
    let details = d
        .determine_xml(&ubl_invoice(PEPPOL_BILLING, BILLING_PROCESS))
        .unwrap()
        .unwrap();

    assert_eq!(details.syntax_id(), Some("ubl2-invoice"));
    assert_eq!(details.syntax_version(), Some("2.1"));
    assert_eq!(details.vesid(), Some("eu.peppol.bis3:invoice:latest-active"));
    assert_eq!(details.profile_name(), Some("Peppol BIS Billing UBL Invoice V3"));
    assert_eq!(details.business_document_id(), Some("RE-2024-001"));
    assert_eq!(details.customization_id(), Some(PEPPOL_BILLING));
    assert_eq!(
        details.sender_id(),
        Some(&Identifier::new(PARTICIPANT_SCHEME_ISO6523, "0088:5790000435968").unwrap())
    );
    assert_eq!(
        details.receiver_id(),
        Some(&Identifier::new(PARTICIPANT_SCHEME_ISO6523, "9930:DE123456789").unwrap())
    );
    // RegistrationName comes first in the fallback list
    assert_eq!(details.sender_name(), Some("ACME A/S"));
    // no RegistrationName for the buyer, PartyName is used
    assert_eq!(details.receiver_name(), Some("Kunde AG"));
    assert_eq!(details.sender_country_code(), Some("DK"));
    assert_eq!(details.receiver_country_code(), Some("DE"));
    assert_eq!(
        details.document_type_id().unwrap().to_uri(),
        format!(
            "busdox-docid-qns::urn:oasis:names:specification:ubl:schema:xsd:Invoice-2::Invoice##{PEPPOL_BILLING}::2.1"
        )
    );
    assert_eq!(
        details.process_id(),
        Some(&Identifier::new(PROCESS_SCHEME_CENBII, BILLING_PROCESS).unwrap())
    );
    assert!(details.flags().is_empty());
    assert!(details.has_all_key_fields());
}

#[test]
fn unknown_process_yields_no_vesid() {
    let d = Determinator::new(builtin());
    let details = d
        .determine_xml(&ubl_invoice(PEPPOL_BILLING, "urn:example:unknown-process"))
        .unwrap()
        .unwrap();
    assert_eq!(details.vesid(), None);
    assert_eq!(details.profile_name(), None);
    // extracted values are still reported
    assert_eq!(
        details.process_id().map(Identifier::value),
        Some("urn:example:unknown-process")
    );
    assert!(details.sender_id().is_some());
}

#[test]
fn self_billing_swaps_sender_and_receiver() {
    let d = Determinator::new(builtin());
    let details = d
        .determine_xml(&ubl_invoice(PEPPOL_SELFBILLING, SELFBILLING_PROCESS))
        .unwrap()
        .unwrap();

    assert_eq!(
        details.vesid(),
        Some("eu.peppol.bis3:invoice-self-billing:latest-active")
    );
    assert_eq!(
        details.sender_id().map(Identifier::value),
        Some("9930:DE123456789")
    );
    assert_eq!(
        details.receiver_id().map(Identifier::value),
        Some("0088:5790000435968")
    );
    assert_eq!(details.sender_name(), Some("Kunde AG"));
    assert_eq!(details.receiver_name(), Some("ACME A/S"));
    assert_eq!(details.sender_country_code(), Some("DE"));
    assert_eq!(details.receiver_country_code(), Some("DK"));
    assert!(!details.flags().contains(FLAG_SWAP_SENDER_RECEIVER));
}

#[test]
fn xrechnung_rule_overrides_process() {
    let d = Determinator::new(builtin());
    let details = d
        .determine_xml(&ubl_invoice(XRECHNUNG, "urn:example:own-process"))
        .unwrap()
        .unwrap();
    assert_eq!(details.vesid(), Some("de.xrechnung:ubl-invoice:3.0.2"));
    assert_eq!(
        details.process_id().map(Identifier::value),
        Some(BILLING_PROCESS)
    );
}

#[test]
fn cii_invoice_is_detected() {
    let d = Determinator::new(builtin());
    let details = d.determine_xml(&cii_invoice(XRECHNUNG)).unwrap().unwrap();
    assert_eq!(details.syntax_id(), Some("cii-d16b"));
    assert_eq!(details.syntax_version(), Some("D16B"));
    assert_eq!(details.vesid(), Some("de.xrechnung:cii:3.0.2"));
    assert_eq!(details.business_document_id(), Some("CII-7"));
    assert_eq!(
        details.sender_id().map(Identifier::value),
        Some("EM:seller@example.de")
    );
    assert_eq!(details.sender_name(), Some("Verkäufer GmbH"));
    assert_eq!(details.receiver_name(), Some("Käufer AG"));
    assert!(details.receiver_id().is_none());
    assert!(!details.has_all_key_fields());
}

#[test]
fn unknown_root_yields_none_and_reports_error() {
    let observer = Arc::new(CollectingObserver::new());
    let d = Determinator::builder(builtin())
        .observer(observer.clone())
        .build();
    let root = parse_document(r#"<Order xmlns="urn:oasis:names:specification:ubl:schema:xsd:Order-2"/>"#)
        .unwrap();
    assert!(d.determine(&root).is_none());
    let errors = observer.messages_at(ObservedLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Order-2"));
}

#[test]
fn same_local_name_in_other_namespace_is_not_matched() {
    let d = Determinator::builder(builtin())
        .observer(Arc::new(NoopObserver))
        .build();
    let root = parse_document("<Invoice xmlns=\"urn:example:not-ubl\"/>").unwrap();
    assert!(d.determine(&root).is_none());
}

#[test]
fn fallback_receiver_fills_missing_endpoint() {
    let observer = Arc::new(CollectingObserver::new());
    let fallback = Identifier::new(PARTICIPANT_SCHEME_ISO6523, "9930:DE000000000").unwrap();
    let d = Determinator::builder(builtin())
        .fallback_sender(Identifier::new(PARTICIPANT_SCHEME_ISO6523, "0088:unused").unwrap())
        .fallback_receiver(fallback.clone())
        .observer(observer.clone())
        .build();
    let details = d.determine_xml(&cii_invoice(XRECHNUNG)).unwrap().unwrap();
    assert_eq!(details.receiver_id(), Some(&fallback));
    // the document has a sender, the fallback is not applied
    assert_eq!(
        details.sender_id().map(Identifier::value),
        Some("EM:seller@example.de")
    );
    let warnings = observer.messages_at(ObservedLevel::Warn);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("receiver"));
}

#[test]
fn missing_customization_leaves_doctype_absent() {
    let d = Determinator::new(builtin());
    let xml = r#"<Invoice xmlns="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2"
        xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
        <cbc:ID>X</cbc:ID></Invoice>"#;
    let details = d.determine_xml(xml).unwrap().unwrap();
    assert_eq!(details.syntax_id(), Some("ubl2-invoice"));
    assert!(details.document_type_id().is_none());
    assert!(details.process_id().is_none());
    assert!(details.vesid().is_none());
}

#[test]
fn malformed_xml_is_an_error() {
    let d = Determinator::new(builtin());
    assert!(matches!(d.determine_xml("<Invoice>"), Err(DddError::Xml(_))));
}

// ---------------------------------------------------------------------------
// Hand-built configuration
// ---------------------------------------------------------------------------

const TEST_NS: &str = "urn:test:invoice";

fn test_syntax(extra: Option<FnGetter<fn(&Element) -> Result<Option<String>, GetterError>>>) -> Syntax {
    let ns = NamespaceContext::new().bind("t", TEST_NS);
    let mut b = Syntax::builder("test", "Test Invoice", TEST_NS, "Invoice")
        .version("2.1")
        .path(SourceField::CustomizationId, "/t:Invoice/t:Customization", &ns)
        .unwrap()
        .path(SourceField::SenderIdValue, "/t:Invoice/t:Sender", &ns)
        .unwrap();
    if let Some(g) = extra {
        b = b.getter(SourceField::BusinessDocumentId, g);
    }
    b.build().unwrap()
}

fn config_with(syntax: Syntax, tree: SelectorTree) -> Arc<DeterminationConfig> {
    let mut registry = SyntaxRegistry::new();
    registry.register(syntax).unwrap();
    let providers = ValueProviderList::new()
        .add(ValueProvider::new("test", tree))
        .unwrap();
    Arc::new(DeterminationConfig::new(registry, providers))
}

fn test_doc(customization: &str) -> Element {
    Element::new(TEST_NS, "Invoice")
        .with_child(Element::new(TEST_NS, "Customization").with_text(customization))
        .with_child(Element::new(TEST_NS, "Sender").with_text("S-1"))
}

#[test]
fn scenario_customization_with_version_suffix() {
    let customization =
        "urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:billing:3.0::2.1";
    let tree = SelectorTree::new()
        .add(
            Select::new(SourceField::CustomizationId)
                .add(
                    customization,
                    If::Leaf(
                        Outcome::new()
                            .set(DeterminedField::Vesid, "eu.peppol.bis3:invoice:latest-active")
                            .unwrap()
                            .set(DeterminedField::ProfileName, "Peppol BIS Billing UBL Invoice V3")
                            .unwrap(),
                    ),
                )
                .unwrap(),
        )
        .unwrap();
    let d = Determinator::new(config_with(test_syntax(None), tree));
    let details = d.determine(&test_doc(customization)).unwrap();
    assert_eq!(details.syntax_version(), Some("2.1"));
    assert_eq!(details.vesid(), Some("eu.peppol.bis3:invoice:latest-active"));
    assert_eq!(details.profile_name(), Some("Peppol BIS Billing UBL Invoice V3"));
}

#[test]
fn user_flags_pass_through() {
    let tree = SelectorTree::new()
        .add(
            Select::new(SourceField::CustomizationId)
                .add("C", If::Leaf(Outcome::new().flag("needs-review").flag("b2g")))
                .unwrap(),
        )
        .unwrap();
    let d = Determinator::new(config_with(test_syntax(None), tree));
    let details = d.determine(&test_doc("C")).unwrap();
    let flags: Vec<&str> = details.flags().iter().collect();
    assert_eq!(flags, ["needs-review", "b2g"]);
    assert!(details.vesid().is_none());
}

fn failing_getter(_: &Element) -> Result<Option<String>, GetterError> {
    Err(GetterError("backend unavailable".into()))
}

#[test]
fn extraction_errors_are_collected_not_fatal() {
    let observer = Arc::new(CollectingObserver::new());
    let getter: FnGetter<fn(&Element) -> Result<Option<String>, GetterError>> =
        FnGetter::new("lookup-bdid", failing_getter);
    let tree = SelectorTree::new()
        .add(
            Select::new(SourceField::CustomizationId)
                .add(
                    "C",
                    If::Leaf(Outcome::new().set(DeterminedField::Vesid, "v").unwrap()),
                )
                .unwrap(),
        )
        .unwrap();
    let d = Determinator::builder(config_with(test_syntax(Some(getter)), tree))
        .observer(observer.clone())
        .build();

    let result = d.determine_full(&test_doc("C"));
    let details = result.details.unwrap();
    assert_eq!(details.vesid(), Some("v"));
    assert!(details.business_document_id().is_none());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].field, SourceField::BusinessDocumentId);
    assert_eq!(result.errors[0].getter, "lookup-bdid");
    assert_eq!(observer.messages_at(ObservedLevel::Warn).len(), 1);
}

#[test]
fn custom_identifier_factory_is_used() {
    struct Upper;
    impl IdentifierFactory for Upper {
        fn participant_id(&self, _scheme: Option<&str>, value: &str) -> Option<Identifier> {
            Identifier::new("custom", value.to_uppercase()).ok()
        }
        fn document_type_id(&self, _value: &str) -> Option<Identifier> {
            None
        }
        fn process_id(&self, value: &str) -> Option<Identifier> {
            Identifier::new("custom", value).ok()
        }
    }

    let tree = SelectorTree::new()
        .add(
            Select::new(SourceField::CustomizationId)
                .add(
                    "C",
                    If::Leaf(Outcome::new().set(DeterminedField::ProcessId, "P").unwrap()),
                )
                .unwrap(),
        )
        .unwrap();
    let d = Determinator::builder(config_with(test_syntax(None), tree))
        .identifier_factory(Upper)
        .build();
    let details = d.determine(&test_doc("C")).unwrap();
    assert_eq!(details.sender_id(), Some(&Identifier::new("custom", "S-1").unwrap()));
    assert!(details.document_type_id().is_none());
    assert_eq!(details.process_id(), Some(&Identifier::new("custom", "P").unwrap()));
}

#[test]
fn determinator_is_shareable_across_threads() {
    let d = Arc::new(Determinator::new(builtin()));
    let xml = ubl_invoice(PEPPOL_BILLING, BILLING_PROCESS);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let d = Arc::clone(&d);
            let xml = xml.clone();
            std::thread::spawn(move || d.determine_xml(&xml).unwrap().unwrap())
        })
        .collect();
    let results: Vec<DocumentDetails> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
