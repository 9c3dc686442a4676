//! Determine the details of invoice files and print them as JSON.
//!
//! ```text
//! RUST_LOG=docdet=debug cargo run --example determine_invoice -- invoice.xml [more.xml ...]
//! ```
//!
//! Without arguments a built-in Peppol BIS 3 sample invoice is used.

use std::sync::Arc;

use docdet::determine::{DeterminationConfig, Determinator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Invoice xmlns="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2"
         xmlns:cac="urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2"
         xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
  <cbc:CustomizationID>urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:billing:3.0</cbc:CustomizationID>
  <cbc:ProfileID>urn:fdc:peppol.eu:2017:poacc:billing:01:1.0</cbc:ProfileID>
  <cbc:ID>RE-2024-001</cbc:ID>
  <cac:AccountingSupplierParty>
    <cac:Party>
      <cbc:EndpointID schemeID="0088">5790000435968</cbc:EndpointID>
      <cac:PartyName><cbc:Name>ACME GmbH</cbc:Name></cac:PartyName>
      <cac:PostalAddress><cac:Country><cbc:IdentificationCode>DE</cbc:IdentificationCode></cac:Country></cac:PostalAddress>
    </cac:Party>
  </cac:AccountingSupplierParty>
  <cac:AccountingCustomerParty>
    <cac:Party>
      <cbc:EndpointID schemeID="9930">DE123456789</cbc:EndpointID>
      <cac:PartyName><cbc:Name>Kunde AG</cbc:Name></cac:PartyName>
    </cac:Party>
  </cac:AccountingCustomerParty>
</Invoice>"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docdet=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let determinator = Determinator::new(Arc::new(DeterminationConfig::builtin()?));

    let paths: Vec<String> = std::env::args().skip(1).collect();
    let documents: Vec<(String, String)> = if paths.is_empty() {
        vec![("<sample>".to_string(), SAMPLE.to_string())]
    } else {
        paths
            .into_iter()
            .map(|p| std::fs::read_to_string(&p).map(|xml| (p, xml)))
            .collect::<Result<_, _>>()?
    };

    for (name, xml) in documents {
        match determinator.determine_xml(&xml)? {
            Some(details) => println!("{name}:\n{}", details.to_json_string_pretty()?),
            None => println!("{name}: unsupported document type"),
        }
    }
    Ok(())
}
