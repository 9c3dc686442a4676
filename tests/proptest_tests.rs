//! Property-based tests for encodings and the rule engine.
//!
//! Run with: `cargo test --features all --test proptest_tests`

#![cfg(all(feature = "xml", feature = "json"))]

use std::collections::BTreeMap;

use docdet::core::*;
use docdet::selector::*;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9&<>'\"._:/#\t -]{1,24}"
}

fn arb_identifier() -> impl Strategy<Value = Identifier> {
    ("[a-z0-9:-]{0,15}[a-z0-9-]", "[A-Za-z0-9:._# -]{1,24}")
        .prop_filter("scheme without separator", |(s, _)| !s.contains("::"))
        .prop_map(|(s, v)| Identifier::new(s, v).unwrap())
}

fn arb_flags() -> impl Strategy<Value = FlagSet> {
    prop::collection::vec("[a-z\t -]{1,10}", 0..4).prop_map(|v| v.into_iter().collect())
}

type Ids = (
    Option<Identifier>,
    Option<Identifier>,
    Option<Identifier>,
    Option<Identifier>,
);

type Texts = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn arb_details() -> impl Strategy<Value = DocumentDetails> {
    let ids: BoxedStrategy<Ids> = (
        prop::option::of(arb_identifier()),
        prop::option::of(arb_identifier()),
        prop::option::of(arb_identifier()),
        prop::option::of(arb_identifier()),
    )
        .boxed();
    let texts_a: BoxedStrategy<Texts> = (
        prop::option::of(arb_text()),
        prop::option::of(arb_text()),
        prop::option::of(arb_text()),
        prop::option::of(arb_text()),
        prop::option::of(arb_text()),
        prop::option::of(arb_text()),
    )
        .boxed();
    let texts_b: BoxedStrategy<Texts> = (
        prop::option::of(arb_text()),
        prop::option::of(arb_text()),
        prop::option::of(arb_text()),
        prop::option::of(arb_text()),
        prop::option::of(arb_text()),
        prop::option::of(arb_text()),
    )
        .boxed();

    (ids, texts_a, texts_b, arb_flags()).prop_map(|(ids, a, b, flags)| {
        let mut builder = DocumentDetails::builder().flags(flags);
        let (sender, receiver, doctype, process) = ids;
        if let Some(v) = sender {
            builder = builder.sender_id(v);
        }
        if let Some(v) = receiver {
            builder = builder.receiver_id(v);
        }
        if let Some(v) = doctype {
            builder = builder.document_type_id(v);
        }
        if let Some(v) = process {
            builder = builder.process_id(v);
        }
        let (syntax_id, syntax_version, customization, bdid, sender_name, sender_cc) = a;
        if let Some(v) = syntax_id {
            builder = builder.syntax_id(v);
        }
        if let Some(v) = syntax_version {
            builder = builder.syntax_version(v);
        }
        if let Some(v) = customization {
            builder = builder.customization_id(v);
        }
        if let Some(v) = bdid {
            builder = builder.business_document_id(v);
        }
        if let Some(v) = sender_name {
            builder = builder.sender_name(v);
        }
        if let Some(v) = sender_cc {
            builder = builder.sender_country_code(v);
        }
        let (receiver_name, receiver_cc, vesid, profile, _, _) = b;
        if let Some(v) = receiver_name {
            builder = builder.receiver_name(v);
        }
        if let Some(v) = receiver_cc {
            builder = builder.receiver_country_code(v);
        }
        if let Some(v) = vesid {
            builder = builder.vesid(v);
        }
        if let Some(v) = profile {
            builder = builder.profile_name(v);
        }
        builder.build()
    })
}

const CANDIDATES: [&str; 3] = ["A", "B", "C"];

fn arb_source() -> impl Strategy<Value = BTreeMap<SourceField, &'static str>> {
    prop::collection::btree_map(
        prop::sample::select(SourceField::ALL.to_vec()),
        prop::sample::select(CANDIDATES.to_vec()),
        0..SourceField::ALL.len(),
    )
}

/// Every leaf sets a unique VESID and a flag with the same text.
fn leaf(id: &str) -> If {
    If::Leaf(
        Outcome::new()
            .set(DeterminedField::Vesid, id)
            .unwrap()
            .flag(id),
    )
}

/// A tree where many leaves can match the same input.
fn overlapping_tree() -> SelectorTree {
    let nested = |prefix: &str| {
        let mut t = SelectorTree::new();
        for field in [SourceField::ProcessId, SourceField::SenderCountryCode] {
            let mut s = Select::new(field);
            for c in CANDIDATES {
                s.insert(c, leaf(&format!("{prefix}/{field}={c}"))).unwrap();
            }
            t.insert(s).unwrap();
        }
        If::Branch(t)
    };
    let mut top = SelectorTree::new();
    let mut customization = Select::new(SourceField::CustomizationId);
    customization.insert("A", nested("A")).unwrap();
    customization.insert("B", leaf("B")).unwrap();
    top.insert(customization).unwrap();
    let mut receiver = Select::new(SourceField::ReceiverCountryCode);
    for c in CANDIDATES {
        receiver.insert(c, leaf(&format!("rcc={c}"))).unwrap();
    }
    top.insert(receiver).unwrap();
    top
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    /// to_json() → from_json() is the identity.
    #[test]
    fn json_round_trip(d in arb_details()) {
        let back = DocumentDetails::from_json(&d.to_json().unwrap()).unwrap();
        prop_assert_eq!(back, d);
    }

    /// to_element() → from_element() and the XML text form are the identity,
    /// including leading, trailing and whitespace-only values.
    #[test]
    fn xml_round_trip(d in arb_details()) {
        prop_assert_eq!(&DocumentDetails::from_element(&d.to_element()).unwrap(), &d);
        let xml = d.to_xml_string().unwrap();
        prop_assert_eq!(DocumentDetails::from_xml_str(&xml).unwrap(), d);
    }

    /// Identifier URIs parse back to the same identifier.
    #[test]
    fn identifier_uri_round_trip(id in arb_identifier()) {
        prop_assert_eq!(Identifier::from_uri(&id.to_uri()), Some(id));
    }

    /// Repeated evaluation of the same input yields the same output.
    #[test]
    fn evaluation_is_deterministic(source in arb_source()) {
        let tree = overlapping_tree();
        let first = tree.evaluate(|f| source.get(&f).copied());
        let second = tree.evaluate(|f| source.get(&f).copied());
        prop_assert_eq!(first, second);
    }

    /// At most one leaf is applied per evaluation.
    #[test]
    fn at_most_one_leaf_applies(source in arb_source()) {
        let out = overlapping_tree().evaluate(|f| source.get(&f).copied());
        prop_assert!(out.flags().len() <= 1);
        match out.get(DeterminedField::Vesid) {
            Some(v) => prop_assert!(out.flags().contains(v)),
            None => prop_assert!(out.is_empty()),
        }
    }

    /// Merging trees with disjoint conditions keeps every condition
    /// evaluating as it did in its own tree.
    #[test]
    fn merge_of_disjoint_conditions_preserves_behaviour(
        split in 0usize..=3,
        value in prop::sample::select(vec!["v0", "v1", "v2", "v3", "none"]),
    ) {
        let all = ["v0", "v1", "v2", "v3"];
        let build = |values: &[&str]| {
            let mut s = Select::new(SourceField::CustomizationId);
            for v in values {
                s.insert(*v, leaf(&format!("out-{v}"))).unwrap();
            }
            if s.is_empty() {
                SelectorTree::new()
            } else {
                SelectorTree::new().add(s).unwrap()
            }
        };
        let left = build(&all[..split]);
        let right = build(&all[split..]);
        let merged = left.merge(&right).unwrap();
        let source = |f: SourceField| (f == SourceField::CustomizationId).then_some(value);

        let expected = if left.get(SourceField::CustomizationId).and_then(|s| s.get(value)).is_some() {
            left.evaluate(source)
        } else {
            right.evaluate(source)
        };
        prop_assert_eq!(merged.evaluate(source), expected);
        prop_assert_eq!(right.merge(&left).unwrap().evaluate(source), merged.evaluate(source));
    }
}
