use std::collections::HashMap;

use ceprims_binary::Headers;
use ceprims_event::{Event, ExtensionValue};
use ceprims_record::{
    encode_json, Encoding, PayloadRegistry, RecordDeserializer, RecordSerializer,
    SerializerConfig, ENCODING_CONFIG,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AddressChanged {
    zip: String,
}

#[derive(Debug, PartialEq)]
enum PeopleEvent {
    AddressChanged(AddressChanged),
}

fn address_changed() -> Event {
    let payload = encode_json(&AddressChanged {
        zip: "10001".to_string(),
    })
    .unwrap();

    Event::builder()
        .id("e1")
        .source("/people/p1")
        .ty("AddressChanged")
        .subject("address")
        .data_with_content_type("application/json", payload)
        .extension("astring", "aaa")
        .extension("aboolean", true)
        .extension("anumber", 10)
        .build()
        .unwrap()
}

fn serializer(encoding: &str) -> RecordSerializer {
    let configs = HashMap::from([(ENCODING_CONFIG.to_string(), encoding.to_string())]);
    RecordSerializer::new(SerializerConfig::from_map(&configs).unwrap()).unwrap()
}

fn payloads() -> PayloadRegistry<PeopleEvent> {
    let mut registry = PayloadRegistry::new();
    registry.register_json("AddressChanged", PeopleEvent::AddressChanged);
    registry
}

#[test]
fn structured_record_embeds_payload() {
    let event = address_changed();
    let mut headers = Headers::new();
    let value = serializer("STRUCTURED")
        .serialize(&event, &mut headers)
        .unwrap()
        .unwrap();

    assert_eq!(
        headers.get_str("content-type"),
        Some("application/cloudevents+json")
    );

    let doc: serde_json::Value = serde_json::from_slice(&value).unwrap();
    let mut keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "aboolean",
            "anumber",
            "astring",
            "data",
            "datacontenttype",
            "id",
            "source",
            "specversion",
            "subject",
            "type",
        ]
    );
    assert_eq!(doc["data"], serde_json::json!({"zip": "10001"}));
    assert_eq!(doc["anumber"], 10);
    assert_eq!(doc["aboolean"], true);
    assert_eq!(doc["astring"], "aaa");

    let decoded = RecordDeserializer::new()
        .deserialize(&headers, Some(&value[..]))
        .unwrap();
    assert_eq!(decoded, event);
    assert_eq!(
        payloads().decode(&decoded).unwrap(),
        PeopleEvent::AddressChanged(AddressChanged {
            zip: "10001".to_string()
        })
    );
}

#[test]
fn binary_record_uses_ce_headers() {
    let event = address_changed();
    let mut headers = Headers::new();
    headers.insert("traceparent", "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01");
    let value = serializer("BINARY")
        .serialize(&event, &mut headers)
        .unwrap()
        .unwrap();

    for (name, expected) in [
        ("ce_id", "e1"),
        ("ce_source", "/people/p1"),
        ("ce_specversion", "1.0"),
        ("ce_type", "AddressChanged"),
        ("ce_subject", "address"),
        ("ce_astring", "aaa"),
        ("ce_aboolean", "true"),
        ("ce_anumber", "10"),
        ("content-type", "application/json"),
    ] {
        assert_eq!(headers.get_str(name), Some(expected), "header {name}");
    }
    assert_eq!(value.as_ref(), br#"{"zip":"10001"}"#);

    let decoded = RecordDeserializer::new()
        .deserialize(&headers, Some(&value[..]))
        .unwrap();
    assert_eq!(decoded, event);
    assert_eq!(
        decoded.extension("anumber"),
        Some(&ExtensionValue::Integer(10))
    );
    assert_eq!(
        payloads().decode(&decoded).unwrap(),
        PeopleEvent::AddressChanged(AddressChanged {
            zip: "10001".to_string()
        })
    );
}

#[test]
fn default_config_is_binary() {
    let serializer = RecordSerializer::new(SerializerConfig::default()).unwrap();
    assert_eq!(serializer.encoding(), Encoding::Binary);
    assert_eq!(
        serializer.format_content_type(),
        "application/cloudevents+json"
    );
}
