use anyhow::Result;
use serde_json::{json, Value};
use std::collections::HashSet;
use tan_adapter::domain::catalog::CatalogResponse;
use tan_adapter::{CatalogGenerator, CategorySource, ContactPlacement, GeneratorOptions};

fn directory_response() -> Value {
    json!({
        "catalog_image": "https://cdn.example.org/catalog.png",
        "services": [
            {
                "id": "svc-101",
                "service_name": "Hearing Assessment",
                "service_short_desc": "Free audiometry",
                "service_description": "Audiometry and hearing aid fitting",
                "organization_names": ["Ali Yavar Jung Institute"],
                "categories": ["Hearing Loss", "Speech and Language Disability"],
                "tags": ["Hearing Loss"],
                "price": {"currency": "INR", "value": "0"},
                "rating": 5,
                "org_image": "ayjnihh logo.png",
                "addresses": [
                    {
                        "address_label": "Bandra Centre",
                        "address_line_1": "K.C. Marg",
                        "city": "Mumbai",
                        "state": "Maharashtra",
                        "pincode": "400050",
                        "latitude": "19.05",
                        "longitude": "72.83",
                        "fulfillment_types": ["Onsite", "Camp"],
                        "contacts": [{"phone": "022-26400215", "email": "info@example.org"}]
                    }
                ]
            },
            {
                "id": "svc-102",
                "service_name": "Sign Language Interpreter",
                "categories": ["Hearing Loss"],
                "addresses": [{"city": "Pune", "fulfillment_types": ["Online"]}]
            },
            {
                "id": "svc-103",
                "categories": ["Autism"],
                "addresses": [{"city": "Delhi", "contacts": [{"phone": "011"}]}]
            },
            {
                "service_name": "No identifier",
                "categories": ["Autism"]
            }
        ]
    })
}

#[test]
fn test_only_services_with_items_become_providers() {
    let response = CatalogGenerator::default().generate(&directory_response());
    let ids: Vec<&str> = response
        .message
        .catalog
        .providers
        .iter()
        .map(|p| p.id.as_str())
        .collect();

    assert_eq!(ids, vec!["svc-101", "svc-102"]);
    for provider in &response.message.catalog.providers {
        assert_eq!(provider.items.len(), 1);
    }
}

#[test]
fn test_full_provider_shape() {
    let response = CatalogGenerator::default().generate(&directory_response());
    let value = serde_json::to_value(&response).unwrap();
    let provider = &value["message"]["catalog"]["providers"][0];

    assert_eq!(
        provider["descriptor"]["images"],
        json!([{"url": "https://image/ayjnihh%20logo.png"}])
    );
    assert_eq!(
        provider["locations"],
        json!([{
            "id": "Bandra Centre",
            "address": "K.C. Marg, Mumbai, Maharashtra, 400050",
            "gps": "19.05,72.83"
        }])
    );
    assert_eq!(
        provider["fulfillments"],
        json!([
            {"id": "svc-101_fulfillment_0_0", "type": "Onsite", "start": {"location": {"location_id": "Bandra Centre"}}},
            {"id": "svc-101_fulfillment_0_1", "type": "Camp", "start": {"location": {"location_id": "Bandra Centre"}}}
        ])
    );
    assert_eq!(
        provider["contacts"],
        json!([{"phone": "022-26400215", "email": "info@example.org"}])
    );

    let item = &provider["items"][0];
    assert_eq!(item["price"], json!({"currency": "INR", "value": "0"}));
    assert_eq!(item["rating"], "5");
    assert_eq!(
        item["category_ids"],
        json!(["hearing_loss", "speech_and_language_disability"])
    );
    assert_eq!(
        item["fulfillment_ids"],
        json!(["svc-101_fulfillment_0_0", "svc-101_fulfillment_0_1"])
    );
    assert_eq!(
        value["message"]["catalog"]["descriptor"]["images"],
        json!([{"url": "https://cdn.example.org/catalog.png"}])
    );
}

#[test]
fn test_category_ids_reference_defined_categories() {
    let generator = CatalogGenerator::new(GeneratorOptions {
        catalog_categories: true,
        ..GeneratorOptions::default()
    });
    let response = generator.generate(&directory_response());
    let catalog = &response.message.catalog;

    let catalog_ids: HashSet<&str> = catalog.categories.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(catalog.categories.len(), 2);

    for provider in &catalog.providers {
        let provider_ids: HashSet<&str> =
            provider.categories.iter().map(|c| c.id.as_str()).collect();
        for id in &provider.items[0].category_ids {
            assert!(provider_ids.contains(id.as_str()));
            assert!(catalog_ids.contains(id.as_str()));
        }
    }

    // "Hearing Loss" from two services slugs to the same id
    assert_eq!(catalog.providers[0].categories[0].id, catalog.providers[1].categories[0].id);
}

#[test]
fn test_repeated_generation_is_byte_identical() {
    let generator = CatalogGenerator::new(GeneratorOptions {
        category_source: CategorySource::Disabilities,
        contact_placement: ContactPlacement::Location,
        catalog_categories: true,
        ..GeneratorOptions::default()
    });
    let payload = directory_response();

    let first = serde_json::to_vec(&generator.generate(&payload)).unwrap();
    let second = serde_json::to_vec(&generator.generate(&payload)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_output_round_trips_through_catalog_types() -> Result<()> {
    let response = CatalogGenerator::default().generate(&directory_response());
    let text = serde_json::to_string(&response)?;
    let parsed: CatalogResponse = serde_json::from_str(&text)?;
    assert_eq!(parsed, response);
    Ok(())
}

#[test]
fn test_garbage_payloads_never_fail() {
    let generator = CatalogGenerator::default();
    for payload in [
        json!(null),
        json!("services"),
        json!({}),
        json!({"services": null}),
        json!({"services": [null, 1, "x", {"id": null}]}),
        json!({"services": [{"id": "s1", "service_name": ["not", "a", "string"]}]}),
    ] {
        let response = generator.generate(&payload);
        assert!(response.message.catalog.providers.is_empty());
    }
}
