//! Maps upstream disability-service records onto the catalog document.
//!
//! Generation is total: every upstream payload produces a catalog, and any
//! missing or unusable field only removes the output field derived from it.
//! The output is a pure function of the input, so identical payloads always
//! serialize to identical bytes.

use crate::core::media::{MediaUrlResolver, DEFAULT_MEDIA_BASE};
use crate::domain::catalog::{
    Catalog, CatalogMessage, CatalogResponse, CategoryRef, Contact, Descriptor, Fulfillment,
    FulfillmentLocation, FulfillmentStart, Item, Location, Price, Provider, Tag,
};
use crate::domain::model::{AddressRecord, ContactRecord, ServiceRecord, UpstreamPayload};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

pub const CATALOG_NAME: &str = "Disability Service Catalog";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Which service field is read first for category labels. The other field is
/// only consulted when the preferred one is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CategorySource {
    #[default]
    Categories,
    Disabilities,
}

/// Where address contacts end up in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ContactPlacement {
    /// All addresses' contacts flattened onto the provider.
    #[default]
    Provider,
    /// Each location carries the contacts of its own address. Contacts on
    /// addresses that do not form a location stay on the provider.
    Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub category_source: CategorySource,
    pub contact_placement: ContactPlacement,
    /// Emit the deduplicated union of provider categories at catalog level.
    pub catalog_categories: bool,
    pub media_base_url: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            category_source: CategorySource::default(),
            contact_placement: ContactPlacement::default(),
            catalog_categories: false,
            media_base_url: DEFAULT_MEDIA_BASE.to_string(),
        }
    }
}

/// Lowercases the label, drops parentheses and collapses every whitespace run
/// into a single underscore.
pub fn slugify(label: &str) -> String {
    let stripped: String = label
        .to_lowercase()
        .chars()
        .filter(|c| *c != '(' && *c != ')')
        .collect();
    WHITESPACE.replace_all(&stripped, "_").into_owned()
}

/// First candidate that is present and non-empty.
pub fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|value| !value.is_empty())
}

/// `address_label`, then `city`, then the owning service id.
fn location_id(address: &AddressRecord, service_id: &str) -> String {
    first_present(&[
        address.address_label.as_deref(),
        address.city.as_deref(),
        Some(service_id),
    ])
    .unwrap_or(service_id)
    .to_string()
}

/// `service_short_desc`, then `service_description`.
fn item_short_desc(service: &ServiceRecord) -> Option<String> {
    first_present(&[
        service.service_short_desc.as_deref(),
        service.service_description.as_deref(),
    ])
    .map(str::to_string)
}

fn first_non_empty<'a>(sources: [&'a [String]; 2]) -> &'a [String] {
    sources
        .into_iter()
        .find(|labels| !labels.is_empty())
        .unwrap_or(&[])
}

fn to_contact(record: &ContactRecord) -> Option<Contact> {
    if record.phone.is_none() && record.email.is_none() {
        return None;
    }
    Some(Contact {
        phone: record.phone.clone(),
        email: record.email.clone(),
    })
}

fn address_contacts(address: &AddressRecord) -> impl Iterator<Item = Contact> + '_ {
    address.contacts.iter().filter_map(to_contact)
}

/// An address becomes a location when it has a street line, a city or a
/// full coordinate pair.
fn is_location(address: &AddressRecord) -> bool {
    let has_gps = address.latitude.is_some() && address.longitude.is_some();
    address.street_line_1().is_some() || address.city.is_some() || has_gps
}

#[derive(Debug, Clone, Default)]
pub struct CatalogGenerator {
    options: GeneratorOptions,
    media: MediaUrlResolver,
}

impl CatalogGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        let media = MediaUrlResolver::new(options.media_base_url.clone());
        Self { options, media }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Builds the `{message: {catalog}}` document from a raw upstream body.
    pub fn generate(&self, api_data: &Value) -> CatalogResponse {
        self.generate_payload(&UpstreamPayload::from_value(api_data))
    }

    pub fn generate_payload(&self, payload: &UpstreamPayload) -> CatalogResponse {
        let providers: Vec<Provider> = payload
            .services
            .iter()
            .filter_map(|service| self.build_provider(service))
            .collect();

        tracing::debug!(
            "Mapped {} of {} upstream services to providers",
            providers.len(),
            payload.services.len()
        );

        let categories = if self.options.catalog_categories {
            Self::catalog_categories(&providers)
        } else {
            Vec::new()
        };

        let descriptor = Descriptor {
            name: Some(CATALOG_NAME.to_string()),
            images: self.media.resolve(payload.catalog_image.as_deref()),
            ..Descriptor::default()
        };

        CatalogResponse {
            message: CatalogMessage {
                catalog: Catalog {
                    descriptor,
                    categories,
                    providers,
                },
            },
        }
    }

    /// Returns `None` when the service yields no item; such a provider would
    /// carry nothing a caller can select.
    pub fn build_provider(&self, service: &ServiceRecord) -> Option<Provider> {
        let Some(service_id) = service.id.as_deref() else {
            tracing::debug!("Skipping upstream service without id");
            return None;
        };

        let locations = self.locations(service, service_id);
        let fulfillments = Self::fulfillments(service, service_id);
        let categories = self.categories(service);
        let tags: Vec<Tag> = self
            .tag_labels(service)
            .iter()
            .map(|label| Tag::disability_type(label))
            .collect();

        let Some(item) = self.build_item(service, service_id, &fulfillments, &categories, tags)
        else {
            tracing::debug!("Dropping service {}: no name or description", service_id);
            return None;
        };

        // Addresses that never become a location keep their contacts on the
        // provider under either placement.
        let contacts = service
            .addresses
            .iter()
            .filter(|address| {
                self.options.contact_placement == ContactPlacement::Provider
                    || !is_location(address)
            })
            .flat_map(address_contacts)
            .collect();

        let descriptor = Descriptor {
            name: service.organization_names.first().cloned(),
            short_desc: service.service_description.clone(),
            images: self.media.resolve(service.org_image.as_deref()),
            ..Descriptor::default()
        };

        Some(Provider {
            id: service_id.to_string(),
            descriptor,
            fulfillments,
            locations,
            categories,
            items: vec![item],
            contacts,
        })
    }

    fn build_item(
        &self,
        service: &ServiceRecord,
        service_id: &str,
        fulfillments: &[Fulfillment],
        categories: &[CategoryRef],
        tags: Vec<Tag>,
    ) -> Option<Item> {
        if service.service_name.is_none() && service.service_description.is_none() {
            return None;
        }

        let descriptor = Descriptor {
            name: service.service_name.clone(),
            short_desc: item_short_desc(service),
            long_desc: service.service_description.clone(),
            images: self.media.resolve(service.image.as_deref()),
            ..Descriptor::default()
        };

        let price = service.price.as_ref().and_then(|price| {
            let value = price.value.clone().or_else(|| price.listed_value.clone())?;
            Some(Price {
                currency: price.currency.clone(),
                value,
            })
        });

        Some(Item {
            id: service_id.to_string(),
            descriptor,
            price,
            rating: service.rating.clone(),
            fulfillment_ids: fulfillments.iter().map(|f| f.id.clone()).collect(),
            category_ids: categories.iter().map(|c| c.id.clone()).collect(),
            tags,
        })
    }

    fn locations(&self, service: &ServiceRecord, service_id: &str) -> Vec<Location> {
        service
            .addresses
            .iter()
            .filter(|address| is_location(address))
            .map(|address| {
                let parts: Vec<&str> = [
                    address.street_line_1(),
                    address.street_line_2(),
                    address.city.as_deref(),
                    address.state.as_deref(),
                    address.pincode.as_deref(),
                    address.organization_name.as_deref(),
                ]
                .into_iter()
                .flatten()
                .collect();

                let gps = match (&address.latitude, &address.longitude) {
                    (Some(lat), Some(lon)) => Some(format!("{},{}", lat, lon)),
                    _ => None,
                };

                let contacts = match self.options.contact_placement {
                    ContactPlacement::Location => address_contacts(address).collect(),
                    ContactPlacement::Provider => Vec::new(),
                };

                Location {
                    id: location_id(address, service_id),
                    address: (!parts.is_empty()).then(|| parts.join(", ")),
                    gps,
                    contacts,
                }
            })
            .collect()
    }

    /// One fulfillment per (address, type). An explicit `fulfillment_id` is
    /// used as-is; otherwise ids are positional, so repeated runs over the same
    /// payload agree.
    fn fulfillments(service: &ServiceRecord, service_id: &str) -> Vec<Fulfillment> {
        service
            .addresses
            .iter()
            .filter(|address| !address.fulfillment_types.is_empty())
            .enumerate()
            .flat_map(move |(address_idx, address)| {
                let location_id = location_id(address, service_id);
                address
                    .fulfillment_types
                    .iter()
                    .enumerate()
                    .map(move |(type_idx, fulfillment_type)| {
                        let id = match address.fulfillment_id.as_deref() {
                            Some(explicit) => explicit.to_string(),
                            None => format!(
                                "{}_fulfillment_{}_{}",
                                service_id, address_idx, type_idx
                            ),
                        };
                        Fulfillment {
                            id,
                            fulfillment_type: fulfillment_type.clone(),
                            start: FulfillmentStart {
                                location: FulfillmentLocation {
                                    location_id: location_id.clone(),
                                },
                            },
                        }
                    })
            })
            .collect()
    }

    fn category_labels<'a>(&self, service: &'a ServiceRecord) -> &'a [String] {
        match self.options.category_source {
            CategorySource::Categories => {
                first_non_empty([service.categories.as_slice(), service.disabilities.as_slice()])
            }
            CategorySource::Disabilities => {
                first_non_empty([service.disabilities.as_slice(), service.categories.as_slice()])
            }
        }
    }

    fn tag_labels<'a>(&self, service: &'a ServiceRecord) -> &'a [String] {
        first_non_empty([service.tags.as_slice(), service.disabilities.as_slice()])
    }

    fn categories(&self, service: &ServiceRecord) -> Vec<CategoryRef> {
        let mut seen = HashSet::new();
        self.category_labels(service)
            .iter()
            .filter_map(|label| {
                let id = slugify(label);
                if id.is_empty() || !seen.insert(id.clone()) {
                    return None;
                }
                Some(CategoryRef {
                    id,
                    descriptor: Descriptor {
                        code: Some(label.clone()),
                        ..Descriptor::default()
                    },
                })
            })
            .collect()
    }

    /// Union of provider categories, first occurrence wins.
    fn catalog_categories(providers: &[Provider]) -> Vec<CategoryRef> {
        let mut seen = HashSet::new();
        providers
            .iter()
            .flat_map(|provider| provider.categories.iter())
            .filter(|category| seen.insert(category.id.clone()))
            .cloned()
            .collect()
    }
}
