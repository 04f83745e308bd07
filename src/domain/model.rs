//! Upstream disability-services directory shapes.
//!
//! The directory API is loosely typed: any field may be missing, numbers show up
//! where strings are expected and arrays are sometimes something else entirely.
//! Every field here is optional and decoded through the lenient helpers below, so
//! a record never fails to decode; unusable values simply read as absent.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamPayload {
    #[serde(deserialize_with = "lenient::records")]
    pub services: Vec<ServiceRecord>,
    #[serde(deserialize_with = "lenient::text")]
    pub catalog_image: Option<String>,
}

impl UpstreamPayload {
    /// Decodes a raw upstream body. Anything that is not a JSON object yields an
    /// empty payload.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub service_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub service_short_desc: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub service_description: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub organization_names: Vec<String>,
    #[serde(deserialize_with = "lenient::records")]
    pub addresses: Vec<AddressRecord>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub disabilities: Vec<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient::record")]
    pub price: Option<PriceRecord>,
    #[serde(deserialize_with = "lenient::text")]
    pub rating: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub org_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub address_line_1: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub address_line_2: Option<String>,
    /// Short-form spelling of `address_line_1` used by some directory feeds.
    #[serde(deserialize_with = "lenient::text")]
    pub line1: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub line2: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub pincode: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub organization_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub latitude: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub longitude: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub address_label: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub fulfillment_id: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub fulfillment_types: Vec<String>,
    #[serde(deserialize_with = "lenient::records")]
    pub contacts: Vec<ContactRecord>,
}

impl AddressRecord {
    /// `address_line_1`, falling back to `line1`.
    pub fn street_line_1(&self) -> Option<&str> {
        self.address_line_1.as_deref().or(self.line1.as_deref())
    }

    /// `address_line_2`, falling back to `line2`.
    pub fn street_line_2(&self) -> Option<&str> {
        self.address_line_2.as_deref().or(self.line2.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub currency: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub value: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub listed_value: Option<String>,
}

pub(crate) mod lenient {
    use super::*;

    /// Strings pass through, numbers are stringified, everything else (and the
    /// empty string) is absent.
    pub fn scalar_text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(format_number(n)),
            _ => None,
        }
    }

    /// Integral floats print without a fraction (`4.0` -> `"4"`).
    fn format_number(n: &serde_json::Number) -> String {
        if n.is_f64() {
            if let Some(f) = n.as_f64() {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                    return format!("{}", f as i64);
                }
            }
        }
        n.to_string()
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(scalar_text(&value))
    }

    pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
            _ => Vec::new(),
        })
    }

    pub fn record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        })
    }

    pub fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}
