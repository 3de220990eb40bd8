//! Data models for MAST Fetcher
//!
//! This module defines the records parsed out of MAST query responses:
//! observations returned by the filtered search and the downloadable
//! products attached to a single observation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One observation row from a filtered search
///
/// Produced by the query client and consumed by the observation selector.
/// Identifiers are kept as strings because the archive emits some of them
/// as numbers and some as strings depending on the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Observation identifier used by the products service
    #[serde(deserialize_with = "required_scalar")]
    pub obsid: String,
    /// Proposal the observation belongs to
    #[serde(default, deserialize_with = "optional_scalar")]
    pub proposal_id: Option<String>,
    /// Principal investigator
    #[serde(default, deserialize_with = "optional_scalar")]
    pub proposal_pi: Option<String>,
    /// Target name
    #[serde(default, deserialize_with = "optional_scalar")]
    pub target_name: Option<String>,
    /// Observation start time as a Modified Julian Date (absent for planned observations)
    #[serde(default)]
    pub t_min: Option<f64>,
}

impl ObservationRecord {
    /// Check whether the record carries a start time
    pub fn is_timed(&self) -> bool {
        self.t_min.is_some_and(|t| !t.is_nan())
    }
}

/// One downloadable file attached to an observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Collection (telescope/mission) the product belongs to
    #[serde(rename = "obs_collection", deserialize_with = "required_scalar")]
    pub collection: String,
    /// Observation folder name
    #[serde(rename = "obs_id", deserialize_with = "required_scalar")]
    pub observation_folder: String,
    /// File name of the product
    #[serde(rename = "productFilename")]
    pub file_name: String,
    /// Archive URI passed verbatim to the download endpoint
    #[serde(rename = "dataURI")]
    pub data_uri: String,
    /// Size in bytes
    #[serde(default, deserialize_with = "size_or_zero")]
    pub size: u64,
}

impl ProductRecord {
    /// Directory the product is written to: `<root>/<collection>/<observation folder>`
    pub fn destination_dir(&self, output_root: &Path) -> PathBuf {
        output_root
            .join(&self.collection)
            .join(&self.observation_folder)
    }

    /// Full local path of the product: `<root>/<collection>/<observation folder>/<file name>`
    ///
    /// Two records sharing the same triple resolve to the same path; the
    /// later write wins.
    pub fn destination_path(&self, output_root: &Path) -> PathBuf {
        self.destination_dir(output_root).join(&self.file_name)
    }
}

/// Total size in bytes of a product list
///
/// Saturates at `u64::MAX` instead of wrapping.
pub fn total_size(products: &[ProductRecord]) -> u64 {
    products.iter().map(|p| p.size).fold(0u64, u64::saturating_add)
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn required_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(value).ok_or_else(|| serde::de::Error::custom("expected a value, found null"))
}

fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(value))
}

fn size_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .ok_or_else(|| serde::de::Error::custom(format!("invalid size: {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid size: {}", s))),
        other => Err(serde::de::Error::custom(format!("invalid size: {}", other))),
    }
}
