//! Search request model for the MAST invocation endpoint
//!
//! A request is built fresh for every query and never mutated afterwards.
//! Filtered searches can only be built through [`SearchRequest::filtered`],
//! which always attaches the collection filter and the proposal filter
//! together.

use serde::Serialize;

use super::ProposalId;
use crate::constants::services;

/// Which columns a filtered search returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSelector {
    /// Single `COUNT_BIG(*)` cell
    Count,
    /// Every column of every matching row
    All,
}

impl ColumnSelector {
    /// Selector string sent to the service
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => services::COUNT_COLUMNS,
            Self::All => services::ALL_COLUMNS,
        }
    }
}

impl Serialize for ColumnSelector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// One named filter and the values it admits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    #[serde(rename = "paramName")]
    pub name: String,
    pub values: Vec<String>,
}

impl Filter {
    fn single(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            values: vec![value.to_string()],
        }
    }
}

/// Service-specific parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestParams {
    /// Filtered search over observations
    Filtered {
        columns: ColumnSelector,
        filters: Vec<Filter>,
    },
    /// Products of a single observation
    Products { obsid: String },
}

/// Structured request submitted to the query endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    service: String,
    format: String,
    params: RequestParams,
    #[serde(rename = "pagesize", skip_serializing_if = "Option::is_none")]
    page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
}

impl SearchRequest {
    /// Filtered observation search for one proposal within one collection
    pub fn filtered(telescope: &str, proposal_id: &ProposalId, columns: ColumnSelector) -> Self {
        Self {
            service: services::FILTERED.to_string(),
            format: services::FORMAT_JSON.to_string(),
            params: RequestParams::Filtered {
                columns,
                filters: vec![
                    Filter::single(services::COLLECTION_FILTER, telescope),
                    Filter::single(services::PROPOSAL_FILTER, proposal_id.as_str()),
                ],
            },
            page_size: None,
            page: None,
        }
    }

    /// First page of products attached to an observation
    pub fn products(obsid: &str, page_size: u32) -> Self {
        Self {
            service: services::PRODUCTS.to_string(),
            format: services::FORMAT_JSON.to_string(),
            params: RequestParams::Products {
                obsid: obsid.to_string(),
            },
            page_size: Some(page_size),
            page: Some(1),
        }
    }

    /// Service name
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Service parameters
    pub fn params(&self) -> &RequestParams {
        &self.params
    }

    /// Column selector, for filtered searches
    pub fn columns(&self) -> Option<ColumnSelector> {
        match &self.params {
            RequestParams::Filtered { columns, .. } => Some(*columns),
            RequestParams::Products { .. } => None,
        }
    }

    /// Serialize the request to its JSON text
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Form body for the invocation endpoint: `request=<url-escaped JSON>`
    pub fn to_form_body(&self) -> serde_json::Result<String> {
        let json = self.to_json()?;
        let escaped: String = url::form_urlencoded::byte_serialize(json.as_bytes()).collect();
        Ok(format!("{}={}", crate::constants::mast::REQUEST_FIELD, escaped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn proposal(id: &str) -> ProposalId {
        ProposalId::parse(id).unwrap()
    }

    #[test]
    fn test_filtered_count_request_shape() {
        // Test that the count request carries both filters and the count selector
        let request = SearchRequest::filtered("JWST", &proposal("1234"), ColumnSelector::Count);
        let value: Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "service": "Mast.Caom.Filtered",
                "format": "json",
                "params": {
                    "columns": "COUNT_BIG(*)",
                    "filters": [
                        {"paramName": "obs_collection", "values": ["JWST"]},
                        {"paramName": "proposal_id", "values": ["1234"]}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_filtered_full_request_selector() {
        let request = SearchRequest::filtered("HST", &proposal("42"), ColumnSelector::All);
        assert_eq!(request.columns(), Some(ColumnSelector::All));
        assert!(request.to_json().unwrap().contains("\"columns\":\"*\""));
    }

    #[test]
    fn test_products_request_shape() {
        // Test that the products request asks for page 1 of the given size
        let request = SearchRequest::products("2003839997", 100);
        let value: Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "service": "Mast.Caom.Products",
                "format": "json",
                "params": {"obsid": "2003839997"},
                "pagesize": 100,
                "page": 1
            })
        );
        assert_eq!(request.columns(), None);
    }

    #[test]
    fn test_form_body_is_url_escaped() {
        let request = SearchRequest::filtered("JWST", &proposal("1234"), ColumnSelector::Count);
        let body = request.to_form_body().unwrap();

        assert!(body.starts_with("request="));
        let payload = &body["request=".len()..];
        assert!(!payload.contains('{'));
        assert!(!payload.contains('"'));

        // Decoding the payload gives back the JSON text
        let decoded: String = url::form_urlencoded::parse(body.as_bytes())
            .find(|(k, _)| k == "request")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(decoded, request.to_json().unwrap());
    }
}
