//! Blocking HTTP client for the lead endpoints.
//!
//! A thin wrapper: it builds query strings and decodes JSON bodies. Transport
//! failures are returned as the underlying [`reqwest::Error`], unmodified.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

use crate::query::ListLeadsParams;
use crate::server::dto::{LeadListResponse, LeadResponse};
use crate::types::{Lead, LeadStats};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Clone)]
pub struct LeadClient {
    client: Client,
    base_url: String,
}

/// Encodes set parameters as `?a=1&b=2`, or an empty string when none are set.
#[must_use]
pub fn build_query_string(params: &ListLeadsParams) -> String {
    let pairs: Vec<String> = params
        .query_pairs()
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
        .collect();

    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

impl LeadClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn list_leads(&self, params: &ListLeadsParams) -> Result<LeadListResponse, ClientError> {
        self.get(&format!("/api/leads{}", build_query_string(params)))
    }

    pub fn get_lead(&self, id: &str) -> Result<Lead, ClientError> {
        let resp: LeadResponse = self.get(&format!("/api/leads/{}", urlencoding::encode(id)))?;
        Ok(resp.lead)
    }

    pub fn lead_stats(&self) -> Result<LeadStats, ClientError> {
        self.get("/api/leads/stats")
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).send()?;
        Self::handle_response(resp)
    }

    fn handle_response<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json()?);
        }

        let body = resp.text()?;
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "Server error (no details provided)".to_string()
                } else {
                    body.trim().to_string()
                }
            });

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_string() {
        assert_eq!(build_query_string(&ListLeadsParams::default()), "");

        let params = ListLeadsParams {
            page: Some("2".into()),
            search: Some("jane doe&co".into()),
            source: Some("Cold Call".into()),
            ..Default::default()
        };
        assert_eq!(
            build_query_string(&params),
            "?page=2&search=jane%20doe%26co&source=Cold%20Call"
        );
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = LeadClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}
