//! HTTP client for the remote task collection.
//!
//! This module provides a low-level HTTP client wrapper for making requests
//! against a REST collection resource, handling URL building, status checks,
//! and response parsing.

use super::error::{RepositoryError, RepositoryResult};
use log::*;
use reqwest::{Method, Response};
use serde::{de::DeserializeOwned, Serialize};

/// Makes requests to the collection and tries to conform response data to the
/// requested type.
///
pub struct Client {
    pub(crate) base_url: String,
    pub(crate) http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given collection URL.
    ///
    pub fn new(base_url: &str) -> RepositoryResult<Self> {
        Ok(Client {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client: reqwest::Client::builder().build()?,
        })
    }

    /// Return one page of the collection.
    ///
    pub async fn list<T: DeserializeOwned>(&self, params: &[(&str, String)]) -> RepositoryResult<Vec<T>> {
        let response = self
            .call::<()>(Method::GET, None, params, None)
            .await?;
        Self::decode(response).await
    }

    /// Send a body to the collection, or to one member of it when an id is
    /// given, and decode the echoed record.
    ///
    pub async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        id: Option<i64>,
        body: &B,
    ) -> RepositoryResult<T> {
        let response = self.call(method, id, &[], Some(body)).await?;
        Self::decode(response).await
    }

    /// Delete one member of the collection.
    ///
    pub async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let response = self
            .call::<()>(Method::DELETE, Some(id), &[], None)
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Return the collection URL, or the member URL when an id is given.
    ///
    pub(crate) fn url(&self, id: Option<i64>) -> String {
        match id {
            Some(id) => format!("{}/{}", self.base_url, id),
            None => self.base_url.clone(),
        }
    }

    /// Make request and return the raw response or a transport error.
    ///
    async fn call<B: Serialize>(
        &self,
        method: Method,
        id: Option<i64>,
        params: &[(&str, String)],
        body: Option<&B>,
    ) -> RepositoryResult<Response> {
        let request_url = self.url(id);
        debug!("{} {}", method, request_url);

        let mut request = self.http_client.request(method, &request_url);
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    /// Fail with the response body as message unless the status is a success.
    ///
    async fn check_status(response: Response) -> RepositoryResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("Unable to read response"));
        error!("API request failed with status {}: {}", status, message);
        Err(RepositoryError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> RepositoryResult<T> {
        let response = Self::check_status(response).await?;
        let response_bytes = response.bytes().await?;
        serde_json::from_slice::<T>(&response_bytes).map_err(|e| {
            error!(
                "Failed to deserialize API response: {}. Response body: {}",
                e,
                String::from_utf8_lossy(&response_bytes)
            );
            RepositoryError::Decode(e)
        })
    }
}
