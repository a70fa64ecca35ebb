use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::EmployeeId,
    error::ApiError,
    protocol::{Employee, NewEmployee},
};
use tracing::debug;
use url::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/employees";

/// Remote employee collection. One call maps to exactly one backend request.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<Employee>>;
    async fn create(&self, payload: &NewEmployee) -> ClientResult<Employee>;
    async fn get(&self, id: EmployeeId) -> ClientResult<Employee>;
    async fn update(&self, id: EmployeeId, employee: &Employee) -> ClientResult<Employee>;
    async fn delete(&self, id: EmployeeId) -> ClientResult<()>;
}

/// HTTP implementation of [`EmployeeStore`] against the `/api/employees` resource.
///
/// No retries, caching or timeouts are layered on top of `reqwest`; transport and
/// backend failures are handed back to the caller as they occur.
#[derive(Debug, Clone)]
pub struct EmployeeClient {
    http: Client,
    base_url: String,
}

impl EmployeeClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let parsed = Url::parse(base_url.trim()).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        Ok(Self {
            http: Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: EmployeeId) -> String {
        format!("{}/{}", self.base_url, id)
    }

    async fn read_body(response: Response) -> ClientResult<String> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body).into());
        }
        Ok(body)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl EmployeeStore for EmployeeClient {
    async fn list(&self) -> ClientResult<Vec<Employee>> {
        debug!(url = %self.base_url, "listing employees");
        let res = self.http.get(&self.base_url).send().await?;
        Self::decode(res).await
    }

    async fn create(&self, payload: &NewEmployee) -> ClientResult<Employee> {
        debug!(full_name = %payload.full_name, "creating employee");
        let res = self.http.post(&self.base_url).json(payload).send().await?;
        Self::decode(res).await
    }

    async fn get(&self, id: EmployeeId) -> ClientResult<Employee> {
        let res = self.http.get(self.item_url(id)).send().await?;
        Self::decode(res).await
    }

    async fn update(&self, id: EmployeeId, employee: &Employee) -> ClientResult<Employee> {
        debug!(%id, "updating employee");
        let res = self
            .http
            .put(self.item_url(id))
            .json(employee)
            .send()
            .await?;
        Self::decode(res).await
    }

    async fn delete(&self, id: EmployeeId) -> ClientResult<()> {
        debug!(%id, "deleting employee");
        let res = self.http.delete(self.item_url(id)).send().await?;
        Self::read_body(res).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
