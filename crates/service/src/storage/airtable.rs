use std::time::Duration;

use async_trait::async_trait;
use configs::AirtableConfig;
use models::{Freelancer, FreelancerPatch, InsertFreelancer};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Backend, FreelancerPage, FreelancerStore};
use crate::errors::ServiceError;

/// Everything needed to reach one Airtable table.
#[derive(Clone, Debug)]
pub struct AirtableCredentials {
    pub token: String,
    pub base_id: String,
    pub table: String,
    pub api_url: String,
    pub page_size: u32,
    pub request_timeout: Duration,
}

impl AirtableCredentials {
    /// `None` unless both token and base id are configured.
    pub fn from_config(cfg: &AirtableConfig) -> Option<Self> {
        if !cfg.is_enabled() {
            return None;
        }
        Some(Self {
            token: cfg.token.trim().to_string(),
            base_id: cfg.base_id.trim().to_string(),
            table: cfg.table.clone(),
            api_url: cfg.api_url.clone(),
            page_size: cfg.page_size,
            request_timeout: Duration::from_secs(cfg.request_timeout_secs),
        })
    }
}

/// A record as Airtable returns it: service-assigned id plus a field bag.
#[derive(Debug, Deserialize)]
struct AirtableRecord {
    id: String,
    #[serde(default)]
    fields: FreelancerPatch,
}

impl AirtableRecord {
    fn normalize(self) -> Freelancer {
        Freelancer::new(self.id, self.fields.apply_defaults())
    }
}

#[derive(Debug, Deserialize)]
struct AirtableList {
    #[serde(default)]
    records: Vec<AirtableRecord>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Serialize)]
struct FieldsBody<'a> {
    fields: &'a FreelancerPatch,
}

/// Freelancer store backed by an Airtable table over its REST API.
///
/// One HTTP call per operation, no retries. Any non-success status is
/// surfaced as `ServiceError::Remote` with the raw body.
#[derive(Clone, Debug)]
pub struct AirtableStore {
    client: Client,
    table_url: Url,
    token: String,
    page_size: u32,
}

impl AirtableStore {
    pub fn new(creds: AirtableCredentials) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(creds.request_timeout).build()?;
        let table_url = table_url(&creds)?;
        Ok(Self { client, table_url, token: creds.token, page_size: creds.page_size })
    }

    fn record_url(&self, id: &str) -> Result<Url, ServiceError> {
        let mut url = self.table_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Http(format!("cannot-be-a-base url: {}", self.table_url)))?
            .push(id);
        Ok(url)
    }

    async fn execute(&self, req: RequestBuilder) -> Result<Response, ServiceError> {
        Ok(req.bearer_auth(&self.token).send().await?)
    }

    async fn ensure_success(resp: Response) -> Result<Response, ServiceError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        // the status alone is not enough, keep the read failure
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(status = status.as_u16(), error = %e, "airtable error body unreadable");
                return Err(ServiceError::Http(format!(
                    "airtable responded {} but the body could not be read: {e}",
                    status.as_u16()
                )));
            }
        };
        warn!(status = status.as_u16(), %body, "airtable request failed");
        Err(ServiceError::Remote { status: status.as_u16(), body })
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ServiceError> {
        let resp = self.execute(req).await?;
        Self::ensure_success(resp).await
    }
}

/// `{api_url}/{base_id}/{table}` with each segment percent-encoded.
fn table_url(creds: &AirtableCredentials) -> Result<Url, ServiceError> {
    let mut url = Url::parse(&creds.api_url)
        .map_err(|e| ServiceError::Http(format!("invalid airtable api url {}: {e}", creds.api_url)))?;
    url.path_segments_mut()
        .map_err(|_| ServiceError::Http(format!("cannot-be-a-base url: {}", creds.api_url)))?
        .pop_if_empty()
        .push(&creds.base_id)
        .push(&creds.table);
    Ok(url)
}

#[async_trait]
impl FreelancerStore for AirtableStore {
    fn backend(&self) -> Backend { Backend::Airtable }

    async fn list(&self, offset: Option<String>) -> Result<FreelancerPage, ServiceError> {
        // one page per call; the caller decides whether to follow `offset`
        let mut req = self
            .client
            .get(self.table_url.clone())
            .query(&[("pageSize", self.page_size.to_string())]);
        if let Some(offset) = offset.as_deref() {
            req = req.query(&[("offset", offset)]);
        }
        let page: AirtableList = self.send(req).await?.json().await?;
        debug!(count = page.records.len(), has_more = page.offset.is_some(), "airtable list");
        Ok(FreelancerPage {
            list: page.records.into_iter().map(AirtableRecord::normalize).collect(),
            offset: page.offset,
        })
    }

    async fn get(&self, id: &str) -> Result<Option<Freelancer>, ServiceError> {
        let resp = self.execute(self.client.get(self.record_url(id)?)).await?;
        // 404 is an answer here, not a failure
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let record: AirtableRecord = Self::ensure_success(resp).await?.json().await?;
        Ok(Some(record.normalize()))
    }

    async fn create(&self, input: InsertFreelancer) -> Result<Freelancer, ServiceError> {
        // every field is sent, absent optionals as their defaults
        let fields = FreelancerPatch::from(FreelancerPatch::from(input).apply_defaults());
        let req = self.client.post(self.table_url.clone()).json(&FieldsBody { fields: &fields });
        let record: AirtableRecord = self.send(req).await?.json().await?;
        debug!(id = %record.id, "airtable create");
        Ok(record.normalize())
    }

    async fn update(&self, id: &str, patch: FreelancerPatch) -> Result<Freelancer, ServiceError> {
        // only present fields are sent; absent means untouched
        let req = self.client.patch(self.record_url(id)?).json(&FieldsBody { fields: &patch });
        let record: AirtableRecord = self.send(req).await?.json().await?;
        debug!(%id, "airtable update");
        Ok(record.normalize())
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        // a missing record is a remote 404 and surfaces through `send`
        self.send(self.client.delete(self.record_url(id)?)).await?;
        debug!(%id, "airtable delete");
        Ok(true)
    }
}
