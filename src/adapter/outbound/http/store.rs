//! Rule persistence over the back-office REST API.

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, info};

use super::client::ApiClient;
use super::dto::{BulkCreateRequest, BulkRemoveRequest, BulkRemoveResponse, ListResponse};
use crate::domain::{id::RuleId, rule::HouseEdgeRule};
use crate::error::Result;
use crate::infrastructure::config::ApiConfig;
use crate::port::outbound::store::RuleDurabilityStore;

const RULES: &str = "house-edge-rules";

/// [`RuleDurabilityStore`] backed by `/house-edge-rules`.
#[derive(Debug, Clone)]
pub struct HttpRuleStore {
    client: ApiClient,
}

impl HttpRuleStore {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(ApiClient::from_config(config))
    }
}

#[async_trait]
impl RuleDurabilityStore for HttpRuleStore {
    async fn list(&self) -> Result<Vec<HouseEdgeRule>> {
        let response: ListResponse<HouseEdgeRule> = self.client.get_with_retry(RULES).await?;
        let rules = response.into_items();
        debug!(count = rules.len(), "Fetched rules");
        Ok(rules)
    }

    async fn create(&self, rule: &HouseEdgeRule) -> Result<()> {
        self.client.send_json(Method::POST, RULES, rule).await?;
        Ok(())
    }

    async fn bulk_create(&self, rules: &[HouseEdgeRule]) -> Result<()> {
        let path = format!("{RULES}/bulk");
        self.client
            .send_json(Method::POST, &path, &BulkCreateRequest { rules })
            .await?;
        info!(count = rules.len(), "Rules bulk-created remotely");
        Ok(())
    }

    async fn update(&self, rule: &HouseEdgeRule) -> Result<bool> {
        let path = format!("{RULES}/{}", rule.id);
        let response = self
            .client
            .send_json_if_found(Method::PUT, &path, rule)
            .await?;
        Ok(response.is_some())
    }

    async fn delete(&self, id: &RuleId) -> Result<bool> {
        let path = format!("{RULES}/{id}");
        let response = self.client.send_if_found(Method::DELETE, &path).await?;
        Ok(response.is_some())
    }

    async fn bulk_remove(&self, ids: &[RuleId]) -> Result<usize> {
        let path = format!("{RULES}/bulk-remove");
        let response = self
            .client
            .send_json(Method::POST, &path, &BulkRemoveRequest { ids })
            .await?;
        let body: BulkRemoveResponse = response.json().await?;
        Ok(body.removed)
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
