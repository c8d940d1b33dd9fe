//! Argo Workflows adapter for [`WorkflowSubmitter`].

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tenantry_core::error::{TenantryError, TenantryResult};
use tenantry_core::gateway::WorkflowSubmitter;
use tenantry_core::models::workflow::SubmitOptions;
use tracing::{debug, instrument};
use url::Url;

use crate::error::GatewayError;
use crate::http::{check_status, endpoint, new_client, parse_base_url};

#[derive(Debug, Clone)]
pub struct ArgoConfig {
    /// Argo server root, e.g. `http://localhost:2746`.
    pub base_url: String,
    /// Namespace the workflow templates live in.
    pub namespace: String,
    pub token: Option<String>,
    pub request_timeout: Duration,
}

impl Default for ArgoConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:2746".into(),
            namespace: "argo".into(),
            token: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    namespace: &'a str,
    resource_kind: &'static str,
    resource_name: &'a str,
    submit_options: &'a SubmitOptions,
}

#[derive(Debug, Deserialize)]
struct WorkflowResponse {
    metadata: WorkflowMetadata,
}

#[derive(Debug, Deserialize)]
struct WorkflowMetadata {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Clone)]
pub struct ArgoClient {
    http: Client,
    base_url: Url,
    namespace: String,
    token: Option<String>,
}

impl ArgoClient {
    pub fn new(config: ArgoConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            http: new_client(config.request_timeout)?,
            base_url: parse_base_url(&config.base_url)?,
            namespace: config.namespace,
            token: config.token,
        })
    }

    #[instrument(skip(self, options), fields(namespace = %self.namespace))]
    async fn submit_from_template(
        &self,
        template: &str,
        options: &SubmitOptions,
    ) -> Result<String, GatewayError> {
        let url = endpoint(
            &self.base_url,
            &["api", "v1", "workflows", self.namespace.as_str(), "submit"],
        )?;
        let body = SubmitRequest {
            namespace: &self.namespace,
            resource_kind: "WorkflowTemplate",
            resource_name: template,
            submit_options: options,
        };

        let mut request = self.http.post(url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let response = check_status(response, "workflow template", template).await?;
        let workflow: WorkflowResponse = response.json().await?;

        if workflow.metadata.name.is_empty() {
            return Err(GatewayError::UnexpectedResponse(
                "submitted workflow has no name".into(),
            ));
        }
        debug!(workflow = %workflow.metadata.name, "Submitted workflow");
        Ok(workflow.metadata.name)
    }
}

impl WorkflowSubmitter for ArgoClient {
    async fn submit(&self, template: &str, options: SubmitOptions) -> TenantryResult<String> {
        self.submit_from_template(template, &options)
            .await
            .map_err(|e| e.into_tenantry(TenantryError::Workflow))
    }
}
