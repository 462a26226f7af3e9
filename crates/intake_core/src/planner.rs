//! Client side of the planner service.

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::IntakeErrorKind,
    protocol::{HealthResponse, PlanRequest, PlanResponse, PlannerCommand},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const PLANNER_PORT: u16 = 8000;
const PLAN_PATH: &str = "api/plan";
const HEALTH_PATH: &str = "api/health";
const GENERIC_REJECTION: &str = "Error";

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed planner response: {0}")]
    Malformed(String),
    #[error("{0}")]
    Rejected(String),
    #[error("planner is unavailable")]
    Unavailable,
}

impl PlannerError {
    pub fn kind(&self) -> IntakeErrorKind {
        match self {
            PlannerError::Malformed(_) => IntakeErrorKind::MalformedResponse,
            _ => IntakeErrorKind::NetworkOrPlannerFailure,
        }
    }
}

/// A plan the service accepted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanAck {
    pub command: PlannerCommand,
    pub used_llm: Option<bool>,
}

impl PlanAck {
    pub fn intent(&self) -> Option<String> {
        self.command.intent_label()
    }
}

#[async_trait]
pub trait PlannerClient: Send + Sync {
    async fn plan(&self, text: &str) -> Result<PlanAck, PlannerError>;
}

pub struct MissingPlanner;

#[async_trait]
impl PlannerClient for MissingPlanner {
    async fn plan(&self, _text: &str) -> Result<PlanAck, PlannerError> {
        Err(PlannerError::Unavailable)
    }
}

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid planner base url '{base}': {source}")]
    InvalidBase {
        base: String,
        source: url::ParseError,
    },
    #[error("planner base url '{0}' cannot carry a path")]
    NotHierarchical(String),
}

pub struct HttpPlanner {
    http: Client,
    plan_url: Url,
    health_url: Url,
    api_key: Option<String>,
}

impl HttpPlanner {
    pub fn new(api_base: &str) -> Result<Self, EndpointError> {
        Self::with_client(Client::new(), api_base)
    }

    pub fn with_client(http: Client, api_base: &str) -> Result<Self, EndpointError> {
        let mut base = Url::parse(api_base.trim()).map_err(|source| EndpointError::InvalidBase {
            base: api_base.to_string(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(EndpointError::NotHierarchical(api_base.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let join = |path: &str| {
            base.join(path).map_err(|source| EndpointError::InvalidBase {
                base: api_base.to_string(),
                source,
            })
        };
        Ok(Self {
            plan_url: join(PLAN_PATH)?,
            health_url: join(HEALTH_PATH)?,
            http,
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.is_empty());
        self
    }

    pub fn plan_url(&self) -> &Url {
        &self.plan_url
    }

    pub async fn health(&self) -> Result<HealthResponse, PlannerError> {
        let res = self
            .http
            .get(self.health_url.clone())
            .send()
            .await?
            .error_for_status()?;
        let body = res.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| PlannerError::Malformed(err.to_string()))
    }
}

#[async_trait]
impl PlannerClient for HttpPlanner {
    async fn plan(&self, text: &str) -> Result<PlanAck, PlannerError> {
        let res = self
            .http
            .post(self.plan_url.clone())
            .json(&PlanRequest {
                text: text.to_string(),
                api_key: self.api_key.clone(),
            })
            .send()
            .await?;
        let status = res.status();
        let body = res.bytes().await?;
        debug!(%status, bytes = body.len(), "planner responded");

        let parsed = match serde_json::from_slice::<PlanResponse>(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(PlannerError::Rejected(format!("HTTP {}", status.as_u16())));
            }
            Err(err) => return Err(PlannerError::Malformed(err.to_string())),
        };

        if !status.is_success() || !parsed.ok {
            let detail = parsed
                .detail_message()
                .unwrap_or_else(|| GENERIC_REJECTION.to_string());
            warn!(%status, %detail, "planner rejected command");
            return Err(PlannerError::Rejected(detail));
        }

        Ok(PlanAck {
            command: parsed.cmd.unwrap_or_default(),
            used_llm: parsed.used_llm,
        })
    }
}

/// Picks the planner origin for a page: pages served from some other explicit
/// port (a dev server) talk to the planner on its own port, everything else
/// uses the page origin.
pub fn resolve_api_base(page_url: &str, planner_port: u16) -> Result<String, EndpointError> {
    let page = Url::parse(page_url.trim()).map_err(|source| EndpointError::InvalidBase {
        base: page_url.to_string(),
        source,
    })?;
    let Some(host) = page.host_str() else {
        return Err(EndpointError::NotHierarchical(page_url.to_string()));
    };
    match page.port() {
        Some(port) if port != planner_port => {
            Ok(format!("{}://{host}:{planner_port}", page.scheme()))
        }
        Some(port) => Ok(format!("{}://{host}:{port}", page.scheme())),
        None => Ok(format!("{}://{host}", page.scheme())),
    }
}

#[cfg(test)]
#[path = "tests/planner_tests.rs"]
mod tests;
