//! Lambda adapter answering agent action-group invocations.
//!
//! The agent names an API path from the OpenAPI document and passes its
//! query parameters as a list; the answer goes back as a JSON string inside
//! the action-group response envelope.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use marketdesk_core::{Endpoint, MarketService, Settings};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub const MESSAGE_VERSION: &str = "1.0";

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AgentEvent {
    #[serde(default)]
    pub message_version: Option<String>,
    pub action_group: String,
    pub api_path: String,
    pub http_method: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub session_attributes: HashMap<String, String>,
    #[serde(default)]
    pub prompt_session_attributes: HashMap<String, String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub value: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    pub message_version: String,
    pub response: ActionResponse,
    pub session_attributes: HashMap<String, String>,
    pub prompt_session_attributes: HashMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub action_group: String,
    pub api_path: String,
    pub http_method: String,
    pub http_status_code: u16,
    pub response_body: ResponseBody,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResponseBody {
    #[serde(rename = "application/json")]
    pub json: JsonBody,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JsonBody {
    /// The answer, encoded as a JSON string.
    pub body: String,
}

/// Answer one invocation. Failures are reported in the envelope, never raised.
pub async fn handle_event(event: AgentEvent, service: &MarketService) -> AgentResponse {
    let (status, body) = match answer(&event, service).await {
        Ok(value) => (200, value),
        Err(e) => {
            error!("{} {}: {e}", event.http_method, event.api_path);
            (e.status_code(), json!({ "error": e.to_string() }))
        }
    };

    AgentResponse {
        message_version: MESSAGE_VERSION.to_string(),
        response: ActionResponse {
            action_group: event.action_group,
            api_path: event.api_path,
            http_method: event.http_method,
            http_status_code: status,
            response_body: ResponseBody {
                json: JsonBody {
                    body: body.to_string(),
                },
            },
        },
        session_attributes: event.session_attributes,
        prompt_session_attributes: event.prompt_session_attributes,
    }
}

async fn answer(event: &AgentEvent, service: &MarketService) -> marketdesk_core::Result<Value> {
    if !event.http_method.eq_ignore_ascii_case("GET") {
        return Err(marketdesk_core::Error::InvalidArgument(format!(
            "{} is not supported; every api path is a GET",
            event.http_method
        )));
    }

    let params: HashMap<String, String> = event
        .parameters
        .iter()
        .map(|p| (p.name.clone(), p.value.clone()))
        .collect();
    let endpoint = Endpoint::resolve(&event.api_path, &params)?;
    service.call(&endpoint).await
}

/// Lambda runtime entry point
pub async fn run() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .without_time()
        .init();

    let settings = Settings::from_env()?;
    info!("scraping {} (max {} rows)", settings.site_url, settings.max_rows);
    let service = Arc::new(MarketService::new(&settings)?);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<AgentEvent>| {
        let service = service.clone();
        async move {
            let (request, _context) = event.into_parts();
            Ok::<_, Error>(handle_event(request, &service).await)
        }
    }))
    .await
}
