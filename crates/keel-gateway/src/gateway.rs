//! Gateway interface and HTTP implementation.

use crate::error::GatewayError;
use crate::prompt;
use crate::wire::{
    AnalysisPayload, ChatMessage, ChatRequest, ChatResponse, JsonSchemaFormat, ResponseFormat,
    analysis_schema,
};
use async_trait::async_trait;
use keel_config::GatewayConfig;
use keel_core::{MAX_PRINCIPLES, Principle, Reflection};
use log::{debug, info, warn};
use std::time::Duration;

/// Advice shown when the model returns an empty synthesis response.
pub const FALLBACK_ADVICE: &str = "No advice came back this time. Re-read the answers you wrote \
     above; they already say what matters to you here.";

/// Schema name sent with the structured analysis request.
const ANALYSIS_SCHEMA_NAME: &str = "principle_analysis";

/// Boundary to the external LLM service.
#[async_trait]
pub trait DecisionGateway: Send + Sync {
    /// Probe a candidate credential with a minimal request.
    ///
    /// True only on a well-formed success response; any transport, auth, or
    /// parse failure yields false. Never returns an error.
    async fn validate_credential(&self, candidate: &str) -> bool;

    /// Rank principles against a situation and generate one reflection
    /// question per matched principle.
    ///
    /// Returned reflections follow the model's order and reference only
    /// principles from the supplied set; an empty result is a valid outcome.
    async fn analyze_situation(
        &self,
        credential: &str,
        situation: &str,
        principles: &[Principle],
    ) -> Result<Vec<Reflection>, GatewayError>;

    /// Synthesize advice from the situation and the answered reflections.
    ///
    /// Callers guarantee every reflection is answered. An empty model
    /// response yields [`FALLBACK_ADVICE`] instead of an error.
    async fn synthesize_advice(
        &self,
        credential: &str,
        situation: &str,
        reflections: &[Reflection],
    ) -> Result<String, GatewayError>;
}

/// Request-level failure, logged at the operation boundary and collapsed
/// into the operation's single user-facing error.
#[derive(Debug, thiserror::Error)]
enum RequestError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("response carried no content")]
    MissingContent,
}

/// HTTP gateway against an OpenAI-compatible endpoint.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    model: String,
    locale: String,
}

impl HttpGateway {
    /// Build a gateway from config; the request timeout is mandatory so a
    /// hung call surfaces as a normal failure instead of freezing the UI.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| GatewayError::Init(err.to_string()))?;
        info!(
            "gateway ready (base_url={}, model={}, locale={}, timeout_secs={})",
            config.base_url, config.model, config.locale, config.timeout_secs
        );
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            locale: config.locale.clone(),
        })
    }

    /// Send a chat request and return the first choice's content.
    async fn post_chat(
        &self,
        credential: &str,
        request: &ChatRequest,
    ) -> Result<String, RequestError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(credential)
            .json(request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status(status.as_u16()));
        }
        let body: ChatResponse = response.json().await?;
        body.text()
            .map(str::to_string)
            .ok_or(RequestError::MissingContent)
    }
}

#[async_trait]
impl DecisionGateway for HttpGateway {
    async fn validate_credential(&self, candidate: &str) -> bool {
        if candidate.trim().is_empty() {
            return false;
        }
        let request = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(candidate)
            .send()
            .await;
        match request {
            Ok(response) if response.status().is_success() => {
                // Well-formed success means a decodable JSON body.
                let ok = response.json::<serde_json::Value>().await.is_ok();
                debug!("credential probe finished (well_formed={ok})");
                ok
            }
            Ok(response) => {
                debug!("credential probe rejected (status={})", response.status());
                false
            }
            Err(err) => {
                debug!("credential probe failed (reason={err})");
                false
            }
        }
    }

    async fn analyze_situation(
        &self,
        credential: &str,
        situation: &str,
        principles: &[Principle],
    ) -> Result<Vec<Reflection>, GatewayError> {
        if credential.trim().is_empty() {
            return Err(GatewayError::MissingCredential);
        }
        if situation.trim().is_empty() {
            return Err(GatewayError::EmptySituation);
        }
        if principles.is_empty() {
            return Err(GatewayError::NoPrinciples);
        }
        if principles.len() > MAX_PRINCIPLES {
            return Err(GatewayError::TooManyPrinciples(MAX_PRINCIPLES));
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompt::analysis_system(&self.locale)),
                ChatMessage::user(prompt::analysis_user(situation, principles)),
            ],
            response_format: Some(ResponseFormat::JsonSchema {
                json_schema: JsonSchemaFormat {
                    name: ANALYSIS_SCHEMA_NAME.to_string(),
                    strict: true,
                    schema: analysis_schema(),
                },
            }),
        };

        let content = self.post_chat(credential, &request).await.map_err(|err| {
            warn!("analysis request failed (reason={err})");
            GatewayError::Analysis
        })?;
        let payload: AnalysisPayload = serde_json::from_str(&content).map_err(|err| {
            warn!("analysis payload malformed (reason={err})");
            GatewayError::Analysis
        })?;
        let reflections = match_reflections(payload, principles);
        info!("analysis completed (reflections={})", reflections.len());
        Ok(reflections)
    }

    async fn synthesize_advice(
        &self,
        credential: &str,
        situation: &str,
        reflections: &[Reflection],
    ) -> Result<String, GatewayError> {
        if credential.trim().is_empty() {
            return Err(GatewayError::MissingCredential);
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompt::synthesis_system(&self.locale)),
                ChatMessage::user(prompt::synthesis_user(situation, reflections)),
            ],
            response_format: None,
        };

        let content = self.post_chat(credential, &request).await.map_err(|err| {
            warn!("synthesis request failed (reason={err})");
            GatewayError::Synthesis
        })?;
        if content.trim().is_empty() {
            info!("synthesis returned empty text, using fallback advice");
            return Ok(FALLBACK_ADVICE.to_string());
        }
        info!("synthesis completed (advice_len={})", content.len());
        Ok(content)
    }
}

/// Join analysis items back to the supplied principles, dropping items whose
/// id matches nothing. The model occasionally invents ids; dropping them
/// silently keeps a partial result usable.
fn match_reflections(payload: AnalysisPayload, principles: &[Principle]) -> Vec<Reflection> {
    let mut reflections = Vec::new();
    for item in payload.analysis {
        match principles
            .iter()
            .find(|principle| principle.id == item.principle_id)
        {
            Some(principle) => {
                reflections.push(Reflection::from_principle(principle, item.reflection_question));
            }
            None => {
                debug!(
                    "dropping analysis item with unknown principle id (principle_id={})",
                    item.principle_id
                );
            }
        }
    }
    reflections
}

#[cfg(test)]
mod tests {
    use super::match_reflections;
    use crate::wire::{AnalysisItem, AnalysisPayload};
    use keel_core::Principle;
    use pretty_assertions::assert_eq;

    fn item(id: &str, question: &str) -> AnalysisItem {
        AnalysisItem {
            principle_id: id.to_string(),
            reflection_question: question.to_string(),
        }
    }

    #[test]
    fn hallucinated_ids_are_dropped() {
        let principles = vec![
            Principle {
                id: "1".to_string(),
                title: "A".to_string(),
                description: String::new(),
            },
            Principle {
                id: "2".to_string(),
                title: "B".to_string(),
                description: String::new(),
            },
        ];
        let payload = AnalysisPayload {
            analysis: vec![item("1", "Q1"), item("9", "Q2")],
        };
        let reflections = match_reflections(payload, &principles);
        assert_eq!(reflections.len(), 1);
        assert_eq!(reflections[0].principle_id, "1");
        assert_eq!(reflections[0].principle_title, "A");
        assert_eq!(reflections[0].question, "Q1");
    }

    #[test]
    fn model_order_is_preserved() {
        let first = Principle::new("A", "");
        let second = Principle::new("B", "");
        let payload = AnalysisPayload {
            analysis: vec![item(&second.id, "Qb"), item(&first.id, "Qa")],
        };
        let reflections = match_reflections(payload, &[first.clone(), second.clone()]);
        assert_eq!(reflections[0].principle_id, second.id);
        assert_eq!(reflections[1].principle_id, first.id);
    }

    #[test]
    fn all_invalid_ids_yield_empty_not_error() {
        let principles = vec![Principle::new("A", "")];
        let payload = AnalysisPayload {
            analysis: vec![item("nope", "Q")],
        };
        assert_eq!(match_reflections(payload, &principles), Vec::new());
    }
}
