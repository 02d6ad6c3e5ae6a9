//! HTTP judging service client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use gavel_core::error::JudgeError;
use gavel_core::model::{Judge, JudgeDecision, Submission, Verdict};
use gavel_core::traits::JudgingCapability;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the remote judging service.
#[derive(Debug, Clone)]
pub struct JudgingConfig {
    /// Service base URL, e.g. `https://judging.example.com`.
    pub base_url: String,
    /// Bearer token; falls back to the `GAVEL_API_KEY` environment variable
    /// when absent.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl JudgingConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: std::env::var("GAVEL_API_KEY").ok(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Judging capability backed by a remote HTTP service.
///
/// POSTs the submission and judge to `{base_url}/v1/judgments` and parses
/// the verdict out of the response.
pub struct HttpJudgeClient {
    config: JudgingConfig,
    client: reqwest::Client,
}

impl HttpJudgeClient {
    pub fn new(config: JudgingConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build HTTP client");
        Self { config, client }
    }
}

#[derive(Serialize)]
struct JudgmentRequest<'a> {
    submission: &'a Submission,
    judge: &'a Judge,
}

#[derive(Deserialize)]
struct JudgmentResponse {
    verdict: String,
    #[serde(default)]
    rationale: Option<String>,
}

#[async_trait]
impl JudgingCapability for HttpJudgeClient {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, submission, judge), fields(submission = %submission.id, judge = %judge.id))]
    async fn invoke(
        &self,
        submission: &Submission,
        judge: &Judge,
    ) -> Result<JudgeDecision, JudgeError> {
        let mut request = self
            .client
            .post(format!("{}/v1/judgments", self.config.base_url))
            .header("content-type", "application/json");
        if let Some(key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request
            .json(&JudgmentRequest { submission, judge })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    JudgeError::Timeout(self.config.timeout_secs)
                } else {
                    JudgeError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after_ms = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(JudgeError::RateLimited { retry_after_ms });
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::AuthenticationFailed(body));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::Api {
                status,
                message: body,
            });
        }

        let body: JudgmentResponse = response.json().await.map_err(|e| JudgeError::Api {
            status,
            message: format!("failed to parse response: {e}"),
        })?;

        let verdict: Verdict = body
            .verdict
            .parse()
            .map_err(|_| JudgeError::MalformedVerdict(body.verdict.clone()))?;

        Ok(JudgeDecision {
            verdict,
            rationale: body.rationale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn submission() -> Submission {
        Submission {
            id: "s1".into(),
            content: serde_json::json!({"text": "the quick brown fox"}),
            metadata: serde_json::Value::Null,
            created_at: Utc::now(),
        }
    }

    fn judge() -> Judge {
        Judge {
            id: "j1".into(),
            name: "Accuracy".into(),
            criteria: "Is the content accurate?".into(),
            active: true,
        }
    }

    fn client_for(server: &MockServer) -> HttpJudgeClient {
        HttpJudgeClient::new(JudgingConfig {
            base_url: server.uri(),
            api_key: Some("test-key".into()),
            timeout_secs: 5,
        })
    }

    #[tokio::test]
    async fn successful_judgment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/judgments"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "verdict": "pass",
                "rationale": "content is accurate"
            })))
            .mount(&server)
            .await;

        let decision = client_for(&server)
            .invoke(&submission(), &judge())
            .await
            .unwrap();
        assert_eq!(decision.verdict, Verdict::Pass);
        assert_eq!(decision.rationale.as_deref(), Some("content is accurate"));
    }

    #[tokio::test]
    async fn rationale_is_optional() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/judgments"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"verdict": "inconclusive"})),
            )
            .mount(&server)
            .await;

        let decision = client_for(&server)
            .invoke(&submission(), &judge())
            .await
            .unwrap();
        assert_eq!(decision.verdict, Verdict::Inconclusive);
        assert!(decision.rationale.is_none());
    }

    #[tokio::test]
    async fn unknown_verdict_is_malformed_and_permanent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/judgments"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"verdict": "excellent"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .invoke(&submission(), &judge())
            .await
            .unwrap_err();
        assert!(matches!(err, JudgeError::MalformedVerdict(ref v) if v == "excellent"));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn rate_limit_carries_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/judgments"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "2"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .invoke(&submission(), &judge())
            .await
            .unwrap_err();
        assert_eq!(err.retry_after_ms(), Some(2000));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn auth_failure_is_permanent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/judgments"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .invoke(&submission(), &judge())
            .await
            .unwrap_err();
        assert!(matches!(err, JudgeError::AuthenticationFailed(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn server_error_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/judgments"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .invoke(&submission(), &judge())
            .await
            .unwrap_err();
        assert!(matches!(err, JudgeError::Api { status: 503, .. }));
        assert!(err.is_transient());
    }
}
