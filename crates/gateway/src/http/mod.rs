use std::env;

use async_trait::async_trait;
use interview_core::model::{Feedback, Question, QuestionId, SessionId};
use log::debug;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use url::Url;

use crate::collaborators::{AnswerScorer, CompletionReporter, GatewayError, QuestionSource};

mod mapping;

use mapping::{AnswerPayload, decode_feedback, decode_questions};

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Where the interview backend lives.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    base_url: Url,
}

impl ApiConfig {
    /// # Errors
    ///
    /// Returns `GatewayError::Decode` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let parsed = Url::parse(base_url.trim())
            .map_err(|e| GatewayError::Decode(format!("invalid api base url {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::Decode(format!(
                "api base url must be http or https: {base_url}"
            )));
        }
        Ok(Self { base_url: parsed })
    }

    /// Read `INTERVIEW_API_BASE`, falling back to [`DEFAULT_API_BASE`].
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Decode` if the configured URL is invalid.
    pub fn from_env() -> Result<Self, GatewayError> {
        let base = env::var("INTERVIEW_API_BASE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.into());
        Self::new(&base)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

/// Caller identity, passed in explicitly rather than read from ambient storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub token: Option<String>,
    pub role: Option<String>,
    pub user_id: Option<u64>,
}

impl AuthContext {
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Read `INTERVIEW_TOKEN`, `INTERVIEW_ROLE` and `INTERVIEW_USER_ID`.
    #[must_use]
    pub fn from_env() -> Self {
        let non_empty = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            token: non_empty("INTERVIEW_TOKEN"),
            role: non_empty("INTERVIEW_ROLE"),
            user_id: non_empty("INTERVIEW_USER_ID").and_then(|v| v.trim().parse().ok()),
        }
    }
}

/// Collaborators backed by the interview REST API.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    config: ApiConfig,
    auth: AuthContext,
}

impl HttpGateway {
    #[must_use]
    pub fn new(config: ApiConfig, auth: AuthContext) -> Self {
        Self {
            client: Client::new(),
            config,
            auth,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        debug!("{method} {url}");
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        match self.auth.token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<String, GatewayError> {
        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(classify_status(status, &body))
        }
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

/// Map a non-success response to a gateway error.
fn classify_status(status: StatusCode, body: &str) -> GatewayError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized,
        StatusCode::NOT_FOUND => GatewayError::NotFound,
        _ => {
            let message = if body.trim().is_empty() {
                format!("request failed with {}", status.as_u16())
            } else {
                body.trim().to_string()
            };
            GatewayError::Rejected {
                status: status.as_u16(),
                message,
            }
        }
    }
}

#[async_trait]
impl QuestionSource for HttpGateway {
    async fn fetch_questions(&self, session_id: SessionId) -> Result<Vec<Question>, GatewayError> {
        let path = format!("/api/interviews/{session_id}/questions");
        let body = self.send(self.request(Method::GET, &path)).await?;
        decode_questions(&body)
    }
}

#[async_trait]
impl AnswerScorer for HttpGateway {
    async fn submit_answer(
        &self,
        question_id: QuestionId,
        answer: &str,
    ) -> Result<Feedback, GatewayError> {
        let path = format!("/api/interview-questions/{question_id}/answer");
        let builder = self
            .request(Method::POST, &path)
            .json(&AnswerPayload { answer });
        let body = self.send(builder).await?;
        decode_feedback(&body)
    }
}

#[async_trait]
impl CompletionReporter for HttpGateway {
    async fn complete_session(&self, session_id: SessionId) -> Result<(), GatewayError> {
        let path = format!("/api/interviews/{session_id}/complete");
        self.send(self.request(Method::POST, &path)).await?;
        Ok(())
    }
}
