use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Fixed route of the question endpoint, appended to the configured base
pub const QUESTION_PATH: &str = "/api/question";

/// Failures on the request path. None of these reach the transcript.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection refused, DNS failure, reset, transport timeout
    #[error("request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status
    #[error("endpoint returned status {status}")]
    Status { status: u16 },

    /// Body was not JSON or had no string `reply` field
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Serialize)]
struct QuestionRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct QuestionResponse {
    reply: String,
}

/// Anything that can turn a question into a reply
#[async_trait]
pub trait Responder: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String, ClientError>;
}

#[derive(Clone)]
pub struct QuestionClient {
    client: Client,
    url: String,
}

impl QuestionClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            url: format!("{}{}", base_url.trim_end_matches('/'), QUESTION_PATH),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Responder for QuestionClient {
    async fn ask(&self, question: &str) -> Result<String, ClientError> {
        // .json() sets Content-Type: application/json
        let response = self
            .client
            .post(&self.url)
            .json(&QuestionRequest { question })
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        parse_reply(&body)
    }
}

fn parse_reply(body: &str) -> Result<String, ClientError> {
    let parsed: QuestionResponse =
        serde_json::from_str(body).map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
    Ok(parsed.reply)
}
