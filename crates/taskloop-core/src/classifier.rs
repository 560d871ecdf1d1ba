//! External badge classifier: asks a language model whether a completed
//! task deserves a one-off special badge.
//!
//! Strictly best-effort: callers bound every call with a timeout and
//! treat any error as "no badge". Nothing here may block or fail a
//! completion that has already been recorded.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::badge::{SpecialBadge, UserStats};
use crate::error::ClassifierError;

/// Boxed future type alias used by [`BadgeClassifier`] to keep the trait dyn-compatible.
pub type ClassifyFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ClassifierVerdict, ClassifierError>> + Send + 'a>>;

/// A completion submitted for special-badge review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub task_name: String,
    pub stats: UserStats,
}

/// The classifier's answer.
///
/// Serialized camelCase to match the wire contract
/// (`{"shouldAwardBadge": ..., "badgeData": ...}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierVerdict {
    pub should_award_badge: bool,
    #[serde(default)]
    pub badge_data: Option<SpecialBadge>,
}

/// Decides whether a completion earns a special badge.
pub trait BadgeClassifier: Send + Sync {
    /// Classify one completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (network, auth, malformed
    /// response, etc.). Callers degrade every error to "no badge".
    fn classify(&self, request: &ClassifyRequest) -> ClassifyFuture<'_>;
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "taskloop";

    pub fn get(key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keyring entry holding the OpenRouter API key.
pub const API_KEY_ENTRY: &str = "openrouter_api_key";

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";

const SYSTEM_PROMPT: &str = "You are a badge evaluation system. Analyze if a task completion \
     deserves a special achievement badge based on difficulty, uniqueness, or achievement level. \
     Respond with JSON only.";

/// Classifier backed by the OpenRouter chat-completions API.
pub struct OpenRouterClassifier {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenRouterClassifier {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Build from the API key stored in the OS keyring.
    pub fn from_keyring() -> Result<Self, ClassifierError> {
        let key = keyring_store::get(API_KEY_ENTRY)
            .map_err(|e| ClassifierError::Credential(e.to_string()))?
            .ok_or(ClassifierError::MissingApiKey)?;
        Ok(Self::new(&key))
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Point at a different endpoint (tests use a local mock server).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn request_verdict(
        &self,
        request: &ClassifyRequest,
    ) -> Result<ClassifierVerdict, ClassifierError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt(request) },
            ],
            "temperature": 0.3,
            "max_tokens": 200,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "taskloop")
            .header("X-Title", "Taskloop")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Http { status, body });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::MalformedVerdict(e.to_string()))?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ClassifierError::EmptyResponse)?;

        serde_json::from_str(content.trim())
            .map_err(|e| ClassifierError::MalformedVerdict(e.to_string()))
    }
}

impl BadgeClassifier for OpenRouterClassifier {
    fn classify(&self, request: &ClassifyRequest) -> ClassifyFuture<'_> {
        let request = request.clone();
        Box::pin(async move { self.request_verdict(&request).await })
    }
}

fn user_prompt(request: &ClassifyRequest) -> String {
    indoc::formatdoc! {r#"
        Evaluate if this task deserves a special badge: "{task}". User stats: {completed} completed tasks, {streak} day streak, {points} points.

        If it deserves a badge, respond with:
        {{"shouldAwardBadge": true, "badgeData": {{"name": "Badge Name", "icon": "🏆", "description": "Achievement description"}}}}

        If not, respond with:
        {{"shouldAwardBadge": false}}

        Consider awarding badges for: challenging physical tasks (like walking 10km), exceptional streaks, difficult habits, creative tasks, or significant milestones."#,
        task = request.task_name,
        completed = request.stats.completed_task_count,
        streak = request.stats.current_streak,
        points = request.stats.points,
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}
