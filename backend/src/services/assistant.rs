//! Weather assistant service
//!
//! Supports:
//! - Short clothing/activity tips for the current conditions (cached)
//! - One-line notification text
//! - Predictive alert text for detected transitions
//! - Free-form chat about the weather

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared::{wmo, Prediction, PredictionKind};
use std::collections::HashMap;
use std::sync::Arc;

use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::external::chat::{ChatClient, ChatMessage, ChatRequest};
use crate::services::composer::TextGenerator;

/// Tips are pruned of expired entries once the cache grows past this
const TIP_CACHE_PRUNE_THRESHOLD: usize = 50;

/// Number of earlier chat messages given to the model
const CHAT_HISTORY_LIMIT: usize = 3;

const APOLOGY: &str =
    "I'm having trouble right now, but I'm here to help with any weather questions!";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AssistantMode {
    Initial,
    Notification,
    Prediction,
    Chat,
}

impl AssistantMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "initial" => Some(AssistantMode::Initial),
            "notification" => Some(AssistantMode::Notification),
            "prediction" => Some(AssistantMode::Prediction),
            "chat" => Some(AssistantMode::Chat),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssistantMode::Initial => "initial",
            AssistantMode::Notification => "notification",
            AssistantMode::Prediction => "prediction",
            AssistantMode::Chat => "chat",
        }
    }
}

/// One earlier message of a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryEntry {
    pub text: String,
    #[serde(default)]
    pub is_assistant: bool,
}

/// Assistant request as sent by the mobile app
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRequest {
    pub mode: Option<String>,
    pub weather_code: Option<i32>,
    pub temperature: Option<f64>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub user_message: Option<String>,
    #[serde(default)]
    pub chat_history: Vec<ChatHistoryEntry>,
    pub prediction_type: Option<String>,
    pub current_weather_code: Option<i32>,
    pub current_temperature: Option<f64>,
    pub precipitation_probability: Option<u8>,
}

impl AssistantRequest {
    /// Prediction-mode request describing a detected transition
    pub fn for_prediction(prediction: &Prediction) -> Self {
        let future = &prediction.future_conditions;
        let current = &prediction.current_conditions;
        Self {
            mode: Some(AssistantMode::Prediction.as_str().to_string()),
            weather_code: Some(future.weather_code),
            temperature: Some(future.temperature as f64),
            description: Some(future.description.clone()),
            prediction_type: Some(prediction.kind.as_str().to_string()),
            current_weather_code: Some(current.weather_code),
            current_temperature: Some(current.temperature as f64),
            precipitation_probability: future.precipitation_probability,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssistantResponse {
    pub content: String,
    pub cached: bool,
    pub fallback: bool,
    pub mode: AssistantMode,
}

/// A validated request turned into model input
#[derive(Debug, Clone)]
struct Prompt {
    mode: AssistantMode,
    weather_code: i32,
    cache_key: Option<String>,
    request: ChatRequest,
}

#[derive(Debug, Clone)]
struct CachedTip {
    content: String,
    stored_at: DateTime<Utc>,
}

/// Weather assistant service
#[derive(Clone)]
pub struct AssistantService {
    chat: ChatClient,
    clock: Arc<dyn Clock>,
    tip_ttl: Duration,
    tips: Arc<RwLock<HashMap<String, CachedTip>>>,
}

impl AssistantService {
    pub fn new(chat: ChatClient, clock: Arc<dyn Clock>, tip_ttl: Duration) -> Self {
        Self {
            chat,
            clock,
            tip_ttl,
            tips: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    // ========================================================================
    // Responses
    // ========================================================================

    /// Answer an assistant request.
    ///
    /// Model failures are answered with canned text (`fallback: true`);
    /// only malformed requests are errors.
    pub async fn respond(&self, request: AssistantRequest) -> AppResult<AssistantResponse> {
        let prompt = Prompt::build(&request)?;

        if let Some(content) = prompt.cache_key.as_deref().and_then(|key| self.cached_tip(key)) {
            tracing::debug!("Serving cached weather tip");
            return Ok(AssistantResponse {
                content,
                cached: true,
                fallback: false,
                mode: prompt.mode,
            });
        }

        match self.chat.complete(&prompt.request).await {
            Ok(content) => {
                if let Some(key) = prompt.cache_key {
                    self.store_tip(key, content.clone());
                }
                Ok(AssistantResponse {
                    content,
                    cached: false,
                    fallback: false,
                    mode: prompt.mode,
                })
            }
            Err(e) => {
                tracing::warn!(mode = prompt.mode.as_str(), "AI request failed: {}", e);
                Ok(AssistantResponse {
                    content: fallback_content(prompt.mode, prompt.weather_code).to_string(),
                    cached: false,
                    fallback: true,
                    mode: prompt.mode,
                })
            }
        }
    }

    /// Number of tips currently cached
    pub fn cached_tips(&self) -> usize {
        self.tips.read().len()
    }

    // ========================================================================
    // Tip Cache
    // ========================================================================

    fn cached_tip(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        self.tips
            .read()
            .get(key)
            .filter(|tip| now - tip.stored_at < self.tip_ttl)
            .map(|tip| tip.content.clone())
    }

    fn store_tip(&self, key: String, content: String) {
        let now = self.clock.now();
        let mut tips = self.tips.write();
        tips.insert(
            key,
            CachedTip {
                content,
                stored_at: now,
            },
        );

        if tips.len() > TIP_CACHE_PRUNE_THRESHOLD {
            let ttl = self.tip_ttl;
            tips.retain(|_, tip| now - tip.stored_at <= ttl);
        }
    }
}

#[async_trait]
impl TextGenerator for AssistantService {
    async fn generate(&self, prediction: &Prediction) -> AppResult<String> {
        let prompt = Prompt::build(&AssistantRequest::for_prediction(prediction))?;
        self.chat.complete(&prompt.request).await
    }
}

// ============================================================================
// Prompt Construction
// ============================================================================

impl Prompt {
    fn build(request: &AssistantRequest) -> AppResult<Self> {
        let mode_name = request
            .mode
            .as_deref()
            .ok_or_else(|| AppError::validation("mode", "Missing required fields"))?;
        let weather_code = request
            .weather_code
            .ok_or_else(|| AppError::validation("weatherCode", "Missing required fields"))?;
        let temperature = request
            .temperature
            .ok_or_else(|| AppError::validation("temperature", "Missing required fields"))?;
        let mode = AssistantMode::parse(mode_name)
            .ok_or_else(|| AppError::validation("mode", "Invalid mode"))?;

        let description = request.description.as_deref().unwrap_or("unknown conditions");
        let location = request.location.as_deref().unwrap_or("unknown location");
        let temp = display_temperature(temperature);

        let (system, user) = match mode {
            AssistantMode::Initial => (
                "You are a friendly weather assistant. Give brief, practical advice in exactly 2 lines."
                    .to_string(),
                format!(
                    "Current weather: {}, {}°C, weather code {}, location: {}.\n\n\
                     Give me a brief 2-line suggestion about what to wear and one activity \
                     recommendation or any other tips as a friend.",
                    description, temp, weather_code, location
                ),
            ),
            AssistantMode::Notification => (
                "You are a weather assistant creating push notifications. Be concise, friendly, \
                 and actionable in exactly 1 line."
                    .to_string(),
                format!(
                    "Weather: {}, {}°C, location: {}.\n\n\
                     Create a friendly notification message (1 line) with a helpful suggestion \
                     or weather tip.",
                    description, temp, location
                ),
            ),
            AssistantMode::Prediction => (
                "You are a weather assistant creating predictive alerts. Be helpful, specific, \
                 and actionable in 1 line."
                    .to_string(),
                prediction_prompt(request, description, temperature),
            ),
            AssistantMode::Chat => {
                let message = request
                    .user_message
                    .as_deref()
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .ok_or_else(|| AppError::validation("userMessage", "Message is required"))?;
                (
                    format!(
                        "You are a helpful weather assistant. Current conditions: {}, {}°C ({}).\n\n\
                         You're having a conversation about weather. Be friendly, helpful, and \
                         consider the current weather and location in your responses.",
                        description,
                        temp,
                        wmo::weather_context(weather_code, temperature)
                    ),
                    chat_prompt(&request.chat_history, message),
                )
            }
        };

        let (sampling_temperature, max_tokens) = match mode {
            AssistantMode::Initial => (0.7, 100),
            _ => (0.8, 200),
        };

        Ok(Self {
            mode,
            weather_code,
            cache_key: (mode == AssistantMode::Initial).then(|| tip_cache_key(weather_code, temperature)),
            request: ChatRequest {
                messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
                temperature: sampling_temperature,
                max_tokens,
            },
        })
    }
}

fn prediction_prompt(request: &AssistantRequest, description: &str, temperature: f64) -> String {
    let current_code = request.current_weather_code.unwrap_or_default();
    let current_temperature = request.current_temperature.unwrap_or(temperature);
    let current_context = wmo::weather_context(current_code, current_temperature);
    let kind = request
        .prediction_type
        .as_deref()
        .and_then(PredictionKind::parse);

    match kind {
        Some(PredictionKind::RainStarting) => format!(
            "Rain starting soon: currently {}°C and {}, rain probability rising to {}%. \
             Create an alert with practical advice.",
            display_temperature(current_temperature),
            current_context,
            request.precipitation_probability.unwrap_or_default()
        ),
        Some(PredictionKind::TempDrop) => format!(
            "Temperature dropping from {}°C to {}°C. Create a helpful alert about dressing \
             appropriately.",
            display_temperature(current_temperature),
            display_temperature(temperature)
        ),
        Some(PredictionKind::TempRise) => format!(
            "Temperature rising from {}°C to {}°C. Create a positive alert about the warming \
             weather.",
            display_temperature(current_temperature),
            display_temperature(temperature)
        ),
        _ => format!(
            "Weather changing from {} to {}, {}°C. Create a helpful transition alert.",
            current_context,
            description,
            display_temperature(temperature)
        ),
    }
}

fn chat_prompt(history: &[ChatHistoryEntry], message: &str) -> String {
    let recent = &history[history.len().saturating_sub(CHAT_HISTORY_LIMIT)..];
    let context = recent
        .iter()
        .map(|entry| {
            let speaker = if entry.is_assistant { "Assistant" } else { "User" };
            format!("{}: {}", speaker, entry.text)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Previous conversation:\n{}\n\nUser's new message: {}\n\n\
         Respond naturally, considering the current weather conditions.",
        context, message
    )
}

/// Tips are shared between temperatures in the same 5° bucket
pub fn tip_cache_key(weather_code: i32, temperature: f64) -> String {
    let bucket = ((temperature / 5.0).round() * 5.0) as i64;
    format!("initial:{}:{}", weather_code, bucket)
}

fn display_temperature(temperature: f64) -> i64 {
    temperature.round() as i64
}

/// Canned text used whenever the model cannot answer
pub fn fallback_content(mode: AssistantMode, weather_code: i32) -> &'static str {
    if mode != AssistantMode::Initial {
        return APOLOGY;
    }

    if wmo::is_rain(weather_code) {
        "Looks like rain! Grab an umbrella and wear a light jacket.\n\
         Perfect weather for a cozy indoor day with hot coffee."
    } else if wmo::is_snow(weather_code) {
        "Snow day! Bundle up in warm layers and waterproof boots.\n\
         Great time for hot chocolate or building a snowman."
    } else if weather_code == 0 || weather_code == 1 {
        "Beautiful sunny weather! Light clothing and sunglasses recommended.\n\
         Perfect for a walk in the park or outdoor activities."
    } else {
        "Check the current conditions and dress accordingly.\n\
         Good day to plan activities based on the weather."
    }
}
