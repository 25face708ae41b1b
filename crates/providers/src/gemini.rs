use anyhow::{anyhow, Context, Result};
use futures::StreamExt;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::agent_api::{ChatMessage, StreamChunk};
use shared::settings::GatewaySettings;
use std::env;
use tokio::sync::mpsc::UnboundedSender;

use crate::sse::SseParser;

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl GeminiPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, base64_data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: base64_data.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

/// Error object the service returns in place of candidates, both as a whole
/// body and as a single SSE frame mid-stream.
#[derive(Debug, Deserialize)]
struct GeminiApiError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    error: Option<GeminiApiError>,
}

impl GeminiResponse {
    fn into_result(mut self) -> Result<Self> {
        match self.error.take() {
            Some(e) => Err(anyhow!("gemini error: {} {} {}", e.code, e.status, e.message)),
            None => Ok(self),
        }
    }

    fn first_parts(&self) -> &[GeminiPart] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[])
    }

    /// Concatenated text of the first candidate.
    fn text(&self) -> String {
        self.first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect()
    }

    fn inline_image(&self) -> Option<&InlineData> {
        self.first_parts().iter().find_map(|p| p.inline_data.as_ref())
    }
}

fn to_gemini_contents(messages: Vec<ChatMessage>) -> Vec<GeminiContent> {
    messages
        .into_iter()
        .map(|m| GeminiContent {
            role: Some(m.role.as_str().to_string()),
            parts: vec![GeminiPart::text(m.content)],
        })
        .collect()
}

/// Decode the reply of a structured-output call into `T`.
fn decode_json<T: DeserializeOwned>(body: GeminiResponse) -> Result<T> {
    let body = body.into_result()?;
    let text = body.text();
    let text = text.trim();
    if text.is_empty() {
        return Err(anyhow!("gemini returned no content"));
    }
    serde_json::from_str(text).context("response did not match schema")
}

fn decode_image(body: GeminiResponse) -> Result<String> {
    body.into_result()?
        .inline_image()
        .map(|img| img.data.clone())
        .ok_or_else(|| anyhow!("image generation failed: no image part"))
}

/// Transport errors carry the request URL; keep it out of logs and detail.
fn transport(e: reqwest::Error) -> anyhow::Error {
    anyhow::Error::new(e.without_url())
}

async fn error_for_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let detail: String = body.trim().chars().take(800).collect();
    if detail.is_empty() {
        return Err(anyhow!("gemini error: {}", status));
    }
    Err(anyhow!("gemini error: {}\n{}", status, detail))
}

// ── Client ───────────────────────────────────────────────────────────

pub struct GeminiClient {
    http: Client,
    auth_token: String,
    text_model: String,
    image_model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn from_settings(settings: &GatewaySettings) -> Result<Self> {
        let auth_token = match &settings.api_key {
            Some(key) => key.clone(),
            None => env::var("GEMINI_API_KEY")
                .or_else(|_| env::var("API_KEY"))
                .map_err(|_| anyhow!("GEMINI_API_KEY not set"))?,
        };

        Ok(Self {
            http: Client::builder().pool_max_idle_per_host(4).build()?,
            auth_token,
            text_model: settings.text_model.clone(),
            image_model: settings.image_model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, model, method)
    }

    /// The key travels in a header so it never appears in a URL.
    fn post(&self, url: String) -> RequestBuilder {
        self.http.post(url).header("x-goog-api-key", &self.auth_token)
    }

    /// One-shot request whose reply must be JSON matching `schema`.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        parts: Vec<GeminiPart>,
        schema: serde_json::Value,
    ) -> Result<T> {
        let req = GeminiRequest {
            contents: vec![GeminiContent { role: None, parts }],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema),
                response_modalities: None,
            }),
        };
        let resp = self
            .post(self.url(&self.text_model, "generateContent"))
            .json(&req)
            .send()
            .await
            .map_err(transport)?;
        let body: GeminiResponse = error_for_status(resp)
            .await?
            .json()
            .await
            .map_err(transport)?;
        decode_json(body)
    }

    /// Generate a single image; returns its base64 payload.
    pub async fn generate_image(&self, prompt: &str) -> Result<String> {
        let req = GeminiRequest {
            contents: vec![GeminiContent {
                role: None,
                parts: vec![GeminiPart::text(prompt)],
            }],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string()]),
                ..Default::default()
            }),
        };
        let resp = self
            .post(self.url(&self.image_model, "generateContent"))
            .json(&req)
            .send()
            .await
            .map_err(transport)?;
        let body: GeminiResponse = error_for_status(resp)
            .await?
            .json()
            .await
            .map_err(transport)?;
        decode_image(body)
    }

    /// Streaming chat turn.
    ///
    /// Contract: failures before the stream opens are returned as `Err`. Once
    /// chunks are flowing, errors go through `StreamChunk::Error` and the
    /// method returns `Ok(())`. `Done` is sent after a clean finish that
    /// carried some text; a stream that ends without any is an error.
    pub async fn generate_stream(
        &self,
        system: &str,
        messages: Vec<ChatMessage>,
        tx: UnboundedSender<StreamChunk>,
    ) -> Result<()> {
        let req = GeminiRequest {
            contents: to_gemini_contents(messages),
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart::text(system)],
            }),
            generation_config: None,
        };
        let url = format!("{}?alt=sse", self.url(&self.text_model, "streamGenerateContent"));
        let resp = self.post(url).json(&req).send().await.map_err(transport)?;
        let resp = error_for_status(resp).await?;

        let mut parser = SseParser::new();
        let mut stream = resp.bytes_stream();
        let mut replied = false;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    let detail = format!("stream read error: {}", e.without_url());
                    let _ = tx.send(StreamChunk::Error(detail));
                    return Ok(());
                }
            };
            for frame in parser.feed(&bytes) {
                match forward_frame(&frame, &tx) {
                    Frame::Text => replied = true,
                    Frame::Empty => {}
                    Frame::Failed => return Ok(()),
                }
            }
        }
        if let Some(frame) = parser.finish() {
            match forward_frame(&frame, &tx) {
                Frame::Text => replied = true,
                Frame::Empty => {}
                Frame::Failed => return Ok(()),
            }
        }

        let last = if replied {
            StreamChunk::Done
        } else {
            StreamChunk::Error("gemini returned no content".to_string())
        };
        let _ = tx.send(last);
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Frame {
    Text,
    /// Metadata only, e.g. the closing frame with `finishReason`.
    Empty,
    /// An error was sent; the stream must stop.
    Failed,
}

fn forward_frame(frame: &str, tx: &UnboundedSender<StreamChunk>) -> Frame {
    let resp = match serde_json::from_str::<GeminiResponse>(frame) {
        Ok(resp) => resp,
        Err(e) => {
            let _ = tx.send(StreamChunk::Error(format!("unreadable stream frame: {}", e)));
            return Frame::Failed;
        }
    };
    match resp.into_result() {
        Ok(resp) => {
            let text = resp.text();
            if text.is_empty() {
                return Frame::Empty;
            }
            let _ = tx.send(StreamChunk::Text(text));
            Frame::Text
        }
        Err(e) => {
            let _ = tx.send(StreamChunk::Error(e.to_string()));
            Frame::Failed
        }
    }
}
