//! Typed operations over the generative-AI service.
//!
//! Every failure, whatever its cause, leaves this module as
//! [`EcoError::ServiceUnavailable`] (or [`EcoError::ImageGeneration`] for the
//! per-item image call). The underlying detail is logged here and nowhere
//! else. Calls are single-shot: nothing is retried.

use async_trait::async_trait;
use shared::agent_api::{ChatMessage, StreamChunk};
use shared::error::EcoError;
use shared::language::LanguageCode;
use shared::settings::GatewaySettings;
use shared::waste::{
    AnalysisInput, DisposalGuide, DiyProject, EcoAlternativesResponse, GeoPoint, ImageUpload,
    Shop, WasteInfo,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::gemini::{GeminiClient, GeminiPart};
use crate::{prompts, schemas};

#[async_trait]
pub trait EcoGateway: Send + Sync {
    async fn search_shops(
        &self,
        waste_type: &str,
        location: GeoPoint,
        language: LanguageCode,
    ) -> Result<Vec<Shop>, EcoError>;

    async fn identify_waste(
        &self,
        image: &ImageUpload,
        language: LanguageCode,
    ) -> Result<WasteInfo, EcoError>;

    async fn find_alternatives(
        &self,
        input: &AnalysisInput,
        location: GeoPoint,
        language: LanguageCode,
    ) -> Result<EcoAlternativesResponse, EcoError>;

    async fn disposal_guide(
        &self,
        input: &AnalysisInput,
        language: LanguageCode,
    ) -> Result<DisposalGuide, EcoError>;

    async fn diy_project(
        &self,
        input: &AnalysisInput,
        language: LanguageCode,
    ) -> Result<DiyProject, EcoError>;

    /// Generate one image from a textual prompt; returns base64 bytes.
    async fn generate_image(&self, prompt: &str) -> Result<String, EcoError>;

    /// Stream a reply to `history`, whose last entry is the new user message.
    /// Failures after the stream opens arrive as `StreamChunk::Error`.
    async fn stream_chat(
        &self,
        language: LanguageCode,
        history: Vec<ChatMessage>,
        tx: UnboundedSender<StreamChunk>,
    ) -> Result<(), EcoError>;
}

/// Build request parts for text-or-image input.
///
/// `subject` names the thing the user supplied ("the product", "a waste item").
pub fn input_parts(input: &AnalysisInput, subject: &str, prompt: String) -> Vec<GeminiPart> {
    match input {
        AnalysisInput::Text(text) => vec![GeminiPart::text(format!(
            "{} {}",
            prompts::text_lead(subject, text.trim()),
            prompt
        ))],
        AnalysisInput::Image(upload) => vec![
            GeminiPart::inline(upload.mime_type.clone(), upload.to_base64()),
            GeminiPart::text(format!("{} {}", prompts::image_lead(subject), prompt)),
        ],
    }
}

fn unavailable(operation: &'static str) -> impl FnOnce(anyhow::Error) -> EcoError {
    move |e| {
        warn!(operation, error = %e, "gateway call failed");
        EcoError::service(e.to_string())
    }
}

pub struct GeminiGateway {
    client: GeminiClient,
}

impl GeminiGateway {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    pub fn from_settings(settings: &GatewaySettings) -> anyhow::Result<Self> {
        Ok(Self::new(GeminiClient::from_settings(settings)?))
    }
}

#[async_trait]
impl EcoGateway for GeminiGateway {
    async fn search_shops(
        &self,
        waste_type: &str,
        location: GeoPoint,
        language: LanguageCode,
    ) -> Result<Vec<Shop>, EcoError> {
        debug!(waste_type, %language, "searching shops");
        let parts = vec![GeminiPart::text(prompts::shops(waste_type, location, language))];
        self.client
            .generate_json(parts, schemas::shop_list())
            .await
            .map_err(unavailable("search_shops"))
    }

    async fn identify_waste(
        &self,
        image: &ImageUpload,
        language: LanguageCode,
    ) -> Result<WasteInfo, EcoError> {
        debug!(mime = %image.mime_type, bytes = image.bytes.len(), "identifying waste");
        let parts = vec![
            GeminiPart::inline(image.mime_type.clone(), image.to_base64()),
            GeminiPart::text(prompts::identify_waste(language)),
        ];
        self.client
            .generate_json(parts, schemas::waste_info())
            .await
            .map_err(unavailable("identify_waste"))
    }

    async fn find_alternatives(
        &self,
        input: &AnalysisInput,
        location: GeoPoint,
        language: LanguageCode,
    ) -> Result<EcoAlternativesResponse, EcoError> {
        debug!(%language, "finding eco alternatives");
        let parts = input_parts(input, "the product", prompts::alternatives(location, language));
        self.client
            .generate_json(parts, schemas::eco_alternatives())
            .await
            .map_err(unavailable("find_alternatives"))
    }

    async fn disposal_guide(
        &self,
        input: &AnalysisInput,
        language: LanguageCode,
    ) -> Result<DisposalGuide, EcoError> {
        debug!(%language, "requesting disposal guide");
        let parts = input_parts(input, "a waste item", prompts::disposal(language));
        self.client
            .generate_json(parts, schemas::disposal_guide())
            .await
            .map_err(unavailable("disposal_guide"))
    }

    async fn diy_project(
        &self,
        input: &AnalysisInput,
        language: LanguageCode,
    ) -> Result<DiyProject, EcoError> {
        debug!(%language, "requesting DIY project");
        let parts = input_parts(input, "a waste item", prompts::diy(language));
        self.client
            .generate_json(parts, schemas::diy_project())
            .await
            .map_err(unavailable("diy_project"))
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, EcoError> {
        self.client
            .generate_image(&prompts::product_image(prompt))
            .await
            .map_err(|e| {
                warn!(error = %e, "image generation failed");
                EcoError::image(e.to_string())
            })
    }

    async fn stream_chat(
        &self,
        language: LanguageCode,
        history: Vec<ChatMessage>,
        tx: UnboundedSender<StreamChunk>,
    ) -> Result<(), EcoError> {
        debug!(%language, turns = history.len(), "streaming chat reply");
        self.client
            .generate_stream(&prompts::chat_system(language), history, tx)
            .await
            .map_err(unavailable("stream_chat"))
    }
}
