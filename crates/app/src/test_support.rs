//! Scripted gateway and fixtures for controller tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use providers::EcoGateway;
use services::geolocation::DeviceLocation;
use shared::agent_api::{ChatMessage, StreamChunk};
use shared::error::EcoError;
use shared::language::LanguageCode;
use shared::waste::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

use crate::state::AppContext;

/// Base64 returned for any image prompt without a scripted outcome.
pub const DEFAULT_IMAGE: &str = "aW1n";

pub enum ChatScript {
    Reply(Vec<String>),
    /// Some text, then an in-stream error.
    BreakAfter(Vec<String>),
    /// The call itself fails before anything streams.
    Refuse,
}

pub struct MockGateway {
    pub shops: Result<Vec<Shop>, EcoError>,
    pub waste: Result<WasteInfo, EcoError>,
    pub alternatives: Result<EcoAlternativesResponse, EcoError>,
    pub disposal: Result<DisposalGuide, EcoError>,
    pub diy: Result<DiyProject, EcoError>,
    /// Prompt -> (delay ms, Some(base64) or None for failure).
    pub images: HashMap<String, (u64, Option<String>)>,
    pub chat: ChatScript,
    /// Delay before the chat stream opens.
    pub chat_delay_ms: u64,
    /// Delay before any structured reply.
    pub primary_delay_ms: u64,
    pub calls: Mutex<Vec<&'static str>>,
    pub shop_queries: Mutex<Vec<(String, GeoPoint, LanguageCode)>>,
    pub chat_histories: Mutex<Vec<Vec<ChatMessage>>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self {
            shops: Ok(sample_shops()),
            waste: Ok(sample_waste()),
            alternatives: Ok(sample_alternatives()),
            disposal: Ok(sample_disposal()),
            diy: Ok(sample_diy()),
            images: HashMap::new(),
            chat: ChatScript::Reply(vec!["Rinse it, ".into(), "then recycle.".into()]),
            chat_delay_ms: 0,
            primary_delay_ms: 0,
            calls: Mutex::new(Vec::new()),
            shop_queries: Mutex::new(Vec::new()),
            chat_histories: Mutex::new(Vec::new()),
        }
    }
}

impl MockGateway {
    pub fn with_image(mut self, prompt: &str, delay_ms: u64, result: Option<&str>) -> Self {
        self.images
            .insert(prompt.to_string(), (delay_ms, result.map(str::to_string)));
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls.lock().iter().filter(|c| **c == op).count()
    }

    fn record(&self, op: &'static str) {
        self.calls.lock().push(op);
    }

    async fn pause(&self) {
        if self.primary_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.primary_delay_ms)).await;
        }
    }
}

#[async_trait]
impl EcoGateway for MockGateway {
    async fn search_shops(
        &self,
        waste_type: &str,
        location: GeoPoint,
        language: LanguageCode,
    ) -> Result<Vec<Shop>, EcoError> {
        self.record("search_shops");
        self.pause().await;
        self.shop_queries
            .lock()
            .push((waste_type.to_string(), location, language));
        self.shops.clone()
    }

    async fn identify_waste(
        &self,
        _image: &ImageUpload,
        _language: LanguageCode,
    ) -> Result<WasteInfo, EcoError> {
        self.record("identify_waste");
        self.pause().await;
        self.waste.clone()
    }

    async fn find_alternatives(
        &self,
        _input: &AnalysisInput,
        _location: GeoPoint,
        _language: LanguageCode,
    ) -> Result<EcoAlternativesResponse, EcoError> {
        self.record("find_alternatives");
        self.pause().await;
        self.alternatives.clone()
    }

    async fn disposal_guide(
        &self,
        _input: &AnalysisInput,
        _language: LanguageCode,
    ) -> Result<DisposalGuide, EcoError> {
        self.record("disposal_guide");
        self.pause().await;
        self.disposal.clone()
    }

    async fn diy_project(
        &self,
        _input: &AnalysisInput,
        _language: LanguageCode,
    ) -> Result<DiyProject, EcoError> {
        self.record("diy_project");
        self.pause().await;
        self.diy.clone()
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, EcoError> {
        self.record("generate_image");
        let (delay, result) = self
            .images
            .get(prompt)
            .cloned()
            .unwrap_or((0, Some(DEFAULT_IMAGE.to_string())));
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        result.ok_or_else(|| EcoError::image("scripted failure"))
    }

    async fn stream_chat(
        &self,
        _language: LanguageCode,
        history: Vec<ChatMessage>,
        tx: UnboundedSender<StreamChunk>,
    ) -> Result<(), EcoError> {
        self.record("stream_chat");
        self.chat_histories.lock().push(history);
        if self.chat_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.chat_delay_ms)).await;
        }
        match &self.chat {
            ChatScript::Reply(chunks) => {
                for c in chunks {
                    let _ = tx.send(StreamChunk::Text(c.clone()));
                }
                let _ = tx.send(StreamChunk::Done);
                Ok(())
            }
            ChatScript::BreakAfter(chunks) => {
                for c in chunks {
                    let _ = tx.send(StreamChunk::Text(c.clone()));
                }
                let _ = tx.send(StreamChunk::Error("connection reset".into()));
                Ok(())
            }
            ChatScript::Refuse => Err(EcoError::service("scripted refusal")),
        }
    }
}

pub fn here() -> GeoPoint {
    GeoPoint::new(12.97, 77.59)
}

/// Context over `gateway` with a granted location.
pub fn context(gateway: Arc<MockGateway>) -> AppContext {
    context_with_location(gateway, DeviceLocation::Granted(here()))
}

pub fn context_with_location(gateway: Arc<MockGateway>, location: DeviceLocation) -> AppContext {
    AppContext::new(gateway, Arc::new(location))
}

pub fn sample_shops() -> Vec<Shop> {
    vec![
        Shop {
            name: "Green Kabadi".into(),
            waste_types: vec!["plastic".into(), "paper".into()],
            phone: "+91 98450 00000".into(),
            address: "12 MG Road, Bengaluru".into(),
            location: "https://maps.google.com/?q=12+MG+Road".into(),
        },
        Shop {
            name: "Metal Mart".into(),
            waste_types: vec!["metal".into()],
            phone: "+91 98450 11111".into(),
            address: "4 Church Street, Bengaluru".into(),
            location: "https://maps.google.com/?q=4+Church+Street".into(),
        },
    ]
}

pub fn sample_waste() -> WasteInfo {
    WasteInfo {
        classification: Classification::NonBiodegradable,
        explanation: "PET plastic does not break down naturally.".into(),
        waste_category: "plastic".into(),
    }
}

fn alternative(name: &str, prompt: &str) -> AlternativeProduct {
    AlternativeProduct {
        name: name.into(),
        description: format!("A reusable {}", name),
        image_prompt: prompt.into(),
        degradation_time: "N/A (reusable)".into(),
        material: "steel".into(),
        buy_link: "https://example.org/buy".into(),
        shops: vec![],
        image: ImageState::Pending,
    }
}

pub fn sample_alternatives() -> EcoAlternativesResponse {
    EcoAlternativesResponse {
        original_product: OriginalProductInfo {
            name: "Plastic straw".into(),
            classification: Classification::NonBiodegradable,
            material: "polypropylene".into(),
            degradation_time: "200 years".into(),
            description: "Single-use drinking straw.".into(),
        },
        alternatives: vec![
            alternative("Steel straw", "p1"),
            alternative("Bamboo straw", "p2"),
            alternative("Glass straw", "p3"),
        ],
    }
}

pub fn sample_disposal() -> DisposalGuide {
    DisposalGuide {
        item_name: "plastic bottle".into(),
        steps: vec![
            "Empty the bottle.".into(),
            "Rinse it with water.".into(),
            "Crush it flat.".into(),
            "Put it in the dry waste bin.".into(),
        ],
        safety_warnings: vec![],
    }
}

pub fn sample_diy() -> DiyProject {
    let step = |n: u32, prompt: &str| DiyStep {
        step: n,
        instruction: format!("Step {}", n),
        image_prompt: prompt.into(),
        image: ImageState::Pending,
    };
    DiyProject {
        title: "Bottle planter".into(),
        description: "Grow herbs in an old bottle.".into(),
        materials: vec!["plastic bottle".into(), "soil".into()],
        steps: vec![step(1, "cut"), step(2, "fill"), step(3, "plant")],
    }
}

pub fn upload() -> ImageUpload {
    ImageUpload::new(vec![0xff, 0xd8, 0xff], "image/jpeg")
}
