//! Result types returned by the gateway, plus the inputs that produce them.
//!
//! Field names on the wire follow the camelCase response schemas. Every
//! result is immutable after receipt except the per-item [`ImageState`] of
//! enrichable items (DIY steps and alternative products).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Device coordinates in floating-point degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// An uploaded photo, kept as raw bytes until it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Preview URI for showing the selected file before submission.
    pub fn preview_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// What the user asked about: either typed text or a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisInput {
    Text(String),
    Image(ImageUpload),
}

/// Tri-state image slot of an enrichable item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageState {
    #[default]
    Pending,
    /// Displayable data URI.
    Loaded(String),
    Failed,
}

impl ImageState {
    pub fn from_base64(data: &str) -> Self {
        ImageState::Loaded(format!("{}{}", PNG_DATA_URI_PREFIX, data))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ImageState::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    pub fn data_uri(&self) -> Option<&str> {
        match self {
            ImageState::Loaded(uri) => Some(uri),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Biodegradable,
    #[serde(rename = "Non-biodegradable")]
    NonBiodegradable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub name: String,
    pub waste_types: Vec<String>,
    pub phone: String,
    pub address: String,
    /// Maps link for the address.
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteInfo {
    pub classification: Classification,
    pub explanation: String,
    pub waste_category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalProductInfo {
    pub name: String,
    pub classification: Classification,
    pub material: String,
    pub degradation_time: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeShop {
    pub name: String,
    pub location: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeProduct {
    pub name: String,
    pub description: String,
    pub image_prompt: String,
    pub degradation_time: String,
    pub material: String,
    pub buy_link: String,
    #[serde(default)]
    pub shops: Vec<AlternativeShop>,
    #[serde(skip)]
    pub image: ImageState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoAlternativesResponse {
    pub original_product: OriginalProductInfo,
    pub alternatives: Vec<AlternativeProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisposalGuide {
    pub item_name: String,
    pub steps: Vec<String>,
    #[serde(default)]
    pub safety_warnings: Vec<String>,
}

impl DisposalGuide {
    pub fn has_warnings(&self) -> bool {
        !self.safety_warnings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiyStep {
    pub step: u32,
    pub instruction: String,
    pub image_prompt: String,
    #[serde(skip)]
    pub image: ImageState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiyProject {
    pub title: String,
    pub description: String,
    pub materials: Vec<String>,
    pub steps: Vec<DiyStep>,
}
