//! Page controllers.
//!
//! Each feature page owns its input, status and result, and drives one
//! gateway call per submission:
//!
//! ```text
//! Idle -> (validate) -> LoadingPrimary -> Ready [-> LoadingImages -> Ready]
//!                     \-> Error                  \-> Error
//! ```
//!
//! Validation failures never reach the gateway. Supplying new input or
//! submitting again discards the previous result; nothing is cancelled, so a
//! late image patch for a discarded result is simply dropped.

pub mod alternatives;
pub mod disposal;
pub mod diy;
pub mod find_shops;
pub mod home;
pub mod identify;
pub mod rewards;

use parking_lot::RwLock;
use services::enrichment::{spawn_enrichment, EnrichmentReport};
use services::result_slot::{Enrichable, ResultSlot};
use shared::error::EcoError;
use shared::events::ScoreEvent;
use shared::waste::{AnalysisInput, GeoPoint, ImageUpload, Shop};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::i18n::Translator;
use crate::state::AppContext;

pub use alternatives::EcoAlternativesPage;
pub use disposal::DisposalGuidePage;
pub use diy::DiyProjectsPage;
pub use find_shops::FindShopsPage;
pub use identify::IdentifyWastePage;
pub use rewards::RewardsView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    FindShops,
    IdentifyWaste,
    Alternatives,
    Disposal,
    Diy,
    Rewards,
}

impl Page {
    pub fn all() -> &'static [Page] {
        &[
            Page::Home,
            Page::FindShops,
            Page::IdentifyWaste,
            Page::Alternatives,
            Page::Disposal,
            Page::Diy,
            Page::Rewards,
        ]
    }

    pub fn nav_key(&self) -> &'static str {
        match self {
            Page::Home => "nav_home",
            Page::FindShops => "nav_find_shops",
            Page::IdentifyWaste => "nav_identify_waste",
            Page::Alternatives => "nav_alternatives",
            Page::Disposal => "nav_disposal_guide",
            Page::Diy => "nav_diy_projects",
            Page::Rewards => "nav_rewards",
        }
    }
}

/// Stored status of a page's primary request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(EcoError),
}

impl PageStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, PageStatus::Loading)
    }

    pub fn error(&self) -> Option<&EcoError> {
        match self {
            PageStatus::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// A page's status behind a shared handle.
///
/// `submit` borrows its page mutably until the gateway answers, so a front end
/// keeps a clone of this handle to render `Loading` in the meantime.
#[derive(Debug, Clone, Default)]
pub struct StatusCell(Arc<RwLock<PageStatus>>);

impl StatusCell {
    pub fn get(&self) -> PageStatus {
        self.0.read().clone()
    }

    pub(crate) fn set(&self, status: PageStatus) {
        *self.0.write() = status;
    }
}

/// What a front end should render right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingPrimary,
    /// Primary result shown, some item images still pending.
    LoadingImages,
    Ready,
    Error,
}

impl Phase {
    pub(crate) fn of(status: &PageStatus, images_pending: bool) -> Self {
        match status {
            PageStatus::Idle => Phase::Idle,
            PageStatus::Loading => Phase::LoadingPrimary,
            PageStatus::Ready if images_pending => Phase::LoadingImages,
            PageStatus::Ready => Phase::Ready,
            PageStatus::Error(_) => Phase::Error,
        }
    }
}

/// Free text or an image, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryInput {
    text: String,
    image: Option<ImageUpload>,
}

impl QueryInput {
    /// Typing clears any selected image.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.image = None;
    }

    /// Selecting an image clears any typed text.
    pub fn select_image(&mut self, upload: ImageUpload) {
        self.text.clear();
        self.image = Some(upload);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    pub fn preview(&self) -> Option<String> {
        self.image.as_ref().map(ImageUpload::preview_data_uri)
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.image = None;
    }

    /// The submission payload, or `None` when nothing usable was given.
    pub fn to_analysis_input(&self) -> Option<AnalysisInput> {
        if let Some(image) = &self.image {
            return Some(AnalysisInput::Image(image.clone()));
        }
        let text = self.text.trim();
        if text.is_empty() {
            None
        } else {
            Some(AnalysisInput::Text(text.to_string()))
        }
    }
}

/// Translation keys a page uses for its own error wording.
#[derive(Debug, Clone, Copy)]
pub struct PageMessages {
    pub no_input: &'static str,
    pub no_location: &'static str,
    pub service: &'static str,
}

impl PageMessages {
    pub const GENERIC: PageMessages = PageMessages {
        no_input: "error_no_input",
        no_location: "error_no_location",
        service: "error_ai_busy",
    };

    pub fn key_for(&self, error: &EcoError) -> &'static str {
        match error {
            EcoError::MissingInput => self.no_input,
            EcoError::MissingLocation => self.no_location,
            EcoError::ServiceUnavailable { .. } => self.service,
            other => other.message_key(),
        }
    }

    pub fn render(&self, error: &EcoError, t: &Translator) -> String {
        t.t(self.key_for(error))
    }
}

/// Page-local one-shot position with its last acquisition error.
#[derive(Debug, Clone, Default)]
pub struct LocationState {
    point: Option<GeoPoint>,
    error: Option<EcoError>,
}

impl LocationState {
    pub fn point(&self) -> Option<GeoPoint> {
        self.point
    }

    pub fn error(&self) -> Option<&EcoError> {
        self.error.as_ref()
    }

    pub fn set(&mut self, point: GeoPoint) {
        self.point = Some(point);
        self.error = None;
    }

    /// Ask the device once. A failure leaves any earlier point in place.
    pub async fn acquire(&mut self, ctx: &AppContext) -> Result<GeoPoint, EcoError> {
        self.error = None;
        match ctx.location().current_position().await {
            Ok(point) => {
                self.point = Some(point);
                Ok(point)
            }
            Err(e) => {
                tracing::warn!(error = %e, "location unavailable");
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }
}

/// Publish `value` into `slot` and start backfilling its images.
pub(crate) fn publish_enriched<R: Enrichable>(
    ctx: &AppContext,
    slot: &ResultSlot<R>,
    value: R,
) -> JoinHandle<EnrichmentReport> {
    let generation = slot.publish(value);
    spawn_enrichment(ctx.gateway(), slot.clone(), generation)
}

pub(crate) fn images_pending<R: Enrichable>(slot: &ResultSlot<R>) -> bool {
    slot.snapshot().is_some_and(|r| !r.is_fully_enriched())
}

/// Record a drop-off at `shop`; returns the confirmation message.
pub fn log_drop_off(ctx: &AppContext, shop: &Shop, t: &Translator) -> String {
    let event = ScoreEvent::DropOffLogged {
        shop_name: shop.name.clone(),
    };
    let points = event.points();
    ctx.ledger().award(event);
    t.t_with(
        "log_drop_off_alert",
        &[("score", points.to_string()), ("shopName", shop.name.clone())],
    )
}
