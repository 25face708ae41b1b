//! Eco-friendly replacements for a product, with images filled in as they
//! arrive.

use services::enrichment::EnrichmentReport;
use services::result_slot::ResultSlot;
use shared::error::EcoError;
use shared::events::ScoreEvent;
use shared::waste::{EcoAlternativesResponse, GeoPoint, ImageUpload};
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::{
    images_pending, publish_enriched, LocationState, PageMessages, PageStatus, Phase, QueryInput,
    StatusCell,
};
use crate::i18n::Translator;
use crate::state::AppContext;

pub const MESSAGES: PageMessages = PageMessages {
    no_input: "alternatives_error_no_input",
    no_location: "alternatives_error_no_location",
    ..PageMessages::GENERIC
};

pub struct EcoAlternativesPage {
    ctx: AppContext,
    input: QueryInput,
    location: LocationState,
    status: StatusCell,
    result: ResultSlot<EcoAlternativesResponse>,
}

impl EcoAlternativesPage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            input: QueryInput::default(),
            location: LocationState::default(),
            status: StatusCell::default(),
            result: ResultSlot::new(),
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.input.set_text(text);
        self.discard_result();
    }

    pub fn select_image(&mut self, upload: ImageUpload) {
        self.input.select_image(upload);
        self.discard_result();
    }

    pub fn input(&self) -> &QueryInput {
        &self.input
    }

    pub fn set_location(&mut self, point: GeoPoint) {
        self.location.set(point);
    }

    pub async fn acquire_location(&mut self) -> Result<GeoPoint, EcoError> {
        self.location.acquire(&self.ctx).await
    }

    pub fn location(&self) -> &LocationState {
        &self.location
    }

    /// Fetch alternatives and start their image backfill. The returned
    /// handle resolves once every image has settled.
    pub async fn submit(&mut self) -> Result<JoinHandle<EnrichmentReport>, EcoError> {
        let Some(input) = self.input.to_analysis_input() else {
            return Err(self.fail(EcoError::MissingInput));
        };
        let Some(point) = self.location.point() else {
            return Err(self.fail(EcoError::MissingLocation));
        };

        self.discard_result();
        self.status.set(PageStatus::Loading);
        match self
            .ctx
            .gateway()
            .find_alternatives(&input, point, self.ctx.language())
            .await
        {
            Ok(response) => {
                self.status.set(PageStatus::Ready);
                self.ctx.ledger().award(ScoreEvent::AlternativesFound);
                Ok(publish_enriched(&self.ctx, &self.result, response))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Current snapshot, including whatever images have landed so far.
    pub fn result(&self) -> Option<Arc<EcoAlternativesResponse>> {
        self.result.snapshot()
    }

    pub fn status(&self) -> PageStatus {
        self.status.get()
    }

    /// Readable while `submit` holds the page.
    pub fn status_handle(&self) -> StatusCell {
        self.status.clone()
    }

    pub fn phase(&self) -> Phase {
        Phase::of(&self.status.get(), images_pending(&self.result))
    }

    pub fn error_message(&self, t: &Translator) -> Option<String> {
        self.status.get().error().map(|e| MESSAGES.render(e, t))
    }

    pub fn reset(&mut self) {
        self.input.clear();
        self.location = LocationState::default();
        self.discard_result();
    }

    fn discard_result(&mut self) {
        self.result.discard();
        self.status.set(PageStatus::Idle);
    }

    fn fail(&mut self, e: EcoError) -> EcoError {
        self.result.discard();
        self.status.set(PageStatus::Error(e.clone()));
        e
    }
}
