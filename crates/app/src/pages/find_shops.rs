//! Recycling shops near the user for a typed waste type.

use shared::error::EcoError;
use shared::waste::{GeoPoint, Shop};
use tracing::debug;

use super::{log_drop_off, LocationState, PageMessages, PageStatus, Phase, StatusCell};
use crate::i18n::Translator;
use crate::state::AppContext;

pub const MESSAGES: PageMessages = PageMessages {
    no_input: "find_shops_error_enter_waste",
    no_location: "find_shops_error_provide_location",
    ..PageMessages::GENERIC
};

pub struct FindShopsPage {
    ctx: AppContext,
    waste_type: String,
    location: LocationState,
    status: StatusCell,
    shops: Vec<Shop>,
}

impl FindShopsPage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            waste_type: String::new(),
            location: LocationState::default(),
            status: StatusCell::default(),
            shops: Vec::new(),
        }
    }

    pub fn set_waste_type(&mut self, text: impl Into<String>) {
        self.waste_type = text.into();
        self.discard_result();
    }

    pub fn waste_type(&self) -> &str {
        &self.waste_type
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

    pub async fn submit(&mut self) -> Result<(), EcoError> {
        let waste_type = self.waste_type.trim().to_string();
        if waste_type.is_empty() {
            return self.fail(EcoError::MissingInput);
        }
        let Some(point) = self.location.point() else {
            return self.fail(EcoError::MissingLocation);
        };

        self.discard_result();
        self.status.set(PageStatus::Loading);
        debug!(%waste_type, "searching shops");
        match self
            .ctx
            .gateway()
            .search_shops(&waste_type, point, self.ctx.language())
            .await
        {
            Ok(shops) => {
                self.shops = shops;
                self.status.set(PageStatus::Ready);
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Log a drop-off at the shop at `index`; returns the confirmation.
    pub fn log_drop_off(&self, index: usize, t: &Translator) -> Option<String> {
        self.shops.get(index).map(|shop| log_drop_off(&self.ctx, shop, t))
    }

    pub fn shops(&self) -> &[Shop] {
        &self.shops
    }

    pub fn status(&self) -> PageStatus {
        self.status.get()
    }

    /// Readable while `submit` holds the page.
    pub fn status_handle(&self) -> StatusCell {
        self.status.clone()
    }

    pub fn phase(&self) -> Phase {
        Phase::of(&self.status.get(), false)
    }

    pub fn error_message(&self, t: &Translator) -> Option<String> {
        self.status.get().error().map(|e| MESSAGES.render(e, t))
    }

    pub fn reset(&mut self) {
        self.waste_type.clear();
        self.location = LocationState::default();
        self.discard_result();
    }

    fn discard_result(&mut self) {
        self.shops.clear();
        self.status.set(PageStatus::Idle);
    }

    fn fail(&mut self, e: EcoError) -> Result<(), EcoError> {
        self.shops.clear();
        self.status.set(PageStatus::Error(e.clone()));
        Err(e)
    }
}
