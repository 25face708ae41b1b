//! Classify a photographed item, then optionally find shops that take it.

use shared::error::EcoError;
use shared::events::ScoreEvent;
use shared::waste::{ImageUpload, Shop, WasteInfo};
use tracing::debug;

use super::{log_drop_off, LocationState, PageMessages, PageStatus, Phase, StatusCell};
use crate::i18n::Translator;
use crate::state::AppContext;

pub const MESSAGES: PageMessages = PageMessages {
    no_input: "error_upload_image",
    service: "error_identify_waste",
    ..PageMessages::GENERIC
};

/// Wording for the follow-up shop search.
pub const SHOP_MESSAGES: PageMessages = PageMessages {
    service: "error_find_shops_for_waste",
    ..PageMessages::GENERIC
};

pub struct IdentifyWastePage {
    ctx: AppContext,
    image: Option<ImageUpload>,
    status: StatusCell,
    info: Option<WasteInfo>,
    location: LocationState,
    shops_status: StatusCell,
    shops: Vec<Shop>,
}

impl IdentifyWastePage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            image: None,
            status: StatusCell::default(),
            info: None,
            location: LocationState::default(),
            shops_status: StatusCell::default(),
            shops: Vec::new(),
        }
    }

    pub fn select_image(&mut self, upload: ImageUpload) {
        self.image = Some(upload);
        self.discard_result();
    }

    pub fn preview(&self) -> Option<String> {
        self.image.as_ref().map(ImageUpload::preview_data_uri)
    }

    /// Classify the selected image. Awards points on success.
    pub async fn submit(&mut self) -> Result<(), EcoError> {
        let Some(image) = self.image.clone() else {
            self.status.set(PageStatus::Error(EcoError::MissingInput));
            return Err(EcoError::MissingInput);
        };

        self.discard_result();
        self.status.set(PageStatus::Loading);
        match self
            .ctx
            .gateway()
            .identify_waste(&image, self.ctx.language())
            .await
        {
            Ok(info) => {
                debug!(category = %info.waste_category, "waste identified");
                self.info = Some(info);
                self.status.set(PageStatus::Ready);
                self.ctx.ledger().award(ScoreEvent::WasteIdentified);
                Ok(())
            }
            Err(e) => {
                self.status.set(PageStatus::Error(e.clone()));
                Err(e)
            }
        }
    }

    /// Search shops for the identified category, asking for the device
    /// position first if none is known yet.
    pub async fn find_shops_for_waste(&mut self) -> Result<(), EcoError> {
        let Some(category) = self.info.as_ref().map(|i| i.waste_category.clone()) else {
            return Ok(());
        };
        self.shops.clear();
        self.shops_status.set(PageStatus::Loading);

        let point = match self.location.point() {
            Some(point) => point,
            None => match self.location.acquire(&self.ctx).await {
                Ok(point) => point,
                Err(e) => {
                    self.shops_status.set(PageStatus::Error(e.clone()));
                    return Err(e);
                }
            },
        };

        match self
            .ctx
            .gateway()
            .search_shops(&category, point, self.ctx.language())
            .await
        {
            Ok(shops) => {
                self.shops = shops;
                self.shops_status.set(PageStatus::Ready);
                Ok(())
            }
            Err(e) => {
                self.shops_status.set(PageStatus::Error(e.clone()));
                Err(e)
            }
        }
    }

    pub fn log_drop_off(&self, index: usize, t: &Translator) -> Option<String> {
        self.shops.get(index).map(|shop| log_drop_off(&self.ctx, shop, t))
    }

    pub fn info(&self) -> Option<&WasteInfo> {
        self.info.as_ref()
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

    pub fn shops_status(&self) -> PageStatus {
        self.shops_status.get()
    }

    pub fn phase(&self) -> Phase {
        Phase::of(&self.status.get(), false)
    }

    pub fn error_message(&self, t: &Translator) -> Option<String> {
        self.status.get().error().map(|e| MESSAGES.render(e, t))
    }

    pub fn shops_error_message(&self, t: &Translator) -> Option<String> {
        self.shops_status.get().error().map(|e| SHOP_MESSAGES.render(e, t))
    }

    pub fn reset(&mut self) {
        self.image = None;
        self.location = LocationState::default();
        self.discard_result();
    }

    fn discard_result(&mut self) {
        self.info = None;
        self.status.set(PageStatus::Idle);
        self.shops.clear();
        self.shops_status.set(PageStatus::Idle);
    }
}
