//! Upcycling project for an item, with one illustration per step.

use services::enrichment::EnrichmentReport;
use services::result_slot::ResultSlot;
use shared::error::EcoError;
use shared::waste::{DiyProject, ImageUpload};
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::{
    images_pending, publish_enriched, PageMessages, PageStatus, Phase, QueryInput, StatusCell,
};
use crate::i18n::Translator;
use crate::state::AppContext;

pub const MESSAGES: PageMessages = PageMessages {
    no_input: "diy_error_no_input",
    ..PageMessages::GENERIC
};

pub struct DiyProjectsPage {
    ctx: AppContext,
    input: QueryInput,
    status: StatusCell,
    result: ResultSlot<DiyProject>,
}

impl DiyProjectsPage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            input: QueryInput::default(),
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

    pub async fn submit(&mut self) -> Result<JoinHandle<EnrichmentReport>, EcoError> {
        let Some(input) = self.input.to_analysis_input() else {
            self.status.set(PageStatus::Error(EcoError::MissingInput));
            return Err(EcoError::MissingInput);
        };

        self.discard_result();
        self.status.set(PageStatus::Loading);
        match self
            .ctx
            .gateway()
            .diy_project(&input, self.ctx.language())
            .await
        {
            Ok(project) => {
                self.status.set(PageStatus::Ready);
                Ok(publish_enriched(&self.ctx, &self.result, project))
            }
            Err(e) => {
                self.status.set(PageStatus::Error(e.clone()));
                Err(e)
            }
        }
    }

    pub fn result(&self) -> Option<Arc<DiyProject>> {
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
        self.discard_result();
    }

    fn discard_result(&mut self) {
        self.result.discard();
        self.status.set(PageStatus::Idle);
    }
}
