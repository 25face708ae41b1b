//! Step-by-step disposal instructions for an item.

use shared::error::EcoError;
use shared::waste::{DisposalGuide, ImageUpload};

use super::{PageMessages, PageStatus, Phase, QueryInput, StatusCell};
use crate::i18n::Translator;
use crate::state::AppContext;

pub const MESSAGES: PageMessages = PageMessages {
    no_input: "disposal_error_no_input",
    ..PageMessages::GENERIC
};

pub struct DisposalGuidePage {
    ctx: AppContext,
    input: QueryInput,
    status: StatusCell,
    guide: Option<DisposalGuide>,
}

impl DisposalGuidePage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            input: QueryInput::default(),
            status: StatusCell::default(),
            guide: None,
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

    pub async fn submit(&mut self) -> Result<(), EcoError> {
        let Some(input) = self.input.to_analysis_input() else {
            self.status.set(PageStatus::Error(EcoError::MissingInput));
            return Err(EcoError::MissingInput);
        };

        self.discard_result();
        self.status.set(PageStatus::Loading);
        match self
            .ctx
            .gateway()
            .disposal_guide(&input, self.ctx.language())
            .await
        {
            Ok(guide) => {
                self.guide = Some(guide);
                self.status.set(PageStatus::Ready);
                Ok(())
            }
            Err(e) => {
                self.status.set(PageStatus::Error(e.clone()));
                Err(e)
            }
        }
    }

    pub fn guide(&self) -> Option<&DisposalGuide> {
        self.guide.as_ref()
    }

    /// Steps prefixed with their 1-based position.
    pub fn numbered_steps(&self) -> Vec<String> {
        self.guide
            .iter()
            .flat_map(|g| g.steps.iter().enumerate())
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect()
    }

    /// The warnings section, absent when there is nothing to warn about.
    pub fn warnings(&self) -> Option<&[String]> {
        self.guide
            .as_ref()
            .filter(|g| g.has_warnings())
            .map(|g| g.safety_warnings.as_slice())
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
        self.input.clear();
        self.discard_result();
    }

    fn discard_result(&mut self) {
        self.guide = None;
        self.status.set(PageStatus::Idle);
    }
}
