//! Top-level application state: auth gate, navigation, language and chat.

use services::preferences::PreferenceStore;
use shared::language::LanguageCode;
use tracing::{info, warn};

use crate::chat::ChatSession;
use crate::i18n::Translator;
use crate::pages::{
    DiyProjectsPage, DisposalGuidePage, EcoAlternativesPage, FindShopsPage, IdentifyWastePage,
    Page, RewardsView,
};
use crate::state::AppContext;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthView {
    #[default]
    Login,
    SignUp,
}

pub struct Shell {
    ctx: AppContext,
    prefs: PreferenceStore,
    authenticated: bool,
    auth_view: AuthView,
    active_page: Page,
    chat: Option<ChatSession>,
    find_shops: FindShopsPage,
    identify: IdentifyWastePage,
    alternatives: EcoAlternativesPage,
    disposal: DisposalGuidePage,
    diy: DiyProjectsPage,
}

impl Shell {
    /// Build the shell, restoring the saved language.
    pub fn new(ctx: AppContext, prefs: PreferenceStore) -> Self {
        let language = prefs.load_language();
        ctx.set_language(language);
        info!(%language, "shell ready");
        Self {
            find_shops: FindShopsPage::new(ctx.clone()),
            identify: IdentifyWastePage::new(ctx.clone()),
            alternatives: EcoAlternativesPage::new(ctx.clone()),
            disposal: DisposalGuidePage::new(ctx.clone()),
            diy: DiyProjectsPage::new(ctx.clone()),
            ctx,
            prefs,
            authenticated: false,
            auth_view: AuthView::Login,
            active_page: Page::Home,
            chat: None,
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn translator(&self) -> Translator {
        Translator::new(self.ctx.language())
    }

    pub fn language(&self) -> LanguageCode {
        self.ctx.language()
    }

    // Auth. There is no backend: any submission lets the user in.

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn auth_view(&self) -> AuthView {
        self.auth_view
    }

    pub fn show_sign_up(&mut self) {
        self.auth_view = AuthView::SignUp;
    }

    pub fn show_login(&mut self) {
        self.auth_view = AuthView::Login;
    }

    pub fn login(&mut self) {
        self.authenticated = true;
        info!("user logged in");
    }

    pub fn sign_up(&mut self) {
        self.authenticated = true;
        info!("user signed up");
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
        self.auth_view = AuthView::Login;
        let page = self.active_page;
        self.reset_page(page);
        self.active_page = Page::Home;
        self.ctx.ledger().reset();
        self.chat = None;
        info!("user logged out");
    }

    // Navigation

    pub fn active_page(&self) -> Page {
        self.active_page
    }

    /// Switch pages. The page being left forgets its query and result.
    pub fn navigate(&mut self, page: Page) {
        if !self.authenticated || page == self.active_page {
            return;
        }
        let leaving = self.active_page;
        self.reset_page(leaving);
        self.active_page = page;
    }

    fn reset_page(&mut self, page: Page) {
        match page {
            Page::FindShops => self.find_shops.reset(),
            Page::IdentifyWaste => self.identify.reset(),
            Page::Alternatives => self.alternatives.reset(),
            Page::Disposal => self.disposal.reset(),
            Page::Diy => self.diy.reset(),
            Page::Home | Page::Rewards => {}
        }
    }

    pub fn find_shops(&mut self) -> &mut FindShopsPage {
        &mut self.find_shops
    }

    pub fn identify(&mut self) -> &mut IdentifyWastePage {
        &mut self.identify
    }

    pub fn alternatives(&mut self) -> &mut EcoAlternativesPage {
        &mut self.alternatives
    }

    pub fn disposal(&mut self) -> &mut DisposalGuidePage {
        &mut self.disposal
    }

    pub fn diy(&mut self) -> &mut DiyProjectsPage {
        &mut self.diy
    }

    pub fn rewards(&self) -> RewardsView {
        RewardsView::build(&self.ctx, &self.translator())
    }

    // Language

    /// Switch language, persist it, and restart an open chat in the new
    /// language. A failed save is logged; the switch still applies.
    pub fn set_language(&mut self, language: LanguageCode) {
        if language == self.ctx.language() {
            return;
        }
        self.ctx.set_language(language);
        if let Err(e) = self.prefs.save_language(language) {
            warn!(error = %e, "failed to save language preference");
        }
        if self.chat.is_some() {
            self.chat = Some(self.new_chat());
        }
    }

    // Chat

    pub fn chat(&self) -> Option<&ChatSession> {
        self.chat.as_ref()
    }

    /// Opening always starts a fresh conversation.
    pub fn open_chat(&mut self) -> &ChatSession {
        let chat = self.new_chat();
        self.chat.insert(chat)
    }

    pub fn close_chat(&mut self) {
        self.chat = None;
    }

    pub fn toggle_chat(&mut self) {
        if self.chat.is_some() {
            self.close_chat();
        } else {
            self.open_chat();
        }
    }

    fn new_chat(&self) -> ChatSession {
        ChatSession::start(self.ctx.gateway(), self.ctx.language(), &self.translator())
    }
}
