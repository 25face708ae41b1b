//! Handles shared by the shell and every page controller.
//!
//! The language lives here as process-wide configuration: the shell loads it
//! from the preference store at startup and is the only writer afterwards.

use parking_lot::RwLock;
use providers::EcoGateway;
use services::geolocation::LocationSource;
use services::ledger::SharedLedger;
use shared::language::LanguageCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    gateway: Arc<dyn EcoGateway>,
    location: Arc<dyn LocationSource>,
    ledger: SharedLedger,
    language: Arc<RwLock<LanguageCode>>,
}

impl AppContext {
    pub fn new(gateway: Arc<dyn EcoGateway>, location: Arc<dyn LocationSource>) -> Self {
        Self {
            gateway,
            location,
            ledger: SharedLedger::new(),
            language: Arc::new(RwLock::new(LanguageCode::default())),
        }
    }

    pub fn gateway(&self) -> Arc<dyn EcoGateway> {
        Arc::clone(&self.gateway)
    }

    pub fn location(&self) -> &dyn LocationSource {
        self.location.as_ref()
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn language(&self) -> LanguageCode {
        *self.language.read()
    }

    pub(crate) fn set_language(&self, language: LanguageCode) {
        *self.language.write() = language;
    }
}
