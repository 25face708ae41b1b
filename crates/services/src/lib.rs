pub mod enrichment;
pub mod geolocation;
pub mod ledger;
pub mod preferences;
pub mod result_slot;
