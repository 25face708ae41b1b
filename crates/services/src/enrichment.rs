//! Progressive image backfill for a published result.
//!
//! One image request per pending item, all in flight at once. Each settles
//! into its own patch; a failure marks that item `Failed` and nothing else.
//! The flow itself cannot fail.

use futures::stream::{FuturesUnordered, StreamExt};
use providers::EcoGateway;
use shared::waste::ImageState;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::result_slot::{Enrichable, Generation, ImagePatch, PatchOutcome, ResultSlot};

/// Tally of one enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub requested: usize,
    pub loaded: usize,
    pub failed: usize,
    /// Patches that arrived after their result was discarded or replaced.
    pub inert: usize,
}

impl EnrichmentReport {
    fn record(&mut self, patch: &ImagePatch, outcome: PatchOutcome) {
        match outcome {
            PatchOutcome::Applied => match patch.state {
                ImageState::Loaded(_) => self.loaded += 1,
                _ => self.failed += 1,
            },
            PatchOutcome::Stale | PatchOutcome::Rejected => self.inert += 1,
        }
    }
}

/// Fill in every pending image of the result published as `generation`.
pub async fn enrich<R: Enrichable>(
    gateway: Arc<dyn EcoGateway>,
    slot: ResultSlot<R>,
    generation: Generation,
) -> EnrichmentReport {
    let mut report = EnrichmentReport::default();
    let Some(snapshot) = slot.snapshot_at(generation) else {
        debug!(generation, "result discarded before enrichment started");
        return report;
    };

    let requests = snapshot.image_requests();
    report.requested = requests.len();

    let mut in_flight: FuturesUnordered<_> = requests
        .into_iter()
        .map(|(key, prompt)| {
            let gateway = Arc::clone(&gateway);
            async move {
                match gateway.generate_image(&prompt).await {
                    Ok(data) => ImagePatch::loaded(key, &data),
                    Err(e) => {
                        warn!(key, error = %e, "image for item failed");
                        ImagePatch::failed(key)
                    }
                }
            }
        })
        .collect();

    while let Some(patch) = in_flight.next().await {
        let outcome = slot.apply(generation, &patch);
        report.record(&patch, outcome);
    }

    info!(
        generation,
        requested = report.requested,
        loaded = report.loaded,
        failed = report.failed,
        inert = report.inert,
        "enrichment finished"
    );
    report
}

/// Run [`enrich`] in the background. Never cancelled; a stale run finishes
/// and its patches are simply inert.
pub fn spawn_enrichment<R: Enrichable>(
    gateway: Arc<dyn EcoGateway>,
    slot: ResultSlot<R>,
    generation: Generation,
) -> JoinHandle<EnrichmentReport> {
    tokio::spawn(enrich(gateway, slot, generation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::agent_api::{ChatMessage, StreamChunk};
    use shared::error::EcoError;
    use shared::language::LanguageCode;
    use shared::waste::*;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedSender;

    /// Image-only gateway: each prompt maps to (delay ms, base64 or failure).
    struct ScriptedImages {
        script: HashMap<String, (u64, Option<String>)>,
    }

    impl ScriptedImages {
        fn new(entries: &[(&str, u64, Option<&str>)]) -> Arc<dyn EcoGateway> {
            let script = entries
                .iter()
                .map(|(p, d, r)| (p.to_string(), (*d, r.map(str::to_string))))
                .collect();
            Arc::new(Self { script })
        }
    }

    #[async_trait]
    impl EcoGateway for ScriptedImages {
        async fn search_shops(
            &self,
            _: &str,
            _: GeoPoint,
            _: LanguageCode,
        ) -> Result<Vec<Shop>, EcoError> {
            Err(EcoError::service("unused"))
        }
        async fn identify_waste(
            &self,
            _: &ImageUpload,
            _: LanguageCode,
        ) -> Result<WasteInfo, EcoError> {
            Err(EcoError::service("unused"))
        }
        async fn find_alternatives(
            &self,
            _: &AnalysisInput,
            _: GeoPoint,
            _: LanguageCode,
        ) -> Result<EcoAlternativesResponse, EcoError> {
            Err(EcoError::service("unused"))
        }
        async fn disposal_guide(
            &self,
            _: &AnalysisInput,
            _: LanguageCode,
        ) -> Result<DisposalGuide, EcoError> {
            Err(EcoError::service("unused"))
        }
        async fn diy_project(
            &self,
            _: &AnalysisInput,
            _: LanguageCode,
        ) -> Result<DiyProject, EcoError> {
            Err(EcoError::service("unused"))
        }
        async fn generate_image(&self, prompt: &str) -> Result<String, EcoError> {
            let (delay, result) = self
                .script
                .get(prompt)
                .cloned()
                .unwrap_or((0, None));
            tokio::time::sleep(Duration::from_millis(delay)).await;
            result.ok_or_else(|| EcoError::image("scripted failure"))
        }
        async fn stream_chat(
            &self,
            _: LanguageCode,
            _: Vec<ChatMessage>,
            _: UnboundedSender<StreamChunk>,
        ) -> Result<(), EcoError> {
            Err(EcoError::service("unused"))
        }
    }

    fn alternatives(prompts: &[&str]) -> EcoAlternativesResponse {
        EcoAlternativesResponse {
            original_product: OriginalProductInfo {
                name: "Plastic toothbrush".into(),
                classification: Classification::NonBiodegradable,
                material: "Plastic".into(),
                degradation_time: "450 years".into(),
                description: "Ends up in landfills".into(),
            },
            alternatives: prompts
                .iter()
                .map(|p| AlternativeProduct {
                    name: p.to_string(),
                    description: String::new(),
                    image_prompt: p.to_string(),
                    degradation_time: "6 months".into(),
                    material: "Bamboo".into(),
                    buy_link: "https://example.com".into(),
                    shops: vec![],
                    image: ImageState::Pending,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_one_failure_stays_scoped_to_its_item() {
        let gateway = ScriptedImages::new(&[
            ("bamboo", 5, Some("YmFtYm9v")),
            ("neem", 1, None),
            ("coconut", 3, Some("Y29jb251dA==")),
        ]);
        let slot = ResultSlot::new();
        let gen = slot.publish(alternatives(&["bamboo", "neem", "coconut"]));

        let report = enrich(gateway, slot.clone(), gen).await;
        assert_eq!(
            report,
            EnrichmentReport {
                requested: 3,
                loaded: 2,
                failed: 1,
                inert: 0
            }
        );

        let done = slot.snapshot().unwrap();
        assert_eq!(done.alternatives.len(), 3);
        assert_eq!(done.alternatives[0].image.data_uri(), Some("data:image/png;base64,YmFtYm9v"));
        assert_eq!(done.alternatives[1].image, ImageState::Failed);
        assert_eq!(
            done.alternatives[2].image.data_uri(),
            Some("data:image/png;base64,Y29jb251dA==")
        );
    }

    #[tokio::test]
    async fn test_reverse_completion_order_keeps_identity() {
        // Later items finish first.
        let gateway = ScriptedImages::new(&[
            ("a", 40, Some("QQ==")),
            ("b", 25, Some("Qg==")),
            ("c", 10, Some("Qw==")),
        ]);
        let slot = ResultSlot::new();
        let gen = slot.publish(alternatives(&["a", "b", "c"]));

        spawn_enrichment(gateway, slot.clone(), gen).await.unwrap();

        let done = slot.snapshot().unwrap();
        let uris: Vec<_> = done
            .alternatives
            .iter()
            .map(|a| a.image.data_uri().unwrap().to_string())
            .collect();
        assert_eq!(
            uris,
            vec![
                "data:image/png;base64,QQ==",
                "data:image/png;base64,Qg==",
                "data:image/png;base64,Qw=="
            ]
        );
    }

    #[tokio::test]
    async fn test_all_failures_still_complete() {
        let gateway = ScriptedImages::new(&[]);
        let slot = ResultSlot::new();
        let gen = slot.publish(alternatives(&["x", "y"]));
        let report = enrich(gateway, slot.clone(), gen).await;
        assert_eq!(report.failed, 2);
        assert!(slot.snapshot().unwrap().is_fully_enriched());
    }

    #[tokio::test]
    async fn test_discard_mid_flight_makes_patches_inert() {
        let gateway = ScriptedImages::new(&[("slow", 30, Some("QQ=="))]);
        let slot = ResultSlot::new();
        let gen = slot.publish(alternatives(&["slow"]));

        let handle = spawn_enrichment(gateway, slot.clone(), gen);
        tokio::time::sleep(Duration::from_millis(5)).await;
        slot.discard();

        let report = handle.await.unwrap();
        assert_eq!(report.inert, 1);
        assert_eq!(report.loaded, 0);
        assert!(slot.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_discarded_before_start_requests_nothing() {
        let gateway = ScriptedImages::new(&[]);
        let slot: ResultSlot<EcoAlternativesResponse> = ResultSlot::new();
        let gen = slot.publish(alternatives(&["x"]));
        slot.discard();
        let report = enrich(gateway, slot, gen).await;
        assert_eq!(report, EnrichmentReport::default());
    }
}
