//! Holder for the result a page is currently showing.
//!
//! A result is published once as an immutable snapshot. Image patches never
//! mutate it in place: [`reduce`] derives the next snapshot with exactly one
//! item changed, and [`ResultSlot::apply`] swaps it in only if the patch
//! belongs to the generation still on display. Patches for a discarded or
//! replaced result are inert.

use parking_lot::RwLock;
use shared::waste::{AlternativeProduct, DiyProject, DiyStep, EcoAlternativesResponse, ImageState};
use std::sync::Arc;

/// Stable identity of an item inside its result: its position.
pub type ItemKey = usize;

/// Monotonic id of a published result.
pub type Generation = u64;

/// A sub-item that needs a secondary image request.
pub trait EnrichableItem {
    fn image_prompt(&self) -> &str;
    fn image(&self) -> &ImageState;
    fn image_mut(&mut self) -> &mut ImageState;
}

/// A result holding an ordered collection of enrichable items.
pub trait Enrichable: Clone + Send + Sync + 'static {
    type Item: EnrichableItem;

    fn items(&self) -> &[Self::Item];
    fn items_mut(&mut self) -> &mut [Self::Item];

    /// `(key, prompt)` for every item still waiting on its image.
    fn image_requests(&self) -> Vec<(ItemKey, String)> {
        self.items()
            .iter()
            .enumerate()
            .filter(|(_, item)| item.image().is_pending())
            .map(|(key, item)| (key, item.image_prompt().to_string()))
            .collect()
    }

    fn is_fully_enriched(&self) -> bool {
        self.items().iter().all(|item| item.image().is_terminal())
    }
}

impl EnrichableItem for DiyStep {
    fn image_prompt(&self) -> &str {
        &self.image_prompt
    }
    fn image(&self) -> &ImageState {
        &self.image
    }
    fn image_mut(&mut self) -> &mut ImageState {
        &mut self.image
    }
}

impl EnrichableItem for AlternativeProduct {
    fn image_prompt(&self) -> &str {
        &self.image_prompt
    }
    fn image(&self) -> &ImageState {
        &self.image
    }
    fn image_mut(&mut self) -> &mut ImageState {
        &mut self.image
    }
}

impl Enrichable for DiyProject {
    type Item = DiyStep;

    fn items(&self) -> &[DiyStep] {
        &self.steps
    }
    fn items_mut(&mut self) -> &mut [DiyStep] {
        &mut self.steps
    }
}

impl Enrichable for EcoAlternativesResponse {
    type Item = AlternativeProduct;

    fn items(&self) -> &[AlternativeProduct] {
        &self.alternatives
    }
    fn items_mut(&mut self) -> &mut [AlternativeProduct] {
        &mut self.alternatives
    }
}

/// Terminal image outcome for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePatch {
    pub key: ItemKey,
    pub state: ImageState,
}

impl ImagePatch {
    pub fn loaded(key: ItemKey, base64: &str) -> Self {
        Self {
            key,
            state: ImageState::from_base64(base64),
        }
    }

    pub fn failed(key: ItemKey) -> Self {
        Self {
            key,
            state: ImageState::Failed,
        }
    }
}

/// Next snapshot with `patch` merged in, or `None` when the patch does not
/// apply (unknown key, non-terminal state, or the item already settled).
pub fn reduce<R: Enrichable>(snapshot: &R, patch: &ImagePatch) -> Option<R> {
    if patch.state.is_pending() {
        return None;
    }
    let current = snapshot.items().get(patch.key)?;
    if current.image().is_terminal() {
        return None;
    }
    let mut next = snapshot.clone();
    *next.items_mut()[patch.key].image_mut() = patch.state.clone();
    Some(next)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    /// The result it targeted is no longer displayed.
    Stale,
    /// Same generation, but the reducer rejected it.
    Rejected,
}

struct SlotState<R> {
    generation: Generation,
    current: Option<Arc<R>>,
}

pub struct ResultSlot<R> {
    inner: Arc<RwLock<SlotState<R>>>,
}

impl<R> Clone for ResultSlot<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> Default for ResultSlot<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ResultSlot<R> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SlotState {
                generation: 0,
                current: None,
            })),
        }
    }

    /// Replace whatever is displayed with `value`. Returns its generation.
    pub fn publish(&self, value: R) -> Generation {
        let mut state = self.inner.write();
        state.generation += 1;
        state.current = Some(Arc::new(value));
        state.generation
    }

    /// Drop the displayed result; in-flight patches for it become inert.
    pub fn discard(&self) {
        let mut state = self.inner.write();
        if state.current.is_some() {
            state.generation += 1;
            state.current = None;
        }
    }

    pub fn snapshot(&self) -> Option<Arc<R>> {
        self.inner.read().current.clone()
    }

    /// Snapshot only if `generation` is still the one displayed.
    pub fn snapshot_at(&self, generation: Generation) -> Option<Arc<R>> {
        let state = self.inner.read();
        if state.generation == generation {
            state.current.clone()
        } else {
            None
        }
    }

    pub fn generation(&self) -> Generation {
        self.inner.read().generation
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().current.is_none()
    }
}

impl<R: Enrichable> ResultSlot<R> {
    pub fn apply(&self, generation: Generation, patch: &ImagePatch) -> PatchOutcome {
        let mut state = self.inner.write();
        if state.generation != generation {
            return PatchOutcome::Stale;
        }
        let Some(current) = state.current.as_ref() else {
            return PatchOutcome::Stale;
        };
        match reduce(current.as_ref(), patch) {
            Some(next) => {
                state.current = Some(Arc::new(next));
                PatchOutcome::Applied
            }
            None => PatchOutcome::Rejected,
        }
    }
}
