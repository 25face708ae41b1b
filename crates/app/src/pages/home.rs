//! Landing page content: the five Rs of waste.

use crate::i18n::Translator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipleCard {
    pub id: &'static str,
    pub title: String,
    pub description: String,
}

/// In the order they should be applied.
pub const PRINCIPLES: [&str; 5] = ["refuse", "reduce", "reuse", "recycle", "rot"];

pub fn principle_cards(t: &Translator) -> Vec<PrincipleCard> {
    PRINCIPLES
        .iter()
        .map(|&id| PrincipleCard {
            id,
            title: t.t(&format!("{}_title", id)),
            description: t.t(&format!("{}_desc", id)),
        })
        .collect()
}
