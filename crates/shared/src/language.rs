//! Supported interface and response languages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    #[default]
    En,
    Hi,
    Ta,
    Te,
    Kn,
    Ml,
    Bn,
}

impl LanguageCode {
    pub fn all() -> &'static [LanguageCode] {
        &[
            LanguageCode::En,
            LanguageCode::Hi,
            LanguageCode::Ta,
            LanguageCode::Te,
            LanguageCode::Kn,
            LanguageCode::Ml,
            LanguageCode::Bn,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::Hi => "hi",
            LanguageCode::Ta => "ta",
            LanguageCode::Te => "te",
            LanguageCode::Kn => "kn",
            LanguageCode::Ml => "ml",
            LanguageCode::Bn => "bn",
        }
    }

    /// Name used when instructing the model which language to answer in.
    pub fn language_name(&self) -> &'static str {
        match self {
            LanguageCode::En => "English",
            LanguageCode::Hi => "Hindi",
            LanguageCode::Ta => "Tamil",
            LanguageCode::Te => "Telugu",
            LanguageCode::Kn => "Kannada",
            LanguageCode::Ml => "Malayalam",
            LanguageCode::Bn => "Bengali",
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language code: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for LanguageCode {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        LanguageCode::all()
            .iter()
            .copied()
            .find(|l| l.code() == wanted)
            .ok_or(UnknownLanguage(s.to_string()))
    }
}
