use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Chat models offered by the backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Model {
    #[serde(rename = "gpt-4o-mini")]
    #[strum(serialize = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "llama-3.3-70b")]
    #[strum(serialize = "llama-3.3-70b")]
    Llama70b,
    #[serde(rename = "claude-3-haiku")]
    #[strum(serialize = "claude-3-haiku")]
    Claude3Haiku,
    #[serde(rename = "o3-mini")]
    #[strum(serialize = "o3-mini")]
    O3Mini,
    #[serde(rename = "mixtral-8x7b")]
    #[strum(serialize = "mixtral-8x7b")]
    Mixtral8x7b,
}

impl Model {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Identifier the chat endpoint expects in request bodies.
    pub fn api_id(self) -> &'static str {
        match self {
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Llama70b => "meta-llama/Llama-3.3-70B-Instruct-Turbo",
            Self::Claude3Haiku => "claude-3-haiku-20240307",
            Self::O3Mini => "o3-mini",
            Self::Mixtral8x7b => "mistralai/Mixtral-8x7B-Instruct-v0.1",
        }
    }

    /// Menu order used by model selection; numbering starts at 1.
    pub fn menu() -> Vec<Self> {
        Self::iter().collect()
    }

    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        let number: usize = choice.trim().parse().ok()?;
        number.checked_sub(1).and_then(|idx| Self::iter().nth(idx))
    }
}
