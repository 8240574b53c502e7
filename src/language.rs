use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Languages the planner can talk in. English is the base language:
/// prompts and choices are authored in it and never translated from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[value(alias = "en")]
    English,
    #[value(alias = "hi")]
    Hindi,
    #[value(alias = "kn")]
    Kannada,
    #[value(alias = "te")]
    Telugu,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Hindi,
        Language::Kannada,
        Language::Telugu,
    ];

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Kannada => "kn",
            Language::Telugu => "te",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Kannada => "Kannada",
            Language::Telugu => "Telugu",
        }
    }

    pub fn is_base(self) -> bool {
        self == Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = String;

    /// Accepts the name or the code, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.name().to_lowercase() == needle || l.code() == needle)
            .ok_or_else(|| format!("unsupported language: {s}"))
    }
}
