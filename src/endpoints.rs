use std::fmt;
use std::str::FromStr;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Chat,
    Analyze,
    Health,
    Translate,
    TranslateVoice,
    AnalyzeImage,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Chat,
        Endpoint::Analyze,
        Endpoint::Health,
        Endpoint::Translate,
        Endpoint::TranslateVoice,
        Endpoint::AnalyzeImage,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Chat => "/api/v1/chat",
            Endpoint::Analyze => "/api/v1/analyze",
            Endpoint::Health => "/api/v1/health",
            Endpoint::Translate => "/api/v1/translator/translate",
            Endpoint::TranslateVoice => "/api/v1/translator/translate-voice",
            Endpoint::AnalyzeImage => "/api/analyze_image",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Chat => "chat",
            Endpoint::Analyze => "analyze",
            Endpoint::Health => "health",
            Endpoint::Translate => "translate",
            Endpoint::TranslateVoice => "translate-voice",
            Endpoint::AnalyzeImage => "analyze-image",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Endpoint::ALL
            .into_iter()
            .find(|e| e.name() == wanted)
            .ok_or_else(|| format!("unknown endpoint '{}'", s))
    }
}

/// Builds absolute request URLs by appending endpoint paths to a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base_url.clone())
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Plain concatenation: a trailing slash on the base is kept as-is.
    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base, endpoint.path())
    }
}
