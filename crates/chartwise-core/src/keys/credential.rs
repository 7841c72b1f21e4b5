//! Provider identities, credential format rules, and display masking.

use crate::error::KeyError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// The two providers a user can bring a key for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini (chart analysis)
    Gemini,
    /// Perplexity Sonar (news search)
    Perplexity,
}

impl ProviderKind {
    /// Every provider, in display order.
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Gemini, ProviderKind::Perplexity];

    /// Static format rules and labels for this provider.
    pub fn spec(&self) -> &'static CredentialSpec {
        match self {
            ProviderKind::Gemini => &GEMINI,
            ProviderKind::Perplexity => &PERPLEXITY,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::Perplexity => write!(f, "perplexity"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "perplexity" => Ok(ProviderKind::Perplexity),
            other => Err(format!("Unknown provider: {other}")),
        }
    }
}

/// Format rule and display metadata for one provider's credential.
#[derive(Debug)]
pub struct CredentialSpec {
    /// Regex source the trimmed key must match
    pub pattern: &'static str,
    /// Where the user can create a key
    pub help_url: &'static str,
    /// Human-readable provider name
    pub name: &'static str,
    /// Input placeholder, e.g. "AIza..."
    pub placeholder: &'static str,
    /// Fixed key name in the credentials file
    pub storage_key: &'static str,
    /// Environment variable consulted when nothing is stored
    pub env_var: &'static str,
    regex: &'static LazyLock<Regex>,
}

impl CredentialSpec {
    /// The literal prefix every valid key starts with.
    pub fn prefix(&self) -> &'static str {
        self.placeholder.trim_end_matches("...")
    }

    /// Whether `key` (already trimmed) matches this provider's format.
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

static GEMINI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(GEMINI.pattern).expect("gemini key pattern is valid"));
static PERPLEXITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PERPLEXITY.pattern).expect("perplexity key pattern is valid"));

static GEMINI: CredentialSpec = CredentialSpec {
    pattern: r"^AIza[a-zA-Z0-9_-]{35,}$",
    help_url: "https://aistudio.google.com/apikey",
    name: "Google Gemini",
    placeholder: "AIza...",
    storage_key: "gemini_api_key",
    env_var: "GEMINI_API_KEY",
    regex: &GEMINI_REGEX,
};

static PERPLEXITY: CredentialSpec = CredentialSpec {
    pattern: r"^pplx-[a-zA-Z0-9]{40,}$",
    help_url: "https://www.perplexity.ai/settings/api",
    name: "Perplexity",
    placeholder: "pplx-...",
    storage_key: "perplexity_api_key",
    env_var: "PERPLEXITY_API_KEY",
    regex: &PERPLEXITY_REGEX,
};

/// Validate a raw key for `provider`, returning the trimmed key.
pub fn validate(provider: ProviderKind, raw: &str) -> Result<String, KeyError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(KeyError::Empty { provider });
    }
    let spec = provider.spec();
    if !spec.matches(trimmed) {
        return Err(KeyError::InvalidFormat {
            provider,
            prefix: spec.prefix(),
        });
    }
    Ok(trimmed.to_string())
}

const MASK: &str = "••••••••";

/// Mask a key for display: first 8 and last 4 characters around a fixed filler.
///
/// Keys shorter than 10 characters are fully obscured.
pub fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < 10 {
        return MASK.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}{MASK}{tail}")
}
