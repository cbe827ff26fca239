//! Model documentation URL lookup.

use serde::{Deserialize, Serialize};

/// A known model identifier and its documentation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUrl {
    /// Lowercase model identifier.
    pub name: String,
    pub url: String,
}

/// Resolves model directory names to documentation URLs.
///
/// Exact matches win. Otherwise the first keyword (in priority order)
/// contained in the name selects the first entry whose name contains it,
/// so more specific keywords must come before more general ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUrlTable {
    #[serde(default)]
    pub entries: Vec<ModelUrl>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

const BUILTIN_URLS: &[(&str, &str)] = &[
    ("chatgpt-4o-latest", "https://platform.openai.com/docs/models/gpt-4o"),
    ("gpt-4o-2024-05-13", "https://platform.openai.com/docs/models/gpt-4o"),
    (
        "gpt-4o-mini",
        "https://openai.com/index/gpt-4o-mini-advancing-cost-efficient-intelligence/",
    ),
    (
        "o1-mini",
        "https://openai.com/index/openai-o1-mini-advancing-cost-efficient-reasoning/",
    ),
    ("o3-mini", "https://platform.openai.com/docs/models/o3-mini"),
    ("o4-mini", "https://platform.openai.com/docs/models/o4-mini"),
    ("claude-3.5-sonnet", "https://www.anthropic.com/news/claude-3-5-sonnet"),
    ("claude-3.7-sonnet", "https://www.anthropic.com/news/claude-3-7-sonnet"),
    (
        "claude-3.7-sonnet-thinking",
        "https://www.anthropic.com/news/claude-3-7-sonnet",
    ),
    ("deepseek-r1", "https://api-docs.deepseek.com/news/news250120"),
    ("deepseek-v3", "https://api-docs.deepseek.com/news/news250325"),
    (
        "gemini-2.5-pro",
        "https://cloud.google.com/vertex-ai/generative-ai/docs/models/gemini/2-5-pro",
    ),
];

const BUILTIN_KEYWORDS: &[&str] = &[
    "gpt-4o-mini",
    "gpt-4o",
    "claude-3.5",
    "claude-3.7",
    "deepseek-r1",
    "deepseek-v3",
    "gemini-2.5-pro",
    "o1-mini",
    "o3-mini",
    "o4-mini",
];

impl ModelUrlTable {
    /// The table of models published in past result sets.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_URLS
                .iter()
                .map(|(name, url)| ModelUrl {
                    name: (*name).to_string(),
                    url: (*url).to_string(),
                })
                .collect(),
            keywords: BUILTIN_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    /// Look up the URL for a model, if any entry matches.
    pub fn lookup(&self, model_name: &str) -> Option<&str> {
        let key = model_name.to_lowercase();

        if let Some(entry) = self.entries.iter().find(|e| e.name.to_lowercase() == key) {
            return Some(&entry.url);
        }

        self.keywords
            .iter()
            .map(|kw| kw.to_lowercase())
            .filter(|kw| key.contains(kw.as_str()))
            .find_map(|kw| {
                self.entries
                    .iter()
                    .find(|e| e.name.to_lowercase().contains(&kw))
                    .map(|e| e.url.as_str())
            })
    }

    /// The URL for a model, or an empty string when unknown.
    pub fn resolve(&self, model_name: &str) -> String {
        self.lookup(model_name).unwrap_or_default().to_string()
    }
}

impl Default for ModelUrlTable {
    fn default() -> Self {
        Self::builtin()
    }
}
