use crate::config::PhrasebookConfig;
use tracing::{debug, info};

/// Message returned when no phrase matches ("translation not available")
pub const DEFAULT_FALLBACK: &str = "🔍 ترجمہ دستیاب نہیں";

/// Built-in English → Urdu phrases
pub const PHRASES: &[(&str, &str)] = &[
    ("HELLO", "ہیلو"),
    ("WORLD", "دنیا"),
    ("GOOD", "اچھا"),
    ("MORNING", "صبح بخیر"),
    ("TEST", "جانچ"),
    ("LOVE", "محبت"),
    ("PEACE", "امن"),
    ("HOW ARE YOU", "آپ کیسے ہیں؟"),
];

/// Result of a phrase lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Phrase found
    Found(String),
    /// No phrase matched; holds the fallback message
    Fallback(String),
}

impl Translation {
    /// Text to show or speak
    pub fn text(&self) -> &str {
        match self {
            Self::Found(text) | Self::Fallback(text) => text,
        }
    }

    /// True when a phrase matched
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Look up a fixed translation for `text`
///
/// Matching is on the trimmed, uppercased text. Configured entries take
/// precedence over the built-in table. With a fuzzy threshold set, the
/// closest phrase by Jaro-Winkler similarity is accepted when no exact
/// entry exists.
pub fn translate(text: &str, config: &PhrasebookConfig) -> Translation {
    let key = text.trim().to_uppercase();

    if let Some(exact) = lookup(&key, config) {
        debug!(phrase = %key, "phrase matched");
        return Translation::Found(exact.to_owned());
    }

    if let Some(threshold) = config.fuzzy_threshold {
        if let Some((phrase, output, score)) = best_fuzzy(&key, config, threshold) {
            info!(
                text = %key,
                phrase = phrase,
                similarity = %score,
                "phrase matched approximately"
            );
            return Translation::Found(output.to_owned());
        }
    }

    debug!(text = %key, "no phrase match, using fallback");
    Translation::Fallback(config.fallback.clone())
}

fn lookup<'c>(key: &str, config: &'c PhrasebookConfig) -> Option<&'c str> {
    config
        .entries
        .iter()
        .find(|(phrase, _)| phrase.trim().to_uppercase() == key)
        .map(|(_, output)| output.as_str())
        .or_else(|| {
            PHRASES
                .iter()
                .find(|(phrase, _)| *phrase == key)
                .map(|&(_, output)| output)
        })
}

fn best_fuzzy<'c>(
    key: &str,
    config: &'c PhrasebookConfig,
    threshold: f64,
) -> Option<(&'c str, &'c str, f64)> {
    let configured = config
        .entries
        .iter()
        .map(|(phrase, output)| (phrase.as_str(), output.as_str()));
    let builtin: &'c [(&'c str, &'c str)] = PHRASES;

    configured
        .chain(builtin.iter().copied())
        .map(|(phrase, output)| {
            let similarity = strsim::jaro_winkler(key, &phrase.to_uppercase());
            (phrase, output, similarity)
        })
        .filter(|&(_, _, similarity)| similarity >= threshold)
        .max_by(|a, b| a.2.total_cmp(&b.2))
}
