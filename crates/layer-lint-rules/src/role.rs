//! Architectural role of a layer, derived from its name.
//!
//! Placement and anti-pattern checks do not know what a user calls their
//! layers, so they classify layer names by vocabulary: `views` and `ui` are
//! presentation, `viewmodels` and `store` hold state, and so on.

/// Coarse architectural role of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerRole {
    /// UI / view code.
    Presentation,
    /// View models, presenters, stores.
    StateHolder,
    /// Business rules and entities.
    Domain,
    /// Repositories, persistence, networking.
    Data,
    /// Anything else.
    Other,
}

const STATE_HOLDER_WORDS: &[&str] = &["viewmodel", "presenter", "store", "state", "bloc"];
const PRESENTATION_WORDS: &[&str] = &[
    "presentation",
    "ui",
    "view",
    "screen",
    "component",
    "page",
    "widget",
];
const DOMAIN_WORDS: &[&str] = &["domain", "business", "usecase", "entity", "entities", "core"];
const DATA_WORDS: &[&str] = &[
    "data",
    "repository",
    "repositories",
    "infra",
    "infrastructure",
    "persistence",
    "api",
    "network",
    "networking",
    "db",
    "database",
    "remote",
];

impl LayerRole {
    /// Classifies a layer name.
    ///
    /// The name is split on non-alphanumeric characters; a word matches a
    /// role when it equals one of the role's words, optionally followed by a
    /// plural `s`. State holders are checked before presentation so that
    /// `view-model` and `viewmodels` are not mistaken for views.
    #[must_use]
    pub fn classify(layer: &str) -> Self {
        let lower = layer.to_ascii_lowercase();
        let joined: String = lower.chars().filter(char::is_ascii_alphanumeric).collect();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let hit = |vocab: &[&str]| {
            words.iter().any(|w| word_in(w, vocab))
                || (words.len() > 1 && word_in(&joined, vocab))
        };

        if hit(STATE_HOLDER_WORDS) {
            Self::StateHolder
        } else if hit(PRESENTATION_WORDS) {
            Self::Presentation
        } else if hit(DOMAIN_WORDS) {
            Self::Domain
        } else if hit(DATA_WORDS) {
            Self::Data
        } else {
            Self::Other
        }
    }
}

fn word_in(word: &str, vocab: &[&str]) -> bool {
    vocab
        .iter()
        .any(|v| word == *v || word.strip_suffix('s') == Some(*v))
}
