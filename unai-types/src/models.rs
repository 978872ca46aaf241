//! Static model catalog.

use serde::{Deserialize, Serialize};

/// Model used when nothing has been selected yet.
pub const DEFAULT_MODEL: &str = "cognitivecomputations/dolphin-mistral-24b-venice-edition:free";

/// `(id, display name)` pairs of the models offered for selection.
const CATALOG: &[(&str, &str)] = &[
    (DEFAULT_MODEL, "Dolphin Mistral 24B"),
    ("mistralai/mistral-7b-instruct:free", "Mistral 7B"),
    ("openchat/openchat-7b:free", "OpenChat 7B"),
    ("meta-llama/llama-3-8b-instruct:free", "Llama 3 8B"),
    ("nousresearch/nous-hermes-2-mixtral-8x7b-dpo:free", "Nous Hermes 2"),
    ("google/gemma-7b-it:free", "Google Gemma 7B"),
    ("deepseek/deepseek-r1:free", "DeepSeek R1"),
];

/// A model that can be selected for a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Provider-specific model identifier, sent verbatim as `model`.
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
}

impl ModelDescriptor {
    /// Create a descriptor.
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// The full model catalog, in presentation order.
#[must_use]
pub fn catalog() -> Vec<ModelDescriptor> {
    CATALOG
        .iter()
        .map(|(id, name)| ModelDescriptor::new(*id, *name))
        .collect()
}

/// Look up a catalog entry by id.
#[must_use]
pub fn find_model(id: &str) -> Option<ModelDescriptor> {
    CATALOG
        .iter()
        .find(|(model_id, _)| *model_id == id)
        .map(|(model_id, name)| ModelDescriptor::new(*model_id, *name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_in_catalog() {
        assert!(find_model(DEFAULT_MODEL).is_some());
        assert_eq!(catalog()[0].id, DEFAULT_MODEL);
    }

    #[test]
    fn catalog_ids_are_unique() {
        let models = catalog();
        for (i, a) in models.iter().enumerate() {
            for b in &models[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn unknown_model_is_none() {
        assert!(find_model("no/such-model").is_none());
    }

    #[test]
    fn find_returns_display_name() {
        let model = find_model("mistralai/mistral-7b-instruct:free").unwrap();
        assert_eq!(model.display_name, "Mistral 7B");
    }
}
