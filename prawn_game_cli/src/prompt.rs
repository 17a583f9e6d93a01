use std::fmt;

use serde::{Deserialize, Serialize};

pub type PromptId = u32;

/// One catalog entry. Never mutated once the catalog is loaded.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Prompt {
    pub id: PromptId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub wildcard: bool,
}

impl Prompt {
    pub fn new(id: PromptId, text: impl Into<String>) -> Self {
        Self { id, text: text.into(), category: None, wildcard: false }
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn as_wildcard(mut self) -> Self {
        self.wildcard = true;
        self
    }

    pub fn is_universal(&self) -> bool {
        self.category.is_none()
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wildcard {
            write!(f, "[wildcard] {}", self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let p: Prompt = serde_json::from_str(r#"{ "id": 7, "text": "hi" }"#).unwrap();
        assert_eq!(p, Prompt::new(7, "hi"));
        assert!(p.is_universal());
        assert!(!p.wildcard);
    }

    #[test]
    fn wildcard_display_carries_badge() {
        let q = Prompt::new(1, "Why?").in_category("Reflection");
        let w = Prompt::new(2, "Hug someone.").as_wildcard();
        assert_eq!(q.to_string(), "Why?");
        assert_eq!(w.to_string(), "[wildcard] Hug someone.");
    }
}
