//! Text search over resource fields.

use resources_sdk::Resource;

/// Case-insensitive substring predicate over named fields.
///
/// An empty (or whitespace-only) text matches everything. An empty field list
/// falls back to the resource's default search fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    text: String,
    needle: String,
    fields: Vec<String>,
}

impl Filter {
    #[must_use]
    pub fn new(text: &str, fields: &[&str]) -> Self {
        Self {
            text: text.to_owned(),
            needle: text.trim().to_lowercase(),
            fields: fields.iter().map(|f| (*f).to_owned()).collect(),
        }
    }

    /// The text as entered.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    #[must_use]
    pub fn matches<R: Resource>(&self, item: &R) -> bool {
        if self.is_empty() {
            return true;
        }
        let hit = |field: &str| {
            item.field_text(field)
                .is_some_and(|value| value.to_lowercase().contains(&self.needle))
        };
        if self.fields.is_empty() {
            R::SEARCH_FIELDS.iter().any(|f| hit(f))
        } else {
            self.fields.iter().any(|f| hit(f))
        }
    }

    /// Matching items in collection order.
    #[must_use]
    pub fn apply<R: Resource>(&self, items: &[R]) -> Vec<R> {
        if self.is_empty() {
            return items.to_vec();
        }
        items.iter().filter(|item| self.matches(*item)).cloned().collect()
    }
}
