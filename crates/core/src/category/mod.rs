//! Category module
//!
//! Categories group tasks. Tasks hold a weak reference to a category id;
//! see `Desk::delete_category` for the cleanup run on deletion.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::fields::trim_to_none;
use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub color: String,
}

impl Record for Category {
    const KIND: &'static str = "Category";

    fn id(&self) -> u64 {
        self.id
    }
}

impl Category {
    pub fn new(id: u64, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
        }
    }

    /// Case-insensitive name comparison used for the uniqueness rule
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

/// Categories written to a fresh data directory
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new(1, "Work", "#3b82f6"),
        Category::new(2, "Personal", "#10b981"),
        Category::new(3, "Shopping", "#f59e0b"),
        Category::new(4, "Health", "#ef4444"),
        Category::new(5, "Education", "#8b5cf6"),
    ]
}

const INVALID_COLOR: &str = "Category color must be a hex value like #3b82f6";

/// `#rrggbb` with hex digits in either case
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Random `#rrggbb` colour for categories created without one
pub fn random_color() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..=0xFF_FFFF);
    format!("#{:06x}", value)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Category name is required".to_string());
        }
        let color = self.color.as_deref().map(str::trim).filter(|c| !c.is_empty());
        if color.is_some_and(|c| !is_hex_color(c)) {
            errors.push(INVALID_COLOR.to_string());
        }
        errors
    }

    pub fn into_category(self, id: u64) -> Category {
        Category {
            id,
            name: self.name.trim().to_string(),
            color: trim_to_none(self.color).unwrap_or_else(random_color),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl CategoryPatch {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            errors.push("Category name cannot be empty".to_string());
        }
        match self.color.as_deref().map(str::trim) {
            Some("") => errors.push("Category color cannot be empty".to_string()),
            Some(color) if !is_hex_color(color) => errors.push(INVALID_COLOR.to_string()),
            _ => {}
        }
        errors
    }

    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name.trim().to_string();
        }
        if let Some(color) = self.color {
            category.color = color.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_color_format() {
        for _ in 0..20 {
            let color = random_color();
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
            assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_default_categories_have_unique_ids_and_names() {
        let defaults = default_categories();
        assert_eq!(defaults.len(), 5);
        for (index, category) in defaults.iter().enumerate() {
            assert_eq!(category.id, index as u64 + 1);
            let same_name = defaults.iter().filter(|c| c.has_name(&category.name)).count();
            assert_eq!(same_name, 1);
        }
    }

    #[test]
    fn test_new_category_gets_color() {
        let category = NewCategory::new(" Hobbies ").into_category(6);
        assert_eq!(category.name, "Hobbies");
        assert!(category.color.starts_with('#'));
    }

    #[test]
    fn test_blank_name_is_invalid() {
        assert_eq!(
            NewCategory::new("  ").validate(),
            vec!["Category name is required"]
        );
        let patch = CategoryPatch {
            name: Some(String::new()),
            ..CategoryPatch::default()
        };
        assert_eq!(patch.validate(), vec!["Category name cannot be empty"]);
    }

    #[test]
    fn test_hex_color_format() {
        assert!(is_hex_color("#3b82f6"));
        assert!(is_hex_color("#ABCDEF"));
        assert!(!is_hex_color("3b82f6"));
        assert!(!is_hex_color("#3b82f"));
        assert!(!is_hex_color("#3b82fg"));
        assert!(!is_hex_color("#3b82f6ff"));
        assert!(!is_hex_color("not a colour"));
    }

    #[test]
    fn test_malformed_color_is_invalid() {
        let input = NewCategory {
            color: Some("not a colour".to_string()),
            ..NewCategory::new("X")
        };
        assert_eq!(
            input.validate(),
            vec!["Category color must be a hex value like #3b82f6"]
        );

        let padded = NewCategory {
            color: Some(" #10B981 ".to_string()),
            ..NewCategory::new("Y")
        };
        assert!(padded.validate().is_empty());
        assert_eq!(padded.into_category(1).color, "#10B981");

        let patch = CategoryPatch {
            color: Some("red".to_string()),
            ..CategoryPatch::default()
        };
        assert_eq!(
            patch.validate(),
            vec!["Category color must be a hex value like #3b82f6"]
        );
    }

    #[test]
    fn test_has_name_ignores_case_and_padding() {
        let category = Category::new(1, "Work", "#3b82f6");
        assert!(category.has_name(" work "));
        assert!(!category.has_name("Workout"));
    }
}
