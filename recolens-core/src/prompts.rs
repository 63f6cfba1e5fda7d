//! Prompt catalog: one template per category plus a fixed system prompt

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder replaced by the detection summary
pub const OBJECTS_PLACEHOLDER: &str = "{objects}";

const SYSTEM_PROMPT: &str =
    "You are an expert interior/fashion designer providing specific recommendations.";

// Continuation lines carry leading indentation and are sent as-is
const STUDY_DESK_TEMPLATE: &str = concat!(
    "Given a study desk setup with the following items: {objects}\n",
    "                            Please provide specific recommendations for:\n",
    "                            1. Ergonomic improvements\n",
    "                            2. Productivity enhancements\n",
    "                            3. Aesthetic improvements\n",
    "                            4. Additional items to consider\n",
    "                            Make suggestions detailed and actionable.",
);

const INTERIOR_TEMPLATE: &str = concat!(
    "In this room, I notice: {objects}\n",
    "                          Please provide specific recommendations for:\n",
    "                          1. Layout optimization\n",
    "                          2. Color scheme improvements\n",
    "                          3. Additional furniture or decor\n",
    "                          4. Lighting suggestions\n",
    "                          Make suggestions practical and stylish.",
);

const FASHION_TEMPLATE: &str = concat!(
    "The outfit includes: {objects}\n",
    "                         Please provide specific recommendations for:\n",
    "                         1. Style improvements\n",
    "                         2. Complementary items\n",
    "                         3. Color coordination\n",
    "                         4. Accessory suggestions\n",
    "                         Make suggestions trendy and practical.",
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    StudyDesk,
    Interior,
    Fashion,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::StudyDesk, Category::Interior, Category::Fashion];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::StudyDesk => "study_desk",
            Category::Interior => "interior",
            Category::Fashion => "fashion",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "study_desk" => Some(Category::StudyDesk),
            "interior" => Some(Category::Interior),
            "fashion" => Some(Category::Fashion),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::StudyDesk => "Study Desk",
            Category::Interior => "Interior",
            Category::Fashion => "Fashion",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            Category::StudyDesk => STUDY_DESK_TEMPLATE,
            Category::Interior => INTERIOR_TEMPLATE,
            Category::Fashion => FASHION_TEMPLATE,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {:?}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_key(s).ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// System and user prompt for a single request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPair {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Fixed category to template lookup table
pub struct PromptCatalog;

impl PromptCatalog {
    /// Template for a category key, or `None` for anything not in the catalog
    pub fn template_for(key: &str) -> Option<&'static str> {
        Category::from_key(key).map(|c| c.template())
    }

    pub fn system_prompt() -> &'static str {
        SYSTEM_PROMPT
    }

    /// Substitute the detection summary at the placeholder. Only the first
    /// placeholder is replaced and the summary itself is never re-scanned.
    pub fn render(template: &str, objects: &str) -> String {
        template.replacen(OBJECTS_PLACEHOLDER, objects, 1)
    }

    pub fn build(category: Category, objects: &str) -> PromptPair {
        PromptPair {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: Self::render(category.template(), objects),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_for_known_keys() {
        for category in Category::ALL {
            let template = PromptCatalog::template_for(category.as_str());
            assert_eq!(template, Some(category.template()));
        }
    }

    #[test]
    fn test_template_for_unknown_keys() {
        let keys = [
            "",
            "Study_Desk",
            "STUDY_DESK",
            "Interior",
            " interior",
            "fashion ",
            "kitchen",
            "study desk",
        ];
        for key in keys {
            assert_eq!(PromptCatalog::template_for(key), None, "key {:?}", key);
        }
    }

    #[test]
    fn test_every_template_has_one_placeholder() {
        for category in Category::ALL {
            assert_eq!(
                category.template().matches(OBJECTS_PLACEHOLDER).count(),
                1,
                "{}",
                category
            );
        }
    }

    #[test]
    fn test_render_substitutes_only_placeholder() {
        let summary = "chair (0.87), lamp (0.73)";
        let template = PromptCatalog::template_for("study_desk").unwrap();
        let rendered = PromptCatalog::render(template, summary);

        let (before, after) = template.split_once(OBJECTS_PLACEHOLDER).unwrap();
        assert_eq!(rendered, format!("{}{}{}", before, summary, after));
        assert!(rendered.starts_with(
            "Given a study desk setup with the following items: chair (0.87), lamp (0.73)\n"
        ));
        assert!(!rendered.contains(OBJECTS_PLACEHOLDER));
    }

    #[test]
    fn test_template_lines_keep_indentation() {
        let expected = [
            (Category::StudyDesk, 28),
            (Category::Interior, 26),
            (Category::Fashion, 25),
        ];
        for (category, indent) in expected {
            let lines: Vec<&str> = category.template().split('\n').collect();
            assert_eq!(lines.len(), 7, "{}", category);
            assert!(!lines[0].starts_with(' '));
            for line in &lines[1..] {
                let leading = line.len() - line.trim_start_matches(' ').len();
                assert_eq!(leading, indent, "{}: {:?}", category, line);
            }
            assert!(lines[1].ends_with("Please provide specific recommendations for:"));
            assert!(!category.template().ends_with('\n'));
        }
    }

    #[test]
    fn test_render_does_not_expand_summary() {
        let rendered = PromptCatalog::render("items: {objects}", "odd {objects} label");
        assert_eq!(rendered, "items: odd {objects} label");
    }

    #[test]
    fn test_system_prompt_constant() {
        let a = PromptCatalog::build(Category::Fashion, "tie (0.90)");
        let b = PromptCatalog::build(Category::Interior, "bed (0.90)");
        assert_eq!(a.system_prompt, b.system_prompt);
        assert_eq!(a.system_prompt, PromptCatalog::system_prompt());
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("fashion".parse::<Category>(), Ok(Category::Fashion));
        assert_eq!(
            "Fashion".parse::<Category>(),
            Err(UnknownCategory("Fashion".to_string()))
        );
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Category::StudyDesk.display_name(), "Study Desk");
        assert_eq!(Category::Interior.display_name(), "Interior");
        assert_eq!(Category::Fashion.display_name(), "Fashion");
        assert_eq!(Category::StudyDesk.to_string(), "study_desk");
    }

    #[test]
    fn test_serde_uses_wire_keys() {
        let json = serde_json::to_string(&Category::StudyDesk).unwrap();
        assert_eq!(json, "\"study_desk\"");
        let parsed: Category = serde_json::from_str("\"interior\"").unwrap();
        assert_eq!(parsed, Category::Interior);
    }
}
