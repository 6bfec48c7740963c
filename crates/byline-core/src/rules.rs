//! Rule set consulted by the [`Validator`](crate::Validator).
//!
//! The literal lists (allowed categories, clickbait phrases) and the length
//! bounds are data rather than code so they can be loaded from configuration.
//! [`Rules::default`] reproduces the stock rules.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PHONE_NUMBER_DIGITS: usize = 10;
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 250;
pub const DEFAULT_MAX_SUMMARY_CHARS: usize = 250;
pub const DEFAULT_CATEGORIES: [&str; 2] = ["Fiction", "Non-Fiction"];
pub const DEFAULT_CLICKBAIT_PHRASES: [&str; 4] = ["Won't Believe", "Secret", "Top", "Guess"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub author: AuthorRules,
    pub post: PostRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorRules {
    /// Exact number of decimal digits in a phone number.
    pub phone_number_digits: usize,
}

impl Default for AuthorRules {
    fn default() -> Self {
        Self {
            phone_number_digits: DEFAULT_PHONE_NUMBER_DIGITS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostRules {
    pub min_content_chars: usize,
    pub max_summary_chars: usize,
    /// Closed set of accepted categories, matched exactly.
    pub categories: Vec<String>,
    /// A title must contain at least one of these, case-sensitive.
    pub clickbait_phrases: Vec<String>,
}

impl Default for PostRules {
    fn default() -> Self {
        Self {
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
            max_summary_chars: DEFAULT_MAX_SUMMARY_CHARS,
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            clickbait_phrases: DEFAULT_CLICKBAIT_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl PostRules {
    pub fn is_category(&self, value: &str) -> bool {
        self.categories.iter().any(|c| c == value)
    }

    pub fn is_clickbait(&self, title: &str) -> bool {
        self.clickbait_phrases
            .iter()
            .any(|phrase| title.contains(phrase.as_str()))
    }

    /// Allowed categories formatted for error messages, e.g. `Fiction or Non-Fiction`.
    pub fn describe_categories(&self) -> String {
        self.categories.join(" or ")
    }
}
