use crate::entity::{AuthorChanges, NewAuthor, NewPost, PostChanges};
use crate::error::{CoreError, ValidationError};
use crate::rules::Rules;
use crate::storage::AuthorDirectory;

/// Write-time field validation for authors and posts.
///
/// Each `validate_*` method checks a single field value and hands it back
/// unchanged when it is accepted.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: Rules,
}

impl Validator {
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Validate an author name.
    /// Must be non-empty and not already used by any author in `authors`.
    pub fn validate_name<'a, D>(&self, name: &'a str, authors: &D) -> Result<&'a str, CoreError>
    where
        D: AuthorDirectory + ?Sized,
    {
        if name.is_empty() {
            return Err(ValidationError::MissingName.into());
        }
        if authors.find_by_name(name)?.is_some() {
            return Err(ValidationError::DuplicateName(name.to_string()).into());
        }
        Ok(name)
    }

    /// Validate a phone number.
    /// Must be exactly the configured number of characters, all ASCII digits.
    pub fn validate_phone_number<'a>(&self, phone: &'a str) -> Result<&'a str, ValidationError> {
        let expected = self.rules.author.phone_number_digits;
        let actual = phone.chars().count();
        if actual != expected {
            return Err(ValidationError::PhoneNumberLength { expected, actual });
        }
        if !phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::PhoneNumberNotNumeric);
        }
        Ok(phone)
    }

    /// Validate post content against the minimum length.
    pub fn validate_content<'a>(&self, content: &'a str) -> Result<&'a str, ValidationError> {
        let min = self.rules.post.min_content_chars;
        let actual = content.chars().count();
        if actual < min {
            return Err(ValidationError::ContentTooShort { min, actual });
        }
        Ok(content)
    }

    /// Validate a post summary against the maximum length.
    /// There is no lower bound; an empty summary is accepted.
    pub fn validate_summary<'a>(&self, summary: &'a str) -> Result<&'a str, ValidationError> {
        let max = self.rules.post.max_summary_chars;
        let actual = summary.chars().count();
        if actual > max {
            return Err(ValidationError::SummaryTooLong { max, actual });
        }
        Ok(summary)
    }

    /// Validate a post category. Exact, case-sensitive match only.
    pub fn validate_category<'a>(&self, category: &'a str) -> Result<&'a str, ValidationError> {
        if !self.rules.post.is_category(category) {
            return Err(ValidationError::InvalidCategory {
                value: category.to_string(),
                allowed: self.rules.post.describe_categories(),
            });
        }
        Ok(category)
    }

    /// Validate a post title.
    /// Must have non-whitespace content and contain one of the clickbait phrases.
    pub fn validate_title<'a>(&self, title: &'a str) -> Result<&'a str, ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if !self.rules.post.is_clickbait(title) {
            return Err(ValidationError::TitleNotClickbait);
        }
        Ok(title)
    }

    /// Validate every field of a new author, stopping at the first failure.
    pub fn validate_new_author<D>(&self, author: &NewAuthor, authors: &D) -> Result<(), CoreError>
    where
        D: AuthorDirectory + ?Sized,
    {
        self.validate_name(&author.name, authors)?;
        self.validate_phone_number(&author.phone_number)?;
        Ok(())
    }

    /// Validate the fields assigned by `changes`.
    pub fn validate_author_changes<D>(
        &self,
        changes: &AuthorChanges,
        authors: &D,
    ) -> Result<(), CoreError>
    where
        D: AuthorDirectory + ?Sized,
    {
        if let Some(name) = &changes.name {
            self.validate_name(name, authors)?;
        }
        if let Some(phone) = &changes.phone_number {
            self.validate_phone_number(phone)?;
        }
        Ok(())
    }

    /// Validate every field of a new post, stopping at the first failure.
    pub fn validate_new_post(&self, post: &NewPost) -> Result<(), ValidationError> {
        self.validate_title(&post.title)?;
        self.validate_content(&post.content)?;
        if let Some(summary) = &post.summary {
            self.validate_summary(summary)?;
        }
        if let Some(category) = &post.category {
            self.validate_category(category)?;
        }
        Ok(())
    }

    /// Validate the fields assigned by `changes`.
    pub fn validate_post_changes(&self, changes: &PostChanges) -> Result<(), ValidationError> {
        if let Some(title) = &changes.title {
            self.validate_title(title)?;
        }
        if let Some(content) = &changes.content {
            self.validate_content(content)?;
        }
        if let Some(summary) = &changes.summary {
            self.validate_summary(summary)?;
        }
        if let Some(category) = &changes.category {
            self.validate_category(category)?;
        }
        Ok(())
    }
}
