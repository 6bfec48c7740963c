use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A field value was rejected by one of the write-time rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("All authors must have a name")]
    MissingName,

    #[error("Author with name '{0}' already exists")]
    DuplicateName(String),

    #[error("The phone number MUST be {expected} digits (got {actual} characters)")]
    PhoneNumberLength { expected: usize, actual: usize },

    #[error("The phone number must contain digits only")]
    PhoneNumberNotNumeric,

    #[error("The post content MUST be at least {min} characters long (got {actual})")]
    ContentTooShort { min: usize, actual: usize },

    #[error("Post summary should be a maximum of {max} characters (got {actual})")]
    SummaryTooLong { max: usize, actual: usize },

    #[error("Post category can only be one of {allowed}, got '{value}'")]
    InvalidCategory { value: String, allowed: String },

    #[error("Title CANNOT be empty")]
    EmptyTitle,

    #[error("Your title is not click-baity")]
    TitleNotClickbait,
}

impl ValidationError {
    /// Name of the field whose value was rejected.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingName | ValidationError::DuplicateName(_) => "name",
            ValidationError::PhoneNumberLength { .. } | ValidationError::PhoneNumberNotNumeric => {
                "phone_number"
            }
            ValidationError::ContentTooShort { .. } => "content",
            ValidationError::SummaryTooLong { .. } => "summary",
            ValidationError::InvalidCategory { .. } => "category",
            ValidationError::EmptyTitle | ValidationError::TitleNotClickbait => "title",
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
}
