use thiserror::Error;

/// Failures raised while turning a provider payload into the domain model.
///
/// Any of these means the whole payload is discarded; callers keep whatever
/// weather they already had cached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("provider returned invalid or incomplete data")]
    InvalidOrIncompleteData,

    #[error("provider returned an unparsable date: '{value}'")]
    InvalidDate { value: String },
}

impl ConvertError {
    pub fn invalid_date(value: impl Into<String>) -> Self {
        ConvertError::InvalidDate { value: value.into() }
    }
}
