//! Error types for profile operations

use thiserror::Error;

/// Main error type for AutoYaST profile operations
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Required element not found: {element}")]
    NotFound { element: String },

    #[error("Serialization error: {message}")]
    Serialize { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProfileError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        ProfileError::Parse {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(element: impl Into<String>) -> Self {
        ProfileError::NotFound {
            element: element.into(),
        }
    }

    pub(crate) fn serialize(message: impl Into<String>) -> Self {
        ProfileError::Serialize {
            message: message.into(),
        }
    }

    /// Whether the error stems from malformed input XML
    pub fn is_parse_error(&self) -> bool {
        matches!(self, ProfileError::Parse { .. } | ProfileError::Xml(_))
    }
}

impl From<quick_xml::events::attributes::AttrError> for ProfileError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ProfileError::Xml(err.into())
    }
}
