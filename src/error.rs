use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiamError {
    #[error("Can not create or update with an empty object. Please see the .delete() method if applicable")]
    EmptyContent,

    #[error("Content key {key} is not of type {expected}")]
    TypeMismatch { key: String, expected: String },

    #[error("'where' is a required field of '{0}'")]
    MissingWhere(&'static str),

    #[error("Could not find the document to be {0}d")]
    NotFound(&'static str),

    #[error("Content must be an object, got {0}")]
    InvalidContent(String),

    #[error("Can not represent an empty collection")]
    EmptyCollectionName,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SiamError {
    /// True for the errors raised by schema validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, SiamError::EmptyContent | SiamError::TypeMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, SiamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = SiamError::TypeMismatch {
            key: "age".to_string(),
            expected: "number".to_string(),
        };
        assert_eq!(err.to_string(), "Content key age is not of type number");
        assert!(err.is_validation());

        assert_eq!(
            SiamError::MissingWhere("update").to_string(),
            "'where' is a required field of 'update'"
        );
        assert_eq!(
            SiamError::NotFound("delete").to_string(),
            "Could not find the document to be deleted"
        );
        assert!(!SiamError::NotFound("update").is_validation());
    }
}
