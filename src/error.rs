use std::error::Error;
use std::fmt;
use std::io;

use crate::i18n::Language;

/// Errors the user gets to see. Each variant renders in the language it was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChefError {
    /// No API key configured; the user has to open settings.
    MissingCredential(Language),
    /// Neither ingredient text nor a photo was supplied.
    MissingInput(Language),
    /// Anything that went wrong talking to the model. The cause is logged, never shown.
    Request(Language),
}

impl ChefError {
    pub fn language(&self) -> Language {
        match self {
            ChefError::MissingCredential(lang)
            | ChefError::MissingInput(lang)
            | ChefError::Request(lang) => *lang,
        }
    }
}

impl fmt::Display for ChefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.language().strings();
        match self {
            ChefError::MissingCredential(_) => f.write_str(t.error_api_key_missing),
            ChefError::MissingInput(_) => f.write_str(t.error_missing),
            ChefError::Request(_) => f.write_str(t.error_kitchen),
        }
    }
}

impl Error for ChefError {}

#[derive(Debug)]
pub enum StorageError {
    Io { key: String, source: io::Error },
    Serialization(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io { key, source } => {
                write!(f, "Failed to write storage key '{}': {}", key, source)
            }
            StorageError::Serialization(err) => write!(f, "Failed to serialize value: {}", err),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StorageError::Io { source, .. } => Some(source),
            StorageError::Serialization(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err)
    }
}
