// Copyright 2023 Remi Bernotavicius

use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Store(#[from] diesel::result::Error),

    #[error("failed to open database: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("failed to apply database schema: {0}")]
    Migration(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("failed to read input: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to initialize logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl Error {
    pub fn not_found(entity: &'static str, id: impl Into<i32>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn validation(message: impl fmt::Display) -> Self {
        Self::Validation(message.to_string())
    }

    /// Errors the user caused by asking for something that isn't there or typing something
    /// unparseable. These abort the current action but are not a failure of the program.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[test]
fn user_errors() {
    assert!(Error::not_found("Recipe", 3).is_user_error());
    assert!(Error::validation("Quantity must be a number").is_user_error());
    assert!(!Error::Store(diesel::result::Error::NotFound).is_user_error());

    assert_eq!(
        Error::not_found("Category", 7).to_string(),
        "Category with ID 7 not found"
    );
}
