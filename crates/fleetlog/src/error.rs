//! Error types for fleetlog.
//!
//! Form rejections, missing records and storage failures all surface through
//! the single [`Error`] enum so the binary can pick a message per variant.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong in a fleetlog operation.
#[derive(Error, Debug)]
pub enum Error {
    // --- store ---
    /// The fleet database could not be opened or created.
    #[error("cannot open fleet database at {path}: {source}")]
    DatabaseOpen {
        /// Database file location.
        path: PathBuf,
        /// Error reported by SQLite.
        #[source]
        source: rusqlite::Error,
    },

    /// A statement against the fleet database failed.
    #[error("fleet database error: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The database schema could not be brought up to date.
    #[error("cannot upgrade fleet database: {message}")]
    DatabaseMigration {
        /// What the upgrade tripped over.
        message: String,
    },

    /// The directory holding the database could not be created.
    #[error("cannot create data directory {path}: {source}")]
    DirectoryCreate {
        /// Directory that was requested.
        path: PathBuf,
        /// Error reported by the filesystem.
        #[source]
        source: std::io::Error,
    },

    /// A collection could not be encoded, or an import was not valid JSON.
    #[error("malformed record data: {0}")]
    Json(#[from] serde_json::Error),

    // --- configuration ---
    /// The configuration sources could not be read or merged.
    #[error("cannot read configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// The configuration was read but holds an unusable value.
    #[error("bad configuration: {message}")]
    ConfigValidation {
        /// Which setting is wrong and why.
        message: String,
    },

    // --- forms ---
    /// A required form field was left empty.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the empty field.
        field: &'static str,
    },

    /// A form field could not be parsed.
    #[error("invalid value for {field}: {message}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the parse failure.
        message: String,
    },

    /// A value that must be unique already exists in the collection.
    #[error("a record with {field} '{value}' already exists")]
    Duplicate {
        /// Name of the unique field.
        field: &'static str,
        /// The conflicting value.
        value: String,
    },

    // --- lookups ---
    /// No record with the given identifier exists.
    #[error("no {collection} record with id {id}")]
    NotFound {
        /// Collection that was searched.
        collection: &'static str,
        /// The identifier that was not found.
        id: i64,
    },

    /// The given name does not match any known collection.
    #[error("unknown collection '{0}'")]
    UnknownCollection(String),

    /// A stored collection could not be decoded, and writing to it would
    /// discard what is there.
    #[error("stored {collection} data is unreadable; replace it with `fleetlog import` before changing it")]
    UnreadableCollection {
        /// Collection that failed to decode.
        collection: &'static str,
    },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a missing-field error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create an invalid-field error.
    #[must_use]
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Create a uniqueness violation error.
    #[must_use]
    pub fn duplicate(field: &'static str, value: impl Into<String>) -> Self {
        Self::Duplicate {
            field,
            value: value.into(),
        }
    }

    /// Whether a form rejected the user's input.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. } | Self::InvalidField { .. } | Self::Duplicate { .. }
        )
    }

    /// Whether a lookup by identifier came up empty.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Process exit status for this error.
    ///
    /// `3` for rejected input, `4` for a missing record, `5` for an
    /// unreadable collection, `1` for everything else.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.is_validation_error() {
            3
        } else if self.is_not_found() {
            4
        } else if matches!(self, Self::UnreadableCollection { .. }) {
            5
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = Error::missing_field("plate");
        assert_eq!(err.to_string(), "missing required field: plate");
    }

    #[test]
    fn test_duplicate_display() {
        let err = Error::duplicate("plate", "ABC-1234");
        assert_eq!(
            err.to_string(),
            "a record with plate 'ABC-1234' already exists"
        );
    }

    #[test]
    fn test_invalid_field_display() {
        let err = Error::invalid_field("year", "not a number");
        let msg = err.to_string();
        assert!(msg.contains("year"));
        assert!(msg.contains("not a number"));
    }

    #[test]
    fn test_is_validation_error() {
        assert!(Error::missing_field("make").is_validation_error());
        assert!(Error::invalid_field("year", "x").is_validation_error());
        assert!(Error::duplicate("plate", "X").is_validation_error());
        assert!(!Error::UnknownCollection("cars".to_string()).is_validation_error());
    }

    #[test]
    fn test_is_not_found() {
        let err = Error::NotFound {
            collection: "vehicles",
            id: 42,
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "no vehicles record with id 42");
        assert!(!Error::missing_field("x").is_not_found());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::missing_field("plate").exit_code(), 3);
        assert_eq!(Error::duplicate("plate", "ABC-1234").exit_code(), 3);
        assert_eq!(
            Error::NotFound {
                collection: "drivers",
                id: 7
            }
            .exit_code(),
            4
        );
        assert_eq!(
            Error::UnreadableCollection {
                collection: "vehicles"
            }
            .exit_code(),
            5
        );
        assert_eq!(
            Error::ConfigValidation {
                message: "x".to_string()
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn test_unknown_collection_display() {
        let err = Error::UnknownCollection("cars".to_string());
        assert_eq!(err.to_string(), "unknown collection 'cars'");
    }

    #[test]
    fn test_sqlite_error_converts() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let sqlite_err = conn.execute("SELECT * FROM no_such_table", []).unwrap_err();
        let err: Error = sqlite_err.into();
        assert!(matches!(err, Error::DatabaseQuery(_)));
        assert!(err.to_string().starts_with("fleet database error"));
    }

    #[test]
    fn test_json_error_converts() {
        let json_err = serde_json::from_str::<Vec<i64>>("[1, oops]").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_store_errors_name_the_path() {
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/srv/fleet"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/srv/fleet"));

        let err = Error::DatabaseMigration {
            message: "unknown migration version: 9".to_string(),
        };
        assert!(err.to_string().contains("version: 9"));
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::ConfigValidation {
            message: "report.title must not be empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "bad configuration: report.title must not be empty"
        );
    }
}
