//! Error types for sqlbridge

use thiserror::Error;

/// Result type alias for sqlbridge operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Establishing the native handle failed
    #[error("Connection error: {message}")]
    Connect {
        message: String,
        /// SQLSTATE reported by the server, when the handshake got that far
        code: Option<String>,
    },

    /// Statement execution failed
    #[error("Query error: {message}")]
    Query {
        message: String,
        /// Five-character SQLSTATE; `None` for client-side failures
        code: Option<String>,
        /// The statement text that failed
        sql: String,
    },

    /// Empty or invalid table reference
    #[error("Table not defined: '{0}'")]
    TableNotDefined(String),

    /// Malformed field/value specification
    #[error("Invalid field: {message}")]
    InvalidField {
        message: String,
        /// Rendering of the offending input
        data: String,
    },

    /// Recursion or escape depth exceeded
    #[error("Too many loops '{0}'")]
    TooManyLoops(usize),

    /// Unsupported row-fetch mode requested
    #[error("Unknown fetch type '{0}' - must be 'assoc', 'num', 'object' or 'both'")]
    UnknownFetchType(String),

    /// Post-insert identifier unobtainable
    #[error("{0}")]
    GetData(String),

    /// Capability not implemented or misused by the chosen backend
    #[error("Driver error: {0}")]
    Driver(String),
}

impl DbError {
    /// Create a connection error.
    pub fn connect(message: impl Into<String>, code: Option<String>) -> Self {
        Self::Connect {
            message: message.into(),
            code,
        }
    }

    /// Create a query error carrying the failed statement text.
    pub fn query(message: impl Into<String>, code: Option<String>, sql: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
            code,
            sql: sql.into(),
        }
    }

    /// Create an invalid-field error carrying the offending input.
    pub fn invalid_field(message: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InvalidField {
            message: message.into(),
            data: data.into(),
        }
    }

    /// Create a driver-capability error.
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver(message.into())
    }

    /// SQLSTATE carried by this error, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Connect { code, .. } | Self::Query { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Statement text carried by this error, if any.
    pub fn sql(&self) -> Option<&str> {
        match self {
            Self::Query { sql, .. } => Some(sql),
            _ => None,
        }
    }

    /// Check if this is a query-execution error.
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query { .. })
    }

    /// Check if this is a connection error.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }

    /// Check if this is a table-not-defined error.
    pub fn is_table_not_defined(&self) -> bool {
        matches!(self, Self::TableNotDefined(_))
    }

    /// Check if this is an invalid-field error.
    pub fn is_invalid_field(&self) -> bool {
        matches!(self, Self::InvalidField { .. })
    }

    /// Check if this is a loop-guard error.
    pub fn is_too_many_loops(&self) -> bool {
        matches!(self, Self::TooManyLoops(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_carries_sql_and_code() {
        let err = DbError::query(
            "Duplicate entry '5' for key 'PRIMARY'",
            Some("23000".to_string()),
            "INSERT INTO t (`id`) VALUES ('5')",
        );
        assert!(err.is_query());
        assert_eq!(err.code(), Some("23000"));
        assert_eq!(err.sql(), Some("INSERT INTO t (`id`) VALUES ('5')"));
    }

    #[test]
    fn connect_error_display() {
        let err = DbError::connect("Access denied for user", Some("28000".to_string()));
        assert_eq!(err.to_string(), "Connection error: Access denied for user");
        assert_eq!(err.code(), Some("28000"));
    }

    #[test]
    fn non_query_errors_carry_no_sql() {
        assert_eq!(DbError::TableNotDefined(String::new()).sql(), None);
        assert_eq!(DbError::TooManyLoops(1001).code(), None);
    }

    #[test]
    fn unknown_fetch_type_names_the_mode() {
        let err = DbError::UnknownFetchType("rows".to_string());
        assert!(err.to_string().contains("'rows'"));
    }
}
