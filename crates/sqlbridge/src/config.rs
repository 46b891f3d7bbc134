//! Connection configuration.
//!
//! A [`Config`] is immutable once the [`Database`](crate::Database) owning it
//! has been constructed; changing database or charset afterwards goes through
//! the corresponding façade operation, never by mutating the config.

/// Default port when the host string carries none.
const DEFAULT_PORT: u16 = 3306;

/// Connection configuration for a [`Database`](crate::Database).
#[derive(Debug, Clone)]
pub struct Config {
    /// Host name, optionally `host:port`.
    pub host: String,
    /// Database (schema) name. Backtick and whitespace padding is trimmed at
    /// construction so identifier quoting stays canonical.
    pub database: String,
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
    /// Table-name prefix prepended by `get_full_table_name`.
    pub prefix: String,
    /// Connection character set.
    pub charset: String,
    /// Collation paired with the charset statement.
    pub collation: String,
    /// Verb of the charset statement (`SET CHARACTER SET` or `SET NAMES`).
    pub method: String,
    /// Optional identifier when several named connections coexist.
    pub connection_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::new(),
            database: String::new(),
            username: String::new(),
            password: String::new(),
            prefix: String::new(),
            charset: "utf8mb4".to_string(),
            collation: "utf8mb4_unicode_ci".to_string(),
            method: "SET CHARACTER SET".to_string(),
            connection_name: None,
        }
    }
}

impl Config {
    /// Create a configuration with the four required parameters and defaults
    /// for everything else.
    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            database: trim_database(&database.into()),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Set the table-name prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the connection character set.
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Set the collation.
    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = collation.into();
        self
    }

    /// Set the charset statement verb (commonly `SET NAMES`).
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Name this connection.
    pub fn connection_name(mut self, name: impl Into<String>) -> Self {
        self.connection_name = Some(name.into());
        self
    }

    /// Split `host` into a host name and port, defaulting to 3306.
    pub fn host_and_port(&self) -> (String, u16) {
        match self.host.rsplit_once(':') {
            Some((host, port)) => match port.parse::<u16>() {
                Ok(port) => (host.to_string(), port),
                Err(_) => (self.host.clone(), DEFAULT_PORT),
            },
            None => (self.host.clone(), DEFAULT_PORT),
        }
    }
}

fn trim_database(name: &str) -> String {
    name.trim().trim_matches('`').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.charset, "utf8mb4");
        assert_eq!(config.collation, "utf8mb4_unicode_ci");
        assert_eq!(config.method, "SET CHARACTER SET");
    }

    #[test]
    fn database_padding_is_trimmed() {
        let config = Config::new("localhost", " `modx` ", "user", "pass");
        assert_eq!(config.database, "modx");
    }

    #[test]
    fn builder_setters() {
        let config = Config::new("localhost", "modx", "user", "pass")
            .prefix("modx_")
            .method("SET NAMES")
            .collation("utf8mb4_general_ci");
        assert_eq!(config.prefix, "modx_");
        assert_eq!(config.method, "SET NAMES");
        assert_eq!(config.collation, "utf8mb4_general_ci");
    }

    #[test]
    fn host_port_parsing() {
        let config = Config::new("db.local:3307", "modx", "u", "p");
        assert_eq!(config.host_and_port(), ("db.local".to_string(), 3307));

        let config = Config::new("db.local", "modx", "u", "p");
        assert_eq!(config.host_and_port(), ("db.local".to_string(), 3306));
    }
}
