use serde::{Deserialize, Serialize};

/// Builder behavior switches.
///
/// All fields have defaults, so a partial document deserializes cleanly:
///
/// ```
/// use querykit::BuilderConfig;
///
/// let config: BuilderConfig = serde_json::from_str(r#"{ "trace_sql": true }"#).unwrap();
/// assert!(config.sanitize_identifiers);
/// assert!(config.trace_sql);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Run table/column names and comparison operators through the sanitizer.
    pub sanitize_identifiers: bool,
    /// Emit a `querykit.sql` debug event for every build.
    pub trace_sql: bool,
    /// Truncate logged SQL (in bytes, on a char boundary). `None` disables truncation.
    pub max_sql_log_length: Option<usize>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            sanitize_identifiers: true,
            trace_sql: false,
            max_sql_log_length: Some(200),
        }
    }
}

impl BuilderConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sanitize_identifiers(mut self, enabled: bool) -> Self {
        self.sanitize_identifiers = enabled;
        self
    }

    pub fn trace_sql(mut self, enabled: bool) -> Self {
        self.trace_sql = enabled;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_sql_log_length(mut self, len: usize) -> Self {
        self.max_sql_log_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_log_length = None;
        self
    }
}
