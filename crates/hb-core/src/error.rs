use thiserror::Error;

/// The main error type for hb-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// Environment variable error
  #[error("Environment variable error: {0}")]
  EnvVar(#[from] std::env::VarError),

  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// A required value still holds its template placeholder
  #[error("{name} still holds the placeholder value '{value}'")]
  Placeholder { name: &'static str, value: String },

  /// Serialization/Deserialization error
  #[error("Serialization error: {0}")]
  Serde(#[from] serde_json::Error),

  /// Date/Time parsing error
  #[error("Date parsing error: {0}")]
  ParseDate(#[from] chrono::ParseError),

  /// IO error while reading a configuration file
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

/// Result type alias for hb-* crates
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_placeholder_display() {
    let err = Error::Placeholder { name: "TELEGRAM_CHAT_ID", value: "YOUR_CHAT_ID".to_string() };
    assert_eq!(err.to_string(), "TELEGRAM_CHAT_ID still holds the placeholder value 'YOUR_CHAT_ID'");
  }

  #[test]
  fn test_config_display() {
    let err = Error::Config("bot name must not be empty".to_string());
    assert_eq!(err.to_string(), "Configuration error: bot name must not be empty");
  }

  #[test]
  fn test_from_parse_error() {
    let parse_err = chrono::NaiveDate::parse_from_str("2025-13-40", "%Y-%m-%d").unwrap_err();
    let err = Error::from(parse_err);
    assert!(matches!(err, Error::ParseDate(_)));
  }
}
