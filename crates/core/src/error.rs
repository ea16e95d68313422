use std::fmt;

#[derive(Debug)]
pub enum Error {
    ConfigParse(String),
    IoError(std::io::Error),
    InvalidData(String),
    /// A content entry broke the schema. Fatal to the collection load.
    SchemaValidation {
        entry: String,
        field: String,
        message: String,
    },
    /// The validated collection could not be obtained.
    CollectionUnavailable(String),
}

impl Error {
    pub fn schema(entry: impl Into<String>, field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::SchemaValidation {
            entry: entry.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigParse(msg) => write!(f, "Configuration parse error: {}", msg),
            Error::IoError(err) => write!(f, "IO error: {}", err),
            Error::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            Error::SchemaValidation {
                entry,
                field,
                message,
            } => write!(
                f,
                "Schema validation failed for '{}': field '{}': {}",
                entry, field, message
            ),
            Error::CollectionUnavailable(msg) => write!(f, "Collection unavailable: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::InvalidData(format!("YAML error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
