use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Failed to get file extension")]
    MissingFileExtension,
    #[error("Unsupported file extension for file: {0}")]
    UnsupportedFileExtension(String),
    #[error("YAML serialization failed")]
    Yaml(#[from] serde_yml::Error),
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
}

pub type FormatResult<T> = Result<T, FormatError>;

pub fn get_file_extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|os_str| os_str.to_str())
}

/// Text formats accepted for configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SerdeFormat {
    Yaml,
    Json,
}

impl SerdeFormat {
    pub fn from_path(path: &Path) -> FormatResult<Self> {
        let ext = get_file_extension(path).ok_or(FormatError::MissingFileExtension)?;

        if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Ok(Self::Yaml)
        } else if ext.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(FormatError::UnsupportedFileExtension(
                path.display().to_string(),
            ))
        }
    }

    pub fn serialize<T: Serialize>(self, value: &T) -> FormatResult<String> {
        match self {
            SerdeFormat::Yaml => Ok(serde_yml::to_string(value)?),
            SerdeFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    pub fn deserialize<T: DeserializeOwned>(self, serialized: &str) -> FormatResult<T> {
        match self {
            SerdeFormat::Yaml => Ok(serde_yml::from_str(serialized)?),
            SerdeFormat::Json => Ok(serde_json::from_str(serialized)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        window_ms: u64,
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            SerdeFormat::from_path(Path::new("session.YML")).unwrap(),
            SerdeFormat::Yaml
        );
        assert_eq!(
            SerdeFormat::from_path(Path::new("a/b/session.json")).unwrap(),
            SerdeFormat::Json
        );
        assert!(matches!(
            SerdeFormat::from_path(Path::new("session")),
            Err(FormatError::MissingFileExtension)
        ));
        assert!(matches!(
            SerdeFormat::from_path(Path::new("session.toml")),
            Err(FormatError::UnsupportedFileExtension(_))
        ));
    }

    #[test]
    fn both_formats_read_back_what_they_write() -> anyhow::Result<()> {
        let sample = Sample {
            name: "pair".to_string(),
            window_ms: 250,
        };
        for format in [SerdeFormat::Yaml, SerdeFormat::Json] {
            let text = format.serialize(&sample)?;
            let back: Sample = format.deserialize(&text)?;
            assert_eq!(back, sample);
        }
        Ok(())
    }

    #[test]
    fn malformed_json_is_an_error() {
        let result: FormatResult<Sample> = SerdeFormat::Json.deserialize("{ name: ");
        assert!(matches!(result, Err(FormatError::Json(_))));
    }
}
