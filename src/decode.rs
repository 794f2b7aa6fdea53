//! Body decoding
//!
//! Document bodies are decoded by file extension: `.json` via serde_json,
//! `.yml` via serde_yaml. Both decode into a `serde_json::Value` so that
//! YAML mappings keep object semantics when re-encoded for the wire.

use std::path::Path;

use crate::error::ImportError;

/// Supported document body formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Json,
    Yaml,
}

impl FileKind {
    /// Determine the format from a file extension. Anything other than
    /// `.json` or `.yml` is an unknown file type.
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yml") => Ok(Self::Yaml),
            _ => Err(ImportError::UnknownFileType {
                file: path.display().to_string(),
            }),
        }
    }
}

/// Decode a (rewritten) body into the payload value sent to the remote API.
pub fn decode_body(body: &str, path: &Path) -> Result<serde_json::Value, ImportError> {
    let file = path.display().to_string();
    match FileKind::from_path(path)? {
        FileKind::Json => serde_json::from_str(body).map_err(|e| ImportError::Parse {
            file,
            message: e.to_string(),
        }),
        FileKind::Yaml => serde_yaml::from_str(body).map_err(|e| ImportError::Parse {
            file,
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(FileKind::from_path(Path::new("a/b.json")).unwrap(), FileKind::Json);
        assert_eq!(FileKind::from_path(Path::new("a/b.yml")).unwrap(), FileKind::Yaml);
        assert!(matches!(
            FileKind::from_path(Path::new("a/b.yaml")),
            Err(ImportError::UnknownFileType { .. })
        ));
        assert!(FileKind::from_path(Path::new("noextension")).is_err());
    }

    #[test]
    fn test_decode_json() {
        let value = decode_body("{\"id\": \"app\", \"order\": 2}", Path::new("x.json")).unwrap();
        assert_eq!(value["id"], "app");
        assert_eq!(value["order"], 2);
    }

    #[test]
    fn test_decode_yaml_keeps_object_semantics() {
        let value = decode_body("id: app\nsettings: {}\n", Path::new("x.yml")).unwrap();
        assert_eq!(value["id"], "app");
        assert!(value["settings"].is_object());
    }

    #[test]
    fn test_decode_json_error_names_file() {
        let err = decode_body("{not json", Path::new("data/bad.json")).unwrap_err();
        match err {
            ImportError::Parse { file, message } => {
                assert_eq!(file, "data/bad.json");
                assert!(!message.is_empty());
            }
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_yaml_error() {
        let err = decode_body("key: [unterminated", Path::new("bad.yml")).unwrap_err();
        assert!(matches!(err, ImportError::Parse { .. }));
    }
}
