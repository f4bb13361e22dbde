//! Pregenerated message file loading.

use std::fs;
use std::path::Path;

use tracing::info;

use jar_models::PregeneratedSet;

use crate::parser::ParseError;

/// Loads a pregenerated JSON file.
///
/// Missing or malformed files are errors; in pregenerated mode that is
/// fatal at startup.
pub fn load_pregenerated(path: &Path) -> Result<PregeneratedSet, ParseError> {
    if !path.exists() {
        return Err(ParseError::FileNotFound(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let set: PregeneratedSet =
        serde_json::from_str(&contents).map_err(|source| ParseError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        path = %path.display(),
        messages = set.len(),
        "loaded pregenerated messages"
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_pregenerated() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "version": "1.0",
                "milestones": [
                    {"id": 1, "category": "Work", "original": "Did X", "message": "You did X!"}
                ]
            }"#,
        )
        .unwrap();

        let set = load_pregenerated(file.path()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.message_for("Did X"), Some("You did X!"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = load_pregenerated(Path::new("nope.json")).unwrap_err();
        assert!(matches!(err, ParseError::FileNotFound(_)));
    }

    #[test]
    fn test_load_malformed_json_fails() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json at all").unwrap();

        let err = load_pregenerated(file.path()).unwrap_err();
        assert!(matches!(err, ParseError::Json { .. }));
    }
}
