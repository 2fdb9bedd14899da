use super::types::TomlDocument;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

pub struct TomlReader;

impl TomlReader {
    pub fn read_file<P: AsRef<Path>>(file_path: P) -> Result<TomlDocument> {
        let path = file_path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| Error::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse_string(&content, path.to_string_lossy().to_string())
    }

    pub fn parse_string(content: &str, origin: String) -> Result<TomlDocument> {
        let toml_value = content
            .parse::<toml::Value>()
            .map_err(|e| Error::TomlParseError {
                origin: origin.clone(),
                source: e,
            })?;

        Ok(TomlDocument::new(origin, toml_value))
    }
}
