use crate::error::{Error, Result};
use toml::value::{Array, Table};

/// parsed toml document together with where it came from
#[derive(Debug, Clone)]
pub struct TomlDocument {
    pub origin: String,
    pub content: toml::Value,
}

impl TomlDocument {
    pub fn new(origin: String, content: toml::Value) -> Self {
        Self { origin, content }
    }

    /// walk nested tables, e.g. `["tool", "towncrier"]`
    pub fn get_section(&self, path: &[&str]) -> Option<TomlSection<'_>> {
        let mut current = self.content.as_table()?;
        for key in path {
            current = current.get(*key)?.as_table()?;
        }

        Some(TomlSection::new(path.join("."), current))
    }
}

/// borrowed view of a single table with typed accessors
///
/// every accessor returns `Ok(None)` for an absent key and an
/// `InvalidOption` error when the key is present with the wrong type
#[derive(Debug, Clone)]
pub struct TomlSection<'a> {
    path: String,
    table: &'a Table,
}

impl<'a> TomlSection<'a> {
    pub fn new(path: String, table: &'a Table) -> Self {
        Self { path, table }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    fn qualified(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    pub fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.table.get(key) {
            None => Ok(None),
            Some(toml::Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(Error::invalid_option(
                self.qualified(key),
                format!("expected a string, found {}", other.type_str()),
            )),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.table.get(key) {
            None => Ok(None),
            Some(toml::Value::Boolean(b)) => Ok(Some(*b)),
            Some(other) => Err(Error::invalid_option(
                self.qualified(key),
                format!("must be a boolean: false or true, found {}", other.type_str()),
            )),
        }
    }

    /// `[[path.key]]` arrays of tables, in document order
    pub fn get_table_array(&self, key: &str) -> Result<Option<Vec<&'a Table>>> {
        let array: &Array = match self.table.get(key) {
            None => return Ok(None),
            Some(toml::Value::Array(array)) => array,
            Some(other) => {
                return Err(Error::invalid_option(
                    self.qualified(key),
                    format!("expected an array of tables, found {}", other.type_str()),
                ));
            }
        };

        array
            .iter()
            .map(|item| {
                item.as_table().ok_or_else(|| {
                    Error::invalid_option(
                        self.qualified(key),
                        format!("expected an array of tables, found {}", item.type_str()),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}
