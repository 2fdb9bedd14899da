// changelog policy configuration

use crate::error::{Error, Result};
use crate::utils::toml_ops::{TomlDocument, TomlSection};
use regex::Regex;
use serde::Serialize;

pub const DEFAULT_NOOP_LABEL: &str = "skip-changelog-checks";
pub const DEFAULT_WHATSNEW_LABEL: &str = "whatsnew-needed";
pub const DEFAULT_WHATSNEW_PATTERN: &str = r"docs\/whatsnew\/\d+\.\d+\.rst";
pub const FRAGMENT_SUBDIRECTORY: &str = "newsfragments";

/// a `[[tool.towncrier.section]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub path: String,
}

/// a `[[tool.towncrier.type]]` entry, keyed by the token used in fragment names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentType {
    pub token: String,
    pub name: String,
    pub showcontent: bool,
}

impl FragmentType {
    fn new(token: &str, name: &str, showcontent: bool) -> Self {
        Self {
            token: token.to_string(),
            name: name.to_string(),
            showcontent,
        }
    }

    /// the five types towncrier ships with
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("feature", "Features", true),
            Self::new("bugfix", "Bugfixes", true),
            Self::new("doc", "Improved Documentation", true),
            Self::new("removal", "Deprecations and Removals", true),
            Self::new("misc", "Misc", false),
        ]
    }
}

/// fragment naming rules read from `[tool.towncrier]`
#[derive(Debug, Clone, Serialize)]
pub struct TowncrierSettings {
    pub package: String,
    pub package_dir: String,
    pub directory: Option<String>,
    pub filename: String,
    pub single_file: bool,
    pub all_bullets: bool,
    pub sections: Vec<Section>,
    pub types: Vec<FragmentType>,
}

impl Default for TowncrierSettings {
    fn default() -> Self {
        Self {
            package: String::new(),
            package_dir: ".".to_string(),
            directory: None,
            filename: "NEWS.rst".to_string(),
            single_file: true,
            all_bullets: true,
            sections: vec![Section {
                name: String::new(),
                path: String::new(),
            }],
            types: FragmentType::defaults(),
        }
    }
}

impl TowncrierSettings {
    pub fn from_section(section: &TomlSection<'_>) -> Result<Self> {
        let defaults = Self::default();

        if section.contains("singlefile") {
            return Err(Error::invalid_option(
                format!("{}.singlefile", section.path()),
                "`singlefile` is not a valid option. Did you mean `single_file`?",
            ));
        }

        let sections = match section.get_table_array("section")? {
            Some(entries) => entries
                .into_iter()
                .map(|table| -> Result<Section> {
                    let entry = TomlSection::new(format!("{}.section", section.path()), table);
                    Ok(Section {
                        name: entry.get_string("name")?.unwrap_or_default(),
                        path: required(&entry, "path")?,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => defaults.sections,
        };

        let types = match section.get_table_array("type")? {
            Some(entries) => entries
                .into_iter()
                .map(|table| -> Result<FragmentType> {
                    let entry = TomlSection::new(format!("{}.type", section.path()), table);
                    Ok(FragmentType {
                        token: required(&entry, "directory")?,
                        name: required(&entry, "name")?,
                        showcontent: entry.get_bool("showcontent")?.ok_or_else(|| {
                            Error::invalid_option(
                                format!("{}.showcontent", entry.path()),
                                "required option is missing",
                            )
                        })?,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => defaults.types,
        };

        Ok(Self {
            package: section.get_string("package")?.unwrap_or(defaults.package),
            package_dir: section
                .get_string("package_dir")?
                .unwrap_or(defaults.package_dir),
            directory: section.get_string("directory")?.filter(|d| !d.is_empty()),
            filename: section.get_string("filename")?.unwrap_or(defaults.filename),
            single_file: section
                .get_bool("single_file")?
                .unwrap_or(defaults.single_file),
            all_bullets: section
                .get_bool("all_bullets")?
                .unwrap_or(defaults.all_bullets),
            sections,
            types,
        })
    }

    /// directories a fragment may be added to, in section order
    ///
    /// an explicit `directory` wins over sections; otherwise every section
    /// gets `<package_dir>/<package>/<section path>/newsfragments/`
    pub fn fragment_directories(&self) -> Vec<String> {
        if let Some(directory) = &self.directory {
            return vec![normalize_directory(&[directory.as_str()])];
        }

        self.sections
            .iter()
            .map(|section| {
                normalize_directory(&[
                    self.package_dir.as_str(),
                    self.package.as_str(),
                    section.path.as_str(),
                    FRAGMENT_SUBDIRECTORY,
                ])
            })
            .collect()
    }

    pub fn type_tokens(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.token.as_str()).collect()
    }
}

fn required(entry: &TomlSection<'_>, key: &str) -> Result<String> {
    entry.get_string(key)?.ok_or_else(|| {
        Error::invalid_option(
            format!("{}.{}", entry.path(), key),
            "required option is missing",
        )
    })
}

/// join path parts into a repository-relative directory ending in `/`
///
/// `.` and empty segments are dropped since changed-file paths reported
/// for a pull request never carry them. a directory that collapses to
/// nothing becomes `/`, which no repository-relative path starts with
pub fn normalize_directory(parts: &[&str]) -> String {
    let directory = parts
        .iter()
        .flat_map(|part| part.split('/'))
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");

    format!("{}/", directory)
}

/// release-notes companion check settings
#[derive(Debug, Clone)]
pub struct WhatsNewPolicy {
    pub label: String,
    pub pattern: Regex,
}

/// the part of `[tool.<bot>.towncrier_changelog]` needed to decide whether
/// a pull request is checked at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExemptionPolicy {
    pub enabled: bool,
    pub skip_label: Option<String>,
    pub noop_label: String,
}

impl ExemptionPolicy {
    /// read only `enabled` and the two labels, so exempt pull requests pass
    /// even when the rest of the configuration is broken
    pub fn resolve(document: &TomlDocument, bot_username: &str) -> Result<Self> {
        let section = bot_section(document, bot_username)?;

        Ok(Self {
            enabled: section.get_bool("enabled")?.unwrap_or(false),
            skip_label: section.get_string("changelog_skip_label")?,
            noop_label: section
                .get_string("changelog_noop_label")?
                .unwrap_or_else(|| DEFAULT_NOOP_LABEL.to_string()),
        })
    }
}

fn bot_section<'a>(document: &'a TomlDocument, bot_username: &str) -> Result<TomlSection<'a>> {
    document
        .get_section(&["tool", bot_username, "towncrier_changelog"])
        .ok_or_else(|| Error::MissingSection {
            section: PolicyConfig::section_path(bot_username),
        })
}

/// fully resolved `[tool.<bot>.towncrier_changelog]` policy
///
/// every optional key has its default substituted here; nothing downstream
/// looks at the raw document again
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    pub exemption: ExemptionPolicy,
    pub verify_pr_number: bool,
    pub whatsnew: WhatsNewPolicy,
    pub towncrier: TowncrierSettings,
}

impl PolicyConfig {
    pub fn section_path(bot_username: &str) -> String {
        format!("tool.{}.towncrier_changelog", bot_username)
    }

    /// resolve the checking rules once a pull request turned out not to be
    /// exempt; this is where the what's new pattern and `[tool.towncrier]`
    /// get validated
    pub fn resolve(
        document: &TomlDocument,
        bot_username: &str,
        exemption: ExemptionPolicy,
    ) -> Result<Self> {
        let section = bot_section(document, bot_username)?;

        let pattern = section
            .get_string("whatsnew_pattern")?
            .unwrap_or_else(|| DEFAULT_WHATSNEW_PATTERN.to_string());
        let pattern = Regex::new(&pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.clone(),
            source: e,
        })?;

        let towncrier_section =
            document
                .get_section(&["tool", "towncrier"])
                .ok_or_else(|| Error::MissingSection {
                    section: "tool.towncrier".to_string(),
                })?;

        Ok(Self {
            exemption,
            verify_pr_number: section.get_bool("verify_pr_number")?.unwrap_or(false),
            whatsnew: WhatsNewPolicy {
                label: section
                    .get_string("whatsnew_label")?
                    .unwrap_or_else(|| DEFAULT_WHATSNEW_LABEL.to_string()),
                pattern,
            },
            towncrier: TowncrierSettings::from_section(&towncrier_section)?,
        })
    }
}
