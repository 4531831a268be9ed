//! Single-document parsing and field validation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::config::merge::MergeAccumulator;
use crate::error::ConfigError;
use crate::paths;

/// File extensions recognized as configuration documents.
pub(crate) const CONFIG_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// One parsed configuration file.
///
/// The field set is closed: any key outside it fails deserialization, which
/// surfaces as a schema error naming the file. `maxAge`, `logFile` and
/// `concurrency` distinguish an absent key from an explicit `null` (null
/// resets the option to its default).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase", default)]
pub struct ConfigDocument {
    pub dirs: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    #[serde(deserialize_with = "nullable")]
    pub max_age: Option<Option<MaxAge>>,
    pub summary: Option<bool>,
    pub parallel: Option<bool>,
    pub dry_run: Option<bool>,
    pub deep: Option<bool>,
    #[serde(deserialize_with = "nullable")]
    pub log_file: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub concurrency: Option<Option<u64>>,
    pub preview: Option<bool>,
    pub presets: Option<OneOrMany>,
}

/// Maps a present-but-null key to `Some(None)`; an absent key stays `None`
/// via the container default.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A field that accepts either one string or a list of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// An age threshold: a bare number of hours, or a string like `30m`, `12h`,
/// `5d` (no suffix means hours).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaxAge {
    Hours(f64),
    Spec(String),
}

impl MaxAge {
    pub fn to_duration(&self) -> Result<Duration, String> {
        match self {
            Self::Hours(hours) => {
                if hours.is_finite() && *hours >= 0.0 {
                    Ok(Duration::from_secs_f64(hours * 3600.0))
                } else {
                    Err("maxAge must be a non-negative number of hours".to_string())
                }
            }
            Self::Spec(spec) => parse_duration(spec)
                .ok_or_else(|| "maxAge must be like 30m, 12h, 5d, or a number of hours".to_string()),
        }
    }
}

/// Parse a duration of the form `\d+[smhdw]?`; a missing unit means hours.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let (digits, unit) = match trimmed.char_indices().last() {
        Some((index, c)) if c.is_ascii_alphabetic() => (&trimmed[..index], c.to_ascii_lowercase()),
        _ => (trimmed, 'h'),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;
    let unit_secs = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3_600,
        'd' => 86_400,
        'w' => 604_800,
        _ => return None,
    };
    Some(Duration::from_secs(amount.checked_mul(unit_secs)?))
}

/// Read and parse one document: JSON or YAML by extension, with a
/// JSON-then-YAML fallback for anything else. The top level must be an
/// object over the allowed key set.
pub(crate) fn load_document(path: &Path) -> Result<ConfigDocument, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value = parse_text(path, &raw)?;
    if !value.is_object() {
        return Err(ConfigError::Schema {
            path: path.to_path_buf(),
            message: "configuration must be a key/value mapping".to_string(),
        });
    }
    serde_json::from_value(value).map_err(|err| ConfigError::Schema {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn parse_text(path: &Path, raw: &str) -> Result<serde_json::Value, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        // An empty document applies nothing.
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => serde_json::from_str(trimmed).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
        Some("yaml") | Some("yml") => serde_yaml::from_str(trimmed).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
        _ => serde_json::from_str(trimmed).or_else(|json_err| {
            serde_yaml::from_str(trimmed).map_err(|yaml_err| ConfigError::Parse {
                path: path.to_path_buf(),
                message: format!("not valid JSON ({json_err}) nor YAML ({yaml_err})"),
            })
        }),
    }
}

/// Trim list entries and reject empty ones.
pub(crate) fn non_empty_strings(
    values: Vec<String>,
    key: &str,
    source: &Path,
) -> Result<Vec<String>, ConfigError> {
    let mut out = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Schema {
                path: source.to_path_buf(),
                message: format!("{key}[{index}] must be a non-empty string"),
            });
        }
        out.push(trimmed.to_string());
    }
    Ok(out)
}

impl ConfigDocument {
    /// Validate the non-preset fields and resolve paths against the
    /// document's directory, producing this file's own contribution.
    pub(crate) fn extract(
        self,
        base_dir: &Path,
        source: &Path,
    ) -> Result<MergeAccumulator, ConfigError> {
        let mut acc = MergeAccumulator::default();

        if let Some(dirs) = self.dirs {
            for dir in non_empty_strings(dirs, "dirs", source)? {
                acc.dirs.push(paths::normalize(&base_dir.join(dir)));
            }
        }
        if let Some(exclude) = self.exclude {
            for dir in non_empty_strings(exclude, "exclude", source)? {
                acc.exclude.push(paths::normalize(&base_dir.join(dir)));
            }
        }

        if let Some(max_age) = self.max_age {
            acc.max_age = Some(match max_age {
                None => None,
                Some(value) => Some(value.to_duration().map_err(|message| {
                    ConfigError::Schema {
                        path: source.to_path_buf(),
                        message,
                    }
                })?),
            });
        }

        if let Some(concurrency) = self.concurrency {
            acc.concurrency = Some(match concurrency {
                None => None,
                Some(raw) => match usize::try_from(raw) {
                    Ok(cap) if cap > 0 => Some(cap),
                    _ => {
                        return Err(ConfigError::Schema {
                            path: source.to_path_buf(),
                            message: "concurrency must be a positive integer or null".to_string(),
                        })
                    }
                },
            });
        }

        if let Some(log_file) = self.log_file {
            acc.log_file = Some(match log_file {
                None => None,
                Some(value) => {
                    let trimmed = value.trim();
                    if trimmed.is_empty() {
                        return Err(ConfigError::Schema {
                            path: source.to_path_buf(),
                            message: "logFile must be a non-empty string or null".to_string(),
                        });
                    }
                    Some(paths::normalize(&base_dir.join(trimmed)))
                }
            });
        }

        acc.summary = self.summary;
        acc.parallel = self.parallel;
        acc.dry_run = self.dry_run;
        acc.deep = self.deep;
        acc.preview = self.preview;

        Ok(acc)
    }
}
