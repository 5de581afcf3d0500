//! Keyed-record source loading for YAML and TOML files.
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// On-disk format of a source file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.yaml` / `.yml` (and anything unrecognised).
    Yaml,
    /// `.toml`.
    Toml,
}

impl SourceFormat {
    /// Pick the format from the file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Extensions tried by [`locate`], in priority order.
const EXTENSIONS: &[&str] = &["yaml", "yml", "toml"];

/// Find `<stem>.yaml`, `<stem>.yml` or `<stem>.toml` inside `dir`.
///
/// When none exists the `.yaml` path is returned so that the subsequent read
/// reports a meaningful "not found" error.
#[must_use]
pub fn locate(dir: &Path, stem: &str) -> PathBuf {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
        .unwrap_or_else(|| dir.join(format!("{stem}.yaml")))
}

/// Load a source whose top level maps record names to records of type `T`.
///
/// Records are returned in source order. An empty file yields no records.
///
/// # Errors
///
/// Returns [`LoadError::SourceRead`] if the file cannot be read and
/// [`LoadError::Parse`] if it is not a mapping of records of type `T`.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<(String, T)>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;

    match SourceFormat::from_path(path) {
        SourceFormat::Yaml => yaml_records(path, &content),
        SourceFormat::Toml => toml_records(path, &content),
    }
}

fn parse_error(path: &Path, message: impl Into<String>) -> LoadError {
    LoadError::Parse {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Top-level YAML mapping decoded straight from the event stream.
///
/// Going through [`serde_yaml::Value`] would resolve plain scalars such as
/// `0x1a1a1a` to numbers before `T` sees them; streaming keeps their text.
struct YamlRecords<T>(Vec<(String, T)>);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for YamlRecords<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordsVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for RecordsVisitor<T> {
            type Value = YamlRecords<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of named records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut records = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(name) = map.next_key::<String>()? {
                    records.push((name, map.next_value()?));
                }
                Ok(YamlRecords(records))
            }
        }

        deserializer.deserialize_map(RecordsVisitor(PhantomData))
    }
}

fn yaml_records<T: DeserializeOwned>(
    path: &Path,
    content: &str,
) -> Result<Vec<(String, T)>, LoadError> {
    serde_yaml::from_str::<YamlRecords<T>>(content)
        .map(|records| records.0)
        .map_err(|e| parse_error(path, e.to_string()))
}

fn toml_records<T: DeserializeOwned>(
    path: &Path,
    content: &str,
) -> Result<Vec<(String, T)>, LoadError> {
    let table: toml::Table =
        toml::from_str(content).map_err(|e| parse_error(path, e.to_string()))?;

    table
        .into_iter()
        .map(|(name, value)| {
            let record: T = value
                .try_into()
                .map_err(|e| parse_error(path, format!("{name}: {e}")))?;
            Ok((name, record))
        })
        .collect()
}
