//! Theme records: named sets of values keyed by config type or name.
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use super::loader;
use crate::error::LoadError;

/// Key reserved for the theme identity; never stored as a value.
pub const RESERVED_NAME_KEY: &str = "name";

/// A named palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    name: String,
    values: BTreeMap<String, String>,
}

impl Theme {
    /// Build a theme, dropping the reserved `name` key from `values`.
    #[must_use]
    pub fn new(name: impl Into<String>, mut values: BTreeMap<String, String>) -> Self {
        values.remove(RESERVED_NAME_KEY);
        Self {
            name: name.into(),
            values,
        }
    }

    /// Theme identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value for `key`, if the theme sets one.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// `true` if the theme sets a value for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// `true` if at least one key is in `known`.
    #[must_use]
    pub fn addresses_any(&self, known: &HashSet<String>) -> bool {
        self.values.keys().any(|k| known.contains(k))
    }
}

/// A free-form theme value, kept as written.
///
/// YAML hands plain scalars over as their source text, so `0x1a1a1a` and
/// `0.90` survive untouched. TOML types its values itself; numbers and
/// booleans from a TOML source take their canonical text form.
struct ThemeValue(String);

impl<'de> Deserialize<'de> for ThemeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TextVisitor;

        impl Visitor<'_> for TextVisitor {
            type Value = ThemeValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a scalar theme value")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(ThemeValue(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(ThemeValue(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ThemeValue(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ThemeValue(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(ThemeValue(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(ThemeValue(v.to_string()))
            }
        }

        deserializer.deserialize_string(TextVisitor)
    }
}

/// Load every theme from `source`, rejecting themes that match no key in
/// `known_keys`.
///
/// `known_keys` is the union of every definition's `type` and `name`
/// (see [`EditSet::known_keys`](super::definitions::EditSet::known_keys)).
///
/// # Errors
///
/// Returns an error if the source cannot be read or decoded, or
/// [`LoadError::InertTheme`] for the first theme that addresses nothing.
pub fn load(source: &Path, known_keys: &HashSet<String>) -> Result<Vec<Theme>, LoadError> {
    let records = loader::load_records::<BTreeMap<String, ThemeValue>>(source)?;
    records
        .into_iter()
        .map(|(name, record)| {
            let values = record.into_iter().map(|(k, v)| (k, v.0)).collect();
            let theme = Theme::new(name, values);
            if theme.addresses_any(known_keys) {
                Ok(theme)
            } else {
                Err(LoadError::InertTheme(theme.name))
            }
        })
        .collect()
}
