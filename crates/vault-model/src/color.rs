//! Color token groups consumed from the color-theory module.
//!
//! A color system is four flat groups of token name to CSS color string.
//! Tokens are addressed by dotted paths such as `brand.primary`. Groups the
//! vault does not know about are kept verbatim in `extra` and may nest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ModelError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSystem {
    #[serde(default)]
    pub brand: BTreeMap<String, String>,
    #[serde(default)]
    pub semantic: BTreeMap<String, String>,
    #[serde(default)]
    pub neutral: BTreeMap<String, String>,
    #[serde(default)]
    pub interaction: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for ColorSystem {
    fn default() -> Self {
        Self::default_palette()
    }
}

fn group(tokens: &[(&str, &str)]) -> BTreeMap<String, String> {
    tokens
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect()
}

impl ColorSystem {
    /// The palette a template starts with and returns to on reset.
    pub fn default_palette() -> Self {
        Self {
            brand: group(&[
                ("primary", "#2563EB"),
                ("secondary", "#7C3AED"),
                ("accent", "#F59E0B"),
            ]),
            semantic: group(&[
                ("success", "#16A34A"),
                ("warning", "#D97706"),
                ("error", "#DC2626"),
                ("info", "#0284C7"),
            ]),
            neutral: group(&[
                ("background", "#FFFFFF"),
                ("surface", "#F8FAFC"),
                ("border", "#E2E8F0"),
                ("text", "#0F172A"),
                ("textMuted", "#64748B"),
            ]),
            interaction: group(&[
                ("hover", "rgba(37, 99, 235, 0.08)"),
                ("active", "rgba(37, 99, 235, 0.16)"),
                ("focus", "#93C5FD"),
                ("disabled", "#CBD5E1"),
            ]),
            extra: BTreeMap::new(),
        }
    }

    /// Every leaf token keyed by its dotted path, nested groups included.
    pub fn tokens(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for (name, tokens) in self.known_groups() {
            for (token, value) in tokens {
                out.insert(format!("{name}.{token}"), value.clone());
            }
        }
        for (name, value) in &self.extra {
            flatten_into(name, value, &mut out);
        }
        out
    }

    /// Look up a token by dotted path.
    pub fn get(&self, path: &str) -> Option<String> {
        self.tokens().remove(path)
    }

    /// Set a token by dotted path (`group.token`).
    ///
    /// Paths into the four known groups must have exactly two segments.
    /// Anything else is written into `extra`, creating nested groups as needed.
    pub fn set(&mut self, path: &str, value: impl Into<String>) -> Result<(), ModelError> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.len() < 2 || segments.iter().any(|segment| segment.is_empty()) {
            return Err(ModelError::InvalidTokenPath(path.to_string()));
        }
        let value = value.into();
        if let Some(group) = self.known_group_mut(segments[0]) {
            if segments.len() != 2 {
                return Err(ModelError::InvalidTokenPath(path.to_string()));
            }
            group.insert(segments[1].to_string(), value);
            return Ok(());
        }

        let mut node = self
            .extra
            .entry(segments[0].to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        for segment in &segments[1..segments.len() - 1] {
            let Value::Object(map) = node else {
                return Err(ModelError::InvalidTokenPath(path.to_string()));
            };
            node = map
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
        }
        let Value::Object(map) = node else {
            return Err(ModelError::InvalidTokenPath(path.to_string()));
        };
        map.insert(segments[segments.len() - 1].to_string(), Value::String(value));
        Ok(())
    }

    fn known_groups(&self) -> [(&'static str, &BTreeMap<String, String>); 4] {
        [
            ("brand", &self.brand),
            ("semantic", &self.semantic),
            ("neutral", &self.neutral),
            ("interaction", &self.interaction),
        ]
    }

    fn known_group_mut(&mut self, name: &str) -> Option<&mut BTreeMap<String, String>> {
        match name {
            "brand" => Some(&mut self.brand),
            "semantic" => Some(&mut self.semantic),
            "neutral" => Some(&mut self.neutral),
            "interaction" => Some(&mut self.interaction),
            _ => None,
        }
    }
}

fn flatten_into(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(&format!("{prefix}.{key}"), child, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}
