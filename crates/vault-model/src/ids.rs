//! Identifier types: template keys, version numbers, and snapshot references.

use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Opaque key naming one template. Every store is scoped by it.
///
/// The id doubles as a directory name, so it must be a single non-empty
/// path component.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        let is_component = !trimmed.is_empty()
            && trimmed != "."
            && trimmed != ".."
            && !trimmed.contains(['/', '\\', '\0']);
        if !is_component {
            return Err(ModelError::InvalidTemplateId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TemplateId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TemplateId> for String {
    fn from(id: TemplateId) -> Self {
        id.0
    }
}

impl FromStr for TemplateId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Semantic `major.minor.patch` version of a saved snapshot.
///
/// Each save increments the patch component of the history's latest
/// version; numbers are never reused, even after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VersionNumber {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl VersionNumber {
    /// The version a fresh history starts from; never assigned to a snapshot.
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The following patch release. Fails once the patch number is exhausted.
    pub fn next_patch(self) -> Result<Self, ModelError> {
        let patch = self
            .patch
            .checked_add(1)
            .ok_or_else(|| ModelError::InvalidVersionNumber(format!("{self} has no next patch")))?;
        Ok(Self { patch, ..self })
    }

    /// Directory name used for this version (`v0.0.1`).
    pub fn dir_name(&self) -> String {
        format!("v{self}")
    }
}

impl FromStr for VersionNumber {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidVersionNumber(s.to_string());
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let mut parts = body.split('.');
        let mut next = || -> Result<u32, ModelError> {
            parts
                .next()
                .and_then(|part| part.parse::<u32>().ok())
                .ok_or_else(invalid)
        };
        let version = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl serde::Serialize for VersionNumber {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for VersionNumber {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One side of a comparison: the baseline, the working copy, or a saved version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotRef {
    Original,
    Working,
    Version(VersionNumber),
}

impl FromStr for SnapshotRef {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(Self::Original),
            "working" => Ok(Self::Working),
            _ => s.parse().map(Self::Version),
        }
    }
}

impl From<VersionNumber> for SnapshotRef {
    fn from(version: VersionNumber) -> Self {
        Self::Version(version)
    }
}

impl fmt::Display for SnapshotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => f.write_str("original"),
            Self::Working => f.write_str("working"),
            Self::Version(version) => write!(f, "{version}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn template_id_rejects_path_components() {
        assert!(TemplateId::new("landing-page").is_ok());
        assert!(TemplateId::new("  ").is_err());
        assert!(TemplateId::new("..").is_err());
        assert!(TemplateId::new("a/b").is_err());
        assert!(TemplateId::new("a\\b").is_err());
    }

    #[test]
    fn template_id_trims_whitespace() {
        let id = TemplateId::new(" shop ").unwrap();
        assert_eq!(id.as_str(), "shop");
    }

    #[test]
    fn version_number_parses_with_optional_prefix() {
        assert_eq!("0.0.3".parse::<VersionNumber>().unwrap(), VersionNumber::new(0, 0, 3));
        assert_eq!("v1.2.3".parse::<VersionNumber>().unwrap(), VersionNumber::new(1, 2, 3));
        assert!("1.2".parse::<VersionNumber>().is_err());
        assert!("1.2.3.4".parse::<VersionNumber>().is_err());
        assert!("a.b.c".parse::<VersionNumber>().is_err());
    }

    #[test]
    fn version_number_serializes_as_string() {
        let json = serde_json::to_string(&VersionNumber::new(0, 0, 4)).unwrap();
        assert_eq!(json, "\"0.0.4\"");
        let back: VersionNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VersionNumber::new(0, 0, 4));
    }

    #[test]
    fn next_patch_only_touches_patch() {
        let next = VersionNumber::new(2, 5, 9).next_patch().unwrap();
        assert_eq!(next, VersionNumber::new(2, 5, 10));
        assert_eq!(next.dir_name(), "v2.5.10");
    }

    #[test]
    fn next_patch_rejects_overflow() {
        let last = VersionNumber::new(0, 0, u32::MAX);
        assert!(matches!(last.next_patch(), Err(ModelError::InvalidVersionNumber(_))));
    }

    #[test]
    fn snapshot_ref_recognizes_sentinels() {
        assert_eq!("original".parse::<SnapshotRef>().unwrap(), SnapshotRef::Original);
        assert_eq!("Working".parse::<SnapshotRef>().unwrap(), SnapshotRef::Working);
        assert_eq!(
            "0.0.1".parse::<SnapshotRef>().unwrap(),
            SnapshotRef::Version(VersionNumber::new(0, 0, 1))
        );
        assert!("latest".parse::<SnapshotRef>().is_err());
    }

    proptest! {
        #[test]
        fn next_patch_is_strictly_greater(major in 0u32..1000, minor in 0u32..1000, patch in 0u32..100_000) {
            let version = VersionNumber::new(major, minor, patch);
            prop_assert!(version.next_patch().unwrap() > version);
        }

        #[test]
        fn display_parses_back(major in 0u32..1000, minor in 0u32..1000, patch in 0u32..100_000) {
            let version = VersionNumber::new(major, minor, patch);
            prop_assert_eq!(version.to_string().parse::<VersionNumber>().unwrap(), version);
        }
    }
}
