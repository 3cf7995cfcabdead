//! `PasswordEntry` and `TagSet`: the in-memory credential record.
//!
//! Entries are validated on construction and by the codec on decode, so
//! an entry with an empty site or username cannot exist.  The secret and
//! notes are held in `Zeroizing` strings and the secret never appears in
//! `Debug` output.

use std::fmt;

use serde_json::{Map, Value};
use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

/// An insertion-ordered set of tags.
///
/// Duplicates are dropped on insert.  Equality ignores order, so two
/// entries with the same tags in a different order compare equal.
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag; returns `false` if it was already present.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

impl PartialEq for TagSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t))
    }
}

impl Eq for TagSet {}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

/// A single credential record.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordEntry {
    site: String,
    username: String,
    secret: Zeroizing<String>,
    notes: Zeroizing<String>,
    tags: TagSet,
}

impl PasswordEntry {
    /// Build a validated entry.
    ///
    /// `site` and `username` must be non-empty after trimming, as must
    /// every tag.  Repeated tags collapse into one.
    pub fn new<I, S>(
        site: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
        notes: impl Into<String>,
        tags: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let site = site.into();
        let username = username.into();
        let mut tag_set = TagSet::new();
        for tag in tags {
            let tag = tag.into();
            if tag.trim().is_empty() {
                return Err(VaultError::Validation("tags cannot be empty".into()));
            }
            tag_set.insert(tag);
        }

        let entry = Self {
            site,
            username,
            secret: Zeroizing::new(secret.into()),
            notes: Zeroizing::new(notes.into()),
            tags: tag_set,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Check the invariants every stored entry must satisfy.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.site.trim().is_empty() {
            return Err(VaultError::Validation("site cannot be empty".into()));
        }
        if self.username.trim().is_empty() {
            return Err(VaultError::Validation("username cannot be empty".into()));
        }
        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Err(VaultError::Validation("tags cannot be empty".into()));
        }
        Ok(())
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Returns `true` if this entry has the given (site, username) identity.
    pub fn matches(&self, site: &str, username: &str) -> bool {
        self.site == site && self.username == username
    }

    /// Generic mapping for display and export.
    ///
    /// Keys: `site`, `username`, `secret`, `notes`, `tags`.  This is never
    /// the persisted form; the codec owns that.
    pub fn to_dict(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("site".into(), Value::from(self.site.as_str()));
        map.insert("username".into(), Value::from(self.username.as_str()));
        map.insert("secret".into(), Value::from(self.secret.as_str()));
        map.insert("notes".into(), Value::from(self.notes.as_str()));
        map.insert(
            "tags".into(),
            Value::Array(self.tags.iter().map(Value::from).collect()),
        );
        map
    }
}

impl fmt::Debug for PasswordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordEntry")
            .field("site", &self.site)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .field("notes", &self.notes.as_str())
            .field("tags", &self.tags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PasswordEntry {
        PasswordEntry::new(
            "example.com",
            "user1",
            "password123",
            "Work account",
            ["work", "important"],
        )
        .unwrap()
    }

    #[test]
    fn new_accepts_valid_fields() {
        let entry = sample();
        assert_eq!(entry.site(), "example.com");
        assert_eq!(entry.username(), "user1");
        assert_eq!(entry.secret(), "password123");
        assert_eq!(entry.notes(), "Work account");
        assert_eq!(entry.tags().iter().collect::<Vec<_>>(), ["work", "important"]);
    }

    #[test]
    fn rejects_blank_site_or_username() {
        let no_tags: [&str; 0] = [];
        assert!(matches!(
            PasswordEntry::new("   ", "user", "pw", "", no_tags),
            Err(VaultError::Validation(_))
        ));
        assert!(matches!(
            PasswordEntry::new("site", "\t", "pw", "", no_tags),
            Err(VaultError::Validation(_))
        ));
    }

    #[test]
    fn rejects_blank_tag() {
        assert!(matches!(
            PasswordEntry::new("site", "user", "pw", "", ["ok", " "]),
            Err(VaultError::Validation(_))
        ));
    }

    #[test]
    fn empty_secret_and_notes_are_allowed() {
        let entry = PasswordEntry::new("site", "user", "", "", ["x"]).unwrap();
        assert_eq!(entry.secret(), "");
        assert_eq!(entry.notes(), "");
    }

    #[test]
    fn duplicate_tags_collapse() {
        let entry = PasswordEntry::new("site", "user", "pw", "", ["a", "b", "a"]).unwrap();
        assert_eq!(entry.tags().len(), 2);
    }

    #[test]
    fn tag_equality_ignores_order() {
        let a: TagSet = ["work", "important"].into_iter().collect();
        let b: TagSet = ["important", "work"].into_iter().collect();
        let c: TagSet = ["work"].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn to_dict_exposes_all_fields_in_tag_order() {
        let dict = sample().to_dict();
        assert_eq!(dict["site"], "example.com");
        assert_eq!(dict["username"], "user1");
        assert_eq!(dict["secret"], "password123");
        assert_eq!(dict["notes"], "Work account");
        assert_eq!(dict["tags"], serde_json::json!(["work", "important"]));
        assert_eq!(dict.len(), 5);
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("password123"));
        assert!(rendered.contains("example.com"));
    }

    #[test]
    fn matches_on_site_and_username() {
        let entry = sample();
        assert!(entry.matches("example.com", "user1"));
        assert!(!entry.matches("example.com", "user2"));
    }
}
