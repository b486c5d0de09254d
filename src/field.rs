//! Typed field identifiers.
//!
//! The requested `FieldSet` is the single control knob for extraction cost:
//! a field that is not in the set is never extracted and stays `None` on the
//! resulting `Post`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A post field that can be requested for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    User,
    Page,
    Timestamp,
    Text,
    Reactions,
    Sponsored,
    Recommended,
    Liked,
    Url,
    CommentCount,
    ShareCount,
    Image,
    Comments,
}

impl Field {
    /// All fields in declaration order.
    pub const ALL: [Field; 13] = [
        Field::User,
        Field::Page,
        Field::Timestamp,
        Field::Text,
        Field::Reactions,
        Field::Sponsored,
        Field::Recommended,
        Field::Liked,
        Field::Url,
        Field::CommentCount,
        Field::ShareCount,
        Field::Image,
        Field::Comments,
    ];

    /// The snake_case name used in configuration and logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Field::User => "user",
            Field::Page => "page",
            Field::Timestamp => "timestamp",
            Field::Text => "text",
            Field::Reactions => "reactions",
            Field::Sponsored => "sponsored",
            Field::Recommended => "recommended",
            Field::Liked => "liked",
            Field::Url => "url",
            Field::CommentCount => "comment_count",
            Field::ShareCount => "share_count",
            Field::Image => "image",
            Field::Comments => "comments",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a field name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let field = match normalized.as_str() {
            "user" | "author" => Field::User,
            "page" | "group" => Field::Page,
            "timestamp" | "date" => Field::Timestamp,
            "text" | "content" => Field::Text,
            "reactions" => Field::Reactions,
            "sponsored" => Field::Sponsored,
            "recommended" => Field::Recommended,
            "liked" => Field::Liked,
            "url" => Field::Url,
            "comment_count" => Field::CommentCount,
            "share_count" => Field::ShareCount,
            "image" | "media" => Field::Image,
            "comments" | "comment_tree" | "comments_tree" => Field::Comments,
            _ => return Err(UnknownField(s.to_string())),
        };
        Ok(field)
    }
}

/// A set of requested fields.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Field>", into = "Vec<Field>")]
pub struct FieldSet(u16);

impl FieldSet {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every field.
    #[must_use]
    pub fn all() -> Self {
        Field::ALL.into_iter().collect()
    }

    #[must_use]
    pub fn contains(self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    /// Whether any of `fields` is requested.
    #[must_use]
    pub fn contains_any(self, fields: &[Field]) -> bool {
        fields.iter().any(|f| self.contains(*f))
    }

    pub fn insert(&mut self, field: Field) {
        self.0 |= field.bit();
    }

    pub fn remove(&mut self, field: Field) {
        self.0 &= !field.bit();
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, field: Field) -> Self {
        self.insert(field);
        self
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Requested fields in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |f| self.contains(*f))
    }

    /// Parses a comma separated list such as `"user,text,reactions"`.
    pub fn parse_list(list: &str) -> Result<Self, UnknownField> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Field::from_str)
            .collect()
    }
}

impl FromIterator<Field> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut set = FieldSet::empty();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

impl From<Vec<Field>> for FieldSet {
    fn from(fields: Vec<Field>) -> Self {
        fields.into_iter().collect()
    }
}

impl From<FieldSet> for Vec<Field> {
    fn from(set: FieldSet) -> Self {
        set.iter().collect()
    }
}

impl<const N: usize> From<[Field; N]> for FieldSet {
    fn from(fields: [Field; N]) -> Self {
        fields.into_iter().collect()
    }
}

impl fmt::Debug for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_contains_every_field() {
        let all = FieldSet::all();
        assert_eq!(all.len(), Field::ALL.len());
        for field in Field::ALL {
            assert!(all.contains(field), "{field} missing");
        }
    }

    #[test]
    fn test_insert_and_remove() {
        let mut set = FieldSet::empty();
        assert!(set.is_empty());
        set.insert(Field::Text);
        set.insert(Field::Reactions);
        assert!(set.contains(Field::Text));
        assert!(!set.contains(Field::User));
        set.remove(Field::Text);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Field::Reactions]);
    }

    #[test]
    fn test_parse_list_accepts_aliases() {
        let set = FieldSet::parse_list("user, comment_tree,media").expect("valid list");
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Field::User, Field::Image, Field::Comments]
        );
    }

    #[test]
    fn test_parse_list_rejects_unknown() {
        let err = FieldSet::parse_list("user,karma").unwrap_err();
        assert_eq!(err, UnknownField("karma".to_string()));
    }

    #[test]
    fn test_serde_as_name_list() {
        let set = FieldSet::from([Field::Url, Field::ShareCount]);
        let json = serde_json::to_string(&set).expect("serialize");
        assert_eq!(json, r#"["url","share_count"]"#);
        let back: FieldSet = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, set);
    }

    #[test]
    fn test_with_adds_to_a_narrow_set() {
        let set = FieldSet::parse_list("user").expect("parse").with(Field::Comments);
        assert_eq!(set, FieldSet::from([Field::User, Field::Comments]));
        assert_eq!(set.with(Field::Comments), set);
    }
}
