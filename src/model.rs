//! Records produced by an extraction pass.
//!
//! Posts and comments are immutable snapshots of what the page showed when
//! they were assembled. They hold derived values only, never element handles.

use std::fmt;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;

/// Caption sentinel for a post that definitively has no text.
pub const NO_TEXT: &str = "[No Text]";

/// Identity of a post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PostId {
    /// Derived from the post's permalink.
    Permalink(String),
    /// Structural hash of the element handle; only stable within one render.
    Structural(u64),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Permalink(id) => f.write_str(id),
            PostId::Structural(hash) => write!(f, "{hash}"),
        }
    }
}

/// Who posted, where, and when.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub user: Option<String>,
    pub page: Option<String>,
    /// Exact time from the hover tooltip, in the page's local time.
    pub timestamp: Option<NaiveDateTime>,
}

/// Reaction kinds, alphabetically ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Angry,
    Care,
    Haha,
    Like,
    Love,
    Sad,
    Wow,
}

impl Reaction {
    pub const ALL: [Reaction; 7] = [
        Reaction::Angry,
        Reaction::Care,
        Reaction::Haha,
        Reaction::Like,
        Reaction::Love,
        Reaction::Sad,
        Reaction::Wow,
    ];

    /// Matches a reaction marker label such as `"Love: 12 people"`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let name = label.split(':').next()?.trim().to_lowercase();
        match name.as_str() {
            "angry" => Some(Reaction::Angry),
            "care" => Some(Reaction::Care),
            "haha" => Some(Reaction::Haha),
            "like" => Some(Reaction::Like),
            "love" => Some(Reaction::Love),
            "sad" => Some(Reaction::Sad),
            "wow" => Some(Reaction::Wow),
            _ => None,
        }
    }
}

/// Per-kind reaction counts.
///
/// `Some(0)` means the post has none of that reaction; `None` means the count
/// could not be measured (or reactions were not requested).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Reactions {
    pub angry: Option<u64>,
    pub care: Option<u64>,
    pub haha: Option<u64>,
    pub like: Option<u64>,
    pub love: Option<u64>,
    pub sad: Option<u64>,
    pub wow: Option<u64>,
}

impl Reactions {
    /// Every kind counted as zero.
    #[must_use]
    pub fn zero() -> Self {
        let mut reactions = Self::default();
        for kind in Reaction::ALL {
            reactions.set(kind, Some(0));
        }
        reactions
    }

    #[must_use]
    pub fn get(&self, kind: Reaction) -> Option<u64> {
        match kind {
            Reaction::Angry => self.angry,
            Reaction::Care => self.care,
            Reaction::Haha => self.haha,
            Reaction::Like => self.like,
            Reaction::Love => self.love,
            Reaction::Sad => self.sad,
            Reaction::Wow => self.wow,
        }
    }

    pub fn set(&mut self, kind: Reaction, count: Option<u64>) {
        let slot = match kind {
            Reaction::Angry => &mut self.angry,
            Reaction::Care => &mut self.care,
            Reaction::Haha => &mut self.haha,
            Reaction::Like => &mut self.like,
            Reaction::Love => &mut self.love,
            Reaction::Sad => &mut self.sad,
            Reaction::Wow => &mut self.wow,
        };
        *slot = count;
    }

    /// Whether no kind has a count.
    #[must_use]
    pub fn is_unmeasured(&self) -> bool {
        Reaction::ALL.iter().all(|kind| self.get(*kind).is_none())
    }

    /// Sum of the measured counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        Reaction::ALL.iter().filter_map(|kind| self.get(*kind)).sum()
    }
}

/// One comment in a post's reply tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    /// Permalink of the post the comment belongs to.
    pub post_url: Option<String>,
    pub author: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
    pub text: String,
    pub reaction_count: Option<u64>,
    pub has_children: bool,
    /// True only for comments directly under the post.
    pub is_root: bool,
}

/// One discovered feed entry.
///
/// Every optional field is `None` when it was not requested or when its
/// extraction failed.
///
/// `liked` is captured at assembly time and is not refreshed by
/// [`Posts::like`](crate::Posts::like) or [`Posts::unlike`](crate::Posts::unlike);
/// it goes stale as soon as the live like state is toggled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: PostId,
    /// Feed slot the post was found at.
    pub index: usize,
    pub metadata: Metadata,
    pub text: Option<String>,
    pub liked: Option<bool>,
    pub reactions: Reactions,
    pub sponsored: Option<bool>,
    pub recommended: Option<bool>,
    pub comments_count: Option<u64>,
    pub shares_count: Option<u64>,
    pub contains_media: Option<bool>,
    pub media_url: Option<String>,
    /// Comment tree flattened depth-first, parents before their replies.
    pub comments: Option<Vec<Comment>>,
    pub url: Option<String>,
}

impl Post {
    /// Whether the posting user's name matches `pattern` (search, not full match).
    #[must_use]
    pub fn by(&self, pattern: &Regex) -> bool {
        matches(self.metadata.user.as_deref(), pattern)
    }

    /// Whether the page or group name matches `pattern`.
    #[must_use]
    pub fn on(&self, pattern: &Regex) -> bool {
        matches(self.metadata.page.as_deref(), pattern)
    }

    /// Whether the post text matches `pattern`.
    #[must_use]
    pub fn contains(&self, pattern: &Regex) -> bool {
        matches(self.text.as_deref(), pattern)
    }
}

fn matches(value: Option<&str>, pattern: &Regex) -> bool {
    value.is_some_and(|v| pattern.is_match(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post {
            id: PostId::Structural(7),
            index: 0,
            metadata: Metadata {
                user: Some("Emma Stone".to_string()),
                page: None,
                timestamp: None,
            },
            text: Some("Fresh tomatoes from the garden".to_string()),
            liked: None,
            reactions: Reactions::default(),
            sponsored: None,
            recommended: None,
            comments_count: None,
            shares_count: None,
            contains_media: None,
            media_url: None,
            comments: None,
            url: None,
        }
    }

    #[test]
    fn test_filters_search_not_full_match() {
        let p = post();
        assert!(p.by(&Regex::new("^[Ee]").expect("regex")));
        assert!(p.by(&Regex::new("Stone").expect("regex")));
        assert!(p.contains(&Regex::new("tomato").expect("regex")));
        assert!(!p.contains(&Regex::new("^tomato").expect("regex")));
    }

    #[test]
    fn test_filters_false_on_missing_field() {
        let p = post();
        assert!(!p.on(&Regex::new(".*").expect("regex")));
    }

    #[test]
    fn test_reaction_from_label() {
        assert_eq!(Reaction::from_label("Love: 12 people"), Some(Reaction::Love));
        assert_eq!(Reaction::from_label("HAHA"), Some(Reaction::Haha));
        assert_eq!(Reaction::from_label("Celebrate: 3"), None);
    }

    #[test]
    fn test_reactions_zero_and_unmeasured() {
        assert!(Reactions::default().is_unmeasured());
        let zero = Reactions::zero();
        assert!(!zero.is_unmeasured());
        assert_eq!(zero.total(), 0);

        let mut r = Reactions::zero();
        r.set(Reaction::Wow, Some(4));
        r.set(Reaction::Sad, None);
        assert_eq!(r.get(Reaction::Wow), Some(4));
        assert_eq!(r.total(), 4);
    }

    #[test]
    fn test_post_id_display() {
        assert_eq!(PostId::Permalink("1234".into()).to_string(), "1234");
        assert_eq!(PostId::Structural(99).to_string(), "99");
    }
}
