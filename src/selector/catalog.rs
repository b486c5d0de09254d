//! Selector Catalog
//!
//! Locator candidates for every semantic UI region, keyed by `(Region, Variant)`.
//!
//! Class names in the rendered feed are short generated strings that change
//! between releases, so most entries lean on ARIA roles and labels, which are
//! consistent and human-readable. Entries are still version-fragile.
//!
//! Two heading layouts have been observed for a post's metadata block:
//! - **Arrow**: `user ▸ page` on the heading line, then `time · audience`.
//! - **Classic**: `page` (or the author) on the heading line, then
//!   `user · time · audience` below it.
//!
//! Posts browsed inside a group or page feed use the **Group** layout, where
//! the page name is already known. Adding a layout means adding a `Variant`
//! and its entries here; extractors do not change.

use super::{Locator, TextMatch};

/// Heading layout of a post's metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Arrow,
    Classic,
    Group,
}

/// A semantic UI region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// The scrollable feed container.
    Feed,
    /// Metadata block at the top of a post.
    Metadata,
    /// Present only in the arrow layout (`user ▸ page`).
    ArrowMarker,
    /// Line under the heading in the classic layout.
    LowerMetadata,
    User,
    Page,
    /// Relative time indicator; hovering it reveals the exact time.
    Time,
    Permalink,
    Sponsored,
    Recommended,
    LikeButton,
    SeeMore,
    ShowOriginal,
    ContentText,
    /// Hover popup, searched in the whole document.
    Tooltip,
    ReactionBar,
    /// One marker per reaction kind, inside the reaction bar.
    ReactionMarker,
    CommentCount,
    ShareCount,
    MediaImage,
    MediaVideo,
    /// Comment ranking menu button ("Most relevant").
    RankingFilter,
    /// "All comments" entry in the ranking menu.
    AllComments,
    MoreComments,
    CommentList,
    /// The comment itself inside a list item (excludes its replies).
    CommentBody,
    /// Nested reply list inside a comment's list item.
    CommentReplies,
    ViewReplies,
    CommentAuthor,
    CommentText,
    CommentTime,
    CommentReactions,
    SidebarAd,
    /// Candidate links to a group's own URL; the matching one carries its name.
    GroupLink,
}

impl Region {
    /// Name used in logs and `ElementAbsent` errors.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Region::Feed => "feed",
            Region::Metadata => "metadata",
            Region::ArrowMarker => "arrow marker",
            Region::LowerMetadata => "lower metadata",
            Region::User => "user",
            Region::Page => "page",
            Region::Time => "time indicator",
            Region::Permalink => "permalink",
            Region::Sponsored => "sponsored label",
            Region::Recommended => "recommended label",
            Region::LikeButton => "like button",
            Region::SeeMore => "see more button",
            Region::ShowOriginal => "see original button",
            Region::ContentText => "content text",
            Region::Tooltip => "tooltip",
            Region::ReactionBar => "reaction bar",
            Region::ReactionMarker => "reaction marker",
            Region::CommentCount => "comment count",
            Region::ShareCount => "share count",
            Region::MediaImage => "media image",
            Region::MediaVideo => "media video",
            Region::RankingFilter => "comment ranking filter",
            Region::AllComments => "all comments option",
            Region::MoreComments => "more comments button",
            Region::CommentList => "comment list",
            Region::CommentBody => "comment body",
            Region::CommentReplies => "comment replies",
            Region::ViewReplies => "view replies button",
            Region::CommentAuthor => "comment author",
            Region::CommentText => "comment text",
            Region::CommentTime => "comment time",
            Region::CommentReactions => "comment reactions",
            Region::SidebarAd => "sidebar ad",
            Region::GroupLink => "group link",
        }
    }
}

// === Shared building blocks ===

const TIME_LINK: &str = r#"span[id^="jsc_c"] a[href]"#;

static FEED: &[Locator] = &[
    Locator::Css(r#"div[role="feed"]"#),
    Locator::Css(r#"div[data-pagelet="GroupFeed"]"#),
    Locator::Css(r#"div[data-pagelet^="ProfileTimeline"]"#),
];

static METADATA: &[Locator] = &[
    Locator::Css("div.buofh1pr > div:first-child"),
    Locator::Css(r#"div[data-ad-rendering-role="profile_name"]"#),
];

static ARROW_MARKER: &[Locator] = &[Locator::Css(
    "h4 > div:first-child > div:first-child > span:nth-of-type(2)",
)];

static LOWER_METADATA: &[Locator] = &[Locator::Child(2)];

// === Variant-specific entries ===

static ARROW_USER: &[Locator] = &[Locator::Css(
    "h4 > div:first-child > div:first-child > span:nth-of-type(1)",
)];
static ARROW_PAGE: &[Locator] = &[Locator::Css(
    "h4 > div:first-child > div:first-child > span:nth-of-type(3)",
)];
static ARROW_TIME: &[Locator] = &[Locator::Css(TIME_LINK)];

// Classic: the heading names the page (or the author when posting on their
// own timeline); the lower line holds `user · time · audience`.
static CLASSIC_USER: &[Locator] = &[Locator::Path(&[Locator::Child(2), Locator::Child(1)])];
static CLASSIC_PAGE: &[Locator] = &[Locator::Css("h4")];
static CLASSIC_TIME: &[Locator] = &[Locator::Path(&[Locator::Child(2), Locator::Css(TIME_LINK)])];

static GROUP_USER: &[Locator] = &[Locator::Css(r#"h4 a[role="link"]"#), Locator::Css("h4")];
static GROUP_TIME: &[Locator] = &[
    Locator::Css(TIME_LINK),
    Locator::Css(r#"a[href*="/groups/"][href*="/posts/"]"#),
];

static ARROW_PERMALINK: &[Locator] = &[
    Locator::Css(TIME_LINK),
    Locator::Css(r#"a[href*="/posts/"]"#),
    Locator::Css(r#"a[href*="story_fbid="]"#),
];
static CLASSIC_PERMALINK: &[Locator] = &[
    Locator::Path(&[Locator::Child(2), Locator::Css(TIME_LINK)]),
    Locator::Css(r#"a[href*="/posts/"]"#),
    Locator::Css(r#"a[href*="story_fbid="]"#),
];
static GROUP_PERMALINK: &[Locator] = &[
    Locator::Css(TIME_LINK),
    Locator::Css(r#"a[href*="/groups/"][href*="/posts/"]"#),
    Locator::Css(r#"a[href*="/permalink/"]"#),
];

// === Layout-independent entries ===

static SPONSORED: &[Locator] = &[Locator::Css(r#"a[aria-label="Sponsored"][role="link"]"#)];
static RECOMMENDED: &[Locator] = &[Locator::CssText(
    r#"[role="article"] span"#,
    TextMatch::Exact("Recommended post"),
)];
static LIKE_BUTTON: &[Locator] = &[
    Locator::Css(r#"div[role="button"][aria-label="Like"]"#),
    Locator::Css(r#"div[role="button"][aria-label="Remove Like"]"#),
];
static SEE_MORE: &[Locator] = &[Locator::CssText(r#"div[role="button"]"#, TextMatch::Exact("See more"))];
static SHOW_ORIGINAL: &[Locator] = &[Locator::CssText(
    r#"div[role="button"]"#,
    TextMatch::Exact("See original"),
)];
static CONTENT_TEXT: &[Locator] = &[
    Locator::Css(r#"div[data-ad-preview="message"]"#),
    Locator::Css(r#"div[data-ad-comet-preview="message"]"#),
    // Background-colour posts render their text centred in bold.
    Locator::Css(r#"div[style*="text-align: center"]"#),
];
static TOOLTIP: &[Locator] = &[Locator::Css(r#"[role="tooltip"]"#)];
static REACTION_BAR: &[Locator] = &[Locator::Css(
    r#"span[aria-label="See who reacted to this"][role="toolbar"]"#,
)];
static REACTION_MARKER: &[Locator] = &[Locator::Css("[aria-label]")];
static COMMENT_COUNT: &[Locator] = &[Locator::CssText(
    r#"div[role="button"] span"#,
    TextMatch::Contains(" Comment"),
)];
static SHARE_COUNT: &[Locator] = &[Locator::CssText(
    r#"div[role="button"] span"#,
    TextMatch::Contains(" Share"),
)];
static MEDIA_IMAGE: &[Locator] = &[
    Locator::Css(r#"a[href*="/photo"] img"#),
    Locator::Css(r#"div[data-visualcompletion="media-vc-image"] img"#),
];
static MEDIA_VIDEO: &[Locator] = &[
    Locator::Css(r#"div[data-visualcompletion="ignore"] video"#),
    Locator::Css("video"),
];
static RANKING_FILTER: &[Locator] = &[
    Locator::CssText(r#"div[role="button"]"#, TextMatch::Exact("Most relevant")),
    Locator::CssText(r#"div[role="button"]"#, TextMatch::Exact("Top comments")),
    Locator::CssText(r#"div[role="button"]"#, TextMatch::Exact("Newest")),
];
static ALL_COMMENTS: &[Locator] = &[Locator::CssText(
    r#"div[role="menuitem"]"#,
    TextMatch::Prefix("All comments"),
)];
static MORE_COMMENTS: &[Locator] = &[Locator::CssText(
    r#"div[role="button"]"#,
    TextMatch::Contains("more comments"),
)];
static COMMENT_LIST: &[Locator] = &[
    Locator::Css(r#"ul[aria-label="Comments"]"#),
    Locator::Css("div.cwj9ozl2 > ul"),
];
static COMMENT_BODY: &[Locator] = &[Locator::Css(r#"div[role="article"]"#)];
static COMMENT_REPLIES: &[Locator] = &[Locator::Css("ul")];
// "View 3 replies", "1 Reply"; a bare "Reply" opens the composer instead.
static VIEW_REPLIES: &[Locator] = &[
    Locator::CssText(r#"div[role="button"]"#, TextMatch::Contains("replies")),
    Locator::CssText(r#"div[role="button"]"#, TextMatch::Contains(" repl")),
    Locator::CssText(r#"div[role="button"]"#, TextMatch::Contains(" Repl")),
];
static COMMENT_AUTHOR: &[Locator] = &[Locator::Css(r#"a[role="link"] span"#), Locator::Css("a span")];
static COMMENT_TEXT: &[Locator] = &[Locator::Css(r#"div[dir="auto"]"#)];
static COMMENT_TIME: &[Locator] = &[Locator::Css(r#"a[href*="comment_id"]"#)];
static COMMENT_REACTIONS: &[Locator] = &[Locator::Css(r#"div[aria-label$="see who reacted to this"]"#)];
static SIDEBAR_AD: &[Locator] = &[Locator::Css(
    r#"a[aria-label="Advertiser"][rel="nofollow noopener"] > div > div > div > span"#,
)];

static GROUP_LINK: &[Locator] = &[Locator::Css("a[href]")];

/// Locator candidates for `region` under `variant`, in priority order.
#[must_use]
pub fn locators(region: Region, variant: Variant) -> &'static [Locator] {
    match (region, variant) {
        (Region::User, Variant::Arrow) => ARROW_USER,
        (Region::User, Variant::Classic) => CLASSIC_USER,
        (Region::User, Variant::Group) => GROUP_USER,

        // The group layout has no page on the heading; the name is supplied by the caller.
        (Region::Page, Variant::Arrow) => ARROW_PAGE,
        (Region::Page, Variant::Classic | Variant::Group) => CLASSIC_PAGE,

        (Region::Time, Variant::Arrow) => ARROW_TIME,
        (Region::Time, Variant::Classic) => CLASSIC_TIME,
        (Region::Time, Variant::Group) => GROUP_TIME,

        (Region::Permalink, Variant::Arrow) => ARROW_PERMALINK,
        (Region::Permalink, Variant::Classic) => CLASSIC_PERMALINK,
        (Region::Permalink, Variant::Group) => GROUP_PERMALINK,

        (Region::Feed, _) => FEED,
        (Region::Metadata, _) => METADATA,
        (Region::ArrowMarker, _) => ARROW_MARKER,
        (Region::LowerMetadata, _) => LOWER_METADATA,
        (Region::Sponsored, _) => SPONSORED,
        (Region::Recommended, _) => RECOMMENDED,
        (Region::LikeButton, _) => LIKE_BUTTON,
        (Region::SeeMore, _) => SEE_MORE,
        (Region::ShowOriginal, _) => SHOW_ORIGINAL,
        (Region::ContentText, _) => CONTENT_TEXT,
        (Region::Tooltip, _) => TOOLTIP,
        (Region::ReactionBar, _) => REACTION_BAR,
        (Region::ReactionMarker, _) => REACTION_MARKER,
        (Region::CommentCount, _) => COMMENT_COUNT,
        (Region::ShareCount, _) => SHARE_COUNT,
        (Region::MediaImage, _) => MEDIA_IMAGE,
        (Region::MediaVideo, _) => MEDIA_VIDEO,
        (Region::RankingFilter, _) => RANKING_FILTER,
        (Region::AllComments, _) => ALL_COMMENTS,
        (Region::MoreComments, _) => MORE_COMMENTS,
        (Region::CommentList, _) => COMMENT_LIST,
        (Region::CommentBody, _) => COMMENT_BODY,
        (Region::CommentReplies, _) => COMMENT_REPLIES,
        (Region::ViewReplies, _) => VIEW_REPLIES,
        (Region::CommentAuthor, _) => COMMENT_AUTHOR,
        (Region::CommentText, _) => COMMENT_TEXT,
        (Region::CommentTime, _) => COMMENT_TIME,
        (Region::CommentReactions, _) => COMMENT_REACTIONS,
        (Region::SidebarAd, _) => SIDEBAR_AD,
        (Region::GroupLink, _) => GROUP_LINK,
    }
}
