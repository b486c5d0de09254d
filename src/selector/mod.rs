//! Selector Infrastructure
//!
//! Locators are declarative descriptions of where a UI region lives. They are
//! resolved against any [`Page`] using only its primitive queries, so the same
//! catalog works for a live browser driver and for snapshot replay.
//!
//! A catalog entry is an ordered slice of candidate locators: the first
//! candidate that matches wins.

use crate::driver::Page;
use crate::{Error, Result};

pub mod catalog;

pub use catalog::{locators, Region, Variant};

/// Predicate on an element's rendered text (trimmed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    Exact(&'static str),
    Prefix(&'static str),
    Contains(&'static str),
}

impl TextMatch {
    #[must_use]
    pub fn is_match(self, text: &str) -> bool {
        let text = text.trim();
        match self {
            TextMatch::Exact(s) => text == s,
            TextMatch::Prefix(s) => text.starts_with(s),
            TextMatch::Contains(s) => text.contains(s),
        }
    }
}

/// Where to find an element, relative to a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// CSS selector matched against descendants of the scope.
    Css(&'static str),
    /// CSS selector, keeping only elements whose text matches.
    CssText(&'static str, TextMatch),
    /// 1-based element child of the scope.
    Child(usize),
    /// Each step is resolved inside the matches of the previous one.
    Path(&'static [Locator]),
}

/// All elements matched by `locator` inside `scope` (the whole document when `None`).
///
/// Missing elements yield an empty list; stale or otherwise broken handles
/// are reported as errors.
pub fn find_all<P: Page>(
    page: &P,
    scope: Option<&P::Element>,
    locator: &Locator,
) -> Result<Vec<P::Element>> {
    match locator {
        Locator::Css(css) => page.find_all(scope, css),
        Locator::CssText(css, text) => {
            let mut matched = Vec::new();
            for el in page.find_all(scope, css)? {
                match page.inner_text(&el) {
                    Ok(t) if text.is_match(&t) => matched.push(el),
                    Ok(_) => {}
                    Err(e) if e.is_stale() || e.is_absent() => {}
                    Err(e) => return Err(e),
                }
            }
            Ok(matched)
        }
        Locator::Child(position) => {
            let Some(parent) = scope else {
                return Ok(Vec::new());
            };
            match page.child_at(parent, *position) {
                Ok(el) => Ok(vec![el]),
                Err(e) if e.is_absent() => Ok(Vec::new()),
                Err(e) => Err(e),
            }
        }
        Locator::Path(steps) => find_path(page, scope, steps),
    }
}

fn find_path<P: Page>(
    page: &P,
    scope: Option<&P::Element>,
    steps: &[Locator],
) -> Result<Vec<P::Element>> {
    let Some((first, rest)) = steps.split_first() else {
        return Ok(scope.cloned().into_iter().collect());
    };

    let mut matched = Vec::new();
    for el in find_all(page, scope, first)? {
        matched.extend(find_path(page, Some(&el), rest)?);
    }
    Ok(matched)
}

/// First element matched by any candidate, tried in order.
///
/// Returns `ElementAbsent` naming `what` when no candidate matches. A stale
/// scope is reported as such rather than as absence.
pub fn find_first<P: Page>(
    page: &P,
    scope: Option<&P::Element>,
    candidates: &[Locator],
    what: &str,
) -> Result<P::Element> {
    let mut first_error = None;
    for locator in candidates {
        match find_all(page, scope, locator) {
            Ok(found) => {
                if let Some(el) = found.into_iter().next() {
                    return Ok(el);
                }
            }
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }
    Err(first_error.unwrap_or_else(|| Error::ElementAbsent(what.to_string())))
}

/// Finds a catalog region inside `scope` for the given layout variant.
pub fn find_region<P: Page>(
    page: &P,
    scope: Option<&P::Element>,
    region: Region,
    variant: Variant,
) -> Result<P::Element> {
    find_first(page, scope, locators(region, variant), region.name())
}

/// Whether a catalog region exists inside `scope`.
pub fn region_exists<P: Page>(
    page: &P,
    scope: Option<&P::Element>,
    region: Region,
    variant: Variant,
) -> Result<bool> {
    match find_region(page, scope, region, variant) {
        Ok(_) => Ok(true),
        Err(e) if e.is_absent() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Every element matched by the first candidate of `region` that matches anything.
pub fn find_region_all<P: Page>(
    page: &P,
    scope: Option<&P::Element>,
    region: Region,
    variant: Variant,
) -> Result<Vec<P::Element>> {
    for locator in locators(region, variant) {
        let found = find_all(page, scope, locator)?;
        if !found.is_empty() {
            return Ok(found);
        }
    }
    Ok(Vec::new())
}

// Regions whose locators do not depend on the heading layout.

pub fn find_common<P: Page>(page: &P, scope: Option<&P::Element>, region: Region) -> Result<P::Element> {
    find_region(page, scope, region, Variant::Classic)
}

pub fn find_common_all<P: Page>(
    page: &P,
    scope: Option<&P::Element>,
    region: Region,
) -> Result<Vec<P::Element>> {
    find_region_all(page, scope, region, Variant::Classic)
}

pub fn common_exists<P: Page>(page: &P, scope: Option<&P::Element>, region: Region) -> Result<bool> {
    region_exists(page, scope, region, Variant::Classic)
}
