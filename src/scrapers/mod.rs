//! Fetching and headline extraction for configured news portals.
//!
//! Every portal goes through the same two phases:
//!
//! 1. **Fetching** ([`fetch`]): download the front page with browser-like headers
//! 2. **Extraction** ([`extract`], [`fallback`]): turn markup into raw candidates
//!
//! # Extraction tiers
//!
//! | Tier | Module | Input | Link |
//! |------|--------|-------|------|
//! | Configured selectors | [`extract`] | parsed document | first anchor of the match |
//! | Anchor scan | [`fallback`] | every `<a>` | the anchor's `href` |
//! | Text-line scan | [`fallback`] | raw markup lines | the source's base URL |
//!
//! A tier runs only when the previous one produced fewer than
//! `extraction.min_viable` distinct titles. The first viable tier wins; when
//! none is viable the tier with the most distinct titles is used.

pub mod extract;
pub mod fallback;
pub mod fetch;

pub use extract::extract;
pub use fetch::HtmlFetcher;
