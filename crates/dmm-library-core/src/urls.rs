//! URLs derived from a canonical ID.
//!
//! These are string templates only. Nothing here checks that the
//! resulting resource exists.

/// Base of the predicted package-art location.
pub const THUMBNAIL_BASE: &str = "https://pics.dmm.co.jp/digital/video";

/// Content page opened by the "open in browser" action.
pub const CONTENT_PAGE_BASE: &str = "https://video.dmm.co.jp/av/content/";

/// Predicted thumbnail URL: the ID appears as the path segment and as the
/// filename prefix.
///
/// ```
/// use dmm_library_core::urls::thumbnail_url;
///
/// assert_eq!(
///     thumbnail_url("abc123"),
///     "https://pics.dmm.co.jp/digital/video/abc123/abc123pl.jpg"
/// );
/// ```
pub fn thumbnail_url(canonical_id: &str) -> String {
    format!("{}/{}/{}pl.jpg", THUMBNAIL_BASE, canonical_id, canonical_id)
}

/// Content page URL for an ID.
pub fn content_page_url(canonical_id: &str) -> String {
    format!("{}?id={}", CONTENT_PAGE_BASE, canonical_id)
}
