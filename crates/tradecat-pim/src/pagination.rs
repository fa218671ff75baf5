//! Cursor pagination over the PIM's `Link` response header.
//!
//! Each catalog page carries RFC 8288 link directives; the next page's
//! cursor is the `page_info` query parameter of the `rel="next"` target:
//!
//! ```text
//! <https://pim.example.com/api/products?limit=100&page_info=PREV>; rel="previous",
//! <https://pim.example.com/api/products?limit=100&page_info=NEXT>; rel="next"
//! ```

use reqwest::Url;

/// Query parameter carrying the opaque page cursor.
pub const CURSOR_PARAM: &str = "page_info";

/// Splits a `Link` header into `(target, rel)` pairs. Directives without a
/// bracketed target are skipped.
fn link_directives(header: &str) -> impl Iterator<Item = (&str, Option<&str>)> {
    header.split(',').filter_map(|directive| {
        let directive = directive.trim();
        let (target, params) = directive
            .strip_prefix('<')
            .and_then(|rest| rest.split_once('>'))?;

        let rel = params.split(';').find_map(|param| {
            let (key, value) = param.trim().split_once('=')?;
            (key.trim() == "rel").then(|| value.trim().trim_matches('"'))
        });
        Some((target, rel))
    })
}

/// Extracts the cursor for the next page from a `Link` header value.
///
/// Returns `None` when the header is absent, has no `rel="next"` directive,
/// or the next target carries no non-empty cursor. Relative targets are
/// accepted.
#[must_use]
pub fn extract_next_cursor(link_header: Option<&str>) -> Option<String> {
    let (target, _) = link_directives(link_header?).find(|(_, rel)| *rel == Some("next"))?;

    let url = Url::parse(target)
        .or_else(|_| Url::parse("http://relative.invalid/").and_then(|base| base.join(target)))
        .ok()?;

    url.query_pairs()
        .find(|(key, _)| key == CURSOR_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
