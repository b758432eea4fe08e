//! Common API utilities and shared types

use serde::Serialize;

/// Smallest page number
pub const MIN_PAGE: u32 = 1;
/// Default page size when the query omits `pageSize`
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Largest accepted page size
pub const MAX_PAGE_SIZE: u32 = 50;

/// Clamp a requested page number. Absent or zero becomes page 1.
pub fn resolve_page(page: Option<u32>) -> u32 {
    page.unwrap_or(MIN_PAGE).max(MIN_PAGE)
}

/// Clamp a requested page size into `1..=50`, defaulting to 10.
pub fn resolve_page_size(page_size: Option<u32>) -> u32 {
    page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

/// Normalize a free-text filter: trim, and treat empty as no filter.
pub fn resolve_query(q: Option<String>) -> Option<String> {
    q.map(|q| q.trim().to_string()).filter(|q| !q.is_empty())
}

/// Standard list envelope: one page of items plus the unfiltered-by-page
/// total for the same filter.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

/// Single-item envelope used by create/get/update responses
#[derive(Debug, Serialize)]
pub struct ItemEnvelope<T> {
    pub item: T,
}

/// Plain acknowledgement used by delete/logout responses
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_page_clamps_low() {
        assert_eq!(resolve_page(None), 1);
        assert_eq!(resolve_page(Some(0)), 1);
        assert_eq!(resolve_page(Some(7)), 7);
    }

    #[test]
    fn test_resolve_page_size_clamps_both_ends() {
        assert_eq!(resolve_page_size(None), 10);
        assert_eq!(resolve_page_size(Some(0)), 1);
        assert_eq!(resolve_page_size(Some(50)), 50);
        assert_eq!(resolve_page_size(Some(500)), 50);
    }

    #[test]
    fn test_resolve_query_trims_and_drops_empty() {
        assert_eq!(resolve_query(None), None);
        assert_eq!(resolve_query(Some("".into())), None);
        assert_eq!(resolve_query(Some("   ".into())), None);
        assert_eq!(resolve_query(Some("  delhi ".into())), Some("delhi".into()));
    }

    #[test]
    fn test_paginated_envelope_is_camel_case() {
        let page = Paginated {
            items: vec!["a"],
            total: 1,
            page: 1,
            page_size: 10,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("pageSize").is_some());
        assert!(json.get("page_size").is_none());
    }
}
