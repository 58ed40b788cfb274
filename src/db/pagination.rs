use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Offset pagination for the admin listing.
///
/// `page` is 1-based and floored at 1; `limit` is clamped to
/// `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Parse raw query-string values. Missing, blank, or non-numeric values
    /// fall back to the defaults; fractions are truncated.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(page.and_then(parse_number), limit.and_then(parse_number))
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn parse_number(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

/// One page of results plus the unfiltered total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(request: PageRequest, total: i64, items: Vec<T>) -> Self {
        Self {
            total,
            page: request.page,
            limit: request.limit,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let req = PageRequest::from_query(None, None);
        assert_eq!(req, PageRequest { page: 1, limit: 20 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(PageRequest::from_query(None, Some("500")).limit, 100);
        assert_eq!(PageRequest::from_query(None, Some("0")).limit, 1);
        assert_eq!(PageRequest::from_query(None, Some("-7")).limit, 1);
    }

    #[test]
    fn page_is_floored() {
        assert_eq!(PageRequest::from_query(Some("0"), None).page, 1);
        assert_eq!(PageRequest::from_query(Some("-3"), None).page, 1);
    }

    #[test]
    fn junk_falls_back_to_defaults() {
        let req = PageRequest::from_query(Some("abc"), Some(""));
        assert_eq!(req, PageRequest { page: 1, limit: 20 });
    }

    #[test]
    fn fractions_truncate() {
        let req = PageRequest::from_query(Some("2.9"), Some("10.5"));
        assert_eq!(req, PageRequest { page: 2, limit: 10 });
        assert_eq!(req.offset(), 10);
    }

    #[test]
    fn offset_saturates() {
        let req = PageRequest::new(Some(i64::MAX), Some(100));
        assert_eq!(req.offset(), i64::MAX);
    }
}
