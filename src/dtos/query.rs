//! Query DTOs - pagination parameters shared by every list endpoint

use serde::Deserialize;
use super::*;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

/// Raw `?page=&limit=` values. Kept as strings so that unparseable numbers
/// fall back to the defaults instead of rejecting the request.
#[derive(Deserialize, Debug, Default)]
pub struct PaginationQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

impl PaginationQuery {
    pub fn resolve(&self) -> Pagination {
        let page = coerce(self.page.as_deref()).unwrap_or(DEFAULT_PAGE).max(1);
        let limit = coerce(self.limit.as_deref())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);
        Pagination { page, limit }
    }
}

/// Leading-integer coercion: "3", " 3 ", "3.7" and "3abc" all give 3.
/// Values too large for a `u32` saturate instead of falling back.
fn coerce(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let value = digits
        .parse::<u64>()
        .ok()
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(u32::MAX);
    Some(value).filter(|n| *n > 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn query(page: Option<&str>, limit: Option<&str>) -> PaginationQuery {
        PaginationQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(query(None, None).resolve(), Pagination { page: 1, limit: 20 });
    }

    #[test]
    fn test_lenient_coercion() {
        assert_eq!(query(Some("3"), Some("10")).resolve(), Pagination { page: 3, limit: 10 });
        assert_eq!(query(Some("2.9"), Some("15px")).resolve(), Pagination { page: 2, limit: 15 });
        assert_eq!(query(Some("abc"), Some("")).resolve(), Pagination { page: 1, limit: 20 });
        assert_eq!(query(Some("0"), Some("0")).resolve(), Pagination { page: 1, limit: 20 });
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(query(None, Some("5000")).resolve().limit, MAX_LIMIT);
    }

    #[test]
    fn test_oversized_values_saturate() {
        assert_eq!(query(None, Some("99999999999")).resolve().limit, MAX_LIMIT);
        assert_eq!(query(Some("99999999999"), None).resolve().page, u32::MAX);
        assert_eq!(
            query(Some("123456789012345678901234567890"), None).resolve().page,
            u32::MAX
        );
    }

    #[test]
    fn test_offset() {
        assert_eq!(Pagination { page: 1, limit: 20 }.offset(), 0);
        assert_eq!(Pagination { page: 3, limit: 20 }.offset(), 40);
    }
}
