//! Offset/limit paging

use serde::{Deserialize, Serialize};

use crate::error::{GbifError, Result};
use crate::params::QueryParams;

/// Page size used when the caller does not choose one
pub const DEFAULT_LIMIT: u32 = 20;

/// Paging cursor: where the next page starts and how large it may be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Paging {
    offset: u64,
    limit: u32,
}

impl Paging {
    /// Validate and build a cursor. `offset` must be non-negative and `limit` positive.
    pub fn new(offset: i64, limit: i64) -> Result<Self> {
        if offset < 0 {
            return Err(GbifError::invalid(format!(
                "offset must not be negative, got {}",
                offset
            )));
        }
        if limit <= 0 {
            return Err(GbifError::invalid(format!(
                "limit must be positive, got {}",
                limit
            )));
        }
        let limit = u32::try_from(limit)
            .map_err(|_| GbifError::invalid(format!("limit {} is too large", limit)))?;
        Ok(Self {
            offset: offset as u64,
            limit,
        })
    }

    /// First page with the given size
    pub fn with_limit(limit: i64) -> Result<Self> {
        Self::new(0, limit)
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Cursor for the page following this one, `None` if the offset would overflow
    pub fn next(&self) -> Option<Self> {
        let offset = self.offset.checked_add(u64::from(self.limit))?;
        Some(Self {
            offset,
            limit: self.limit,
        })
    }

    pub(crate) fn apply(&self, params: &mut QueryParams) {
        params.push("offset", self.offset).push("limit", self.limit);
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Count of records sharing one facet value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub name: String,
    pub count: u64,
}

/// Facet counts for one search parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub field: String,
    #[serde(default, deserialize_with = "crate::types::de::null_as_default")]
    pub counts: Vec<FacetCount>,
}

/// One page of decoded records
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub offset: u64,
    pub limit: u32,
    /// The server's own end-of-records flag, when it sent one
    pub end_of_records: Option<bool>,
    pub count: Option<u64>,
    pub results: Vec<T>,
    pub facets: Vec<Facet>,
}

impl<T> Page<T> {
    /// Whether no further page exists
    ///
    /// An explicit server flag wins, even when it disagrees with the number
    /// of records received. Without one, a short page is the last page.
    /// A page with a zero limit cannot be advanced past and counts as last.
    pub fn is_last_page(&self) -> bool {
        if self.limit == 0 {
            return true;
        }
        match self.end_of_records {
            Some(flag) => flag,
            None => self.results.len() < self.limit as usize,
        }
    }

    /// Cursor this page was fetched with. The limit is never below 1.
    pub fn paging(&self) -> Paging {
        Paging {
            offset: self.offset,
            limit: self.limit.max(1),
        }
    }

    /// Cursor for the following page, `None` once the last page is reached
    pub fn next_page(&self) -> Option<Paging> {
        if self.is_last_page() {
            None
        } else {
            self.paging().next()
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_results(self) -> Vec<T> {
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(offset: u64, limit: u32, n: usize, flag: Option<bool>) -> Page<u32> {
        Page {
            offset,
            limit,
            end_of_records: flag,
            count: None,
            results: (0..n as u32).collect(),
            facets: vec![],
        }
    }

    #[test]
    fn test_default_paging() {
        let paging = Paging::default();
        assert_eq!(paging.offset(), 0);
        assert_eq!(paging.limit(), 20);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(matches!(Paging::new(-1, 20), Err(GbifError::InvalidArgument(_))));
        assert!(matches!(Paging::new(0, 0), Err(GbifError::InvalidArgument(_))));
        assert!(matches!(Paging::new(0, -5), Err(GbifError::InvalidArgument(_))));
        assert!(Paging::new(0, i64::MAX).is_err());
    }

    #[test]
    fn test_next_advances_by_limit() {
        let next = Paging::new(40, 20).unwrap().next();
        assert_eq!(next, Some(Paging::new(60, 20).unwrap()));
    }

    #[test]
    fn test_next_stops_at_offset_overflow() {
        let p = page(u64::MAX - 5, 10, 10, Some(false));
        assert_eq!(p.paging().next(), None);
        assert_eq!(p.next_page(), None);
    }

    #[test]
    fn test_zero_limit_page_does_not_repeat() {
        let p = page(40, 0, 0, None);
        assert!(p.is_last_page());
        assert_eq!(p.next_page(), None);
        assert_eq!(p.paging().limit(), 1);
        // even when the server insists there is more
        assert_eq!(page(40, 0, 0, Some(false)).next_page(), None);
    }

    #[test]
    fn test_short_page_is_last() {
        let p = page(0, 20, 7, None);
        assert!(p.is_last_page());
        assert_eq!(p.next_page(), None);
    }

    #[test]
    fn test_full_page_without_flag_is_not_last() {
        let p = page(20, 20, 20, None);
        assert!(!p.is_last_page());
        assert_eq!(p.next_page().unwrap().offset(), 40);
    }

    #[test]
    fn test_server_flag_is_authoritative() {
        // full page, server says done
        assert!(page(0, 10, 10, Some(true)).is_last_page());
        // short page, server says there is more
        let p = page(0, 10, 3, Some(false));
        assert!(!p.is_last_page());
        assert_eq!(p.next_page().unwrap().offset(), 10);
    }

    #[test]
    fn test_count_is_not_consulted() {
        let mut p = page(0, 5, 5, None);
        p.count = Some(5);
        assert!(!p.is_last_page());
    }
}
