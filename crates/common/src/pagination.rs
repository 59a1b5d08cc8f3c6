//! Pagination and sorting utilities.
//!
//! Page numbers are 1-indexed. `pages` is always `ceil(total / limit)`.

/// Default page number (1-indexed)
pub const DEFAULT_PAGE: u32 = 1;

/// Default items per page
pub const DEFAULT_LIMIT: u32 = 10;

/// Maximum items per page
pub const MAX_LIMIT: u32 = 100;

/// Pagination parameters for list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    /// Page number (1-indexed)
    pub page: u32,

    /// Items per page
    pub limit: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PaginationParams {
    /// Create new pagination parameters.
    ///
    /// Zero values fall back to the defaults and the limit is capped.
    pub fn new(page: u32, limit: u32) -> Self {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let limit = if limit == 0 {
            DEFAULT_LIMIT
        } else {
            limit.min(MAX_LIMIT)
        };

        Self { page, limit }
    }

    /// Number of documents to skip (0-indexed).
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order
    #[default]
    Asc,
    /// Descending order
    Desc,
}

impl SortDirection {
    /// The numeric form used in MongoDB sort documents
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Asc => 1,
            Self::Desc => -1,
        }
    }
}

/// Sort parameters for list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortParams {
    /// Stored field to sort by
    pub field: String,

    /// Sort direction
    pub direction: SortDirection,
}

impl SortParams {
    /// Create new sort parameters.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Create ascending sort parameters.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }
}

impl Default for SortParams {
    /// Insertion order
    fn default() -> Self {
        Self::asc("_id")
    }
}

/// One page of a filtered collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult<T> {
    /// The items for the current page
    pub data: Vec<T>,

    /// Total number of matching items across all pages
    pub total: u64,

    /// Current page number (1-indexed)
    pub page: u32,

    /// Total number of pages
    pub pages: u32,

    /// Items per page
    pub limit: u32,
}

impl<T> PaginatedResult<T> {
    /// Create a new paginated result.
    pub fn new(data: Vec<T>, params: PaginationParams, total: u64) -> Self {
        Self {
            data,
            total,
            page: params.page,
            pages: page_count(total, params.limit),
            limit: params.limit,
        }
    }
}

/// `ceil(total / limit)`, with a zero limit yielding zero pages
pub fn page_count(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let limit = u64::from(limit);
    u32::try_from(total.div_ceil(limit)).unwrap_or(u32::MAX)
}

/// Slice an in-memory, already ordered collection into one page
pub fn paginate_slice<T: Clone>(items: &[T], params: PaginationParams) -> PaginatedResult<T> {
    let total = items.len() as u64;
    let start = usize::try_from(params.offset()).unwrap_or(usize::MAX);
    let data = items
        .iter()
        .skip(start)
        .take(params.limit as usize)
        .cloned()
        .collect();
    PaginatedResult::new(data, params, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pagination_params_default() {
        let params = PaginationParams::default();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_pagination_params_new() {
        let params = PaginationParams::new(3, 25);
        assert_eq!(params.page, 3);
        assert_eq!(params.limit, 25);
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn test_pagination_params_zero_values_fall_back() {
        let params = PaginationParams::new(0, 0);
        assert_eq!(params, PaginationParams::default());
    }

    #[test]
    fn test_pagination_params_max_limit() {
        let params = PaginationParams::new(1, 500);
        assert_eq!(params.limit, MAX_LIMIT);
    }

    #[test]
    fn test_sort_direction() {
        assert_eq!(SortDirection::Asc.as_i32(), 1);
        assert_eq!(SortDirection::Desc.as_i32(), -1);
    }

    #[test]
    fn test_default_sort_is_insertion_order() {
        assert_eq!(SortParams::default(), SortParams::asc("_id"));
    }

    #[test]
    fn test_paginated_result() {
        let result = PaginatedResult::new(vec![1, 2, 3, 4, 5], PaginationParams::new(2, 5), 23);
        assert_eq!(result.page, 2);
        assert_eq!(result.pages, 5);
        assert_eq!(result.total, 23);
        assert_eq!(result.limit, 5);
    }

    #[test]
    fn test_empty_result_has_no_pages() {
        let result: PaginatedResult<u8> =
            PaginatedResult::new(vec![], PaginationParams::default(), 0);
        assert_eq!(result.pages, 0);
    }

    #[test]
    fn test_paginate_slice_past_the_end() {
        let items: Vec<u32> = (0..7).collect();
        let page = paginate_slice(&items, PaginationParams::new(5, 3));
        assert!(page.data.is_empty());
        assert_eq!(page.pages, 3);
    }

    proptest! {
        #[test]
        fn pages_is_ceiling_of_total_over_limit(n in 0usize..500, limit in 1u32..=100) {
            let items: Vec<usize> = (0..n).collect();
            let first = paginate_slice(&items, PaginationParams::new(1, limit));
            let expected = (n as u64 + u64::from(limit) - 1) / u64::from(limit);
            prop_assert_eq!(u64::from(first.pages), expected);
        }

        #[test]
        fn page_k_returns_its_window(n in 0usize..300, limit in 1u32..=50, k in 1u32..10) {
            let items: Vec<usize> = (0..n).collect();
            let page = paginate_slice(&items, PaginationParams::new(k, limit));
            let lo = ((k - 1) * limit) as usize;
            let hi = (k * limit) as usize;
            let expected: Vec<usize> = items.iter().copied().filter(|i| *i >= lo && *i < hi).collect();
            prop_assert_eq!(page.data, expected);
        }
    }
}
