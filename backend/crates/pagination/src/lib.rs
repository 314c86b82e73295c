//! Page-number pagination primitives shared by list endpoints.
//!
//! Callers validate the `page` and `limit` query parameters into
//! [`PageParams`], run their query with [`PageParams::offset`] and
//! [`PageParams::limit`], then wrap the rows in a [`Paginated`] envelope. The
//! envelope carries absolute `next` and `previous` links that preserve every
//! other query parameter of the original request.
//!
//! ```
//! use pagination::{PageParams, Paginated};
//! use url::Url;
//!
//! let params = PageParams::parse(Some("2"), Some("2")).expect("valid params");
//! let url = Url::parse("https://example.test/api/v1/recipes?tags=lunch&page=2&limit=2")
//!     .expect("valid url");
//! let page = Paginated::new(vec!["c", "d"], 5, params, &url);
//!
//! assert_eq!(
//!     page.next.as_deref(),
//!     Some("https://example.test/api/v1/recipes?tags=lunch&limit=2&page=3")
//! );
//! assert_eq!(
//!     page.previous.as_deref(),
//!     Some("https://example.test/api/v1/recipes?tags=lunch&limit=2")
//! );
//! ```

use serde::Serialize;
use url::Url;

/// Number of items returned when the client does not supply `limit`.
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// Upper bound accepted for the `limit` query parameter.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameter carrying the 1-based page number.
pub const PAGE_PARAM: &str = "page";

/// Query parameter carrying the page size.
pub const LIMIT_PARAM: &str = "limit";

/// Errors raised while validating pagination query parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The page number is missing digits, zero, or out of range.
    #[error("page must be a positive integer")]
    InvalidPage,
    /// The page size is not a number within the accepted bounds.
    #[error("limit must be an integer between 1 and {max}")]
    InvalidLimit {
        /// Largest accepted page size.
        max: u32,
    },
}

/// Validated page-number pagination request.
///
/// ## Invariants
/// - `page` is at least 1.
/// - `limit` lies within `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    page: u32,
    limit: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    /// Build parameters from already-decoded numbers.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPage`] for page zero and
    /// [`PaginationError::InvalidLimit`] for a limit outside
    /// `1..=MAX_PAGE_SIZE`.
    pub const fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, PaginationError> {
        let page_number = match page {
            Some(0) => return Err(PaginationError::InvalidPage),
            Some(value) => value,
            None => 1,
        };
        let page_size = match limit {
            Some(value) if value == 0 || value > MAX_PAGE_SIZE => {
                return Err(PaginationError::InvalidLimit { max: MAX_PAGE_SIZE });
            }
            Some(value) => value,
            None => DEFAULT_PAGE_SIZE,
        };
        Ok(Self {
            page: page_number,
            limit: page_size,
        })
    }

    /// Parse raw query-string values.
    ///
    /// # Errors
    ///
    /// Returns a [`PaginationError`] when either value is not a decimal
    /// integer or falls outside its accepted range.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{DEFAULT_PAGE_SIZE, PageParams};
    ///
    /// let params = PageParams::parse(None, None).expect("defaults apply");
    /// assert_eq!(params.page(), 1);
    /// assert_eq!(params.limit(), DEFAULT_PAGE_SIZE);
    /// assert!(PageParams::parse(Some("abc"), None).is_err());
    /// ```
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, PaginationError> {
        let page_number = page
            .map(|raw| raw.trim().parse::<u32>())
            .transpose()
            .map_err(|_| PaginationError::InvalidPage)?;
        let page_size = limit
            .map(|raw| raw.trim().parse::<u32>())
            .transpose()
            .map_err(|_| PaginationError::InvalidLimit { max: MAX_PAGE_SIZE })?;
        Self::new(page_number, page_size)
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items preceding the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)).saturating_mul(u64::from(self.limit))
    }

    fn has_next(&self, count: u64) -> bool {
        u64::from(self.page).saturating_mul(u64::from(self.limit)) < count
    }
}

/// Paginated response envelope.
///
/// Serialises as `{"count": .., "next": .., "previous": .., "results": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    /// Total number of items across all pages.
    pub count: u64,
    /// Absolute link to the following page, if any.
    pub next: Option<String>,
    /// Absolute link to the preceding page, if any.
    pub previous: Option<String>,
    /// Items on the requested page.
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Wrap one page of results and derive navigation links from the request
    /// URL.
    #[must_use]
    pub fn new(results: Vec<T>, count: u64, params: PageParams, request_url: &Url) -> Self {
        let next = params
            .has_next(count)
            .then(|| page_link(request_url, params.page().saturating_add(1)));
        let previous = (params.page() > 1)
            .then(|| page_link(request_url, params.page().saturating_sub(1)));
        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// Transform every item while keeping the count and links.
    #[must_use]
    pub fn map<U, F>(self, transform: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(transform).collect(),
        }
    }
}

/// Rebuild `request_url` pointing at `page`, dropping the parameter for the
/// first page.
fn page_link(request_url: &Url, page: u32) -> String {
    let retained: Vec<(String, String)> = request_url
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut link = request_url.clone();
    if retained.is_empty() && page <= 1 {
        link.set_query(None);
        return link.into();
    }

    link.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .extend_pairs((page > 1).then(|| (PAGE_PARAM, page.to_string())));
    link.into()
}
