//! Query-string access for handlers that need repeated keys or the raw
//! request URL.
//!
//! `web::Query` cannot express `?tags=a&tags=b`, and pagination links are
//! built from the full request URL, so list handlers read the query through
//! [`QueryPairs`] instead.

use actix_web::HttpRequest;
use pagination::{LIMIT_PARAM, PAGE_PARAM, PageParams, Paginated};

use crate::domain::{Error, Page};
use crate::inbound::http::validation::pagination_error;

/// Decoded `key=value` pairs in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    pub(crate) fn from_request(req: &HttpRequest) -> Self {
        Self::parse(req.query_string())
    }

    pub(crate) fn parse(query: &str) -> Self {
        Self(
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect(),
        )
    }

    /// First value for `key`.
    pub(crate) fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }

    /// Every value for `key`, in request order.
    pub(crate) fn all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.clone())
            .collect()
    }

    pub(crate) fn page_params(&self) -> Result<PageParams, Error> {
        PageParams::parse(self.first(PAGE_PARAM), self.first(LIMIT_PARAM))
            .map_err(pagination_error)
    }
}

/// Wrap a domain page in the pagination envelope, linking relative to the
/// request URL.
pub(crate) fn paginate<T, U>(
    req: &HttpRequest,
    page: Page<T>,
    params: PageParams,
    to_response: impl FnMut(T) -> U,
) -> Paginated<U> {
    let Page { items, total } = page;
    Paginated::new(items, total, params, &req.full_url()).map(to_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    fn repeated_keys_are_kept_in_order() {
        let pairs = QueryPairs::parse("tags=lunch&page=2&tags=dinner");
        assert_eq!(pairs.all("tags"), vec!["lunch", "dinner"]);
        assert_eq!(pairs.first("page"), Some("2"));
        assert_eq!(pairs.first("limit"), None);
    }

    #[rstest]
    fn values_are_percent_decoded() {
        let pairs = QueryPairs::parse("name=%D1%81%D0%BE%D0%BB%D1%8C&x=a+b");
        assert_eq!(pairs.first("name"), Some("соль"));
        assert_eq!(pairs.first("x"), Some("a b"));
    }

    #[rstest]
    fn invalid_page_is_an_invalid_request() {
        let error = QueryPairs::parse("page=0")
            .page_params()
            .expect_err("page zero");
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn envelope_links_follow_request_url() {
        let req = TestRequest::get()
            .uri("/api/v1/recipes?limit=1&tags=lunch")
            .insert_header(("Host", "food.example"))
            .to_http_request();
        let params = QueryPairs::from_request(&req)
            .page_params()
            .expect("valid params");

        let envelope = paginate(&req, Page::new(vec![1_u8], 3), params, u32::from);

        assert_eq!(envelope.count, 3);
        assert_eq!(envelope.results, vec![1_u32]);
        assert_eq!(
            envelope.next.as_deref(),
            Some("http://food.example/api/v1/recipes?limit=1&tags=lunch&page=2")
        );
        assert_eq!(envelope.previous, None);
    }
}
