//! Upstream failure mapping tests.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bookfeed_core::RequestParams;
    use bookfeed_paapi::{PaapiClient, PaapiError};
    use bookfeed_search::{BookSearch, SearchError, SearchQuery};
    use chrono::{TimeZone, Utc};

    use crate::{
        Book, CannedResponse, MockUpstream, item_search_page, items_error_document,
        operation_error_document,
    };

    fn item_search() -> RequestParams {
        RequestParams::new()
            .with("Operation", "ItemSearch")
            .with("SearchIndex", "Books")
            .with("ItemPage", 1)
    }

    fn client_for(upstream: &MockUpstream) -> PaapiClient {
        PaapiClient::from_config(&upstream.config(), "us").unwrap()
    }

    #[tokio::test]
    async fn test_should_map_items_error_to_service_error() {
        let upstream = MockUpstream::start(|_| {
            CannedResponse::ok(items_error_document(
                "AWS.InvalidParameterValue",
                "daterank is not a valid value for Sort.",
            ))
        })
        .await
        .unwrap();

        let err = client_for(&upstream)
            .request(item_search())
            .await
            .unwrap_err();

        let service = err.service_error().expect("service error");
        assert_eq!(service.code, "AWS.InvalidParameterValue");
        assert_eq!(service.message, "daterank is not a valid value for Sort.");
    }

    #[tokio::test]
    async fn test_should_prefer_error_document_over_status() {
        let upstream = MockUpstream::start(|_| {
            CannedResponse::with_status(
                403,
                operation_error_document(
                    "SignatureDoesNotMatch",
                    "The request signature we calculated does not match the signature you provided.",
                ),
            )
        })
        .await
        .unwrap();

        let err = client_for(&upstream)
            .request(item_search())
            .await
            .unwrap_err();

        assert!(matches!(err, PaapiError::Aws(ref e) if e.code == "SignatureDoesNotMatch"));
    }

    #[tokio::test]
    async fn test_should_map_bare_server_error_to_status() {
        let upstream = MockUpstream::start(|_| CannedResponse::with_status(503, "Service Unavailable"))
            .await
            .unwrap();

        let err = client_for(&upstream)
            .request(item_search())
            .await
            .unwrap_err();

        assert!(matches!(err, PaapiError::Status { status: 503, .. }));
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_should_map_malformed_body_to_parse_error() {
        let upstream = MockUpstream::start(|_| CannedResponse::ok("<ItemSearchResponse><Items>"))
            .await
            .unwrap();

        let err = client_for(&upstream)
            .request(item_search())
            .await
            .unwrap_err();

        assert!(matches!(err, PaapiError::Parse(_)));
    }

    #[tokio::test]
    async fn test_should_time_out_hung_upstream() {
        let upstream = MockUpstream::start(|_| {
            CannedResponse::ok(item_search_page(1, &[])).delayed(Duration::from_secs(10))
        })
        .await
        .unwrap();
        let mut config = upstream.config();
        config.request_timeout = 1;
        let client = PaapiClient::from_config(&config, "us").unwrap();

        let err = client.request(item_search()).await.unwrap_err();

        assert!(matches!(err, PaapiError::Network(ref e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_should_stop_search_at_first_failing_page() {
        let upstream = MockUpstream::start(|req| match req.param("ItemPage") {
            Some("1") => CannedResponse::ok(item_search_page(
                3,
                &[Book {
                    isbn: Some("1"),
                    title: "first page",
                    release_date: "2009-01-01",
                    authors: &[],
                }],
            )),
            _ => CannedResponse::ok(items_error_document(
                "AWS.ECommerceService.ItemNotAccessible",
                "This item is not accessible through the Product Advertising API.",
            )),
        })
        .await
        .unwrap();
        let search = BookSearch::from_config(&upstream.config()).unwrap();
        let query = SearchQuery::new("rust", "uk", 0).unwrap();
        let now = Utc.with_ymd_and_hms(2009, 5, 20, 12, 0, 0).unwrap();

        let err = search.search_at(&query, now).await.unwrap_err();

        assert!(matches!(
            err,
            SearchError::Api(PaapiError::Aws(ref e)) if e.code == "AWS.ECommerceService.ItemNotAccessible"
        ));
        assert_eq!(upstream.requests().len(), 2);
    }

    #[test]
    fn test_should_reject_unsupported_locale() {
        let err = PaapiClient::new("AKID", "secret", "br").unwrap_err();
        assert!(matches!(err, PaapiError::Configuration(_)));
    }
}
