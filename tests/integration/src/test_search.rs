//! End-to-end search tests.

#[cfg(test)]
mod tests {
    use bookfeed_auth::canonical::{build_canonical_query_string, build_string_to_sign};
    use bookfeed_auth::signer::compute_signature;
    use bookfeed_core::RequestParams;
    use bookfeed_paapi::ServiceError;
    use bookfeed_search::{BookSearch, SearchQuery};
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

    use crate::{
        ACCESS_KEY, Book, CannedResponse, MockUpstream, RecordedRequest, SECRET_KEY,
        item_search_page, items_error_document,
    };

    const PAGE_ONE: [Book<'static>; 2] = [
        Book {
            isbn: Some("4873113946"),
            title: "Released",
            release_date: "2009-05-01",
            authors: &["Jim Blandy", "Jason Orendorff"],
        },
        Book {
            isbn: Some("4873114000"),
            title: "Preorder",
            release_date: "2009-06-01",
            authors: &["Steve Klabnik"],
        },
    ];

    const PAGE_TWO: [Book<'static>; 2] = [
        Book {
            isbn: None,
            title: "Kindle edition",
            release_date: "2009-04-01",
            authors: &[],
        },
        Book {
            isbn: Some("4873114111"),
            title: "Month only",
            release_date: "2009-04",
            authors: &["Carol Nichols"],
        },
    ];

    fn two_pages(req: &RecordedRequest) -> CannedResponse {
        match req.param("ItemPage") {
            Some("1") => CannedResponse::ok(item_search_page(2, &PAGE_ONE)),
            _ => CannedResponse::ok(item_search_page(2, &PAGE_TWO)),
        }
    }

    fn may_20th() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2009, 5, 20, 12, 0, 0).unwrap()
    }

    fn assert_signed_correctly(req: &RecordedRequest) {
        let signature = req.param("Signature").expect("request carries a signature");
        let params: RequestParams = req
            .params
            .iter()
            .filter(|(k, _)| k != "Signature")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let canonical = build_canonical_query_string(&params);
        assert!(
            req.raw_query.starts_with(&format!("{canonical}&Signature=")),
            "query is not in canonical order: {}",
            req.raw_query
        );

        let string_to_sign = build_string_to_sign("GET", &req.host, "/onca/xml", &canonical);
        assert_eq!(signature, compute_signature(SECRET_KEY, &string_to_sign));
    }

    #[tokio::test]
    async fn test_should_search_all_pages_and_filter_items() {
        let upstream = MockUpstream::start(two_pages).await.unwrap();
        let search = BookSearch::from_config(&upstream.config()).unwrap();
        let query = SearchQuery::new("rust\n\"async\"", "us", 0).unwrap();

        let found = search.search_at(&query, may_20th()).await.unwrap();

        let titles: Vec<&str> = found.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["Released", "Month only"]);
        assert_eq!(found[0].author_line(), "Jim Blandy/Jason Orendorff");
        assert_eq!(
            found[0].medium_image.as_deref(),
            Some("http://images.example/4873113946.jpg")
        );

        let requests = upstream.requests();
        let pages: Vec<&str> = requests.iter().filter_map(|r| r.param("ItemPage")).collect();
        assert_eq!(pages, ["1", "2"]);
    }

    #[tokio::test]
    async fn test_should_send_signed_item_search_requests() {
        let upstream = MockUpstream::start(two_pages).await.unwrap();
        let search = BookSearch::from_config(&upstream.config()).unwrap();
        let query = SearchQuery::new("rust\nasync", "jp", 0).unwrap();

        search.search_at(&query, may_20th()).await.unwrap();

        let requests = upstream.requests();
        assert_eq!(requests.len(), 2);
        for req in &requests {
            assert_eq!(req.path, "/onca/xml");
            assert_eq!(req.param("Service"), Some("AWSECommerceService"));
            assert_eq!(req.param("Operation"), Some("ItemSearch"));
            assert_eq!(req.param("SearchIndex"), Some("Books"));
            assert_eq!(req.param("Sort"), Some("daterank"));
            assert_eq!(req.param("ResponseGroup"), Some("Medium"));
            assert_eq!(req.param("AWSAccessKeyId"), Some(ACCESS_KEY));
            assert_eq!(
                req.param("Power"),
                Some(r#"pubdate: after 01-2009 and keywords: "rust" or "async""#)
            );
            let timestamp = req.param("Timestamp").unwrap();
            assert!(NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%SZ").is_ok());
            assert_signed_correctly(req);
        }
    }

    #[tokio::test]
    async fn test_should_send_associate_tag_when_configured() {
        let upstream = MockUpstream::start(two_pages).await.unwrap();
        let mut config = upstream.config();
        config.associate_tag = Some("bookfeed-22".to_owned());
        let search = BookSearch::from_config(&config).unwrap();
        let query = SearchQuery::new("rust", "de", 0).unwrap();

        search.search_at(&query, may_20th()).await.unwrap();

        for req in upstream.requests() {
            assert_eq!(req.param("AssociateTag"), Some("bookfeed-22"));
            assert_signed_correctly(&req);
        }
    }

    #[tokio::test]
    async fn test_should_serve_repeated_search_from_cache() {
        let upstream = MockUpstream::start(two_pages).await.unwrap();
        let search = BookSearch::from_config(&upstream.config()).unwrap();
        let query = SearchQuery::new("rust", "us", 0).unwrap();

        let first = search.search_at(&query, may_20th()).await.unwrap();
        let second = search.search_at(&query, may_20th()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(upstream.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_should_return_empty_result_on_no_exact_matches() {
        let upstream = MockUpstream::start(|_| {
            CannedResponse::ok(items_error_document(
                ServiceError::NO_EXACT_MATCHES,
                "We did not find any matches for your request.",
            ))
        })
        .await
        .unwrap();
        let search = BookSearch::from_config(&upstream.config()).unwrap();
        let query = SearchQuery::new("no such book", "fr", 0).unwrap();

        let found = search.search_at(&query, may_20th()).await.unwrap();

        assert!(found.is_empty());
        assert_eq!(upstream.requests().len(), 1);
    }
}
