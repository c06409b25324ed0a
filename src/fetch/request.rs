//! HTTP request building.
//!
//! Every GET carries the same browser-like header set. The User-Agent is set
//! on the client itself (see `initialization::init_client`).

use reqwest::header::{
    HeaderName, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, UPGRADE_INSECURE_REQUESTS,
};

use crate::config::{
    ACCEPT_LANGUAGE_VALUE, ACCEPT_VALUE, CACHE_CONTROL_VALUE, CONNECTION_VALUE,
    UPGRADE_INSECURE_REQUESTS_VALUE,
};

/// Browser-like request headers for listing and detail pages.
pub(crate) struct RequestHeaders;

impl RequestHeaders {
    /// Header pairs in the order they are applied.
    pub(crate) fn pairs() -> [(HeaderName, &'static str); 5] {
        [
            (ACCEPT, ACCEPT_VALUE),
            (ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE),
            (CONNECTION, CONNECTION_VALUE),
            (UPGRADE_INSECURE_REQUESTS, UPGRADE_INSECURE_REQUESTS_VALUE),
            (CACHE_CONTROL, CACHE_CONTROL_VALUE),
        ]
    }

    /// Applies the standard request headers to a `reqwest::RequestBuilder`.
    pub(crate) fn apply_to_request_builder(
        builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        Self::pairs()
            .into_iter()
            .fold(builder, |builder, (name, value)| builder.header(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_applied() {
        let client = reqwest::Client::new();
        let request = RequestHeaders::apply_to_request_builder(client.get("http://example.com/"))
            .build()
            .expect("request should build");
        let headers = request.headers();
        assert_eq!(headers.get(ACCEPT).unwrap(), ACCEPT_VALUE);
        assert_eq!(headers.get(ACCEPT_LANGUAGE).unwrap(), "en-US,en;q=0.5");
        assert_eq!(headers.get(CONNECTION).unwrap(), "keep-alive");
        assert_eq!(headers.get(UPGRADE_INSECURE_REQUESTS).unwrap(), "1");
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "max-age=0");
    }
}
