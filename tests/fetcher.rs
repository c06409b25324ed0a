//! Integration tests for the rate-limited fetch layer against mock servers.

mod helpers;

use std::sync::Arc;
use std::time::{Duration, Instant};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fightstats_scrape::error_handling::{FetchError, InfoType, RequestFailure};
use fightstats_scrape::fetch::{FetchPolicy, ScraperSession};
use helpers::{test_fetcher, test_policy, test_session};

#[tokio::test]
async fn test_fetch_returns_body_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let session = test_session();
    let body = test_fetcher()
        .fetch(&session, &format!("{}/page", server.uri()))
        .await
        .expect("200 should succeed");

    assert_eq!(body, "<html>ok</html>");
    assert_eq!(session.circuit_breaker().failure_count().await, 0);
    assert_eq!(session.queue().pending(), 0);
}

#[tokio::test]
async fn test_fetch_404_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let session = test_session();
    let err = test_fetcher()
        .fetch(&session, &format!("{}/missing", server.uri()))
        .await
        .expect_err("404 should fail");

    match err {
        FetchError::Failed {
            attempts, source, ..
        } => {
            assert_eq!(attempts, 1);
            assert!(matches!(source, RequestFailure::Client(404)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(session.circuit_breaker().failure_count().await, 1);
    assert_eq!(session.stats().get_info_count(InfoType::RetryScheduled), 0);
}

#[tokio::test]
async fn test_fetch_500_exhausts_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let session = test_session();
    let err = test_fetcher()
        .fetch(&session, &format!("{}/flaky", server.uri()))
        .await
        .expect_err("persistent 500 should fail");

    match err {
        FetchError::Failed {
            attempts, source, ..
        } => {
            assert_eq!(attempts, 3);
            assert!(matches!(source, RequestFailure::Server(500)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // Three failures stay below the threshold of five
    assert_eq!(session.circuit_breaker().failure_count().await, 3);
    assert!(!session.is_circuit_open().await);
    assert_eq!(session.stats().get_info_count(InfoType::RetryScheduled), 2);
}

#[tokio::test]
async fn test_fetch_recovers_after_429() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .expect(1)
        .mount(&server)
        .await;

    let session = test_session();
    let body = test_fetcher()
        .fetch(&session, &format!("{}/busy", server.uri()))
        .await
        .expect("should succeed on retry");

    assert_eq!(body, "recovered");
    // One failure, then one success gives it back
    assert_eq!(session.circuit_breaker().failure_count().await, 0);
    assert_eq!(session.stats().get_info_count(InfoType::RetryScheduled), 1);
}

#[tokio::test]
async fn test_open_circuit_fails_fast_without_io() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let session = ScraperSession::new(FetchPolicy {
        max_retries: 0,
        failure_threshold: 2,
        ..test_policy()
    });
    let fetcher = test_fetcher();
    let url = format!("{}/down", server.uri());

    assert!(fetcher.fetch(&session, &url).await.is_err());
    assert!(fetcher.fetch(&session, &url).await.is_err());
    assert!(session.is_circuit_open().await);

    let err = fetcher
        .fetch(&session, &url)
        .await
        .expect_err("open circuit should block");
    assert!(matches!(err, FetchError::CircuitOpen { .. }));
    // MockServer verifies on drop that only two requests arrived
}

#[tokio::test]
async fn test_circuit_opens_mid_retry_and_stops_retrying() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let session = ScraperSession::new(FetchPolicy {
        max_retries: 8,
        failure_threshold: 2,
        ..test_policy()
    });
    let err = test_fetcher()
        .fetch(&session, &format!("{}/down", server.uri()))
        .await
        .expect_err("should fail");

    match err {
        FetchError::Failed { attempts, .. } => assert_eq!(attempts, 2),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_errors_are_retried() {
    // Bind then drop a listener so the port refuses connections
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        format!("http://{}", listener.local_addr().expect("local addr"))
    };

    let session = ScraperSession::new(FetchPolicy {
        max_retries: 1,
        ..test_policy()
    });
    let err = test_fetcher()
        .fetch(&session, &format!("{uri}/gone"))
        .await
        .expect_err("closed port should fail");

    match err {
        FetchError::Failed {
            attempts, source, ..
        } => {
            assert_eq!(attempts, 2);
            assert!(matches!(source, RequestFailure::Transport(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_url_fails_without_retry() {
    let session = test_session();
    let err = test_fetcher()
        .fetch(&session, "not a url")
        .await
        .expect_err("malformed URL should fail");

    match err {
        FetchError::Failed {
            attempts, source, ..
        } => {
            assert_eq!(attempts, 1);
            assert!(!source.is_retryable());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unbuildable_requests_do_not_open_the_circuit() {
    let session = ScraperSession::new(FetchPolicy {
        failure_threshold: 2,
        ..test_policy()
    });
    let fetcher = test_fetcher();

    for _ in 0..5 {
        let err = fetcher
            .fetch(&session, "not a url")
            .await
            .expect_err("malformed URL should fail");
        assert!(matches!(
            err,
            FetchError::Failed {
                source: RequestFailure::InvalidRequest(_),
                ..
            }
        ));
    }

    assert_eq!(session.circuit_breaker().failure_count().await, 0);
    assert!(!session.is_circuit_open().await);
}

#[tokio::test]
async fn test_concurrency_is_capped_by_request_queue() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow")
                .set_delay(Duration::from_millis(200)),
        )
        .expect(6)
        .mount(&server)
        .await;

    let session = Arc::new(test_session());
    let fetcher = test_fetcher();
    let url = format!("{}/slow", server.uri());

    let started = Instant::now();
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let session = Arc::clone(&session);
            let fetcher = fetcher.clone();
            let url = url.clone();
            tokio::spawn(async move { fetcher.fetch(&session, &url).await })
        })
        .collect();

    for handle in handles {
        let body = handle.await.expect("task panicked").expect("fetch failed");
        assert_eq!(body, "slow");
    }

    // Six 200ms requests, two at a time, take at least three rounds
    assert!(
        started.elapsed() >= Duration::from_millis(600),
        "requests were not capped: {:?}",
        started.elapsed()
    );
    assert_eq!(session.queue().pending(), 0);
}
