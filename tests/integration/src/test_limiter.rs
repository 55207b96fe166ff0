//! Rate limiting through the full invocation pipeline.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use http::Method;
    use wirecall_core::{Arguments, Host, Operation, RateLimit, ScopeConfig};
    use wirecall_model::{ResultKind, RouteDefinition};

    use crate::{BASE_URL, RecordingTransport, init_tracing};

    fn json_operation() -> Operation<serde_json::Value> {
        let route = RouteDefinition::new(Method::GET, "/users", vec![], ResultKind::Json).unwrap();
        Operation::json(route).unwrap()
    }

    #[test]
    fn test_should_not_block_first_capacity_calls() {
        init_tracing();
        let host = Host::builder()
            .base_url(BASE_URL)
            .rate_limit(Some(RateLimit::new(3, Duration::from_secs(60))))
            .build();
        let transport = RecordingTransport::new();
        let operation = json_operation();

        let start = Instant::now();
        for _ in 0..3 {
            operation
                .invoke_blocking(&host, &transport, Arguments::new())
                .unwrap();
        }
        assert!(start.elapsed() < Duration::from_millis(100));
        assert_eq!(transport.request_count(), 3);
    }

    #[test]
    fn test_should_throttle_blocking_calls_beyond_capacity() {
        init_tracing();
        let host = Host::builder()
            .base_url(BASE_URL)
            .rate_limit(Some(RateLimit::new(2, Duration::from_millis(100))))
            .build();
        let transport = RecordingTransport::new();
        let operation = json_operation();

        let start = Instant::now();
        for _ in 0..4 {
            operation
                .invoke_blocking(&host, &transport, Arguments::new())
                .unwrap();
        }
        // N = 4 against C = 2 per 100ms: at least ((N - C) / C) * period,
        // less the tokens accrued between creation and the first call.
        assert!(start.elapsed() >= Duration::from_millis(90));
        assert_eq!(transport.request_count(), 4);
    }

    #[tokio::test]
    async fn test_should_suspend_async_calls_beyond_capacity() {
        init_tracing();
        let host = Host::builder()
            .base_url(BASE_URL)
            .rate_limit(Some(RateLimit::new(1, Duration::from_millis(50))))
            .build();
        let transport = RecordingTransport::new();
        let operation = json_operation();

        let start = Instant::now();
        operation
            .invoke(&host, &transport, Arguments::new())
            .await
            .unwrap();
        operation
            .invoke(&host, &transport, Arguments::new())
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(45));
    }

    #[test]
    fn test_should_share_one_bucket_between_operations() {
        init_tracing();
        let limit = RateLimit::new(2, Duration::from_millis(100));
        let host = Host::builder()
            .base_url(BASE_URL)
            .scope(ScopeConfig::new())
            .build();
        let transport = RecordingTransport::new();

        let first = json_operation().with_rate_limit(Arc::clone(&limit));
        let second = json_operation().with_rate_limit(Arc::clone(&limit));

        let start = Instant::now();
        first
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap();
        second
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap();
        first
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap();
        // The third call across either operation waits on the shared bucket.
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_should_prefer_route_rate_limit_over_host_rate_limit() {
        init_tracing();
        // Host budget is generous; the operation's own tight budget governs.
        let host = Host::builder()
            .base_url(BASE_URL)
            .rate_limit(Some(RateLimit::new(100, Duration::from_secs(1))))
            .build();
        let transport = RecordingTransport::new();
        let operation = json_operation().with_rate_limit(RateLimit::new(1, Duration::from_millis(60)));

        let start = Instant::now();
        operation
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap();
        operation
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
