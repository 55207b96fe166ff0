//! Hook resolution: preparer order, scope replacement, finalizers.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::Method;
    use parking_lot::Mutex;
    use serde_json::{Value, json};
    use wirecall_core::{Arguments, Host, Operation, ScopeConfig, snake_case};
    use wirecall_model::{CaseMap, Error, ParamDescriptor, ResultKind, RouteDefinition};

    use crate::{BASE_URL, RecordingTransport, init_tracing};

    fn json_route(path: &str) -> RouteDefinition {
        RouteDefinition::new(Method::GET, path, vec![], ResultKind::Json).unwrap()
    }

    fn host_with_scope(scope: ScopeConfig) -> Host {
        init_tracing();
        Host::builder().base_url(BASE_URL).scope(scope).build()
    }

    /// Preparers tag a shared log so the execution order is observable.
    fn tracking_scope(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> ScopeConfig {
        let log = Arc::clone(log);
        ScopeConfig::new().with_preparer(move |args| {
            log.lock().push(tag);
            Ok(args)
        })
    }

    #[test]
    fn test_should_run_host_preparer_before_route_preparers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let host = host_with_scope(tracking_scope(&log, "host"));
        let transport = RecordingTransport::new();

        let route_log = Arc::clone(&log);
        let second_log = Arc::clone(&log);
        let operation = Operation::json(json_route("/users"))
            .unwrap()
            .prepare(move |args| {
                route_log.lock().push("route-1");
                Ok(args)
            })
            .prepare(move |args| {
                second_log.lock().push("route-2");
                Ok(args)
            });

        operation
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap();

        assert_eq!(*log.lock(), vec!["host", "route-1", "route-2"]);
    }

    #[test]
    fn test_should_replace_host_preparer_with_group_preparer() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let host = host_with_scope(tracking_scope(&log, "host"));
        let transport = RecordingTransport::new();

        let operation = Operation::json(json_route("/users"))
            .unwrap()
            .with_scope(tracking_scope(&log, "group"));

        operation
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap();

        // The group preparer replaces the host's; both never run.
        assert_eq!(*log.lock(), vec!["group"]);
    }

    #[test]
    fn test_should_run_each_applicable_preparer_exactly_once() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let host = host_with_scope(tracking_scope(&log, "host"));
        let transport = RecordingTransport::new();

        let route_log = Arc::clone(&log);
        let operation = Operation::json(json_route("/users"))
            .unwrap()
            .prepare(move |args| {
                route_log.lock().push("route");
                Ok(args)
            });

        for _ in 0..3 {
            operation
                .invoke_blocking(&host, &transport, Arguments::new())
                .unwrap();
        }

        assert_eq!(
            *log.lock(),
            vec!["host", "route", "host", "route", "host", "route"]
        );
    }

    #[test]
    fn test_should_skip_inherited_preparer_only() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let host = host_with_scope(tracking_scope(&log, "host"));
        let transport = RecordingTransport::new();

        let route_log = Arc::clone(&log);
        let route = RouteDefinition::new(Method::GET, "/users", vec![], ResultKind::Json)
            .unwrap()
            .skipping_preparer();
        let operation = Operation::json(route).unwrap().prepare(move |args| {
            route_log.lock().push("route");
            Ok(args)
        });

        operation
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap();

        assert_eq!(*log.lock(), vec!["route"]);
    }

    #[test]
    fn test_should_let_preparer_rewrite_descriptor() {
        let host = host_with_scope(ScopeConfig::new().with_preparer(|mut args| {
            args.push_header("Authorization", "Bearer token");
            Ok(args)
        }));
        let transport = RecordingTransport::new();
        let operation = Operation::json(json_route("/users")).unwrap();

        operation
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap();

        assert!(transport
            .only_request()
            .headers
            .contains(&("Authorization".to_owned(), "Bearer token".to_owned())));
    }

    #[test]
    fn test_should_unwrap_envelope_with_json_finalizer() {
        let host = host_with_scope(ScopeConfig::new().with_json_finalizer(|value: Value| {
            value
                .get("data")
                .cloned()
                .ok_or_else(|| Error::Decode("missing data envelope".to_owned()))
        }));
        let transport = RecordingTransport::new();
        transport.push_json(200, &json!({"data": {"id": 1}}));

        let operation = Operation::json(json_route("/users")).unwrap();
        let value = operation
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap();

        assert_eq!(value, json!({"id": 1}));
    }

    #[test]
    fn test_should_replace_host_json_finalizer_with_group_finalizer() {
        let host = host_with_scope(ScopeConfig::new().with_json_finalizer(|_| {
            Err(Error::Decode("host finalizer must not run".to_owned()))
        }));
        let transport = RecordingTransport::new();
        transport.push_json(200, &json!({"payload": {"id": 2}}));

        let group = ScopeConfig::new().with_json_finalizer(|value: Value| {
            value
                .get("payload")
                .cloned()
                .ok_or_else(|| Error::Decode("missing payload".to_owned()))
        });
        let operation = Operation::json(json_route("/users"))
            .unwrap()
            .with_scope(group);

        let value = operation
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap();
        assert_eq!(value, json!({"id": 2}));
    }

    #[test]
    fn test_should_apply_group_case_instead_of_host_case() {
        // Host converts response keys with an always-wrong marker converter;
        // the group's snake_case must fully replace it.
        fn marker_case(_: &str) -> String {
            "host-converter-ran".to_owned()
        }

        let host = host_with_scope(ScopeConfig::new().with_cases(CaseMap {
            response: Some(marker_case),
            ..CaseMap::default()
        }));
        let transport = RecordingTransport::new();
        transport.push_json(200, &json!({"firstName": "a"}));

        let group = ScopeConfig::new().with_cases(CaseMap {
            response: Some(snake_case),
            ..CaseMap::default()
        });
        let operation = Operation::json(json_route("/users"))
            .unwrap()
            .with_scope(group);

        let value = operation
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap();
        assert_eq!(value, json!({"first_name": "a"}));
    }

    #[test]
    fn test_should_let_response_finalizer_intercept_error_status() {
        let host = host_with_scope(ScopeConfig::new());
        let transport = RecordingTransport::new();
        transport.push_json(404, &json!({"detail": "gone"}));

        let route =
            RouteDefinition::new(Method::GET, "/users", vec![], ResultKind::Custom).unwrap();
        let operation: Operation<String> = Operation::custom(route)
            .unwrap()
            .finalize(|response| Ok(format!("status:{}", response.status.as_u16())));

        let value = operation
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap();
        assert_eq!(value, "status:404");
    }

    #[test]
    fn test_should_fail_fast_without_finalizer_for_custom_result() {
        let host = host_with_scope(ScopeConfig::new());
        let transport = RecordingTransport::new();

        let route =
            RouteDefinition::new(Method::GET, "/users", vec![], ResultKind::Custom).unwrap();
        let operation: Operation<String> = Operation::custom(route).unwrap();

        let err = operation
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap_err();

        assert!(matches!(err, Error::Configuration(_)));
        // Fail-fast: no request was attempted.
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_should_reject_suspending_preparer_on_blocking_call() {
        let host = host_with_scope(ScopeConfig::new());
        let transport = RecordingTransport::new();

        let operation = Operation::json(json_route("/users"))
            .unwrap()
            .prepare_suspending(|args| Box::pin(async move { Ok(args) }));

        let err = operation
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap_err();

        assert!(matches!(err, Error::Configuration(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_should_run_suspending_preparer_on_async_call() {
        let host = host_with_scope(ScopeConfig::new());
        let transport = RecordingTransport::new();

        let operation = Operation::json(json_route("/users"))
            .unwrap()
            .prepare_suspending(|mut args| {
                Box::pin(async move {
                    args.push_header("X-Async", "1");
                    Ok(args)
                })
            });

        operation
            .invoke(&host, &transport, Arguments::new())
            .await
            .unwrap();

        assert!(transport
            .only_request()
            .headers
            .contains(&("X-Async".to_owned(), "1".to_owned())));
    }

    #[test]
    fn test_should_check_path_params_against_supplied_arguments() {
        let host = host_with_scope(ScopeConfig::new());
        let transport = RecordingTransport::new();
        let operation = Operation::json(
            RouteDefinition::new(
                Method::GET,
                "/users/{id}",
                vec![ParamDescriptor::path("id")],
                ResultKind::Json,
            )
            .unwrap(),
        )
        .unwrap();

        let err = operation
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap_err();
        assert!(matches!(err, Error::Validation { param, .. } if param == "id"));
    }
}
