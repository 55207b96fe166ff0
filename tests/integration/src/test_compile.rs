//! Request compilation: path building, parameter distribution, bodies.

#[cfg(test)]
mod tests {
    use http::Method;
    use serde_json::{Value, json};
    use wirecall_core::{Arguments, Operation, camel_case};
    use wirecall_model::{CaseMap, ParamDescriptor, ResultKind, RouteDefinition, WireBody};

    use crate::{RecordingTransport, test_host};

    fn json_route(
        method: Method,
        path: &str,
        params: Vec<ParamDescriptor>,
    ) -> RouteDefinition {
        RouteDefinition::new(method, path, params, ResultKind::Json).unwrap()
    }

    #[test]
    fn test_should_resolve_aliased_path_placeholder() {
        let host = test_host();
        let transport = RecordingTransport::new();
        let operation = Operation::json(json_route(
            Method::GET,
            "/users/{id_}",
            vec![ParamDescriptor::path("id_").with_alias("id")],
        ))
        .unwrap();

        operation
            .invoke_blocking(&host, &transport, Arguments::new().with("id_", 7).unwrap())
            .unwrap();

        assert_eq!(transport.only_request().url, "http://testserver/users/7");
    }

    #[test]
    fn test_should_distribute_parameters_by_origin() {
        let host = test_host();
        let transport = RecordingTransport::new();
        let operation = Operation::json(json_route(
            Method::GET,
            "/users/{id}",
            vec![
                ParamDescriptor::path("id"),
                ParamDescriptor::query("email"),
                ParamDescriptor::cookie("session"),
                ParamDescriptor::body("note"),
                ParamDescriptor::header("x_token"),
            ],
        ))
        .unwrap();

        let arguments = Arguments::new()
            .with("id", 1)
            .unwrap()
            .with("email", "a@b.c")
            .unwrap()
            .with("session", "s1")
            .unwrap()
            .with("note", "hi")
            .unwrap()
            .with("x_token", "t")
            .unwrap();
        operation.invoke_blocking(&host, &transport, arguments).unwrap();

        let request = transport.only_request();
        assert_eq!(request.url, "http://testserver/users/1");
        assert_eq!(request.query, vec![("email".to_owned(), "a@b.c".to_owned())]);
        assert_eq!(request.cookies, vec![("session".to_owned(), "s1".to_owned())]);
        // Header names convert with the host default Header-Case.
        assert!(request
            .headers
            .contains(&("X-Token".to_owned(), "t".to_owned())));
        match request.body {
            WireBody::Json(body) => assert_eq!(body, json!({"note": "hi"})),
            other => panic!("expected JSON body, got {other:?}"),
        }
    }

    #[test]
    fn test_should_embed_body_under_its_key() {
        let host = test_host();
        let transport = RecordingTransport::new();
        let operation = Operation::json(json_route(
            Method::POST,
            "/users",
            vec![ParamDescriptor::body("user")],
        ))
        .unwrap();

        operation
            .invoke_blocking(
                &host,
                &transport,
                Arguments::new().with("user", json!({"name": "a"})).unwrap(),
            )
            .unwrap();

        match transport.only_request().body {
            WireBody::Json(body) => assert_eq!(body, json!({"user": {"name": "a"}})),
            other => panic!("expected JSON body, got {other:?}"),
        }
    }

    #[test]
    fn test_should_merge_non_embedded_body_at_top_level() {
        let host = test_host();
        let transport = RecordingTransport::new();
        let operation = Operation::json(json_route(
            Method::POST,
            "/users",
            vec![ParamDescriptor::body("user").with_embed(false)],
        ))
        .unwrap();

        operation
            .invoke_blocking(
                &host,
                &transport,
                Arguments::new().with("user", json!({"name": "a"})).unwrap(),
            )
            .unwrap();

        match transport.only_request().body {
            WireBody::Json(body) => assert_eq!(body, json!({"name": "a"})),
            other => panic!("expected JSON body, got {other:?}"),
        }
    }

    #[test]
    fn test_should_resolve_implicit_origins_from_method() {
        let host = test_host();
        let transport = RecordingTransport::new();
        // POST: undeclared origins land in the body.
        let operation = Operation::json(json_route(
            Method::POST,
            "/users",
            vec![
                ParamDescriptor::auto("first_name"),
                ParamDescriptor::auto("last_name"),
            ],
        ))
        .unwrap();

        operation
            .invoke_blocking(
                &host,
                &transport,
                Arguments::new()
                    .with("first_name", "a")
                    .unwrap()
                    .with("last_name", "b")
                    .unwrap(),
            )
            .unwrap();

        match transport.only_request().body {
            WireBody::Json(body) => {
                assert_eq!(body, json!({"first_name": "a", "last_name": "b"}));
            }
            other => panic!("expected JSON body, got {other:?}"),
        }
    }

    #[test]
    fn test_should_apply_route_case_override_to_query() {
        let host = test_host();
        let transport = RecordingTransport::new();
        let route = json_route(
            Method::GET,
            "/users",
            vec![ParamDescriptor::query("page_size")],
        )
        .with_cases(CaseMap {
            query: Some(camel_case),
            ..CaseMap::default()
        });
        let operation = Operation::json(route).unwrap();

        operation
            .invoke_blocking(
                &host,
                &transport,
                Arguments::new().with("page_size", 10).unwrap(),
            )
            .unwrap();

        assert_eq!(
            transport.only_request().query,
            vec![("pageSize".to_owned(), "10".to_owned())]
        );
    }

    #[test]
    fn test_should_send_files_as_multipart() {
        let host = test_host();
        let transport = RecordingTransport::new();
        let payload = vec![0x89u8, 0x50, 0x4e, 0x47];
        let operation = Operation::json(json_route(
            Method::POST,
            "/avatars",
            vec![
                ParamDescriptor::form("kind"),
                ParamDescriptor::file("image"),
            ],
        ))
        .unwrap();

        operation
            .invoke_blocking(
                &host,
                &transport,
                Arguments::new()
                    .with("kind", "png")
                    .unwrap()
                    .with_file("image", payload.clone()),
            )
            .unwrap();

        match transport.only_request().body {
            WireBody::Multipart { fields, files } => {
                assert_eq!(fields, vec![("kind".to_owned(), "png".to_owned())]);
                assert_eq!(files.len(), 1);
                assert_eq!(files[0].name, "image");
                // Binary content is preserved byte for byte.
                assert_eq!(files[0].content.as_ref(), payload.as_slice());
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[test]
    fn test_should_fail_validation_before_any_request() {
        let host = test_host();
        let transport = RecordingTransport::new();
        let operation = Operation::json(json_route(
            Method::GET,
            "/users",
            vec![ParamDescriptor::query("page")],
        ))
        .unwrap();

        let err = operation
            .invoke_blocking(&host, &transport, Arguments::new())
            .unwrap_err();

        assert!(matches!(err, wirecall_model::Error::Validation { .. }));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_should_compile_identically_on_async_path() {
        let host = test_host();
        let transport = RecordingTransport::new();
        let operation = Operation::json(json_route(
            Method::GET,
            "/users/{id}",
            vec![ParamDescriptor::path("id"), ParamDescriptor::query("email")],
        ))
        .unwrap();

        let _: Value = operation
            .invoke(
                &host,
                &transport,
                Arguments::new()
                    .with("id", 3)
                    .unwrap()
                    .with("email", "a@b.c")
                    .unwrap(),
            )
            .await
            .unwrap();

        let request = transport.only_request();
        assert_eq!(request.url, "http://testserver/users/3");
        assert_eq!(request.query, vec![("email".to_owned(), "a@b.c".to_owned())]);
    }
}
