mod common;

use std::time::Duration;

use common::{Reply, TestServer, page_of, students};
use reqwest::StatusCode;
use schooldesk::gateway::{Notification, PageRequest, Recipient};
use schooldesk::{Gateway, GatewayError, HttpGateway, Resource, Session};
use serde_json::{Map, Value, json};

fn gateway(server: &TestServer) -> HttpGateway {
    HttpGateway::new(
        &server.url(),
        Session::with_token("secret-token"),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[tokio::test]
async fn test_list_sends_bearer_and_paging_params() {
    let server = TestServer::start(|_| {
        Reply::json(
            200,
            json!({"items": [{"id": "S001", "name": "Ada"}], "total": 31}),
        )
    });
    let gw = gateway(&server);

    let mut request = PageRequest::new(20, 10);
    request.filters = vec![("class".to_string(), "7B".to_string())];
    let page = gw.list(Resource::Students, &request).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id(), "S001");
    assert_eq!(page.total, Some(31));

    let seen = &server.requests()[0];
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.path(), "/students/showall");
    assert_eq!(
        seen.query(),
        [
            ("offset".to_string(), "20".to_string()),
            ("limit".to_string(), "10".to_string()),
            ("class".to_string(), "7B".to_string()),
        ]
    );
    assert_eq!(seen.header("authorization"), Some("Bearer secret-token"));
}

#[tokio::test]
async fn test_list_accepts_bare_array() {
    let records = students(1, 3);
    let server = TestServer::start(move |req| Reply::json(200, page_of(&records, req)));

    let page = gateway(&server)
        .list(Resource::FeePosts, &PageRequest::new(0, 10))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total, None);
    assert_eq!(server.requests()[0].path(), "/fee-posts/showall");
}

#[tokio::test]
async fn test_error_detail_becomes_api_message() {
    let server =
        TestServer::start(|_| Reply::json(500, json!({"detail": "database unavailable"})));

    let err = gateway(&server)
        .delete(Resource::Students, "S042")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GatewayError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "database unavailable".to_string(),
        }
    );
    assert_eq!(server.requests()[0].method, "DELETE");
    assert_eq!(server.requests()[0].path(), "/students/S042");
}

#[tokio::test]
async fn test_validation_detail_list_is_joined() {
    let server = TestServer::start(|_| {
        Reply::json(
            422,
            json!({"detail": [{"msg": "name is required"}, {"msg": "class is required"}]}),
        )
    });

    let err = gateway(&server)
        .create(Resource::Students, &object(json!({"roll_no": 4})))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    assert_eq!(err.user_message(), "name is required; class is required");
}

#[tokio::test]
async fn test_error_without_body_uses_reason() {
    let server = TestServer::start(|_| Reply::raw(404, ""));
    let err = gateway(&server)
        .get(Resource::Teachers, "T404")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GatewayError::Api {
            status: StatusCode::NOT_FOUND,
            message: "Not Found".to_string(),
        }
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_transport_error() {
    let server = TestServer::start(|_| Reply::raw(200, "<html>proxy error</html>"));
    let err = gateway(&server)
        .get(Resource::Students, "S001")
        .await
        .unwrap_err();
    assert!(err.is_transport(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind and release a port so nothing is listening on it
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let gw = HttpGateway::new(
        &format!("http://{addr}"),
        Session::with_token("t"),
        Duration::from_secs(2),
    )
    .unwrap();

    let err = gw
        .list(Resource::Students, &PageRequest::new(0, 10))
        .await
        .unwrap_err();
    assert!(err.is_transport(), "unexpected error: {err:?}");
    assert!(err.user_message().starts_with("Network error"));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server =
        TestServer::start(|_| Reply::json(200, json!([])).delayed(Duration::from_secs(3)));
    let gw = HttpGateway::new(
        &server.url(),
        Session::with_token("t"),
        Duration::from_millis(300),
    )
    .unwrap();

    let err = gw.search(Resource::Students, "ada", 10).await.unwrap_err();
    assert_eq!(err, GatewayError::transport("request timed out"));
}

#[tokio::test]
async fn test_update_and_patch_methods() {
    let server = TestServer::start(|req| {
        let mut body = req.json();
        body["id"] = json!("S007");
        Reply::json(200, json!({"data": body}))
    });
    let gw = gateway(&server);
    let fields = object(json!({"name": "Grace"}));

    let updated = gw
        .update(Resource::Students, "S007", &fields)
        .await
        .unwrap();
    assert_eq!(updated.display_field("name").as_deref(), Some("Grace"));
    gw.patch(Resource::Students, "S007", &fields).await.unwrap();

    let seen = server.requests();
    assert_eq!(seen[0].method, "PUT");
    assert_eq!(seen[1].method, "PATCH");
    assert_eq!(seen[1].path(), "/students/S007");
    assert_eq!(seen[0].json(), json!({"name": "Grace"}));
}

#[tokio::test]
async fn test_search_query_params() {
    let server = TestServer::start(|_| Reply::json(200, json!({"results": [{"id": 9}]})));
    let results = gateway(&server)
        .search(Resource::Students, "ada love", 5)
        .await
        .unwrap();

    assert_eq!(results[0].id(), "9");
    let seen = &server.requests()[0];
    assert_eq!(seen.path(), "/students/search");
    assert_eq!(
        seen.query(),
        [
            ("q".to_string(), "ada love".to_string()),
            ("limit".to_string(), "5".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_notify_posts_payload() {
    let server = TestServer::start(|_| Reply::json(200, json!({"ok": true})));
    let gw = gateway(&server);

    gw.notify(
        &Recipient::One("S042".to_string()),
        &Notification::new("Fees due", "Term 2 fees are due Friday"),
    )
    .await
    .unwrap();
    gw.notify(&Recipient::All, &Notification::new("Holiday", "Closed Monday"))
        .await
        .unwrap();

    let seen = server.requests();
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].path(), "/notifications/send");
    assert_eq!(
        seen[0].json(),
        json!({
            "title": "Fees due",
            "message": "Term 2 fees are due Friday",
            "recipient_id": "S042",
            "broadcast": false
        })
    );
    assert_eq!(seen[1].json()["broadcast"], json!(true));
}

#[tokio::test]
async fn test_unauthenticated_session_sends_nothing() {
    let server = TestServer::start(|_| Reply::json(200, json!([])));
    let gw = HttpGateway::new(
        &server.url(),
        Session::Unauthenticated,
        Duration::from_secs(1),
    )
    .unwrap();

    let err = gw
        .list(Resource::Students, &PageRequest::new(0, 10))
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::Unauthenticated);
    assert!(server.requests().is_empty());
}
