use httpmock::prelude::*;
use salvo::http::StatusCode;
use salvo::prelude::*;
use salvo::test::{ResponseExt, TestClient};
use serde_json::{Value, json};
use tracing_test::traced_test;
use usergraph::{Config, route};

const URL: &str = "http://127.0.0.1:4000/graphql";

fn service(server: &MockServer) -> Service {
    Service::new(route(&Config::default().backend_url(server.base_url())).unwrap())
}

async fn users_backend() -> MockServer {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/23");
            then.status(200)
                .json_body(json!({"id": "23", "firstName": "Bill", "age": 20, "companyId": "1"}));
        })
        .await;
    server
}

#[tokio::test]
async fn test_post_json_query() {
    let backend = users_backend().await;
    let service = service(&backend);

    let mut res = TestClient::post(URL)
        .json(&json!({"query": r#"{ user(id: "23") { firstName age } }"#}))
        .send(&service)
        .await;
    assert_eq!(res.status_code.unwrap(), StatusCode::OK);
    let body: Value = res.take_json().await.unwrap();
    assert_eq!(body, json!({"data": {"user": {"firstName": "Bill", "age": 20}}}));
}

#[tokio::test]
async fn test_post_json_with_variables_and_operation_name() {
    let backend = users_backend().await;
    let service = service(&backend);

    let mut res = TestClient::post(URL)
        .json(&json!({
            "query": "query Named($id: String) { user(id: $id) { id } } query Other { __typename }",
            "operationName": "Named",
            "variables": {"id": "23"}
        }))
        .send(&service)
        .await;
    let body: Value = res.take_json().await.unwrap();
    assert_eq!(body, json!({"data": {"user": {"id": "23"}}}));
}

#[tokio::test]
async fn test_post_raw_graphql_body() {
    let backend = users_backend().await;
    let service = service(&backend);

    let mut res = TestClient::post(URL)
        .add_header("content-type", "application/graphql", true)
        .text(r#"{ user(id: "23") { firstName } }"#)
        .send(&service)
        .await;
    assert_eq!(res.status_code.unwrap(), StatusCode::OK);
    let body: Value = res.take_json().await.unwrap();
    assert_eq!(body, json!({"data": {"user": {"firstName": "Bill"}}}));
}

#[tokio::test]
async fn test_get_query() {
    let backend = users_backend().await;
    let service = service(&backend);

    let mut res = TestClient::get(URL)
        .query("query", "query($id: String) { user(id: $id) { age } }")
        .query("variables", r#"{"id": "23"}"#)
        .send(&service)
        .await;
    assert_eq!(res.status_code.unwrap(), StatusCode::OK);
    let body: Value = res.take_json().await.unwrap();
    assert_eq!(body, json!({"data": {"user": {"age": 20}}}));
}

#[tokio::test]
async fn test_get_without_query_serves_graphiql() {
    let backend = MockServer::start_async().await;
    let service = service(&backend);

    let html = TestClient::get(URL).send(&service).await.take_string().await.unwrap();
    assert!(html.to_lowercase().contains("graphiql"));
    assert!(html.contains("/graphql"));
}

#[tokio::test]
async fn test_get_mutation_not_allowed() {
    let backend = MockServer::start_async().await;
    let post_mock = backend
        .mock_async(|when, then| {
            when.method(POST).path("/users");
            then.status(201).json_body(json!({"id": "9", "firstName": "X", "age": "1"}));
        })
        .await;
    let service = service(&backend);

    let res = TestClient::get(URL)
        .query("query", r#"mutation { addUser(firstName: "X", age: "1") { id } }"#)
        .send(&service)
        .await;
    assert_eq!(res.status_code.unwrap(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers().get("allow").unwrap(), "POST");
    post_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn test_get_named_query_beside_mutation_runs() {
    let backend = users_backend().await;
    let service = service(&backend);

    let mut res = TestClient::get(URL)
        .query(
            "query",
            r#"query Read { user(id: "23") { id } } mutation Write { addUser(firstName: "X", age: "1") { id } }"#,
        )
        .query("operationName", "Read")
        .send(&service)
        .await;
    assert_eq!(res.status_code.unwrap(), StatusCode::OK);
    let body: Value = res.take_json().await.unwrap();
    assert_eq!(body, json!({"data": {"user": {"id": "23"}}}));
}

#[tokio::test]
async fn test_browser_get_with_query_serves_prefilled_graphiql() {
    let backend = MockServer::start_async().await;
    let user_mock = backend
        .mock_async(|when, then| {
            when.method(GET).path("/users/23");
            then.status(200).json_body(json!({"id": "23"}));
        })
        .await;
    let service = service(&backend);

    let mut res = TestClient::get(URL)
        .add_header("accept", "text/html,application/xhtml+xml,*/*;q=0.8", true)
        .query("query", r#"{ user(id: "23") { id } }"#)
        .send(&service)
        .await;
    assert_eq!(res.status_code.unwrap(), StatusCode::OK);
    let html = res.take_string().await.unwrap();
    assert!(html.contains(r#"query: "{ user(id: \"23\") { id } }","#));
    user_mock.assert_calls_async(0).await;

    let mut res = TestClient::get(URL)
        .add_header("accept", "text/html", true)
        .query("query", r#"{ user(id: "23") { id } }"#)
        .query("raw", "")
        .send(&service)
        .await;
    let body: Value = res.take_json().await.unwrap();
    assert_eq!(body, json!({"data": {"user": {"id": "23"}}}));
    user_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn test_invalid_variables_rejected() {
    let backend = MockServer::start_async().await;
    let service = service(&backend);

    let res = TestClient::get(URL)
        .query("query", "{ user { id } }")
        .query("variables", "{not json")
        .send(&service)
        .await;
    assert_eq!(res.status_code.unwrap(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let backend = MockServer::start_async().await;
    let service = service(&backend);

    let res = TestClient::post(URL)
        .raw_json(r#"{"query": "#)
        .send(&service)
        .await;
    assert_eq!(res.status_code.unwrap(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_user_without_first_name_is_bad_request() {
    // nothing listens here, so any execution would end in a field error and `data`
    let service = Service::new(route(&Config::default().backend_url("http://127.0.0.1:9/")).unwrap());

    let mut res = TestClient::post(URL)
        .json(&json!({"query": r#"mutation { addUser(age: "1") { id } }"#}))
        .send(&service)
        .await;
    assert_eq!(res.status_code.unwrap(), StatusCode::BAD_REQUEST);
    let body: Value = res.take_json().await.unwrap();
    assert!(body.get("data").is_none());
    assert!(!body["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_backend_error_is_field_error() {
    let backend = MockServer::start_async().await;
    backend
        .mock_async(|when, then| {
            when.method(GET).path("/companies/404");
            then.status(404).json_body(json!({}));
        })
        .await;
    let service = service(&backend);

    let mut res = TestClient::post(URL)
        .json(&json!({"query": r#"{ company(id: "404") { name } }"#}))
        .send(&service)
        .await;
    assert_eq!(res.status_code.unwrap(), StatusCode::OK);
    let body: Value = res.take_json().await.unwrap();
    assert_eq!(body["data"], json!({"company": null}));
    assert_eq!(body["errors"][0]["path"], json!(["company"]));
}

#[tokio::test]
#[traced_test]
async fn test_requests_are_logged() {
    let backend = users_backend().await;
    let service = service(&backend);

    TestClient::post(URL)
        .json(&json!({"query": r#"{ user(id: "23") { id } }"#}))
        .send(&service)
        .await
        .take_string()
        .await
        .unwrap();
    assert!(logs_contain("duration"));
    assert!(logs_contain("calling backend"));
}
