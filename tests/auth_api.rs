mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::json;

use common::{call, test_app};

#[actix_web::test]
async fn login_issues_token_and_marks_user_online() {
    let (db, config) = common::setup().await;
    let user = common::create_user(&db, "TestUser").await;
    let app = test_app!(db, config);

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "TestUser", "password": common::PASSWORD}));
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["user_id"], user.id);
    assert_eq!(body["data"]["slug"], "testuser");
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (_, body) = call!(app, TestRequest::get().uri(&format!("/api/users/{}", user.id)));
    assert_eq!(body["data"]["status"]["is_online"], true);
}

#[actix_web::test]
async fn wrong_password_fails() {
    let (db, config) = common::setup().await;
    common::create_user(&db, "TestUser").await;
    let app = test_app!(db, config);

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "TestUser", "password": "nope"}));
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 2);
}

#[actix_web::test]
async fn malformed_login_body_is_a_param_error() {
    let (db, config) = common::setup().await;
    let app = test_app!(db, config);

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json");
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 1);
}

#[actix_web::test]
async fn logout_requires_login() {
    let (db, config) = common::setup().await;
    let app = test_app!(db, config);

    let (status, body) = call!(app, TestRequest::post().uri("/api/auth/logout"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 3);
}

#[actix_web::test]
async fn token_of_deleted_user_is_treated_as_anonymous() {
    let (db, config) = common::setup().await;
    let token = forum_backend_rs::auth::generate_token(&config, 4242).unwrap();
    let app = test_app!(db, config);

    let req = TestRequest::get()
        .uri("/api/users/?list=active")
        .insert_header(("token", token.as_str()));
    let (status, body) = call!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
}

#[actix_web::test]
async fn cors_headers_and_preflight() {
    let (db, config) = common::setup().await;
    let app = test_app!(db, config);

    let req = TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/users/")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert!(headers
        .get("access-control-allow-headers")
        .unwrap()
        .to_str()
        .unwrap()
        .ends_with("token"));
}
