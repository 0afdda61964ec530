//! Registration behavior: account creation, duplicate rejection and the
//! follow-up login.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use common::{
    create_test_app, credentials, location, submit_login, TEST_PASSWORD, TEST_USERNAME,
};

#[actix_web::test]
async fn test_register_then_login() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/register")
        .set_form(credentials("bob", "hunter2"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login?registered");

    let resp = submit_login(&app, "bob", "hunter2").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/dashboard");
}

#[actix_web::test]
async fn test_register_duplicate_username_rejected() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/register")
        .set_form(credentials(TEST_USERNAME, "another-password"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/register?error=taken");

    // The original credential still works
    let resp = submit_login(&app, TEST_USERNAME, TEST_PASSWORD).await;
    assert_eq!(location(&resp), "/dashboard");
}

#[actix_web::test]
async fn test_register_rejects_empty_fields() {
    let app = create_test_app().await;

    for (username, password) in [("", "password"), ("   ", "password"), ("carol", "")] {
        let req = test::TestRequest::post()
            .uri("/register")
            .set_form(credentials(username, password))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/register?error=invalid");
    }
}

#[actix_web::test]
async fn test_register_page_shows_taken_notice() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/register?error=taken")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("already taken"));
}
