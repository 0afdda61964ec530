//! Access-rule tests: which paths are public and which are gated.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use common::{create_test_app, location};

#[actix_web::test]
async fn test_public_paths_are_never_redirected_to_login() {
    let app = create_test_app().await;

    for path in ["/register", "/login", "/error"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK, "{} must be public", path);
    }
}

#[actix_web::test]
async fn test_protected_paths_redirect_unauthenticated_requests() {
    let app = create_test_app().await;

    for path in ["/dashboard", "/portfolio", "/holdings/42", "/"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(
            resp.status(),
            StatusCode::FOUND,
            "{} must require a session",
            path
        );
        assert_eq!(location(&resp), "/login");
    }
}

#[actix_web::test]
async fn test_unauthenticated_logout_is_gated_too() {
    let app = create_test_app().await;

    let req = test::TestRequest::post().uri("/perform_logout").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login");
}

#[actix_web::test]
async fn test_protected_paths_pass_with_a_session() {
    let app = create_test_app().await;

    let login = common::submit_login(&app, common::TEST_USERNAME, common::TEST_PASSWORD).await;
    let cookie = common::session_cookie(&login).expect("login must establish a session");

    let req = test::TestRequest::get()
        .uri("/dashboard")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}
