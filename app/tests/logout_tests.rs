//! Logout behavior: session invalidation and the post-logout redirect.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use common::{
    create_test_app, location, session_cookie, submit_login, TEST_PASSWORD, TEST_USERNAME,
};

#[actix_web::test]
async fn test_logout_redirects_and_invalidates_the_session() {
    let app = create_test_app().await;

    let login = submit_login(&app, TEST_USERNAME, TEST_PASSWORD).await;
    let session = session_cookie(&login).expect("login must establish a session");

    // Logout with the established session
    let req = test::TestRequest::post()
        .uri("/perform_logout")
        .cookie(session)
        .to_request();
    let logout = test::call_service(&app, req).await;

    assert_eq!(logout.status(), StatusCode::FOUND);
    assert_eq!(location(&logout), "/login?logout");

    // The cookie coming back from logout is the invalidated one; a
    // protected request carrying it must be redirected to login.
    let mut req = test::TestRequest::get().uri("/dashboard");
    if let Some(cleared) = session_cookie(&logout) {
        req = req.cookie(cleared);
    }
    let resp = test::call_service(&app, req.to_request()).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login");
}

#[actix_web::test]
async fn test_login_page_shows_logout_notice() {
    let app = create_test_app().await;

    let req = test::TestRequest::get().uri("/login?logout").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("signed out"));
}
