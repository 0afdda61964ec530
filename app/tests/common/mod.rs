//! Shared test composition: the real application wiring over an
//! in-memory user store, driven through actix's test service.

// Each test binary compiles its own copy; not every binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::body::{BoxBody, EitherBody};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{test, web, App};
use serde::Serialize;

use stocksim::handlers;
use stocksim::security::security_filter_chain;
use stocksim::state::AppState;
use stocksim_security::http::security::{
    BcryptPasswordEncoder, InMemoryUserRepository, PasswordEncoder, User, UserManager,
};

pub const TEST_USERNAME: &str = "alice";
pub const TEST_PASSWORD: &str = "secret";

/// Response body type of the composed application.
pub type AppBody = EitherBody<EitherBody<BoxBody>>;

/// Low-cost encoder so the tests stay fast.
pub fn test_encoder() -> BcryptPasswordEncoder {
    BcryptPasswordEncoder::with_cost(4)
}

/// An in-memory store seeded with the default test user.
pub async fn seeded_store() -> Arc<dyn UserManager> {
    let store = InMemoryUserRepository::new();
    seed_user(&store, TEST_USERNAME, TEST_PASSWORD).await;
    Arc::new(store)
}

/// Register a user directly in the store.
pub async fn seed_user(store: &InMemoryUserRepository, username: &str, password: &str) {
    store
        .create_user(&User::with_encoded_password(
            username,
            test_encoder().encode(password),
        ))
        .await
        .expect("failed to seed test user");
}

/// The application with the default seeded store.
pub async fn create_test_app(
) -> impl Service<Request, Response = ServiceResponse<AppBody>, Error = actix_web::Error> {
    create_app_with(seeded_store().await).await
}

/// The application over an arbitrary user store.
pub async fn create_app_with(
    users: Arc<dyn UserManager>,
) -> impl Service<Request, Response = ServiceResponse<AppBody>, Error = actix_web::Error> {
    let chain = security_filter_chain();
    let state = web::Data::new(AppState::new(users, test_encoder(), &chain));

    test::init_service(
        App::new()
            .app_data(state)
            .wrap(chain.transform())
            .wrap(chain.csrf())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                    .cookie_secure(false)
                    .build(),
            )
            .service(handlers::public::register_page)
            .service(handlers::public::register_submit)
            .service(handlers::public::login_page)
            .service(handlers::public::login_submit)
            .service(handlers::public::error_page)
            .service(handlers::home::dashboard)
            .service(handlers::home::logout),
    )
    .await
}

/// Form payload for login and registration submissions.
#[derive(Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub fn credentials(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.to_string(),
        password: password.to_string(),
    }
}

/// Submit the login form.
pub async fn submit_login<S>(app: &S, username: &str, password: &str) -> ServiceResponse<AppBody>
where
    S: Service<Request, Response = ServiceResponse<AppBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(credentials(username, password))
        .to_request();
    test::call_service(app, req).await
}

/// The `Location` header of a redirect response.
pub fn location(resp: &ServiceResponse<AppBody>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// First session cookie set on the response, if any.
pub fn session_cookie(resp: &ServiceResponse<AppBody>) -> Option<Cookie<'static>> {
    resp.response().cookies().next().map(|c| c.into_owned())
}
