//! Stock simulator application entry point.
//!
//! Assembles the security filter chain and the user store once, then
//! serves the route table behind it.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use stocksim::config::AppConfig;
use stocksim::handlers;
use stocksim::security::security_filter_chain;
use stocksim::state::AppState;
use stocksim_security::http::security::{
    BcryptPasswordEncoder, InMemoryUserRepository, UserManager,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::from_env();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let encoder = match config.bcrypt_cost {
        Some(cost) => BcryptPasswordEncoder::with_cost(cost),
        None => BcryptPasswordEncoder::new(),
    };

    let users: Arc<dyn UserManager> = if config.case_insensitive_usernames {
        Arc::new(InMemoryUserRepository::new().case_insensitive())
    } else {
        Arc::new(InMemoryUserRepository::new())
    };

    let chain = security_filter_chain();
    let state = web::Data::new(AppState::new(users, encoder, &chain));
    let session_key = config.session_key()?;

    log::info!("listening on {}", config.bind_addr);

    let bind_addr = config.bind_addr.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            // Wraps run in reverse registration order; the session
            // middleware must run before CSRF and the security transform.
            .wrap(chain.transform())
            .wrap(chain.csrf())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .wrap(Logger::default())
            .service(handlers::public::register_page)
            .service(handlers::public::register_submit)
            .service(handlers::public::login_page)
            .service(handlers::public::login_submit)
            .service(handlers::public::error_page)
            .service(handlers::home::dashboard)
            .service(handlers::home::logout)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
