//! Public pages: registration, login and the error page.

use actix_session::Session;
use actix_web::http::header::LOCATION;
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;

use stocksim_security::http::error::AuthError;
use stocksim_security::http::security::{
    AuthenticationError, LoginForm, OptionalUser, PasswordEncoder, RepositoryError, User,
};

use crate::state::AppState;

/// Query flags rendered as notices on the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    error: Option<String>,
    logout: Option<String>,
    registered: Option<String>,
}

/// Query flags rendered as notices on the registration page.
#[derive(Debug, Deserialize)]
pub struct RegisterQuery {
    error: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

fn page(title: &str, body: &str) -> HttpResponse {
    HttpResponse::Ok().content_type("text/html").body(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title}</title>
    <style>
        body {{ font-family: Arial, sans-serif; max-width: 400px; margin: 50px auto; padding: 20px; }}
        form {{ display: flex; flex-direction: column; gap: 15px; }}
        input, button {{ padding: 10px; font-size: 16px; }}
        .error {{ color: red; }}
        .info {{ color: #666; }}
    </style>
</head>
<body>
{body}
</body>
</html>"#
    ))
}

/// Login form (GET). An already authenticated session is sent straight
/// to the success target.
#[get("/login")]
pub async fn login_page(
    user: OptionalUser,
    query: web::Query<LoginQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    if user.is_authenticated() {
        return HttpResponse::Found()
            .insert_header((
                LOCATION,
                data.form_login.config().get_default_success_url().to_string(),
            ))
            .finish();
    }

    let mut notices = String::new();
    if query.error.is_some() {
        notices.push_str(r#"<p class="error">Invalid username or password</p>"#);
    }
    if query.logout.is_some() {
        notices.push_str(r#"<p class="info">You have been signed out</p>"#);
    }
    if query.registered.is_some() {
        notices.push_str(r#"<p class="info">Account created, please sign in</p>"#);
    }

    page(
        "Sign In",
        &format!(
            r#"    <h1>Sign In</h1>
    {notices}
    <form action="/login" method="post">
        <input type="text" name="username" placeholder="Username" required>
        <input type="password" name="password" placeholder="Password" required>
        <button type="submit">Sign In</button>
    </form>
    <p class="info"><a href="/register">Create an account</a></p>"#
        ),
    )
}

/// Login processing (POST).
///
/// Unknown username and wrong password produce the same redirect; only a
/// storage fault surfaces differently, as a server error.
#[post("/login")]
pub async fn login_submit(
    session: Session,
    form: web::Form<LoginForm>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AuthError> {
    match data.provider.authenticate(&form.username, &form.password).await {
        Ok(user) => Ok(data.form_login.on_authentication_success(&session, &user)),
        Err(AuthenticationError::Storage(err)) => {
            log::error!("user lookup failed during login: {}", err);
            Err(AuthError::Lookup)
        }
        Err(err) => {
            log::debug!("login rejected: {}", err);
            Ok(data.form_login.on_authentication_failure())
        }
    }
}

/// Registration form (GET).
#[get("/register")]
pub async fn register_page(query: web::Query<RegisterQuery>) -> impl Responder {
    let notice = match query.error.as_deref() {
        Some("taken") => r#"<p class="error">That username is already taken</p>"#,
        Some(_) => r#"<p class="error">Username and password must not be empty</p>"#,
        None => "",
    };

    page(
        "Register",
        &format!(
            r#"    <h1>Register</h1>
    {notice}
    <form action="/register" method="post">
        <input type="text" name="username" placeholder="Username" required>
        <input type="password" name="password" placeholder="Password" required>
        <button type="submit">Create account</button>
    </form>
    <p class="info"><a href="/login">Back to sign in</a></p>"#
        ),
    )
}

/// Registration processing (POST).
#[post("/register")]
pub async fn register_submit(
    form: web::Form<RegisterForm>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AuthError> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Ok(redirect("/register?error=invalid"));
    }

    let user = User::with_encoded_password(username, data.encoder.encode(&form.password));

    match data.users.create_user(&user).await {
        Ok(()) => {
            log::info!("registered user {}", username);
            Ok(redirect("/login?registered"))
        }
        Err(RepositoryError::DuplicateUsername) => Ok(redirect("/register?error=taken")),
        Err(err @ RepositoryError::Storage(_)) => {
            log::error!("user store failed during registration: {}", err);
            Err(AuthError::Lookup)
        }
    }
}

/// Public error page.
#[get("/error")]
pub async fn error_page() -> impl Responder {
    page(
        "Error",
        r#"    <h1>Something went wrong</h1>
    <p class="info">Please try again, or <a href="/login">return to sign in</a>.</p>"#,
    )
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location.to_string()))
        .finish()
}
