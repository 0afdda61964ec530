//! Pages behind the authentication gate.

use actix_session::Session;
use actix_web::{get, post, web, HttpResponse, Responder};

use stocksim_security::http::security::AuthenticatedUser;

use crate::state::AppState;

/// Dashboard, the landing page after login.
#[get("/dashboard")]
pub async fn dashboard(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().content_type("text/html").body(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Dashboard</title></head>
<body>
    <h1>Welcome, {}!</h1>
    <form action="/perform_logout" method="post">
        <button type="submit">Sign out</button>
    </form>
</body>
</html>"#,
        user.get_username()
    ))
}

/// Logout: invalidate the session and redirect to the login page.
#[post("/perform_logout")]
pub async fn logout(session: Session, data: web::Data<AppState>) -> impl Responder {
    data.form_login.on_logout(&session)
}
