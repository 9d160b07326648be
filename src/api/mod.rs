//! All API endpoint setup

use axum::Router;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;

pub use current_user::CurrentUser;
pub use current_user::JwtKeys;
pub use request::Form;
pub use request::PathParameters;
pub use request::QueryParameters;
pub use response::Error;
pub use response::Success;

mod current_user;
mod links;
mod request;
mod response;
mod users;

/// Get the Axum router for all API routes
pub fn router() -> Router {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/me", get(users::me))
        .route("/upgrade-premium", post(users::upgrade_premium))
        .route("/shorten", post(links::shorten))
        .route("/update-slug/{url_id}", put(links::update_slug))
        .route("/urls", get(links::list))
        .route("/urls/{url_id}", delete(links::delete))
        .route("/urls/{url_id}/toggle-status", put(links::toggle_status))
        .route("/stats/{url_id}", get(links::stats))
}
