//! Auth cookie helpers.
//!
//! Keeps handlers free of cookie attribute details: login sets the
//! `auth_token` cookie, logout replaces it with an expired one, and the auth
//! gate reads it back.

use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, time::Duration as CookieDuration};

use super::session_config::CookieSettings;
use crate::domain::{SESSION_TTL, SessionToken};

/// Name of the cookie carrying the session token.
pub const AUTH_COOKIE_NAME: &str = "auth_token";

/// Build the cookie issued after a successful login.
///
/// # Examples
/// ```
/// use backend::inbound::http::session::{AUTH_COOKIE_NAME, session_cookie};
/// use backend::inbound::http::session_config::CookieSettings;
///
/// let cookie = session_cookie("header.claims.sig", CookieSettings::default());
/// assert_eq!(cookie.name(), AUTH_COOKIE_NAME);
/// assert_eq!(cookie.http_only(), Some(true));
/// ```
pub fn session_cookie(token: &str, settings: CookieSettings) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE_NAME, token.to_owned())
        .path("/")
        .http_only(true)
        .secure(settings.secure)
        .same_site(settings.same_site)
        .max_age(CookieDuration::seconds(SESSION_TTL.num_seconds()))
        .finish()
}

/// Build the cookie for a freshly issued token.
pub fn cookie_for(token: &SessionToken, settings: CookieSettings) -> Cookie<'static> {
    session_cookie(token.as_str(), settings)
}

/// Build a cookie that instructs the client to drop the session token.
///
/// The token itself stays valid until it expires; this only removes it from
/// the client.
pub fn cleared_cookie(settings: CookieSettings) -> Cookie<'static> {
    let mut cookie = session_cookie("", settings);
    cookie.make_removal();
    cookie
}

/// Read the raw session token from the request, if present and non-empty.
pub fn token_from_request(req: &HttpRequest) -> Option<String> {
    req.cookie(AUTH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
}
