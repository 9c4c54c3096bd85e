//! Session cookie binding
//!
//! Binds the session token to the transport: one fixed-name cookie, attributes
//! bit-exact per the session contract. Absence of the cookie is the anonymous
//! state, not an error.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Fixed session cookie name
pub const SESSION_COOKIE: &str = "session";

/// Cookie lifetime matches the token TTL: 7 days
pub const SESSION_MAX_AGE_SECONDS: i64 = 604_800;

/// Attach a session token to the response jar.
pub fn store(jar: CookieJar, token: String, secure: bool) -> CookieJar {
    jar.add(session_cookie(token, secure))
}

/// Read the session token from the incoming request, if any.
pub fn retrieve(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE).map(|cookie| cookie.value())
}

/// Remove the session cookie (logout).
pub fn clear(jar: CookieJar) -> CookieJar {
    // The removal cookie must carry the same path as the one we set
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    jar.remove(cookie)
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(Duration::seconds(SESSION_MAX_AGE_SECONDS));
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_carries_the_exact_attribute_contract() {
        let cookie = session_cookie("token-value".to_string(), false);
        let rendered = cookie.to_string();

        assert!(rendered.starts_with("session=token-value"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=604800"));
        assert!(!rendered.contains("Secure"));
    }

    #[test]
    fn secure_attribute_is_set_for_production_transport() {
        let cookie = session_cookie("token-value".to_string(), true);
        assert!(cookie.to_string().contains("Secure"));
    }

    #[test]
    fn retrieve_returns_none_without_a_cookie() {
        let jar = CookieJar::new();
        assert_eq!(retrieve(&jar), None);
    }

    #[test]
    fn store_then_retrieve_round_trips() {
        let jar = store(CookieJar::new(), "abc".to_string(), false);
        assert_eq!(retrieve(&jar), Some("abc"));
    }
}
