//! Browser session cookies.
//!
//! The cookie carries a random key; the database stores its SHA-256 so a
//! leaked sessions table cannot be replayed.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration;
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "biobase_session";

/// 244 random bits from two v4 UUIDs
pub fn generate_session_key() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

pub fn hash_session_key(key: &str) -> String {
    format!("{:x}", Sha256::digest(key.as_bytes()))
}

pub fn session_cookie(key: String, lifetime_hours: u64, secure: bool) -> Cookie<'static> {
    let hours = i64::try_from(lifetime_hours).unwrap_or(i64::MAX);

    Cookie::build((SESSION_COOKIE, key))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(hours.saturating_mul(3600)))
        .build()
}

/// Clears the session cookie on the client, if the request carried one
pub fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

pub fn session_key(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn jar(cookie_header: &'static str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(cookie_header));
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn keys_are_unique_and_hashes_stable() {
        let a = generate_session_key();
        let b = generate_session_key();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert_eq!(hash_session_key(&a), hash_session_key(&a));
        assert_ne!(hash_session_key(&a), hash_session_key(&b));
    }

    #[test]
    fn finds_session_among_other_cookies() {
        let jar = jar("theme=dark; biobase_session=abc123; lang=ru");
        assert_eq!(session_key(&jar).as_deref(), Some("abc123"));
    }

    #[test]
    fn empty_or_missing_cookie_is_none() {
        assert_eq!(session_key(&CookieJar::new()), None);
        assert_eq!(session_key(&jar("biobase_session=")), None);
    }

    #[test]
    fn cookie_attributes() {
        let cookie = session_cookie("k".into(), 2, true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(Duration::hours(2)));
        assert_eq!(session_cookie("k".into(), 2, false).secure(), Some(false));
    }

    #[test]
    fn huge_lifetimes_saturate() {
        let cookie = session_cookie("k".into(), u64::MAX, false);
        assert!(cookie.max_age().is_some_and(|age| age.is_positive()));
    }
}
