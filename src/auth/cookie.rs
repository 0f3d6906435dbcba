// Session cookie formatting and parsing
// The token cookie is httpOnly; Secure is added outside development

use chrono::{DateTime, Duration, Utc};

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

/// Value written by logout in place of a token
pub const CLEARED_VALUE: &str = "none";

/// Builds the `Set-Cookie` value that stores a session token
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use teamboard_api::auth::cookie::session_cookie;
///
/// let expires = Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap();
/// assert_eq!(
///     session_cookie("abc", expires, false),
///     "token=abc; Path=/; Expires=Fri, 31 Jan 2025 12:00:00 GMT; HttpOnly; SameSite=Lax"
/// );
/// ```
pub fn session_cookie(token: &str, expires: DateTime<Utc>, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Expires={}; HttpOnly; SameSite=Lax",
        TOKEN_COOKIE,
        token,
        http_date(expires)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Builds the `Set-Cookie` value that logs a browser out
///
/// Overwrites the token with a placeholder that expires 10 seconds from now.
pub fn cleared_cookie(now: DateTime<Utc>) -> String {
    format!(
        "{}={}; Path=/; Expires={}; HttpOnly; SameSite=Lax",
        TOKEN_COOKIE,
        CLEARED_VALUE,
        http_date(now + Duration::seconds(10))
    )
}

/// Finds the value of cookie `name` in a `Cookie` request header
pub fn read_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim().trim_matches('"'))
    })
}

fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
