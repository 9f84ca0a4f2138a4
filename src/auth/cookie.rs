//! Defines functions for storing the session token in a private cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, UserID, auth::token::Token};

/// The name of the cookie holding the session token.
pub(crate) const COOKIE_TOKEN: &str = "session";
/// How long a session lasts after logging in.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::days(1);

/// The attributes shared by every session cookie.
///
/// The cookie is not marked as secure so that the app works over plain HTTP
/// during development.
fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((COOKIE_TOKEN, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(false)
        .build()
}

/// Add the session cookie to the cookie jar, indicating that a user is logged in and authenticated.
///
/// The session expires `duration` after the current time.
/// You can use [DEFAULT_SESSION_DURATION] for the default duration.
///
/// Returns the cookie jar with the cookie added.
///
/// # Errors
///
/// Returns an [Error::TokenSerialization] if the token cannot be serialized.
pub fn set_session_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = Token::new(user_id, OffsetDateTime::now_utc(), duration);
    let token_string =
        serde_json::to_string(&token).map_err(|err| Error::TokenSerialization(err.to_string()))?;

    let mut cookie = session_cookie(token_string);
    cookie.set_expires(token.expires_at);

    Ok(jar.add(cookie))
}

/// Set the session cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    let mut cookie = session_cookie("deleted".to_owned());
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
    cookie.set_max_age(Duration::ZERO);

    jar.add(cookie)
}

/// Read the session token from the cookie jar.
///
/// # Errors
///
/// Returns:
/// - [Error::NotFound] if there is no session cookie in the jar,
/// - or [Error::TokenSerialization] if the cookie does not contain a valid token.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::NotFound)?;

    serde_json::from_str(cookie.value_trimmed())
        .map_err(|err| Error::TokenSerialization(err.to_string()))
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key, SameSite},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error, UserID,
        auth::cookie::{
            COOKIE_TOKEN, DEFAULT_SESSION_DURATION, get_token_from_cookies,
            invalidate_session_cookie, set_session_cookie,
        },
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    /// Test helper macro to assert that two date times are within one second
    /// of each other. Used instead of a function so that the file and line
    /// number of the caller is included in the error message instead of the
    /// helper.
    macro_rules! assert_date_time_close {
        ($left:expr, $right:expr) => {
            assert!(
                ($left - $right).abs() < Duration::seconds(1),
                "got date time {:?}, want {:?}",
                $left,
                $right
            );
        };
    }

    #[test]
    fn can_set_cookie() {
        let user_id = UserID::new(1);

        let jar = set_session_cookie(get_jar(), user_id, DEFAULT_SESSION_DURATION).unwrap();
        let token = get_token_from_cookies(&jar).unwrap();

        assert_eq!(token.user_id, user_id);
        assert_date_time_close!(
            token.expires_at,
            OffsetDateTime::now_utc() + Duration::days(1)
        );
    }

    #[test]
    fn session_cookie_has_expected_attributes() {
        let jar = set_session_cookie(get_jar(), UserID::new(1), DEFAULT_SESSION_DURATION).unwrap();

        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.path(), Some("/"));
        assert_date_time_close!(
            cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + DEFAULT_SESSION_DURATION
        );
    }

    #[test]
    fn get_token_fails_without_cookie() {
        assert_eq!(get_token_from_cookies(&get_jar()), Err(Error::NotFound));
    }

    #[test]
    fn get_token_fails_with_garbage_cookie() {
        let jar = get_jar().add(Cookie::new(COOKIE_TOKEN, "FOOBAR"));

        assert!(matches!(
            get_token_from_cookies(&jar),
            Err(Error::TokenSerialization(_))
        ));
    }

    #[test]
    fn invalidate_session_cookie_succeeds() {
        let jar = set_session_cookie(get_jar(), UserID::new(1), DEFAULT_SESSION_DURATION).unwrap();

        let jar = invalidate_session_cookie(jar);
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert!(get_token_from_cookies(&jar).is_err());
    }
}
