use axum::{
    body::Body,
    http::{HeaderMap, StatusCode, header::{COOKIE, LOCATION, SET_COOKIE}},
    response::Response,
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    app_state::create_cookie_key,
    flash::{Flash, take_flash},
    test_utils::TEST_COOKIE_SECRET,
};

#[track_caller]
pub(crate) fn assert_redirect(response: &Response<Body>, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let got_location = response
        .headers()
        .get(LOCATION)
        .expect("location header missing");
    assert_eq!(got_location, location);
}

/// Read the flash message set by a handler whose cookies were encrypted with
/// [TEST_COOKIE_SECRET].
pub(crate) fn get_flash(response: &Response<Body>) -> Option<Flash> {
    let mut headers = HeaderMap::new();

    for set_cookie in response.headers().get_all(SET_COOKIE) {
        let set_cookie = set_cookie.to_str().expect("Could not convert to str");
        let name_value = set_cookie.split(';').next().unwrap_or_default();
        headers.append(COOKIE, name_value.parse().expect("Invalid cookie header"));
    }

    let jar = PrivateCookieJar::from_headers(&headers, create_cookie_key(TEST_COOKIE_SECRET));

    take_flash(jar).1
}
