//! Authentication middleware that only lets requests with a valid session through.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    auth::identity::Identity,
    endpoints,
    flash::{Flash, set_flash},
};

/// The message shown on the log-in page after an anonymous client was turned away.
pub const LOG_IN_REQUIRED_MSG: &str = "Please log in to access this page.";

/// Middleware function that checks for a valid session cookie.
///
/// The authenticated [User](crate::User) is placed into the request extensions
/// and the request executed normally if the session is valid, otherwise the
/// client is redirected to the log-in page. The page they asked for is not
/// remembered.
///
/// **Note**: Route handlers can use the function argument `Extension(user): Extension<User>` to receive the user.
pub async fn auth_guard(
    identity: Identity,
    jar: PrivateCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match identity {
        Identity::Authenticated(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Identity::Anonymous => {
            tracing::debug!(
                "Redirecting anonymous request for {} to the log-in page",
                request.uri().path()
            );

            (
                set_flash(jar, Flash::info(LOG_IN_REQUIRED_MSG)),
                Redirect::to(endpoints::LOG_IN_VIEW),
            )
                .into_response()
        }
    }
}
