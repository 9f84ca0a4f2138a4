//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState,
    auth::auth_guard,
    dashboard::get_dashboard_page,
    diagnostics::{check_db, test_db},
    endpoints,
    index::get_index_page,
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    register_user::{get_register_page, register_user},
    transaction::{add_transaction_endpoint, delete_transaction_endpoint},
};

/// Return a router with all the app's routes.
///
/// The diagnostics routes are only added when they are enabled in `state`.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(
            endpoints::LOG_IN_VIEW,
            get(get_log_in_page).post(post_log_in),
        )
        .route(
            endpoints::REGISTER_VIEW,
            get(get_register_page).post(register_user),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let unprotected_routes = if state.diagnostics_enabled {
        tracing::warn!("Diagnostics routes are enabled");
        unprotected_routes
            .route(endpoints::TEST_DB, get(test_db))
            .route(endpoints::CHECK_DB, get(check_db))
    } else {
        unprotected_routes
    };

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::ADD_TRANSACTION, post(add_transaction_endpoint))
        .route(
            endpoints::DELETE_TRANSACTION,
            get(delete_transaction_endpoint),
        )
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::{TestResponse, TestServer};
    use scraper::{Html, Selector};

    use crate::{
        AppState,
        auth::{COOKIE_TOKEN, LOG_IN_REQUIRED_MSG},
        endpoints::{self, format_endpoint},
        test_utils::get_test_app_state,
        transaction::get_transactions_for_user,
        user::get_user_by_email,
    };

    use super::build_router;

    fn get_test_server(state: AppState) -> TestServer {
        TestServer::new(build_router(state))
    }

    #[track_caller]
    fn assert_see_other(response: &TestResponse, location: &str) {
        response.assert_status_see_other();
        assert_eq!(response.header("location"), location);
    }

    async fn register(server: &TestServer, username: &str, email: &str, password: &str) {
        let response = server
            .post(endpoints::REGISTER_VIEW)
            .form(&[("username", username), ("email", email), ("password", password)])
            .await;

        assert_see_other(&response, endpoints::LOG_IN_VIEW);
    }

    /// Log in and return the session cookie.
    async fn log_in(server: &TestServer, email: &str, password: &str) -> Cookie<'static> {
        let response = server
            .post(endpoints::LOG_IN_VIEW)
            .form(&[("email", email), ("password", password)])
            .await;

        assert_see_other(&response, endpoints::DASHBOARD_VIEW);

        response.cookie(COOKIE_TOKEN)
    }

    async fn add_transaction(
        server: &TestServer,
        session: &Cookie<'static>,
        kind: &str,
        amount: &str,
    ) {
        let response = server
            .post(endpoints::ADD_TRANSACTION)
            .add_cookie(session.clone())
            .form(&[
                ("type", kind),
                ("amount", amount),
                ("category", "Misc"),
                ("date", "2024-03-15"),
                ("notes", ""),
            ])
            .await;

        assert_see_other(&response, endpoints::DASHBOARD_VIEW);
    }

    #[track_caller]
    fn get_text(document: &Html, selector: &str) -> String {
        document
            .select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("No element found for {selector}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[tokio::test]
    async fn register_log_in_add_and_delete_transaction() {
        let state = get_test_app_state();
        let server = get_test_server(state.clone());

        register(&server, "Alice", "alice@example.com", "hunter2").await;
        let session = log_in(&server, "alice@example.com", "hunter2").await;
        add_transaction(&server, &session, "income", "100").await;
        add_transaction(&server, &session, "expense", "30").await;

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_cookie(session.clone())
            .await;
        response.assert_status_ok();
        let document = Html::parse_document(&response.text());
        assert_eq!(get_text(&document, "#total-income p"), "$100.00");
        assert_eq!(get_text(&document, "#total-expenses p"), "$30.00");
        assert_eq!(get_text(&document, "#savings p"), "$70.00");

        let transaction_id = {
            let connection = state.db_connection.lock().unwrap();
            let user = get_user_by_email("alice@example.com", &connection).unwrap();
            get_transactions_for_user(user.id, &connection).unwrap()[0].id
        };

        let response = server
            .get(&format_endpoint(endpoints::DELETE_TRANSACTION, transaction_id))
            .add_cookie(session.clone())
            .await;
        assert_see_other(&response, endpoints::DASHBOARD_VIEW);

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_cookie(session)
            .add_cookies(response.cookies())
            .await;
        let text = response.text();
        assert!(text.contains("Transaction deleted successfully!"));
        let document = Html::parse_document(&text);
        assert_eq!(get_text(&document, "#savings p"), "-$30.00");
    }

    #[tokio::test]
    async fn cannot_delete_other_users_transaction() {
        let state = get_test_app_state();
        let server = get_test_server(state.clone());
        register(&server, "Alice", "alice@example.com", "hunter2").await;
        register(&server, "Bob", "bob@example.com", "hunter3").await;
        let alice_session = log_in(&server, "alice@example.com", "hunter2").await;
        let bob_session = log_in(&server, "bob@example.com", "hunter3").await;
        add_transaction(&server, &alice_session, "income", "50").await;

        let (alice_id, transaction_id) = {
            let connection = state.db_connection.lock().unwrap();
            let alice = get_user_by_email("alice@example.com", &connection).unwrap();
            let id = get_transactions_for_user(alice.id, &connection).unwrap()[0].id;
            (alice.id, id)
        };

        let response = server
            .get(&format_endpoint(endpoints::DELETE_TRANSACTION, transaction_id))
            .add_cookie(bob_session.clone())
            .await;
        assert_see_other(&response, endpoints::DASHBOARD_VIEW);

        let text = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_cookie(bob_session)
            .add_cookies(response.cookies())
            .await
            .text();
        assert!(text.contains("Transaction not found or you do not have permission to delete it."));

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_transactions_for_user(alice_id, &connection).unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn guarded_routes_redirect_to_log_in() {
        let server = get_test_server(get_test_app_state());

        for path in [endpoints::DASHBOARD_VIEW, endpoints::LOG_OUT, "/delete_transaction/1"] {
            let response = server.get(path).await;
            assert_see_other(&response, endpoints::LOG_IN_VIEW);
        }

        let response = server
            .post(endpoints::ADD_TRANSACTION)
            .form(&[("type", "income"), ("amount", "1")])
            .await;
        assert_see_other(&response, endpoints::LOG_IN_VIEW);

        let text = server
            .get(endpoints::LOG_IN_VIEW)
            .add_cookies(response.cookies())
            .await
            .text();
        assert!(text.contains(LOG_IN_REQUIRED_MSG));
    }

    #[tokio::test]
    async fn log_out_ends_session() {
        let server = get_test_server(get_test_app_state());
        register(&server, "Alice", "alice@example.com", "hunter2").await;
        let session = log_in(&server, "alice@example.com", "hunter2").await;

        let response = server.get(endpoints::LOG_OUT).add_cookie(session).await;
        assert_see_other(&response, endpoints::ROOT);

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_cookie(response.cookie(COOKIE_TOKEN))
            .await;
        assert_see_other(&response, endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn root_redirects_logged_in_users_to_dashboard() {
        let server = get_test_server(get_test_app_state());
        register(&server, "Alice", "alice@example.com", "hunter2").await;
        let session = log_in(&server, "alice@example.com", "hunter2").await;

        server.get(endpoints::ROOT).await.assert_status_ok();

        let response = server.get(endpoints::ROOT).add_cookie(session).await;
        assert_see_other(&response, endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn diagnostics_are_disabled_by_default() {
        let server = get_test_server(get_test_app_state());

        server
            .get(endpoints::TEST_DB)
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get(endpoints::CHECK_DB)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn diagnostics_can_be_enabled() {
        let server = get_test_server(get_test_app_state().with_diagnostics(true));

        server.get(endpoints::TEST_DB).await.assert_status_ok();
        server.get(endpoints::CHECK_DB).await.assert_status_ok();
    }

    #[tokio::test]
    async fn unknown_route_returns_not_found_page() {
        let server = get_test_server(get_test_app_state());

        let response = server.get("/does-not-exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("404"));
    }
}
