//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx, get_log_in_page, get_log_out, post_log_in},
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_edit_transaction_page, get_new_transaction_page, get_transactions_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_new_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::DELETE_TRANSACTION,
                delete(delete_transaction_endpoint),
            )
            .route(
                endpoints::EDIT_TRANSACTION_VIEW,
                put(edit_transaction_endpoint),
            )
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_htmx::HX_REDIRECT;
    use axum_test::TestServer;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        LedgerStore,
        auth::COOKIE_TOKEN,
        build_router, endpoints,
        endpoints::format_endpoint,
        ledger::{Transaction, TransactionType},
        test_utils::{get_test_app_state, get_test_ledger},
    };

    fn get_test_server(ledger: LedgerStore) -> TestServer {
        let app = build_router(get_test_app_state(ledger));

        TestServer::new(app)
    }

    async fn log_in(server: &TestServer) -> Cookie<'static> {
        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("password", "hunter2")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        response.cookie(COOKIE_TOKEN)
    }

    #[tokio::test]
    async fn dashboard_requires_log_in() {
        let server = get_test_server(get_test_ledger());

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_see_other();
        let location = response.header("location");
        assert!(
            location
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW),
            "want redirect to log-in page, got {location:?}"
        );
    }

    #[tokio::test]
    async fn wrong_password_does_not_set_cookie() {
        let server = get_test_server(get_test_ledger());

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("password", "wrong")])
            .await;

        response.assert_status_ok();
        assert!(response.maybe_cookie(COOKIE_TOKEN).is_none());
    }

    #[tokio::test]
    async fn dashboard_is_shown_after_log_in() {
        let server = get_test_server(get_test_ledger());
        let cookie = log_in(&server).await;

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("No transactions yet"));
    }

    #[tokio::test]
    async fn htmx_requests_without_session_get_hx_redirect() {
        let server = get_test_server(get_test_ledger());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&[("date", "2025-01-15"), ("type", "Salary"), ("amount", "500")])
            .await;

        response.assert_status_ok();
        assert!(response.maybe_header(HX_REDIRECT).is_some());
    }

    #[tokio::test]
    async fn create_list_and_delete_transaction() {
        let ledger = get_test_ledger();
        let server = get_test_server(ledger.clone());
        let cookie = log_in(&server).await;

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .add_cookie(cookie.clone())
            .form(&[
                ("date", "2025-01-15"),
                ("type", "ClientInvoice"),
                ("amount", "1000"),
                ("client", "ACME"),
                ("commission_percent", "15"),
                ("notes", ""),
            ])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(HX_REDIRECT), endpoints::DASHBOARD_VIEW);

        let transactions = ledger.list_all().await.unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].treasury_impact, dec!(850));

        let response = server
            .get(endpoints::TRANSACTIONS_VIEW)
            .add_cookie(cookie.clone())
            .await;
        response.assert_status_ok();
        assert!(response.text().contains("ACME"));

        server
            .delete(&format_endpoint(
                endpoints::DELETE_TRANSACTION,
                transactions[0].id.as_str(),
            ))
            .add_cookie(cookie)
            .await
            .assert_status_ok();
        assert!(ledger.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_page_of_missing_transaction_is_not_found() {
        let server = get_test_server(get_test_ledger());
        let cookie = log_in(&server).await;

        let response = server
            .get(&format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, "missing"))
            .add_cookie(cookie)
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn edit_transaction_through_router() {
        let ledger = get_test_ledger();
        let record = Transaction::build(TransactionType::Salary, dec!(500), date!(2025 - 02 - 01))
            .finalize()
            .unwrap();
        let transaction = ledger.add(record).await.unwrap().remove(0);
        let server = get_test_server(ledger.clone());
        let cookie = log_in(&server).await;

        let response = server
            .put(&format_endpoint(
                endpoints::EDIT_TRANSACTION_VIEW,
                transaction.id.as_str(),
            ))
            .add_cookie(cookie)
            .form(&[("date", "2025-02-01"), ("type", "Salary"), ("amount", "650")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        let updated = ledger.get(&transaction.id).await.unwrap().unwrap();
        assert_eq!(updated.amount, dec!(650));
        assert_eq!(updated.treasury_impact, dec!(-650));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server(get_test_ledger());

        server.get("/does/not/exist").await.assert_status_not_found();
    }
}
