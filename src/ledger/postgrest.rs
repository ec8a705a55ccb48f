//! A [TableService] backed by a PostgREST endpoint, e.g. a Supabase project.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};

use crate::{
    Error, TableConfig,
    ledger::{Filter, Row, TableQuery, TableService},
};

/// PostgREST HTTP client for a single table.
#[derive(Clone)]
pub struct PostgrestTable {
    client: Client,
    endpoint: String,
    key: String,
}

impl PostgrestTable {
    /// Create a client for `table` in the project at `config.url`.
    pub fn new(config: &TableConfig, table: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/rest/v1/{table}", config.url.trim_end_matches('/')),
            key: config.key.clone(),
        }
    }

    /// The URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, &self.endpoint)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }
}

// The access key must never end up in the logs.
impl std::fmt::Debug for PostgrestTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestTable")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Turn a non-2xx response into an [Error::Persistence] that carries the
/// status and the error body sent by PostgREST.
async fn check_status(response: Response) -> Result<Response, Error> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(Error::Persistence(format!("{status}: {body}")))
}

#[async_trait]
impl TableService for PostgrestTable {
    async fn insert(&self, rows: Row) -> Result<Vec<Row>, Error> {
        let response = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&rows)
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    async fn select(&self, query: &TableQuery) -> Result<Vec<Row>, Error> {
        let response = self
            .request(Method::GET)
            .query(&query.to_query_pairs())
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    async fn update(&self, filter: &Filter, patch: Row) -> Result<(), Error> {
        let response = self
            .request(Method::PATCH)
            .header("Prefer", "return=minimal")
            .query(&[filter.to_query_pair()])
            .json(&patch)
            .send()
            .await?;

        check_status(response).await?;

        Ok(())
    }

    async fn delete(&self, filter: &Filter) -> Result<(), Error> {
        let response = self
            .request(Method::DELETE)
            .query(&[filter.to_query_pair()])
            .send()
            .await?;

        check_status(response).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Router,
        extract::{RawQuery, State},
        http::{HeaderMap, Method, StatusCode, header::CONTENT_TYPE},
        routing::any,
    };
    use serde_json::json;
    use tokio::net::TcpListener;

    use crate::{
        Error, TableConfig,
        ledger::{Filter, PostgrestTable, TableQuery, TableService},
    };

    fn config(url: &str) -> TableConfig {
        TableConfig {
            url: url.to_owned(),
            key: "secret-key".to_owned(),
        }
    }

    #[test]
    fn endpoint_points_at_rest_api_for_table() {
        let table = PostgrestTable::new(&config("https://abc.supabase.co"), "transactions");

        assert_eq!(table.endpoint(), "https://abc.supabase.co/rest/v1/transactions");
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let table = PostgrestTable::new(&config("https://abc.supabase.co/"), "transactions");

        assert_eq!(table.endpoint(), "https://abc.supabase.co/rest/v1/transactions");
    }

    #[test]
    fn debug_output_hides_key() {
        let table = PostgrestTable::new(&config("https://abc.supabase.co"), "transactions");

        let debug = format!("{table:?}");

        assert!(!debug.contains("secret-key"));
    }

    /// A request as seen by [StubServer].
    #[derive(Debug, Clone)]
    struct ReceivedRequest {
        method: Method,
        path: String,
        query: String,
        headers: HeaderMap,
        body: String,
    }

    #[derive(Clone)]
    struct StubServer {
        status: StatusCode,
        body: &'static str,
        received: Arc<Mutex<Vec<ReceivedRequest>>>,
    }

    async fn record_request(
        State(server): State<StubServer>,
        method: Method,
        uri: axum::http::Uri,
        RawQuery(query): RawQuery,
        headers: HeaderMap,
        body: String,
    ) -> (StatusCode, [(axum::http::HeaderName, &'static str); 1], &'static str) {
        server.received.lock().unwrap().push(ReceivedRequest {
            method,
            path: uri.path().to_owned(),
            query: query.unwrap_or_default(),
            headers,
            body,
        });

        (server.status, [(CONTENT_TYPE, "application/json")], server.body)
    }

    /// Serve `body` with `status` for every request on a local port.
    async fn start_stub(status: StatusCode, body: &'static str) -> (PostgrestTable, StubServer) {
        let server = StubServer {
            status,
            body,
            received: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route("/{*path}", any(record_request))
            .with_state(server.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        let table = PostgrestTable::new(&config(&format!("http://{address}")), "transactions");

        (table, server)
    }

    fn single_request(server: &StubServer) -> ReceivedRequest {
        let received = server.received.lock().unwrap();
        assert_eq!(received.len(), 1, "want exactly one request, got {received:?}");

        received[0].clone()
    }

    fn header<'a>(request: &'a ReceivedRequest, name: &str) -> &'a str {
        request
            .headers
            .get(name)
            .unwrap_or_else(|| panic!("missing header {name}"))
            .to_str()
            .unwrap()
    }

    #[tokio::test]
    async fn select_sends_key_and_query_parameters() {
        let (table, server) = start_stub(StatusCode::OK, r#"[{"id":"a"}]"#).await;
        let query = TableQuery::all()
            .filter(Filter::eq("type", "Salary"))
            .order_by_descending("date");

        let rows = table.select(&query).await.unwrap();

        assert_eq!(rows, vec![json!({ "id": "a" })]);
        let request = single_request(&server);
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/rest/v1/transactions");
        assert_eq!(request.query, "select=*&type=eq.Salary&order=date.desc");
        assert_eq!(header(&request, "apikey"), "secret-key");
        assert_eq!(header(&request, "authorization"), "Bearer secret-key");
    }

    #[tokio::test]
    async fn insert_asks_for_stored_rows() {
        let (table, server) = start_stub(StatusCode::CREATED, r#"[{"id":"a","amount":5}]"#).await;

        let rows = table.insert(json!({ "id": "a", "amount": 5 })).await.unwrap();

        assert_eq!(rows, vec![json!({ "id": "a", "amount": 5 })]);
        let request = single_request(&server);
        assert_eq!(request.method, Method::POST);
        assert_eq!(header(&request, "prefer"), "return=representation");
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&request.body).unwrap(),
            json!({ "id": "a", "amount": 5 })
        );
    }

    #[tokio::test]
    async fn update_and_delete_filter_by_column() {
        let (table, server) = start_stub(StatusCode::NO_CONTENT, "").await;

        table
            .update(&Filter::eq("id", "abc"), json!({ "notes": "paid" }))
            .await
            .unwrap();
        table.delete(&Filter::eq("id", "abc")).await.unwrap();

        let received = server.received.lock().unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].method, Method::PATCH);
        assert_eq!(received[0].query, "id=eq.abc");
        assert_eq!(received[1].method, Method::DELETE);
        assert_eq!(received[1].query, "id=eq.abc");
    }

    #[tokio::test]
    async fn error_status_becomes_persistence_error_with_body() {
        let (table, _server) = start_stub(
            StatusCode::CONFLICT,
            r#"{"message":"duplicate key value violates unique constraint"}"#,
        )
        .await;

        let result = table.insert(json!({ "id": "a" })).await;

        assert_eq!(
            result,
            Err(Error::Persistence(
                r#"409 Conflict: {"message":"duplicate key value violates unique constraint"}"#
                    .to_owned()
            ))
        );
    }
}
