use std::env;

use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::debug;

use burgerlog_core::config::{LedgerOrder, RemoteConfig};
use burgerlog_core::{BurgerLogError, Field, Record, RecordId, Schema};

use crate::LedgerBackend;

/// Hosted table behind a PostgREST-style endpoint (`{url}/rest/v1/{table}`).
/// Rows use the same columns as the flat file.
pub struct RemoteTableLedger {
    client: Client,
    endpoint: String,
    api_key: String,
    schema: Schema,
    order: LedgerOrder,
}

impl RemoteTableLedger {
    pub fn new(url: &str, table: &str, api_key: String, schema: Schema, order: LedgerOrder) -> Result<Self> {
        let client = Client::builder().build().context("build HTTP client")?;
        Ok(Self {
            client,
            endpoint: table_endpoint(url, table),
            api_key,
            schema,
            order,
        })
    }

    /// Reads the API key from the environment variable named in `config`.
    pub fn from_config(config: &RemoteConfig, schema: Schema, order: LedgerOrder) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(BurgerLogError::InvalidConfig("remote.url is empty".to_string()).into());
        }
        let api_key = env::var(&config.api_key_env).map_err(|_| {
            BurgerLogError::InvalidConfig(format!(
                "environment variable {} with the remote API key is not set",
                config.api_key_env
            ))
        })?;
        Self::new(&config.url, &config.table, api_key, schema, order)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, &self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn list_query(&self) -> Vec<(String, String)> {
        let mut query = vec![("select".to_string(), "*".to_string())];
        if self.order == LedgerOrder::NewestFirst {
            query.push(("order".to_string(), format!("{}.desc", self.schema.name_of(Field::Date))));
        }
        query
    }

    fn id_filter(&self, id: &RecordId) -> (String, String) {
        (self.schema.name_of(Field::Id), format!("eq.{id}"))
    }

    fn insert_rows(&self, records: &[Record]) -> Result<()> {
        let rows: Vec<Value> = records
            .iter()
            .map(|record| Value::Object(self.schema.json_row(record)))
            .collect();
        self.request(Method::POST)
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .context("insert remote rows")?
            .error_for_status()
            .context("remote insert rejected")?;
        Ok(())
    }
}

impl LedgerBackend for RemoteTableLedger {
    fn describe(&self) -> String {
        format!("remote table {}", self.endpoint)
    }

    fn list_all(&self) -> Result<Vec<Record>> {
        let rows: Vec<Map<String, Value>> = self
            .request(Method::GET)
            .query(&self.list_query())
            .send()
            .context("query remote table")?
            .error_for_status()
            .context("remote query rejected")?
            .json()
            .context("parse remote rows")?;
        debug!(count = rows.len(), endpoint = %self.endpoint, "loaded remote rows");
        Ok(rows.iter().map(|row| self.schema.record_from_json(row)).collect())
    }

    /// Deletes every row, then inserts `records` in one request.
    fn replace_all(&mut self, records: &[Record]) -> Result<()> {
        self.request(Method::DELETE)
            .query(&[(self.schema.name_of(Field::Id), "not.is.null".to_string())])
            .send()
            .context("clear remote table")?
            .error_for_status()
            .context("remote clear rejected")?;
        if records.is_empty() {
            return Ok(());
        }
        self.insert_rows(records)
    }

    /// The table orders rows itself, so `order` only affects listing.
    fn append(&mut self, record: Record, _order: LedgerOrder) -> Result<()> {
        self.insert_rows(std::slice::from_ref(&record))
    }

    fn remove(&mut self, id: &RecordId) -> Result<bool> {
        let deleted: Vec<Value> = self
            .request(Method::DELETE)
            .query(&[self.id_filter(id)])
            .header("Prefer", "return=representation")
            .send()
            .context("delete remote row")?
            .error_for_status()
            .context("remote delete rejected")?
            .json()
            .context("parse remote delete response")?;
        Ok(!deleted.is_empty())
    }
}

fn table_endpoint(url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", url.trim().trim_end_matches('/'), table.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use burgerlog_core::{Category, ColumnStyle, RecordBuilder, Reviewer, ScoreSet};
    use serde_json::json;
    use tokio::runtime::Runtime;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const TABLE_PATH: &str = "/rest/v1/burger-logs";

    /// Mock table served from its own runtime so the blocking client can be
    /// driven from a plain test thread.
    struct TableServer {
        server: MockServer,
        runtime: Runtime,
    }

    impl TableServer {
        fn start() -> Self {
            let runtime = Runtime::new().unwrap();
            let server = runtime.block_on(MockServer::start());
            Self { server, runtime }
        }

        fn mount(&self, mock: Mock) {
            self.runtime.block_on(mock.mount(&self.server));
        }

        fn requests(&self) -> Vec<Request> {
            self.runtime
                .block_on(self.server.received_requests())
                .unwrap_or_default()
        }

        fn ledger(&self, order: LedgerOrder) -> RemoteTableLedger {
            RemoteTableLedger::new(
                &self.server.uri(),
                "burger-logs",
                "key".to_string(),
                Schema::new(ColumnStyle::Snake),
                order,
            )
            .unwrap()
        }
    }

    fn scored(venue: &str, rating: u8) -> Record {
        RecordBuilder::new(venue)
            .would_return(true)
            .reviewer(Reviewer::Baba, ScoreSet::from_ratings(&[rating; 6]), "baba notu")
            .reviewer(Reviewer::Gokce, ScoreSet::from_ratings(&[2, 4, 6, 8, 10, 0]), "")
            .build()
            .unwrap()
    }

    fn json_rows(records: &[Record]) -> Vec<Value> {
        let schema = Schema::new(ColumnStyle::Snake);
        records
            .iter()
            .map(|record| Value::Object(schema.json_row(record)))
            .collect()
    }

    fn ledger(style: ColumnStyle, order: LedgerOrder) -> RemoteTableLedger {
        RemoteTableLedger::new(
            "https://example.supabase.co/",
            "burger-logs",
            "key".to_string(),
            Schema::new(style),
            order,
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_trims_slashes() {
        let ledger = ledger(ColumnStyle::Snake, LedgerOrder::NewestFirst);
        assert_eq!(ledger.endpoint(), "https://example.supabase.co/rest/v1/burger-logs");
        assert_eq!(ledger.describe(), "remote table https://example.supabase.co/rest/v1/burger-logs");
    }

    #[test]
    fn test_list_query_orders_by_date_column() {
        let snake = ledger(ColumnStyle::Snake, LedgerOrder::NewestFirst);
        assert!(snake
            .list_query()
            .contains(&("order".to_string(), "tarih.desc".to_string())));

        let titled = ledger(ColumnStyle::Titled, LedgerOrder::NewestFirst);
        assert!(titled
            .list_query()
            .contains(&("order".to_string(), "Tarih.desc".to_string())));

        let insertion = ledger(ColumnStyle::Snake, LedgerOrder::Insertion);
        assert_eq!(insertion.list_query().len(), 1);
    }

    #[test]
    fn test_id_filter() {
        let ledger = ledger(ColumnStyle::Snake, LedgerOrder::NewestFirst);
        let filter = ledger.id_filter(&RecordId::from("abc123"));
        assert_eq!(filter, ("id".to_string(), "eq.abc123".to_string()));
    }

    #[test]
    fn test_from_config_requires_key_variable() {
        let config = RemoteConfig {
            url: "https://example.supabase.co".to_string(),
            table: "burger-logs".to_string(),
            api_key_env: "BURGERLOG_TEST_UNSET_KEY_VARIABLE".to_string(),
        };
        let result = RemoteTableLedger::from_config(&config, Schema::new(ColumnStyle::Snake), LedgerOrder::NewestFirst);
        let message = result.err().unwrap().to_string();
        assert!(message.contains("BURGERLOG_TEST_UNSET_KEY_VARIABLE"));
    }

    #[test]
    fn test_list_all_orders_newest_first_and_fills_missing_columns() {
        let table = TableServer::start();
        let full = scored("Tam", 8);
        let mut rows = json_rows(std::slice::from_ref(&full));
        rows.push(json!({
            "id": "eski",
            "mekan": "Eski Yer",
            "tarih": "2023-07-14",
            "baba_toplam": 6.5,
            "foto": null
        }));
        table.mount(
            Mock::given(method("GET"))
                .and(path(TABLE_PATH))
                .and(query_param("select", "*"))
                .and(query_param("order", "tarih.desc"))
                .and(header("apikey", "key"))
                .and(header("authorization", "Bearer key"))
                .respond_with(ResponseTemplate::new(200).set_body_json(&rows)),
        );

        let records = table.ledger(LedgerOrder::NewestFirst).list_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], full);

        let partial = &records[1];
        assert_eq!(partial.id().as_str(), "eski");
        assert_eq!(partial.venue(), "Eski Yer");
        assert_eq!(partial.date_string(), "2023-07-14");
        assert_eq!(partial.entry(Reviewer::Baba).subtotal, 6.5);
        assert_eq!(partial.entry(Reviewer::Gokce).comment, "");
        assert_eq!(partial.entry(Reviewer::Gokce).scores.get(Category::Value), Some(0.0));
        assert_eq!(partial.overall(), 0.0);
        assert!(!partial.would_return());
        assert!(partial.photo().is_empty());
    }

    #[test]
    fn test_append_posts_single_row() {
        let table = TableServer::start();
        table.mount(
            Mock::given(method("POST"))
                .and(path(TABLE_PATH))
                .and(header("prefer", "return=minimal"))
                .respond_with(ResponseTemplate::new(201)),
        );

        let record = scored("Yeni", 7);
        let mut ledger = table.ledger(LedgerOrder::NewestFirst);
        ledger.append(record.clone(), LedgerOrder::NewestFirst).unwrap();

        let requests = table.requests();
        assert_eq!(requests.len(), 1);
        let body: Vec<Map<String, Value>> = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(Schema::new(ColumnStyle::Snake).record_from_json(&body[0]), record);
    }

    #[test]
    fn test_remove_reports_whether_a_row_was_deleted() {
        let table = TableServer::start();
        let present = scored("Silinecek", 5);
        table.mount(
            Mock::given(method("DELETE"))
                .and(path(TABLE_PATH))
                .and(query_param("id", format!("eq.{}", present.id())))
                .and(header("prefer", "return=representation"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json_rows(std::slice::from_ref(&present))),
                ),
        );
        table.mount(
            Mock::given(method("DELETE"))
                .and(path(TABLE_PATH))
                .and(query_param("id", "eq.yok"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([]))),
        );

        let mut ledger = table.ledger(LedgerOrder::NewestFirst);
        assert!(ledger.remove(present.id()).unwrap());
        assert!(!ledger.remove(&RecordId::from("yok")).unwrap());
        assert_eq!(table.requests().len(), 2);
    }

    #[test]
    fn test_replace_all_with_list_all_keeps_rows() {
        let table = TableServer::start();
        let rows = json_rows(&[scored("Bir", 4), scored("İki", 9)]);
        table.mount(
            Mock::given(method("GET"))
                .and(path(TABLE_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(&rows)),
        );
        table.mount(
            Mock::given(method("DELETE"))
                .and(path(TABLE_PATH))
                .and(query_param("id", "not.is.null"))
                .respond_with(ResponseTemplate::new(204)),
        );
        table.mount(
            Mock::given(method("POST"))
                .and(path(TABLE_PATH))
                .respond_with(ResponseTemplate::new(201)),
        );

        let mut ledger = table.ledger(LedgerOrder::Insertion);
        let before = ledger.list_all().unwrap();
        ledger.replace_all(&before).unwrap();

        let requests = table.requests();
        let methods: Vec<String> = requests.iter().map(|request| request.method.to_string()).collect();
        assert_eq!(methods, vec!["GET", "DELETE", "POST"]);
        assert!(requests[0].url.query().map_or(true, |query| !query.contains("order=")));
        let posted: Vec<Value> = serde_json::from_slice(&requests[2].body).unwrap();
        assert_eq!(posted, rows);
    }

    #[test]
    fn test_replace_all_with_nothing_only_deletes() {
        let table = TableServer::start();
        table.mount(
            Mock::given(method("DELETE"))
                .and(path(TABLE_PATH))
                .respond_with(ResponseTemplate::new(204)),
        );

        table.ledger(LedgerOrder::NewestFirst).replace_all(&[]).unwrap();
        assert_eq!(table.requests().len(), 1);
    }

    #[test]
    fn test_rejected_request_is_an_error() {
        let table = TableServer::start();
        table.mount(
            Mock::given(method("GET"))
                .and(path(TABLE_PATH))
                .respond_with(ResponseTemplate::new(401)),
        );

        let error = table.ledger(LedgerOrder::NewestFirst).list_all().unwrap_err();
        assert!(format!("{error:#}").contains("remote query rejected"));
    }
}
