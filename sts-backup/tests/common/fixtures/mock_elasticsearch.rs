//! Mock Elasticsearch HTTP server
//!
//! Serves canned responses for the REST endpoints the client calls, so the
//! client can be exercised without a cluster.

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use sts_backup::search::ElasticsearchClient;

pub struct MockElasticsearchServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockElasticsearchServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    pub fn client(&self) -> ElasticsearchClient {
        ElasticsearchClient::new(self.base_url.clone()).unwrap()
    }

    pub async fn mock_snapshots(&self, repository: &str, selector: &str, snapshots: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/_snapshot/{}/{}", repository, selector)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "snapshots": snapshots
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_restore(&self, repository: &str, name: &str, pattern: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/_snapshot/{}/{}/_restore", repository, name)))
            .and(query_param("wait_for_completion", "true"))
            .and(body_json(json!({ "indices": pattern })))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "snapshot": { "snapshot": name, "indices": [] }
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_cat_indices(&self, pattern: &str, names: &[&str]) {
        let rows: Vec<Value> = names.iter().map(|n| json!({ "index": n })).collect();
        Mock::given(method("GET"))
            .and(path(format!("/_cat/indices/{}", pattern)))
            .and(query_param("format", "json"))
            .and(query_param("h", "index"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_cat_indices_detailed(&self, rows: Value) {
        Mock::given(method("GET"))
            .and(path("/_cat/indices"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_delete(&self, index: &str, status: u16) {
        Mock::given(method("DELETE"))
            .and(path(format!("/{}", index)))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({ "acknowledged": status == 200 })),
            )
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_exists(&self, index: &str, status: u16) {
        Mock::given(method("HEAD"))
            .and(path(format!("/{}", index)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_rollover(&self, name: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/{}/_rollover", name)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "acknowledged": true,
                "rolled_over": true
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_put(&self, url_path: &str, expected_body: Value) {
        Mock::given(method("PUT"))
            .and(path(url_path.to_string()))
            .and(body_json(expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
            .expect(1)
            .mount(&self.server)
            .await;
    }
}
