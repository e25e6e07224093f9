use reqwest::Client;
use std::time::Duration;

use super::types::*;
use crate::error::{Error, Result};

/// PeeringDB API client
pub struct PeeringDbClient {
    base_url: String,
    token: String,
    client: Client,
}

impl PeeringDbClient {
    pub fn new(url: &str, token: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn auth_header(&self) -> String {
        format!("Api-Key {}", self.token)
    }

    /// GET a list endpoint; `endpoint` names it in errors
    async fn list<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let resp = self
            .client
            .get(self.api_url(&format!("/{}", endpoint)))
            .query(query)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("PeeringDB {} request failed with {}", endpoint, status);
            return Err(Error::Lookup {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body: ApiResponse<T> = resp.json().await?;
        Ok(body.data)
    }

    // --- Networks ---

    pub async fn get_network_by_asn(&self, asn: u32) -> Result<PdbNetwork> {
        self.list::<PdbNetwork>("net", &[("asn", asn.to_string())])
            .await?
            .into_iter()
            .next()
            .ok_or(Error::PeerNotFound(asn))
    }

    // --- Exchange LAN links ---

    pub async fn list_netixlan_by_net(&self, net_id: u64) -> Result<Vec<PdbNetIxLan>> {
        self.list("netixlan", &[("net_id", net_id.to_string())]).await
    }

    /// Resolve a peer's name and its addresses on exchange `ix_id`
    pub async fn lookup_peer(&self, asn: u32, ix_id: u32) -> Result<PeerRecord> {
        let net = self.get_network_by_asn(asn).await?;
        tracing::info!("AS{} is {} (net_id={})", asn, net.name, net.id);

        let links = self.list_netixlan_by_net(net.id).await?;
        let peer = PeerRecord::from_links(asn, net.name, ix_id, links);
        tracing::info!(
            "Found {} IPv4 and {} IPv6 addresses for AS{} on ix_id={}",
            peer.ipv4.len(),
            peer.ipv6.len(),
            asn,
            ix_id
        );

        Ok(peer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_net(server: &MockServer, status: u16, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/net"))
            .and(query_param("asn", "64500"))
            .and(header("Authorization", "Api-Key secret"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn mock_netixlan(server: &MockServer, status: u16, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/netixlan"))
            .and(query_param("net_id", "777"))
            .and(header("Authorization", "Api-Key secret"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    fn net_body() -> serde_json::Value {
        serde_json::json!({"data": [{"id": 777, "name": "Example Networks", "asn": 64500}]})
    }

    #[tokio::test]
    async fn test_lookup_peer() {
        let server = MockServer::start().await;
        mock_net(&server, 200, net_body()).await;
        mock_netixlan(
            &server,
            200,
            serde_json::json!({"data": [
                {"ix_id": 18, "ipaddr4": "195.66.224.10", "ipaddr6": "2001:7f8:4::fbf4:1"},
                {"ix_id": 26, "ipaddr4": "80.249.208.10", "ipaddr6": null},
                {"ix_id": 18, "ipaddr4": "195.66.226.10", "ipaddr6": null}
            ]}),
        )
        .await;

        let client = PeeringDbClient::new(&format!("{}/", server.uri()), "secret").unwrap();
        let peer = client.lookup_peer(64500, 18).await.unwrap();

        assert_eq!(peer.name, "Example Networks");
        assert_eq!(peer.asn, 64500);
        assert_eq!(peer.ipv4, vec!["195.66.224.10", "195.66.226.10"]);
        assert_eq!(peer.ipv6, vec!["2001:7f8:4::fbf4:1"]);
    }

    #[tokio::test]
    async fn test_no_links_on_exchange() {
        let server = MockServer::start().await;
        mock_net(&server, 200, net_body()).await;
        mock_netixlan(&server, 200, serde_json::json!({"data": []})).await;

        let client = PeeringDbClient::new(&server.uri(), "secret").unwrap();
        let peer = client.lookup_peer(64500, 26).await.unwrap();

        assert!(peer.ipv4.is_empty());
        assert!(peer.ipv6.is_empty());
    }

    #[tokio::test]
    async fn test_net_error_status() {
        let server = MockServer::start().await;
        mock_net(&server, 403, serde_json::json!({"meta": {"error": "forbidden"}})).await;

        let client = PeeringDbClient::new(&server.uri(), "secret").unwrap();
        let err = client.lookup_peer(64500, 26).await.unwrap_err();

        assert!(matches!(err, Error::Lookup { endpoint: "net", status: 403 }));
        assert_eq!(err.to_string(), "failed to retrieve net data: 403");
    }

    #[tokio::test]
    async fn test_netixlan_error_status() {
        let server = MockServer::start().await;
        mock_net(&server, 200, net_body()).await;
        mock_netixlan(&server, 500, serde_json::json!({})).await;

        let client = PeeringDbClient::new(&server.uri(), "secret").unwrap();
        let err = client.lookup_peer(64500, 26).await.unwrap_err();

        assert!(matches!(err, Error::Lookup { endpoint: "netixlan", status: 500 }));
    }

    #[tokio::test]
    async fn test_unknown_asn() {
        let server = MockServer::start().await;
        mock_net(&server, 200, serde_json::json!({"data": []})).await;

        let client = PeeringDbClient::new(&server.uri(), "secret").unwrap();
        let err = client.lookup_peer(64500, 26).await.unwrap_err();

        assert!(matches!(err, Error::PeerNotFound(64500)));
    }
}
