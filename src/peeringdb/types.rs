use serde::Deserialize;

// --- PeeringDB API types ---

/// Every PeeringDB list endpoint wraps its records in `data`
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Subset of a `net` record
#[derive(Debug, Clone, Deserialize)]
pub struct PdbNetwork {
    pub id: u64,
    pub name: String,
}

/// Subset of a `netixlan` record: one network's port on one exchange LAN
#[derive(Debug, Clone, Deserialize)]
pub struct PdbNetIxLan {
    pub ix_id: u64,
    #[serde(default)]
    pub ipaddr4: Option<String>,
    #[serde(default)]
    pub ipaddr6: Option<String>,
}

// --- Lookup result ---

/// A peer's addresses on one exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRecord {
    pub asn: u32,
    pub name: String,
    pub ipv4: Vec<String>,
    pub ipv6: Vec<String>,
}

impl PeerRecord {
    /// Keep the links on `ix_id` and split their addresses by family,
    /// in the order PeeringDB returned them
    pub fn from_links(asn: u32, name: String, ix_id: u32, links: Vec<PdbNetIxLan>) -> Self {
        let mut ipv4 = Vec::new();
        let mut ipv6 = Vec::new();

        for link in links.into_iter().filter(|l| l.ix_id == u64::from(ix_id)) {
            if let Some(addr) = present(link.ipaddr4) {
                ipv4.push(addr);
            }
            if let Some(addr) = present(link.ipaddr6) {
                ipv6.push(addr);
            }
        }

        Self {
            asn,
            name,
            ipv4,
            ipv6,
        }
    }
}

fn present(addr: Option<String>) -> Option<String> {
    addr.map(|a| a.trim().to_string()).filter(|a| !a.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(json: &str) -> Vec<PdbNetIxLan> {
        serde_json::from_str::<ApiResponse<PdbNetIxLan>>(json)
            .unwrap()
            .data
    }

    #[test]
    fn test_filters_by_exchange_and_family() {
        let links = links(
            r#"{"data": [
                {"ix_id": 26, "ipaddr4": "80.249.208.1", "ipaddr6": "2001:7f8:1::a506:4500:1"},
                {"ix_id": 18, "ipaddr4": "195.66.224.1", "ipaddr6": null},
                {"ix_id": 26, "ipaddr4": "80.249.208.2", "ipaddr6": null},
                {"ix_id": 26, "ipaddr4": null, "ipaddr6": "2001:7f8:1::a506:4500:2"}
            ]}"#,
        );

        let peer = PeerRecord::from_links(64500, "Example".into(), 26, links);
        assert_eq!(peer.ipv4, vec!["80.249.208.1", "80.249.208.2"]);
        assert_eq!(
            peer.ipv6,
            vec!["2001:7f8:1::a506:4500:1", "2001:7f8:1::a506:4500:2"]
        );
    }

    #[test]
    fn test_ipv4_only_link() {
        let links = links(r#"{"data": [{"ix_id": 18, "ipaddr4": "195.66.224.1"}]}"#);
        let peer = PeerRecord::from_links(64500, "Example".into(), 18, links);
        assert_eq!(peer.ipv4, vec!["195.66.224.1"]);
        assert!(peer.ipv6.is_empty());
    }

    #[test]
    fn test_no_matching_links() {
        let links = links(r#"{"data": [{"ix_id": 31, "ipaddr4": "80.81.192.1", "ipaddr6": ""}]}"#);
        let peer = PeerRecord::from_links(64500, "Example".into(), 1308, links);
        assert!(peer.ipv4.is_empty());
        assert!(peer.ipv6.is_empty());
    }

    #[test]
    fn test_empty_address_skipped() {
        let links = links(r#"{"data": [{"ix_id": 31, "ipaddr4": "80.81.192.1", "ipaddr6": ""}]}"#);
        let peer = PeerRecord::from_links(64500, "Example".into(), 31, links);
        assert_eq!(peer.ipv4.len(), 1);
        assert!(peer.ipv6.is_empty());
    }
}
