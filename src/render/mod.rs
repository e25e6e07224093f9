use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::Result;
use crate::exchange::BgpGroups;
use crate::peeringdb::PeerRecord;

const STANZA: &str = "stanza";

/// A template rendered once per record.
/// Text outside tags, including the trailing newline, is kept as written.
pub struct StanzaTemplate {
    tera: Tera,
}

impl StanzaTemplate {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            std::io::Error::new(e.kind(), format!("reading template {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(STANZA, content)?;
        Ok(Self { tera })
    }

    pub fn render<T: Serialize>(&self, values: &T) -> Result<String> {
        let context = Context::from_serialize(values)?;
        Ok(self.tera.render(STANZA, &context)?)
    }

    pub fn render_all<T: Serialize>(&self, records: &[T]) -> Result<Vec<String>> {
        records.iter().map(|r| self.render(r)).collect()
    }
}

/// Rendered stanzas in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedConfig {
    stanzas: Vec<String>,
}

impl RenderedConfig {
    pub fn from_stanzas(stanzas: Vec<String>) -> Self {
        Self { stanzas }
    }

    pub fn stanzas(&self) -> &[String] {
        &self.stanzas
    }

    pub fn is_empty(&self) -> bool {
        self.stanzas.is_empty()
    }

    /// Stanzas joined with a single newline between each
    pub fn text(&self) -> String {
        self.stanzas.join("\n")
    }

    /// Non-blank lines, as sent to the device
    pub fn commands(&self) -> Vec<String> {
        self.text()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Placeholders of the peering template
#[derive(Debug, Serialize)]
pub struct PeeringStanza<'a> {
    #[serde(rename = "BGP_GROUP")]
    pub bgp_group: &'a str,
    #[serde(rename = "PEER_IP")]
    pub peer_ip: &'a str,
    #[serde(rename = "PEER_NAME")]
    pub peer_name: &'a str,
    #[serde(rename = "PEER_ASN")]
    pub peer_asn: u32,
}

/// One neighbor stanza per address, all IPv4 neighbors before IPv6
pub fn peering_config(
    template: &StanzaTemplate,
    peer: &PeerRecord,
    groups: &BgpGroups,
) -> Result<RenderedConfig> {
    let stanza = |group: &str, ip: &str| {
        template.render(&PeeringStanza {
            bgp_group: group,
            peer_ip: ip,
            peer_name: &peer.name,
            peer_asn: peer.asn,
        })
    };

    let mut stanzas = Vec::with_capacity(peer.ipv4.len() + peer.ipv6.len());
    for ip in &peer.ipv4 {
        stanzas.push(stanza(&groups.ipv4, ip)?);
    }
    for ip in &peer.ipv6 {
        stanzas.push(stanza(&groups.ipv6, ip)?);
    }

    Ok(RenderedConfig::from_stanzas(stanzas))
}
