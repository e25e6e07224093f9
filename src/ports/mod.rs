use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::{RenderedConfig, StanzaTemplate};

/// One access port from the port sheet.
/// Read from the `Interface`, `Company`, `Vlan` columns; rendered as
/// `Interface`, `Description`, `Vlan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchPortRow {
    #[serde(rename = "Interface")]
    pub interface: String,
    #[serde(rename(serialize = "Description", deserialize = "Company"))]
    pub description: String,
    #[serde(rename = "Vlan")]
    pub vlan: String,
}

/// Read all rows, in file order
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<SwitchPortRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        std::io::Error::new(e.kind(), format!("opening {}: {}", path.display(), e))
    })?;
    let rows = rows_from_reader(file)?;
    tracing::info!("Read {} ports from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn rows_from_reader<R: Read>(reader: R) -> Result<Vec<SwitchPortRow>> {
    let mut sheet = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows: Vec<SwitchPortRow> = Vec::new();
    for row in sheet.deserialize::<SwitchPortRow>() {
        rows.push(row?);
    }
    Ok(rows)
}

/// One interface stanza per row
pub fn port_config(template: &StanzaTemplate, rows: &[SwitchPortRow]) -> Result<RenderedConfig> {
    Ok(RenderedConfig::from_stanzas(template.render_all(rows)?))
}
