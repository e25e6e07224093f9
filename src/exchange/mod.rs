use std::fmt;
use std::str::FromStr;

/// Internet exchanges we peer at, with their PeeringDB `ix_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePoint {
    Amsix,
    Decix,
    Linx,
    Globalix,
    Lsix,
}

/// Edge router terminating an exchange's peering LAN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRouter {
    Er1Ams1,
    Er1Ams2,
}

/// BGP groups the neighbors of one exchange are placed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgpGroups {
    pub ipv4: String,
    pub ipv6: String,
}

/// Exchanges whose groups don't follow the `<IX>` / `<IX>-INET6` convention.
/// Columns: exchange name, IPv4 group suffix, IPv6 group suffix.
const GROUP_OVERRIDES: &[(&str, &str, &str)] = &[("LINX", "-INET4", "-INET6-NEW")];

impl ExchangePoint {
    pub const ALL: [ExchangePoint; 5] = [
        ExchangePoint::Amsix,
        ExchangePoint::Decix,
        ExchangePoint::Linx,
        ExchangePoint::Globalix,
        ExchangePoint::Lsix,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExchangePoint::Amsix => "AMSIX",
            ExchangePoint::Decix => "DECIX",
            ExchangePoint::Linx => "LINX",
            ExchangePoint::Globalix => "GLOBALIX",
            ExchangePoint::Lsix => "LSIX",
        }
    }

    /// PeeringDB exchange identifier
    pub fn id(self) -> u32 {
        match self {
            ExchangePoint::Amsix => 26,
            ExchangePoint::Decix => 31,
            ExchangePoint::Linx => 18,
            ExchangePoint::Globalix => 1088,
            ExchangePoint::Lsix => 1308,
        }
    }

    pub fn router(self) -> EdgeRouter {
        match self {
            ExchangePoint::Amsix | ExchangePoint::Decix | ExchangePoint::Globalix => {
                EdgeRouter::Er1Ams2
            }
            ExchangePoint::Linx | ExchangePoint::Lsix => EdgeRouter::Er1Ams1,
        }
    }

    pub fn bgp_groups(self) -> BgpGroups {
        resolve_groups(self.name())
    }

    /// Comma separated list of valid names, as shown in the selection prompt
    pub fn options() -> String {
        Self::ALL
            .iter()
            .map(|ix| ix.name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for ExchangePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown exchange: {0}")]
pub struct UnknownExchange(pub String);

impl FromStr for ExchangePoint {
    type Err = UnknownExchange;

    /// Names are matched exactly, as listed in the prompt
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ix| ix.name() == s)
            .ok_or_else(|| UnknownExchange(s.to_string()))
    }
}

impl EdgeRouter {
    /// Environment variable holding the router's management address
    pub fn env_key(self) -> &'static str {
        match self {
            EdgeRouter::Er1Ams1 => "ER1_AMS1",
            EdgeRouter::Er1Ams2 => "ER1_AMS2",
        }
    }
}

/// Resolve the IPv4 and IPv6 BGP group names for an exchange
pub fn resolve_groups(exchange: &str) -> BgpGroups {
    let (v4_suffix, v6_suffix) = GROUP_OVERRIDES
        .iter()
        .find(|(name, _, _)| *name == exchange)
        .map(|(_, v4, v6)| (*v4, *v6))
        .unwrap_or(("", "-INET6"));

    BgpGroups {
        ipv4: format!("{}{}", exchange, v4_suffix),
        ipv6: format!("{}{}", exchange, v6_suffix),
    }
}
