//! Tracked asset registry

/// A tracked cryptocurrency: source-specific id plus display name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    pub id: &'static str,
    pub name: &'static str,
}

/// Every asset the dashboard offers, in menu order
pub const DASHBOARD_ASSETS: [Asset; 10] = [
    Asset { id: "bitcoin", name: "Bitcoin" },
    Asset { id: "ethereum", name: "Ethereum" },
    Asset { id: "cardano", name: "Cardano" },
    Asset { id: "dogecoin", name: "Dogecoin" },
    // CoinGecko lists XRP under "ripple"
    Asset { id: "ripple", name: "XRP" },
    Asset { id: "solana", name: "Solana" },
    Asset { id: "polkadot", name: "Polkadot" },
    Asset { id: "litecoin", name: "Litecoin" },
    Asset { id: "tron", name: "TRON" },
    Asset { id: "polygon", name: "Polygon" },
];

/// Assets covered by the weekly comparison report (everything but Polygon)
pub fn comparison_assets() -> &'static [Asset] {
    &DASHBOARD_ASSETS[..9]
}

impl Asset {
    pub fn by_id(id: &str) -> Option<&'static Asset> {
        DASHBOARD_ASSETS.iter().find(|a| a.id == id)
    }

    /// Case-insensitive lookup by display name or id
    pub fn by_name(name: &str) -> Option<&'static Asset> {
        let name = name.trim();
        DASHBOARD_ASSETS
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name) || a.id.eq_ignore_ascii_case(name))
    }
}

/// Display name for an id, falling back to the id with its first letter capitalised
pub fn display_name(id: &str) -> String {
    if let Some(asset) = Asset::by_id(id) {
        return asset.name.to_string();
    }

    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_assets_skip_polygon() {
        let ids: Vec<&str> = comparison_assets().iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), 9);
        assert_eq!(ids[0], "bitcoin");
        assert_eq!(ids[8], "tron");
        assert!(!ids.contains(&"polygon"));
    }

    #[test]
    fn test_lookup_by_name_and_id() {
        assert_eq!(Asset::by_name("xrp").map(|a| a.id), Some("ripple"));
        assert_eq!(Asset::by_name("Ripple").map(|a| a.name), Some("XRP"));
        assert_eq!(Asset::by_id("tron").map(|a| a.name), Some("TRON"));
        assert!(Asset::by_id("shiba").is_none());
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(display_name("ripple"), "XRP");
        assert_eq!(display_name("avalanche"), "Avalanche");
        assert_eq!(display_name(""), "");
    }
}
