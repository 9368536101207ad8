use serde::{Deserialize, Serialize};
use std::fmt;

/// Which regression model a form feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Sale price from 7-day and 30-day moving averages.
    NftPrice,
    /// Collection floor price from aggregate market metrics.
    FloorPrice,
}

const NFT_PRICE_SCHEMA: &[&str] = &["MA7", "MA30"];
const FLOOR_PRICE_SCHEMA: &[&str] = &["Volume_USD", "Sales", "Owners", "Average_Price_USD"];

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::NftPrice, Variant::FloorPrice];

    pub fn key(self) -> &'static str {
        match self {
            Variant::NftPrice => "nft-price",
            Variant::FloorPrice => "floor-price",
        }
    }

    pub fn from_key(key: &str) -> anyhow::Result<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|v| v.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| anyhow::anyhow!("unknown variant: {key}"))
    }

    /// Feature names in the exact order the model was trained with.
    pub fn schema(self) -> &'static [&'static str] {
        match self {
            Variant::NftPrice => NFT_PRICE_SCHEMA,
            Variant::FloorPrice => FLOOR_PRICE_SCHEMA,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
