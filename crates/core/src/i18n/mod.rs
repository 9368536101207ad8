//! Static bilingual display text.
//!
//! Entries are keyed by `(Variant, Language)` through an exhaustive match, so
//! every selectable combination has text at compile time. `validate_all` is run
//! at startup to catch empty strings or template mistakes.

use crate::domain::variant::Variant;
use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const AMOUNT_PLACEHOLDER: &str = "{amount}";
pub const SETTINGS_HEADER: &str = "Settings";
pub const LANGUAGE_SELECTOR_LABEL: &str = "Language / Bahasa";

/// Placeholder conversion rate: 1 USD = 15,000 IDR.
pub const USD_TO_IDR: f64 = 15_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "id")]
    Indonesian,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Indonesian];

    pub fn key(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Indonesian => "id",
        }
    }

    /// Label shown on the language selector.
    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English 🇬🇧",
            Language::Indonesian => "Indonesia 🇮🇩",
        }
    }

    pub fn from_key(key: &str) -> anyhow::Result<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| anyhow::anyhow!("unknown language: {key}"))
    }
}

// Same key policy as query strings: trimmed, case-insensitive.
impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Language::from_key(&key).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Currency {
    pub code: &'static str,
    /// Applied to the raw model output before display.
    pub multiplier: f64,
}

const USD: Currency = Currency {
    code: "USD",
    multiplier: 1.0,
};

const IDR: Currency = Currency {
    code: "IDR",
    multiplier: USD_TO_IDR,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LocalizationEntry {
    pub title: &'static str,
    pub description: &'static str,
    pub header: &'static str,
    /// One label per feature, in schema order.
    pub field_labels: &'static [&'static str],
    pub button_label: &'static str,
    /// Contains exactly one `{amount}` placeholder.
    pub success_template: &'static str,
    pub currency: Currency,
    pub disclaimer: &'static str,
}

const DISCLAIMER_EN: &str =
    "Disclaimer: This is a demonstration project and should not be used as financial advice.";
const DISCLAIMER_ID: &str =
    "Disclaimer: Ini adalah proyek demonstrasi dan tidak boleh digunakan sebagai saran finansial.";

static NFT_PRICE_EN: LocalizationEntry = LocalizationEntry {
    title: "💎 Predictive Model for NFT Market Trends",
    description: "This application demonstrates a simple Machine Learning model to predict NFT prices. \
The model is trained using historical sales data and utilizes Moving Average features (7-day and 30-day) to make predictions.",
    header: "Enter Data for Prediction",
    field_labels: &[
        "Enter the Last 7-Day Moving Average (MA7)",
        "Enter the Last 30-Day Moving Average (MA30)",
    ],
    button_label: "Predict NFT Price",
    success_template: "The Predicted NFT Price is: ${amount}",
    currency: USD,
    disclaimer: DISCLAIMER_EN,
};

static NFT_PRICE_ID: LocalizationEntry = LocalizationEntry {
    title: "💎 Predictive Model for NFT Market Trends",
    description: "Aplikasi ini mendemonstrasikan model Machine Learning sederhana untuk memprediksi harga NFT. \
Model ini dilatih menggunakan data historis penjualan dan menggunakan fitur Moving Average (7 hari dan 30 hari) untuk membuat prediksi.",
    header: "Masukkan Data untuk Prediksi",
    field_labels: &[
        "Masukkan Nilai Moving Average 7-Hari Terakhir (MA7)",
        "Masukkan Nilai Moving Average 30-Hari Terakhir (MA30)",
    ],
    button_label: "Prediksi Harga NFT",
    success_template: "Prediksi Harga NFT adalah: Rp {amount}",
    currency: IDR,
    disclaimer: DISCLAIMER_ID,
};

static FLOOR_PRICE_EN: LocalizationEntry = LocalizationEntry {
    title: "💎 NFT Collection Floor Price Estimator",
    description: "This application estimates the floor price of an NFT collection from its recent market activity. \
The model is trained on historical collection data and uses trading volume, sales count, owner count and average sale price as features.",
    header: "Enter Collection Metrics",
    field_labels: &[
        "Trading Volume (USD)",
        "Number of Sales",
        "Number of Owners",
        "Average Sale Price (USD)",
    ],
    button_label: "Estimate Floor Price",
    success_template: "The Estimated Floor Price is: ${amount}",
    currency: USD,
    disclaimer: DISCLAIMER_EN,
};

static FLOOR_PRICE_ID: LocalizationEntry = LocalizationEntry {
    title: "💎 Estimasi Harga Dasar Koleksi NFT",
    description: "Aplikasi ini memperkirakan harga dasar (floor price) sebuah koleksi NFT dari aktivitas pasarnya. \
Model dilatih menggunakan data historis koleksi dengan fitur volume perdagangan, jumlah penjualan, jumlah pemilik dan harga rata-rata.",
    header: "Masukkan Metrik Koleksi",
    field_labels: &[
        "Volume Perdagangan (USD)",
        "Jumlah Penjualan",
        "Jumlah Pemilik",
        "Harga Rata-rata Penjualan (USD)",
    ],
    button_label: "Estimasi Harga Dasar",
    success_template: "Estimasi Harga Dasar adalah: ${amount}",
    currency: USD,
    disclaimer: DISCLAIMER_ID,
};

pub fn get_texts(variant: Variant, language: Language) -> &'static LocalizationEntry {
    match (variant, language) {
        (Variant::NftPrice, Language::English) => &NFT_PRICE_EN,
        (Variant::NftPrice, Language::Indonesian) => &NFT_PRICE_ID,
        (Variant::FloorPrice, Language::English) => &FLOOR_PRICE_EN,
        (Variant::FloorPrice, Language::Indonesian) => &FLOOR_PRICE_ID,
    }
}

impl LocalizationEntry {
    pub fn validate(&self, variant: Variant) -> anyhow::Result<()> {
        for (field, value) in [
            ("title", self.title),
            ("description", self.description),
            ("header", self.header),
            ("button_label", self.button_label),
            ("success_template", self.success_template),
            ("disclaimer", self.disclaimer),
        ] {
            ensure!(!value.trim().is_empty(), "{field} must be non-empty");
        }

        ensure!(
            self.field_labels.len() == variant.schema().len(),
            "{variant} needs {} field labels (got {})",
            variant.schema().len(),
            self.field_labels.len()
        );
        ensure!(
            self.field_labels.iter().all(|l| !l.trim().is_empty()),
            "field labels must be non-empty"
        );

        let placeholders = self.success_template.matches(AMOUNT_PLACEHOLDER).count();
        ensure!(
            placeholders == 1,
            "success_template must contain exactly one {AMOUNT_PLACEHOLDER} (got {placeholders})"
        );

        ensure!(
            self.currency.multiplier.is_finite() && self.currency.multiplier > 0.0,
            "currency multiplier must be positive (got {})",
            self.currency.multiplier
        );
        Ok(())
    }

    pub fn render_success(&self, formatted_amount: &str) -> String {
        self.success_template
            .replacen(AMOUNT_PLACEHOLDER, formatted_amount, 1)
    }
}

pub fn validate_all() -> anyhow::Result<()> {
    for variant in Variant::ALL {
        for language in Language::ALL {
            get_texts(variant, language).validate(variant).map_err(|e| {
                e.context(format!("invalid texts for {variant}/{language}"))
            })?;
        }
    }
    Ok(())
}
