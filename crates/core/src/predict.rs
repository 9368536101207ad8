use crate::domain::variant::Variant;
use crate::form::FormValues;
use crate::i18n::{get_texts, Language};
use crate::model::{ModelError, Regressor};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub variant: Variant,
    pub language: Language,
    /// Model output before currency conversion.
    pub raw_prediction: f64,
    /// Value shown to the user, in the language's display currency.
    pub value: f64,
    pub currency: &'static str,
    pub message: String,
}

/// Runs one single-row inference and renders it with the language's template.
pub fn predict(
    model: &dyn Regressor,
    language: Language,
    values: &FormValues,
) -> anyhow::Result<PredictionResult> {
    let variant = values.variant();
    let row = values.to_feature_vector()?;

    let outputs = model.predict(std::slice::from_ref(&row))?;
    let [raw_prediction] = outputs[..] else {
        return Err(ModelError::OutputShape {
            rows: 1,
            outputs: outputs.len(),
        }
        .into());
    };

    let texts = get_texts(variant, language);
    let value = raw_prediction * texts.currency.multiplier;
    let message = texts.render_success(&format_amount(value));

    tracing::debug!(
        %variant,
        %language,
        features = ?row.iter().collect::<Vec<_>>(),
        raw_prediction,
        value,
        "prediction served"
    );

    Ok(PredictionResult {
        variant,
        language,
        raw_prediction,
        value,
        currency: texts.currency.code,
        message,
    })
}

/// Formats with two decimals and comma thousands separators: `14,250,000.00`.
pub fn format_amount(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
