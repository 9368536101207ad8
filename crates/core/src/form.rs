use crate::domain::features::FeatureVector;
use crate::domain::variant::Variant;
use std::collections::HashMap;
use std::fmt;

/// A numeric input widget: floor, step granularity and display precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericField {
    pub name: &'static str,
    pub min: f64,
    pub step: f64,
    pub precision: usize,
}

impl NumericField {
    const fn currency(name: &'static str, step: f64) -> Self {
        Self {
            name,
            min: 0.0,
            step,
            precision: 2,
        }
    }

    const fn count(name: &'static str) -> Self {
        Self {
            name,
            min: 0.0,
            step: 1.0,
            precision: 0,
        }
    }

    /// Formats at the display precision, falling back to the full value when
    /// rounding would change what the model sees.
    pub fn format_value(&self, value: f64) -> String {
        let fixed = format!("{:.*}", self.precision, value);
        if fixed.parse::<f64>().ok() == Some(value) {
            fixed
        } else {
            value.to_string()
        }
    }
}

const NFT_PRICE_FIELDS: &[NumericField] = &[
    NumericField::currency("MA7", 100.0),
    NumericField::currency("MA30", 100.0),
];

const FLOOR_PRICE_FIELDS: &[NumericField] = &[
    NumericField::currency("Volume_USD", 1000.0),
    NumericField::count("Sales"),
    NumericField::count("Owners"),
    NumericField::currency("Average_Price_USD", 10.0),
];

/// Input widgets for a variant, in schema order.
pub fn fields(variant: Variant) -> &'static [NumericField] {
    match variant {
        Variant::NftPrice => NFT_PRICE_FIELDS,
        Variant::FloorPrice => FLOOR_PRICE_FIELDS,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    UnknownField(String),
    NotANumber { field: &'static str, raw: String },
    NonFinite { field: &'static str },
    BelowMinimum { field: &'static str, value: f64, min: f64 },
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::UnknownField(name) => write!(f, "unknown field: {name}"),
            FormError::NotANumber { field, raw } => {
                write!(f, "{field} must be a number (got {raw:?})")
            }
            FormError::NonFinite { field } => write!(f, "{field} must be a finite number"),
            FormError::BelowMinimum { field, value, min } => {
                write!(f, "{field} must be at least {min} (got {value})")
            }
        }
    }
}

impl std::error::Error for FormError {}

/// Current values of a variant's form, one per field in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    variant: Variant,
    values: Vec<f64>,
}

impl FormValues {
    /// Every field at its lower bound, as on first render.
    pub fn defaults(variant: Variant) -> Self {
        Self {
            variant,
            values: fields(variant).iter().map(|f| f.min).collect(),
        }
    }

    /// Parses raw text inputs keyed by field name. Missing or blank fields keep
    /// their default.
    pub fn parse(variant: Variant, raw: &HashMap<String, String>) -> Result<Self, FormError> {
        reject_unknown(variant, raw.keys())?;

        let mut out = Self::defaults(variant);
        for (i, field) in fields(variant).iter().enumerate() {
            let Some(text) = raw.get(field.name).map(|s| s.trim()) else {
                continue;
            };
            if text.is_empty() {
                continue;
            }
            let value = text
                .replace(',', "")
                .parse::<f64>()
                .map_err(|_| FormError::NotANumber {
                    field: field.name,
                    raw: text.to_string(),
                })?;
            out.values[i] = check(field, value)?;
        }
        Ok(out)
    }

    /// Same as `parse` for already-numeric inputs (JSON bodies).
    pub fn from_numbers(variant: Variant, raw: &HashMap<String, f64>) -> Result<Self, FormError> {
        reject_unknown(variant, raw.keys())?;

        let mut out = Self::defaults(variant);
        for (i, field) in fields(variant).iter().enumerate() {
            if let Some(value) = raw.get(field.name) {
                out.values[i] = check(field, *value)?;
            }
        }
        Ok(out)
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        fields(self.variant)
            .iter()
            .position(|f| f.name == name)
            .map(|i| self.values[i])
    }

    /// Display text for each input, in schema order.
    pub fn display(&self) -> Vec<String> {
        fields(self.variant)
            .iter()
            .zip(&self.values)
            .map(|(field, value)| field.format_value(*value))
            .collect()
    }

    pub fn to_feature_vector(&self) -> anyhow::Result<FeatureVector> {
        FeatureVector::try_new(self.variant, self.values.clone())
    }
}

/// Input text exactly as submitted, for re-rendering a rejected form. Fields
/// left out show their default.
pub fn echo_raw(variant: Variant, raw: &HashMap<String, String>) -> Vec<String> {
    fields(variant)
        .iter()
        .map(|field| match raw.get(field.name).map(|s| s.trim()) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => field.format_value(field.min),
        })
        .collect()
}

fn reject_unknown<'a>(
    variant: Variant,
    mut names: impl Iterator<Item = &'a String>,
) -> Result<(), FormError> {
    let schema = variant.schema();
    match names.find(|n| !schema.contains(&n.as_str())) {
        Some(name) => Err(FormError::UnknownField(name.clone())),
        None => Ok(()),
    }
}

fn check(field: &NumericField, value: f64) -> Result<f64, FormError> {
    if !value.is_finite() {
        return Err(FormError::NonFinite { field: field.name });
    }
    if value < field.min {
        return Err(FormError::BelowMinimum {
            field: field.name,
            value,
            min: field.min,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn fields_follow_schema() {
        for variant in Variant::ALL {
            let names: Vec<_> = fields(variant).iter().map(|f| f.name).collect();
            assert_eq!(names, variant.schema());
            assert!(fields(variant).iter().all(|f| f.min == 0.0 && f.step > 0.0));
        }
    }

    #[test]
    fn counts_use_integer_precision() {
        let by_name = |n: &str| {
            *fields(Variant::FloorPrice)
                .iter()
                .find(|f| f.name == n)
                .unwrap()
        };
        assert_eq!(by_name("Sales").precision, 0);
        assert_eq!(by_name("Owners").precision, 0);
        assert_eq!(by_name("Volume_USD").precision, 2);
        assert_eq!(by_name("Average_Price_USD").format_value(2500.0), "2500.00");
        assert_eq!(by_name("Sales").format_value(200.0), "200");
        // Rounding would hide the value actually submitted to the model.
        assert_eq!(by_name("Sales").format_value(2.5), "2.5");
        assert_eq!(by_name("Volume_USD").format_value(1234.567), "1234.567");
    }

    #[test]
    fn missing_and_blank_fields_default_to_floor() {
        let values = FormValues::parse(Variant::NftPrice, &raw(&[("MA7", "  ")])).unwrap();
        assert_eq!(values.values(), &[0.0, 0.0]);
        assert_eq!(values, FormValues::defaults(Variant::NftPrice));
    }

    #[test]
    fn parses_numbers_with_thousands_separators() {
        let values = FormValues::parse(
            Variant::FloorPrice,
            &raw(&[
                ("Volume_USD", "500,000.00"),
                ("Sales", "200"),
                ("Owners", "150"),
                ("Average_Price_USD", "2500"),
            ]),
        )
        .unwrap();
        assert_eq!(values.values(), &[500_000.0, 200.0, 150.0, 2500.0]);
        assert_eq!(values.get("Owners"), Some(150.0));
    }

    #[test]
    fn rejects_negative_non_finite_and_garbage() {
        assert!(matches!(
            FormValues::parse(Variant::NftPrice, &raw(&[("MA7", "-1")])),
            Err(FormError::BelowMinimum { field: "MA7", .. })
        ));
        assert!(matches!(
            FormValues::parse(Variant::NftPrice, &raw(&[("MA30", "NaN")])),
            Err(FormError::NonFinite { field: "MA30" })
        ));
        assert!(matches!(
            FormValues::parse(Variant::NftPrice, &raw(&[("MA30", "ten")])),
            Err(FormError::NotANumber { field: "MA30", .. })
        ));
    }

    #[test]
    fn rejects_fields_from_another_variant() {
        let err = FormValues::parse(Variant::NftPrice, &raw(&[("Sales", "3")])).unwrap_err();
        assert_eq!(err, FormError::UnknownField("Sales".to_string()));
    }

    #[test]
    fn display_round_trips_fractional_counts() {
        let values = FormValues::parse(
            Variant::FloorPrice,
            &raw(&[("Sales", "2.5"), ("Average_Price_USD", "2505")]),
        )
        .unwrap();
        assert_eq!(values.display(), vec!["0.00", "2.5", "0", "2505.00"]);
    }

    #[test]
    fn echo_raw_keeps_submitted_text() {
        let submitted = raw(&[("MA7", " 1234.56 "), ("MA30", "-1")]);
        assert!(FormValues::parse(Variant::NftPrice, &submitted).is_err());
        assert_eq!(echo_raw(Variant::NftPrice, &submitted), vec!["1234.56", "-1"]);
        assert_eq!(
            echo_raw(Variant::NftPrice, &raw(&[("MA30", "")])),
            vec!["0.00", "0.00"]
        );
    }

    #[test]
    fn zero_owners_is_accepted() {
        let numbers: HashMap<String, f64> = [("Owners".to_string(), 0.0)].into_iter().collect();
        let values = FormValues::from_numbers(Variant::FloorPrice, &numbers).unwrap();
        assert_eq!(values.get("Owners"), Some(0.0));
    }
}
