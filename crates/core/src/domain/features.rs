use crate::domain::variant::Variant;
use anyhow::ensure;

/// One row of named model inputs, in the variant's trained column order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    names: &'static [&'static str],
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn try_new(variant: Variant, values: Vec<f64>) -> anyhow::Result<Self> {
        let names = variant.schema();
        ensure!(
            values.len() == names.len(),
            "{variant} expects {} features (got {})",
            names.len(),
            values.len()
        );
        Ok(Self { names, values })
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.names.iter().copied().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_schema_order() {
        let row = FeatureVector::try_new(Variant::FloorPrice, vec![500_000.0, 200.0, 150.0, 2500.0])
            .unwrap();
        let pairs: Vec<_> = row.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("Volume_USD", 500_000.0),
                ("Sales", 200.0),
                ("Owners", 150.0),
                ("Average_Price_USD", 2500.0),
            ]
        );
        assert_eq!(row.get("Owners"), Some(150.0));
        assert_eq!(row.get("MA7"), None);
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(FeatureVector::try_new(Variant::NftPrice, vec![1.0]).is_err());
        assert!(FeatureVector::try_new(Variant::NftPrice, vec![1.0, 2.0, 3.0]).is_err());
    }
}
