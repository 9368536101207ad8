use crate::domain::features::FeatureVector;
use crate::model::{ModelError, Regressor};
use anyhow::ensure;
use serde::{Deserialize, Serialize};

/// Ordinary least-squares style model: `intercept + Σ coefficient_i * x_i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegressor {
    pub fn new(
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> anyhow::Result<Self> {
        let model = Self {
            feature_names,
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            !self.feature_names.is_empty(),
            "feature_names must be non-empty"
        );
        ensure!(
            self.coefficients.len() == self.feature_names.len(),
            "expected {} coefficients (got {})",
            self.feature_names.len(),
            self.coefficients.len()
        );
        ensure!(
            self.coefficients.iter().all(|c| c.is_finite()) && self.intercept.is_finite(),
            "coefficients and intercept must be finite"
        );
        Ok(())
    }

    fn predict_row(&self, row: &FeatureVector) -> Result<f64, ModelError> {
        let names_match = row
            .names()
            .iter()
            .copied()
            .eq(self.feature_names.iter().map(String::as_str));
        if !names_match {
            return Err(ModelError::FeatureMismatch {
                expected: self.feature_names.clone(),
                got: row.names().iter().map(|s| s.to_string()).collect(),
            });
        }

        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.values())
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }
}

impl Regressor for LinearRegressor {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, rows: &[FeatureVector]) -> anyhow::Result<Vec<f64>> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(self.predict_row(row)?);
        }
        Ok(out)
    }
}
