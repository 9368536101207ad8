use crate::domain::features::FeatureVector;
use crate::domain::variant::Variant;
use std::fmt;
use std::path::PathBuf;

pub mod linear;
pub mod loader;

pub use loader::{load_model, read_model};

/// A pre-trained model: one scalar per submitted row.
pub trait Regressor: Send + Sync + fmt::Debug {
    /// Feature names (and order) the model was trained with.
    fn feature_names(&self) -> &[String];

    fn predict(&self, rows: &[FeatureVector]) -> anyhow::Result<Vec<f64>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Artifact missing, unreadable, or not a valid model.
    Load { path: PathBuf, detail: String },
    FeatureMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },
    OutputShape { rows: usize, outputs: usize },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Load { path, detail } => {
                write!(f, "failed to load model {}: {detail}", path.display())
            }
            ModelError::FeatureMismatch { expected, got } => write!(
                f,
                "feature mismatch: model expects {expected:?}, got {got:?}"
            ),
            ModelError::OutputShape { rows, outputs } => write!(
                f,
                "model returned {outputs} predictions for {rows} rows"
            ),
        }
    }
}

impl std::error::Error for ModelError {}

/// Fails when a loaded model was trained on a different schema than the variant
/// it is about to serve.
pub fn ensure_schema(model: &dyn Regressor, variant: Variant) -> Result<(), ModelError> {
    let expected = model.feature_names();
    let schema = variant.schema();
    if expected.iter().map(String::as_str).eq(schema.iter().copied()) {
        return Ok(());
    }
    Err(ModelError::FeatureMismatch {
        expected: expected.to_vec(),
        got: schema.iter().map(|s| s.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::linear::LinearRegressor;

    #[test]
    fn ensure_schema_compares_names_and_order() {
        let model = LinearRegressor::new(
            vec!["MA7".into(), "MA30".into()],
            vec![0.5, 0.5],
            0.0,
        )
        .unwrap();
        assert!(ensure_schema(&model, Variant::NftPrice).is_ok());
        assert!(matches!(
            ensure_schema(&model, Variant::FloorPrice),
            Err(ModelError::FeatureMismatch { .. })
        ));

        let swapped = LinearRegressor::new(
            vec!["MA30".into(), "MA7".into()],
            vec![0.5, 0.5],
            0.0,
        )
        .unwrap();
        assert!(ensure_schema(&swapped, Variant::NftPrice).is_err());
    }
}
