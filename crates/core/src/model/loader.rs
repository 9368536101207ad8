use crate::model::linear::LinearRegressor;
use crate::model::{ModelError, Regressor};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelArtifact {
    Linear(LinearRegressor),
}

// Models already read in this process, keyed by the path they were loaded from.
static LOADED: OnceLock<Mutex<HashMap<PathBuf, Arc<dyn Regressor>>>> = OnceLock::new();

/// Reads and parses a model artifact, bypassing the process-wide cache.
pub fn read_model(path: &Path) -> anyhow::Result<Arc<dyn Regressor>> {
    let load_err = |detail: String| ModelError::Load {
        path: path.to_path_buf(),
        detail,
    };

    let text = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
    let artifact = serde_json::from_str::<ModelArtifact>(&text)
        .map_err(|e| load_err(format!("invalid artifact: {e}")))?;

    let model: Arc<dyn Regressor> = match artifact {
        ModelArtifact::Linear(linear) => {
            linear.validate().map_err(|e| load_err(format!("{e:#}")))?;
            Arc::new(linear)
        }
    };
    Ok(model)
}

/// Loads the model at `path` once per process; later calls hand back the same
/// instance without touching the file again.
pub fn load_model(path: impl AsRef<Path>) -> anyhow::Result<Arc<dyn Regressor>> {
    let path = path.as_ref();
    let registry = LOADED.get_or_init(|| Mutex::new(HashMap::new()));
    // Held across the read so concurrent first callers load the file only once.
    let mut loaded = registry.lock().unwrap_or_else(|e| e.into_inner());

    if let Some(model) = loaded.get(path) {
        return Ok(Arc::clone(model));
    }

    let model = read_model(path)?;
    tracing::info!(
        path = %path.display(),
        features = ?model.feature_names(),
        "model loaded"
    );
    loaded.insert(path.to_path_buf(), Arc::clone(&model));
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_artifact(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "nft_predictor_{}_{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, body).unwrap();
        path
    }

    fn linear_json() -> String {
        json!({
            "kind": "linear",
            "feature_names": ["MA7", "MA30"],
            "coefficients": [0.5, 0.5],
            "intercept": 0.0,
        })
        .to_string()
    }

    #[test]
    fn reads_linear_artifact() {
        let path = write_artifact("read", &linear_json());
        let model = read_model(&path).unwrap();
        assert_eq!(model.feature_names(), ["MA7", "MA30"]);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn load_model_is_memoized() {
        let path = write_artifact("memo", &linear_json());
        let first = load_model(&path).unwrap();
        let second = load_model(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // The cached instance survives the file going away.
        std::fs::remove_file(&path).unwrap();
        let third = load_model(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &third));
        assert!(read_model(&path).is_err());
    }

    #[test]
    fn concurrent_first_calls_share_one_instance() {
        let path = write_artifact("concurrent", &linear_json());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let path = path.clone();
                std::thread::spawn(move || load_model(&path).unwrap())
            })
            .collect();
        let models: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(models.iter().all(|m| Arc::ptr_eq(m, &models[0])));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let path = std::env::temp_dir().join("nft_predictor_does_not_exist.json");
        let err = load_model(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModelError>(),
            Some(ModelError::Load { .. })
        ));
    }

    #[test]
    fn corrupt_artifacts_are_load_errors() {
        let garbage = write_artifact("garbage", "not json");
        let err = read_model(&garbage).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModelError>(),
            Some(ModelError::Load { .. })
        ));
        std::fs::remove_file(garbage).unwrap();

        let unknown_kind = write_artifact(
            "unknown_kind",
            &json!({"kind": "forest", "trees": []}).to_string(),
        );
        assert!(read_model(&unknown_kind).is_err());
        std::fs::remove_file(unknown_kind).unwrap();

        let short = write_artifact(
            "short",
            &json!({
                "kind": "linear",
                "feature_names": ["MA7", "MA30"],
                "coefficients": [0.5],
                "intercept": 0.0,
            })
            .to_string(),
        );
        assert!(read_model(&short).is_err());
        std::fs::remove_file(short).unwrap();
    }
}
