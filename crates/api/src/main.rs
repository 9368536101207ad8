use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use nft_predictor_core::domain::variant::Variant;
use nft_predictor_core::form::{echo_raw, FormError, FormValues};
use nft_predictor_core::i18n::Language;
use nft_predictor_core::model::Regressor;
use nft_predictor_core::predict::{predict, PredictionResult};

mod page;

use page::Outcome;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = nft_predictor_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    // Without both models there is nothing to serve.
    let models = Models::load(&settings).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "model load failed; refusing to start");
        e
    })?;

    let state = AppState {
        models: Arc::new(models),
        default_language: settings.default_language,
    };

    let app = router(state).layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(index))
        .route("/:variant", get(show_form).post(submit_form))
        .route("/api/:variant/predict", post(predict_json))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn index() -> Redirect {
    Redirect::to(&format!("/{}", Variant::NftPrice.key()))
}

#[derive(Debug)]
struct Models {
    nft_price: Arc<dyn Regressor>,
    floor_price: Arc<dyn Regressor>,
}

impl Models {
    fn load(settings: &nft_predictor_core::config::Settings) -> anyhow::Result<Self> {
        nft_predictor_core::i18n::validate_all()?;

        let load = |variant: Variant| -> anyhow::Result<Arc<dyn Regressor>> {
            let path = settings.model_path(variant);
            let model = nft_predictor_core::model::load_model(path)
                .with_context(|| format!("loading {variant} model"))?;
            nft_predictor_core::model::ensure_schema(model.as_ref(), variant)
                .with_context(|| format!("{variant} model at {}", path.display()))?;
            Ok(model)
        };

        Ok(Self {
            nft_price: load(Variant::NftPrice)?,
            floor_price: load(Variant::FloorPrice)?,
        })
    }

    fn get(&self, variant: Variant) -> &dyn Regressor {
        match variant {
            Variant::NftPrice => self.nft_price.as_ref(),
            Variant::FloorPrice => self.floor_price.as_ref(),
        }
    }
}

#[derive(Debug, Clone)]
struct AppState {
    models: Arc<Models>,
    default_language: Language,
}

impl AppState {
    fn language(&self, key: Option<&str>) -> Result<Language, StatusCode> {
        match key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(k) => Language::from_key(k).map_err(|_| StatusCode::BAD_REQUEST),
            None => Ok(self.default_language),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    lang: Option<String>,
}

fn parse_variant(key: &str) -> Result<Variant, StatusCode> {
    Variant::from_key(key).map_err(|_| StatusCode::NOT_FOUND)
}

async fn show_form(
    State(state): State<AppState>,
    Path(variant): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, StatusCode> {
    let variant = parse_variant(&variant)?;
    let language = state.language(query.lang.as_deref())?;

    Ok(Html(page::render(
        variant,
        language,
        &FormValues::defaults(variant).display(),
        None,
    )))
}

async fn submit_form(
    State(state): State<AppState>,
    Path(variant): Path<String>,
    Query(query): Query<PageQuery>,
    Form(raw): Form<HashMap<String, String>>,
) -> Result<(StatusCode, Html<String>), StatusCode> {
    let variant = parse_variant(&variant)?;
    let language = state.language(query.lang.as_deref())?;

    let values = match FormValues::parse(variant, &raw) {
        Ok(values) => values,
        Err(e) => {
            tracing::info!(%variant, error = %e, "rejected form input");
            let html = page::render(
                variant,
                language,
                &echo_raw(variant, &raw),
                Some(&Outcome::InputError(e.to_string())),
            );
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)));
        }
    };

    let result = predict(state.models.get(variant), language, &values).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(%variant, error = %e, "prediction failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let html = page::render(
        variant,
        language,
        &values.display(),
        Some(&Outcome::Success(result.message)),
    );
    Ok((StatusCode::OK, Html(html)))
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    language: Option<Language>,
    #[serde(default)]
    features: HashMap<String, f64>,
}

#[derive(Debug, Serialize)]
struct ApiPrediction {
    prediction_id: Uuid,
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    result: PredictionResult,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.to_string() })))
}

async fn predict_json(
    State(state): State<AppState>,
    Path(variant): Path<String>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<ApiPrediction>, ApiError> {
    let variant = Variant::from_key(&variant).map_err(|e| api_error(StatusCode::NOT_FOUND, e))?;
    let language = req.language.unwrap_or(state.default_language);

    let values = FormValues::from_numbers(variant, &req.features)
        .map_err(|e: FormError| api_error(StatusCode::UNPROCESSABLE_ENTITY, e))?;

    let result = predict(state.models.get(variant), language, &values).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(%variant, error = %e, "prediction failed");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
    })?;

    let prediction_id = Uuid::new_v4();
    tracing::info!(%prediction_id, %variant, %language, value = result.value, "prediction served");

    Ok(Json(ApiPrediction {
        prediction_id,
        generated_at: Utc::now(),
        result,
    }))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &nft_predictor_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
