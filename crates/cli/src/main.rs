use anyhow::Context;
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nft_predictor_core::config::Settings;
use nft_predictor_core::domain::variant::Variant;
use nft_predictor_core::form::FormValues;
use nft_predictor_core::i18n::Language;

#[derive(Debug, Parser)]
#[command(name = "nft_predictor_cli")]
struct Args {
    /// Model to run: nft-price or floor-price.
    #[arg(long, default_value = "nft-price")]
    variant: String,

    /// Display language (en or id). Defaults to DEFAULT_LANGUAGE.
    #[arg(long)]
    lang: Option<String>,

    /// Model artifact path. Overrides the per-variant path from the environment.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Print the whole result as JSON.
    #[arg(long)]
    json: bool,

    /// Feature values as NAME=VALUE (e.g. MA7=1000 MA30=900). Omitted features are 0.
    values: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    match run(&args, &settings) {
        Ok(out) => {
            println!("{out}");
            Ok(())
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "prediction failed");
            Err(err)
        }
    }
}

fn run(args: &Args, settings: &Settings) -> anyhow::Result<String> {
    let variant = Variant::from_key(&args.variant)?;
    let language = match args.lang.as_deref() {
        Some(key) => Language::from_key(key)?,
        None => settings.default_language,
    };

    let raw = parse_assignments(&args.values)?;
    let values = FormValues::parse(variant, &raw)?;

    let path = args
        .model
        .as_deref()
        .unwrap_or_else(|| settings.model_path(variant));
    let model = nft_predictor_core::model::load_model(path)
        .with_context(|| format!("loading {variant} model"))?;
    nft_predictor_core::model::ensure_schema(model.as_ref(), variant)?;

    let result = nft_predictor_core::predict::predict(model.as_ref(), language, &values)?;

    if args.json {
        return Ok(serde_json::to_string_pretty(&result)?);
    }
    Ok(result.message)
}

fn parse_assignments(items: &[String]) -> anyhow::Result<HashMap<String, String>> {
    let mut out = HashMap::with_capacity(items.len());
    for item in items {
        let (name, value) = item
            .split_once('=')
            .with_context(|| format!("expected NAME=VALUE (got {item:?})"))?;
        let name = name.trim();
        anyhow::ensure!(!name.is_empty(), "feature name must be non-empty in {item:?}");
        anyhow::ensure!(
            out.insert(name.to_string(), value.trim().to_string()).is_none(),
            "duplicate feature: {name}"
        );
    }
    Ok(out)
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
