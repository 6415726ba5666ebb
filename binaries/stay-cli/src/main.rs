//! Stay CLI
//!
//! ```bash
//! stay serve                      # web UI on the configured address
//! stay serve --port 8080
//! stay routes
//! stay predict --type apartment --address "서울특별시 강남구 테헤란로" \
//!     --bedrooms 2 --bathrooms 1 --guests 4 --amenity wifi --amenity kitchen
//! stay config
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use stay_config::StayConfig;
use stay_core::{format_delta, format_won, Amenity, PropertyType};
use stay_handoff::{FileHandoff, HandoffStore, MemoryHandoff};
use stay_predict::{LoadingTiming, MockPredictor, Predictor, ResultViewer, ViewerPhase};
use stay_web::{serve, AppState};
use stay_wizard::IntakeWizard;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stay")]
#[command(about = "Short-term rental price predictor")]
#[command(version)]
struct Cli {
    /// Configuration file (overrides STAY_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web UI
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the web route table
    Routes,

    /// Run the wizard and result pipeline headlessly
    Predict {
        /// Property type (apartment, house, condo, studio, villa)
        #[arg(long = "type")]
        property_type: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        bedrooms: u32,

        #[arg(long)]
        bathrooms: u32,

        #[arg(long)]
        guests: u32,

        /// Amenity id, repeatable
        #[arg(long = "amenity")]
        amenities: Vec<String>,

        /// Hand off through this file instead of memory
        #[arg(long)]
        handoff: Option<PathBuf>,

        /// Hand off through the slot file in the user data directory
        #[arg(long, conflicts_with = "handoff")]
        persist: bool,

        /// Seed the predictor for repeatable output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = StayConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Serve { host, port } => cmd_serve(config, host, port).await,
        Commands::Routes => {
            stay_web::routes::print_routes();
            Ok(())
        }
        Commands::Predict {
            property_type,
            address,
            bedrooms,
            bathrooms,
            guests,
            amenities,
            handoff,
            persist,
            seed,
        } => {
            let input = PredictInput {
                property_type,
                address,
                bedrooms,
                bathrooms,
                guests,
                amenities,
            };
            let store = handoff_store(handoff.or_else(|| config.handoff.path.clone()), persist)?;
            cmd_predict(config, input, store, seed).await
        }
        Commands::Config => cmd_config(&config),
    }
}

async fn cmd_serve(mut config: StayConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let addr = config.server.bind_addr();

    println!("\n  AirPrice Insight v{}", env!("CARGO_PKG_VERSION"));
    stay_web::routes::print_routes();
    println!("  Server ready at http://{}\n", addr);

    info!(%addr, "starting web server");
    let state = Arc::new(AppState::new(config));
    serve(state, &addr)
        .await
        .with_context(|| format!("web server on {} failed", addr))
}

struct PredictInput {
    property_type: String,
    address: String,
    bedrooms: u32,
    bathrooms: u32,
    guests: u32,
    amenities: Vec<String>,
}

/// File slot at `path`, the default slot file when `persist`, else memory.
fn handoff_store(path: Option<PathBuf>, persist: bool) -> Result<Box<dyn HandoffStore>> {
    let store: Box<dyn HandoffStore> = match path {
        Some(path) => {
            info!(path = %path.display(), "handing off through file");
            Box::new(FileHandoff::at_path(path))
        }
        None if persist => {
            let store = FileHandoff::default_location()
                .context("failed to prepare the default handoff file")?;
            info!(path = %store.path().display(), "handing off through default file");
            Box::new(store)
        }
        None => Box::new(MemoryHandoff::new()),
    };
    Ok(store)
}

async fn cmd_predict(
    config: StayConfig,
    input: PredictInput,
    store: Box<dyn HandoffStore>,
    seed: Option<u64>,
) -> Result<()> {
    let mut wizard = IntakeWizard::starting_at(config.location.fallback());

    wizard.set_property_type(PropertyType::from_str(&input.property_type)?);
    wizard.set_address(input.address);
    wizard.advance().context("basic info incomplete")?;

    wizard.set_bedroom_count(input.bedrooms)?;
    wizard.set_bathroom_count(input.bathrooms)?;
    wizard.set_max_guests(input.guests)?;
    wizard.advance().context("capacity incomplete")?;

    for id in &input.amenities {
        wizard.toggle_amenity(Amenity::from_str(id)?);
    }

    let draft = wizard.submit(store.as_ref())?;
    info!(address = %draft.address, seeded = seed.is_some(), "draft submitted");
    println!("\n  {} · {}", draft.property_type.map(|t| t.label()).unwrap_or("-"), draft.address);

    let predictor: Arc<dyn Predictor> = match seed {
        Some(seed) => Arc::new(MockPredictor::seeded(seed)),
        None => Arc::new(MockPredictor::new()),
    };
    let viewer = ResultViewer::open(
        store.as_ref(),
        predictor,
        LoadingTiming::from_config(&config.loading),
    );

    let mut phase = viewer.subscribe();
    loop {
        let current = phase.borrow_and_update().clone();
        match current {
            ViewerPhase::Pending => bail!("handoff data could not be read back"),
            ViewerPhase::Loading { stage, progress } => {
                println!("  [{:>3}%] {}", progress, stage.message());
            }
            ViewerPhase::Ready(_) => break,
        }
        if phase.changed().await.is_err() {
            break;
        }
    }

    let analysis = viewer
        .wait_ready()
        .await
        .context("analysis did not complete")?;
    let prediction = &analysis.prediction;
    info!(
        price = prediction.predicted_price,
        comparables = analysis.comparables.len(),
        "analysis ready"
    );

    println!("\n  AI 가격 예측 결과");
    println!("  ================\n");
    println!("  예측 가격 (1박 기준): {}", format_won(prediction.predicted_price));
    println!("  신뢰도: {}%", prediction.confidence);
    println!(
        "  가격 범위: {} ~ {}",
        format_won(prediction.price_range.min),
        format_won(prediction.price_range.max)
    );

    println!("\n  주요 가격 요인");
    for factor in &prediction.factors {
        println!("    {:>5}  {} - {}", factor.impact_label, factor.name, factor.description);
    }

    println!("\n  추천 가격 전략");
    println!("    최저 권장가    {}", format_won(prediction.discount_price()));
    println!("    추천           {}", format_won(prediction.predicted_price));
    println!("    프리미엄 가격  {}", format_won(prediction.premium_price()));

    println!("\n  유사 매물 비교");
    for listing in &analysis.comparables {
        println!(
            "    {}  {}  ⭐ {}  {}km  (예측가 대비 {})",
            listing.name,
            format_won(listing.price),
            listing.rating,
            listing.distance_km,
            format_delta(prediction.delta_for(listing))
        );
    }
    println!();

    Ok(())
}

fn cmd_config(config: &StayConfig) -> Result<()> {
    if let Some(path) = stay_config::default_path() {
        println!("# default location: {}", path.display());
    }
    print!("{}", config.to_yaml()?);
    Ok(())
}
