use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use hp_core::{format_currency, HouseInput, Neighborhood, Result};
use hp_model::{ModelRegistry, DEFAULT_ARTIFACT};
use hp_web::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about = "House price estimation over a registry of fitted models", long_about = None)]
struct Cli {
    /// Path to the model artifact produced by the training pipeline
    #[arg(long, default_value = DEFAULT_ARTIFACT)]
    artifact: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the interactive prediction form
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: SocketAddr,
    },
    /// Estimate once from the command line
    Predict(PredictArgs),
    /// List the models in the artifact
    Models,
}

#[derive(clap::Args, Debug)]
struct PredictArgs {
    /// Model to use; defaults to the artifact's default model
    #[arg(long)]
    model: Option<String>,
    /// Building area (sqft)
    #[arg(long, default_value_t = 1500.0)]
    gr_liv_area: f64,
    /// Lot area (sqft)
    #[arg(long, default_value_t = 5000.0)]
    lot_area: f64,
    /// Basement area (sqft)
    #[arg(long, default_value_t = 1000.0)]
    total_bsmt_sf: f64,
    /// Bedrooms
    #[arg(long, default_value_t = 3)]
    bedroom_abv_gr: u32,
    /// Full bathrooms
    #[arg(long, default_value_t = 2)]
    full_bath: u32,
    /// Total rooms
    #[arg(long, default_value_t = 6)]
    tot_rms_abv_grd: u32,
    /// Overall quality, 1-10
    #[arg(long, default_value_t = 5)]
    overall_qual: u8,
    /// Overall condition, 1-10
    #[arg(long, default_value_t = 5)]
    overall_cond: u8,
    /// Kitchen quality, 1-5
    #[arg(long, default_value_t = 3)]
    kitchen_qual: u8,
    /// Garage capacity (cars)
    #[arg(long, default_value_t = 2)]
    garage_cars: u32,
    /// Garage area (sqft)
    #[arg(long, default_value_t = 400.0)]
    garage_area: f64,
    /// Neighborhood code
    #[arg(long, default_value = "Blmngtn")]
    neighborhood: Neighborhood,
}

impl PredictArgs {
    fn into_input(self) -> HouseInput {
        HouseInput {
            gr_liv_area: self.gr_liv_area,
            lot_area: self.lot_area,
            total_bsmt_sf: self.total_bsmt_sf,
            bedroom_abv_gr: self.bedroom_abv_gr,
            full_bath: self.full_bath,
            tot_rms_abv_grd: self.tot_rms_abv_grd,
            overall_qual: self.overall_qual,
            overall_cond: self.overall_cond,
            kitchen_qual: self.kitchen_qual,
            garage_cars: self.garage_cars,
            garage_area: self.garage_area,
            neighborhood: self.neighborhood,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    // The registry loads exactly once; a missing artifact is fatal before
    // anything is served.
    let registry = Arc::new(ModelRegistry::load(&cli.artifact).await?);

    match cli.command {
        Commands::Serve { listen } => {
            let app = hp_web::create_app(AppState { registry }).await;
            let listener = tokio::net::TcpListener::bind(listen).await?;
            info!("🏡 Serving the prediction form on http://{}", listen);
            axum::serve(listener, app).await?;
        }
        Commands::Predict(args) => {
            let name = args
                .model
                .clone()
                .unwrap_or_else(|| registry.default_name().to_string());
            let predictor = registry.get(&name)?;
            let input = args.into_input();
            input.validate()?;
            let estimate = predictor.predict(&input.to_record()).await?;
            println!(
                "💰 Estimated price: {} (model: {})",
                format_currency(estimate),
                name
            );
        }
        Commands::Models => {
            for name in registry.names() {
                if name == registry.default_name() {
                    println!("{} (default)", name);
                } else {
                    println!("{}", name);
                }
            }
        }
    }

    Ok(())
}
