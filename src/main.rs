use clap::Parser;
use polyhedge::application::backfill::BackfillOptions;
use polyhedge::application::hedge::HedgeOptions;
use polyhedge::cli::commands::{Cli, Commands};
use polyhedge::config::Config;
use polyhedge::domain::values::portfolio::Portfolio;
use polyhedge::domain::values::topic::Topic;
use polyhedge::telemetry::init_logging;
use polyhedge::PolyHedge;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let ph = match PolyHedge::new(&config) {
        Ok(ph) => ph,
        Err(e) => {
            eprintln!("Error initializing polyhedge: {e}");
            std::process::exit(1);
        }
    };

    let result = run_command(ph, &config, cli.command).await;
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(ph: PolyHedge, config: &Config, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Backfill {
            max_events,
            page_size,
            window_days,
            no_prices,
            full,
        } => {
            let options = BackfillOptions {
                max_events,
                page_size,
                price_window_days: window_days,
                skip_prices: no_prices,
                incremental: !full,
                request_delay: config.request_delay,
                ..Default::default()
            };
            let report = ph.backfill(&options).await?;
            print_json(&report)?;
        }
        Commands::Classify { text } => {
            print_json(&ph.classify(&text))?;
        }
        Commands::Match { text, min_confidence } => {
            let matches = ph.match_text(&text, min_confidence)?;
            print_json(&matches)?;
        }
        Commands::Correlate { ticker, topic } => {
            let topic = topic
                .map(|t| t.parse::<Topic>())
                .transpose()
                .map_err(|e: String| e)?;
            let insights = ph.correlate(&ticker, topic)?;
            print_json(&insights)?;
        }
        Commands::Hedge {
            portfolio: path,
            max,
            event_limit,
            refine,
        } => {
            let data = std::fs::read_to_string(&path)
                .map_err(|e| format!("Reading portfolio {path}: {e}"))?;
            let portfolio: Portfolio = serde_json::from_str(&data)
                .map_err(|e| format!("Invalid portfolio JSON in {path}: {e}"))?;
            let options = HedgeOptions {
                max_recommendations: max,
                event_limit,
                refine_candidates: refine,
                ..Default::default()
            };
            let report = ph.hedge(portfolio, &options).await?;
            print_json(&report)?;
        }
        Commands::Quote { tickers } => {
            let quotes = ph.quote(&tickers).await?;
            print_json(&quotes)?;
        }
        Commands::Stats => {
            print_json(&ph.stats()?)?;
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
