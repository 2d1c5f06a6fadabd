//! Fetch orders from a Magento shop
//!
//! ```text
//! MAGENTO_API_KEY=... cargo run --example fetch_orders -- \
//!     --config magento.yaml --start 2024-01-01 --end 2024-01-31
//! ```

use chrono::NaiveDate;
use clap::Parser;
use magento_connector::{load_config, DateRange, MagentoConnector};
use std::path::PathBuf;

/// Fetch orders created within a date range
#[derive(Parser, Debug)]
#[command(name = "fetch_orders", version)]
struct Args {
    /// Path to the connector configuration YAML
    #[arg(short, long)]
    config: PathBuf,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,

    /// Last day of the range, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end: NaiveDate,

    /// Print orders as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> magento_connector::Result<()> {
    let config = load_config(&args.config)?;
    let range = DateRange::new(args.start, args.end)?;

    let connector = MagentoConnector::from_config(&config).await?;
    let orders = connector.get_orders(&range).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&orders)
            .map_err(|e| magento_connector::Error::decode(e.to_string()))?;
        println!("{json}");
        return Ok(());
    }

    for order in &orders {
        println!(
            "{}  {}  {:<30}  {} line(s)  {:.2}",
            order.increment_id,
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.customer.email,
            order.lines.len(),
            order.total_with_tax()
        );
    }
    println!("{} order(s) in {}", orders.len(), range);

    Ok(())
}
