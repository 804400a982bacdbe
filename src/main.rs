use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use matchbook::config::Settings;
use matchbook::generator::OrderFlowGenerator;
use matchbook::{OrderBook, csv};

#[derive(Parser, Debug)]
#[command(name = "matchbook", about = "single-instrument price-time priority matching engine")]
struct Args {
    /// CSV file of orders to process.
    input_file: PathBuf,
    /// Generate this many synthetic orders into the input file first.
    #[arg(long, value_name = "NUM_ORDERS")]
    generate: Option<usize>,
    /// Optional settings file.
    #[arg(long)]
    config: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() { 1 } else { 0 };
            std::process::exit(code);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    if let Some(count) = args.generate {
        let mut generator = OrderFlowGenerator::new(settings.generator.clone());
        let orders = generator.generate(count, (0, settings.generator.window_ns));
        csv::write_orders(&args.input_file, &orders)?;
        println!("generated {count} orders in {}", args.input_file.display());
    }

    let orders = csv::read_orders(&args.input_file)?;
    info!(count = orders.len(), file = %args.input_file.display(), "orders loaded");

    let mut book = OrderBook::new();
    let started = Instant::now();
    for order in &orders {
        book.insert(*order);
    }
    let elapsed = started.elapsed();

    println!();
    println!("order book statistics");
    println!("---------------------");
    println!("total orders processed: {}", orders.len());
    println!("processing time: {} us", elapsed.as_micros());
    println!(
        "average latency per order: {} ns",
        book.average_execution_latency().as_nanos()
    );
    println!("matched pairings: {}", book.matched_orders());
    println!("current spread: {}", book.spread());
    println!("best bid: {}", book.best_bid());
    println!("best ask: {}", book.best_ask());
    println!("total bid volume: {}", book.bid_volume());
    println!("total ask volume: {}", book.ask_volume());

    let export_path = PathBuf::from(&settings.book_export_path);
    csv::write_book(&export_path, &book)?;
    println!();
    println!("order book state exported to {}", export_path.display());
    Ok(())
}
