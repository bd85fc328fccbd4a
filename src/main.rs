use clap::Parser;
use ip_geo_lookup::config::{watch_ticks, Config, TICK_MSEC};
use ip_geo_lookup::output::{print_csv, print_rows};
use ip_geo_lookup::{build_cache, parse_input_lines, read_inputs_file, run_lookups};
use std::error::Error;
use std::time::Duration;

/// Look up country, flag and local time of IPv4 addresses.
///
/// Examples:
///   ip-geo-lookup 8.8.8.8 1.1.1.1
///   ip-geo-lookup --file addresses.txt --csv
///   cat addresses.txt | ip-geo-lookup --watch 30
#[derive(Parser, Debug)]
#[command(name = "ip-geo-lookup", version, about, long_about = None)]
struct Cli {
    /// Addresses to look up. Read from --file or stdin when empty.
    ips: Vec<String>,

    /// File with one address per line.
    #[arg(long, short = 'f')]
    file: Option<String>,

    /// Print CSV instead of the terminal table.
    #[arg(long)]
    csv: bool,

    /// Keep refreshing local times for this many seconds.
    #[arg(long, value_name = "SECONDS")]
    watch: Option<u64>,

    /// Load and save looked up addresses in this JSON file.
    #[arg(long)]
    cache_file: Option<String>,

    /// log4rs configuration file.
    #[arg(long, default_value = "log4rs.yml")]
    log_config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    let cli = Cli::parse();
    if let Err(e) = log4rs::init_file(&cli.log_config, Default::default()) {
        eprintln!("Logging disabled, could not load {}: {e}", cli.log_config);
    }
    dotenv::dotenv().ok();
    log::info!("#Start main()");

    let mut config = Config::from_env()?;
    if cli.cache_file.is_some() {
        config.cache_file = cli.cache_file.clone();
    }

    let inputs = if !cli.ips.is_empty() {
        cli.ips.clone()
    } else if let Some(file) = &cli.file {
        read_inputs_file(file)?
    } else {
        parse_input_lines(&std::io::read_to_string(std::io::stdin())?)
    };

    let cache = build_cache(&config)?;
    let list = run_lookups(inputs, &cache, config.cache_file.as_deref()).await?;

    if cli.csv {
        print_csv(list.rows(), chrono::Utc::now());
        return Ok(());
    }

    print_rows(list.rows(), chrono::Utc::now());
    if let Some(seconds) = cli.watch {
        let mut ticker = tokio::time::interval(Duration::from_millis(TICK_MSEC));
        ticker.tick().await;
        for _ in 0..watch_ticks(seconds) {
            ticker.tick().await;
            // clear screen and home cursor
            print!("\x1B[2J\x1B[H");
            print_rows(list.rows(), chrono::Utc::now());
        }
    }

    Ok(())
}
