use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use carbook::{
    cli::{Cli, Commands},
    config::Config,
    database::{CarStore, SupabaseClient},
    models::{CarRecord, Owner},
    tui,
    vpic::{VinError, VinLookup, VpicClient},
};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: could not read .env: {}", e);
        }
    }

    let cli = Cli::parse();
    let config = Config::from_env()?;

    // The TUI owns the terminal, so it only logs to the file
    let interactive = matches!(cli.command, Commands::Tui { .. });
    init_logging(&config, !interactive);

    if let Err(e) = run(cli.command, &config).await {
        error!("Command failed: {:#}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("carbook=info"))
}

/// Log to the configured file, and to stderr for one-shot commands
fn init_logging(config: &Config, to_stderr: bool) {
    let directory = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ".".into());
    let file_name = config
        .log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "carbook.log".into());
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(default_filter())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(default_filter()),
        )
        .init();
}

async fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Decode { vin } => {
            let client = VpicClient::new(config)?;
            let vin = vin.to_uppercase();

            let vehicle = client.decode(&vin).await.map_err(|e| {
                if !matches!(e, VinError::Invalid(_)) {
                    warn!("VIN decode failed: {}", e.cause());
                }
                e
            })?;

            println!("VIN: {}", vin);
            for (label, value) in vehicle.attributes() {
                println!("{:<18}{}", label, value.unwrap_or(""));
            }
        }

        Commands::Owners => {
            let store = store(config)?;
            let owners = store.list_owners().await?;
            print_owners(&owners);
        }

        Commands::Add { year, make, model, vin, owner } => {
            let car = Commands::new_car(&year, &make, &model, &vin, &owner)?;
            let store = store(config)?;
            store.insert_car(&car).await?;
            info!("Car added: {} {} {} ({})", car.year, car.make, car.model, car.vin);
            println!("Car added");
        }

        Commands::Find { make, model, year } => {
            let search = Commands::car_search(make.as_deref(), model.as_deref(), year.as_deref())?;
            let store = store(config)?;
            let cars = store.search_cars(&search).await?;
            print_cars(&cars);
        }

        Commands::Tui { screen } => {
            info!("Launching TUI interface");
            tui::run_tui(config, screen).await?;
            info!("TUI exited successfully");
        }
    }

    Ok(())
}

fn store(config: &Config) -> Result<SupabaseClient> {
    config.validate_database()?;
    SupabaseClient::new(config).context("Failed to create database client")
}

fn print_owners(owners: &[Owner]) {
    if owners.is_empty() {
        println!("No owners found");
        return;
    }

    println!("{:<8} {:<30} {:<30} {:<20} {:<6}", "Id", "Name", "Address", "City", "State");
    println!("{}", "-".repeat(98));
    for owner in owners {
        println!(
            "{:<8} {:<30} {:<30} {:<20} {:<6}",
            owner.id.to_string(),
            owner.display_name(),
            owner.address.as_deref().unwrap_or(""),
            owner.city.as_deref().unwrap_or(""),
            owner.state.as_deref().unwrap_or(""),
        );
    }
}

fn print_cars(cars: &[CarRecord]) {
    if cars.is_empty() {
        println!("No cars found");
        return;
    }

    println!("Found {} car(s):", cars.len());
    for car in cars {
        println!();
        println!("{}", car.headline());
        println!("  VIN:     {}", car.vin.as_deref().unwrap_or(""));
        println!("  Owner:   {}", car.owner_name());
        println!("  Address: {}", car.owner_field(|o| &o.address));
        println!("  City:    {}", car.owner_field(|o| &o.city));
        println!("  State:   {}", car.owner_field(|o| &o.state));
        if let Some(added) = car.added_on() {
            println!("  Added:   {}", added);
        }
    }
}
