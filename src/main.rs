use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use unique_phone::candidate_generator::RandomCandidateGenerator;
use unique_phone::carrier::classify;
use unique_phone::config::{Cli, Command};
use unique_phone::metrics::IssuerMetrics;
use unique_phone::server::{self, AppState, SharedGenerator, SharedIssuer};
use unique_phone::NumberIssuer;

fn open_issuer(cli: &Cli) -> Result<(SharedIssuer, IssuerMetrics), Box<dyn Error>> {
    let metrics = IssuerMetrics::new()?;
    let generator: SharedGenerator = Box::new(RandomCandidateGenerator::new());
    let issuer = NumberIssuer::with_generator(cli.open_store()?, generator).with_metrics(metrics.clone());
    Ok((Arc::new(issuer), metrics))
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Classify { phone } => println!("{}", classify(phone)),
        Command::Serve { bind } => {
            let (issuer, metrics) = open_issuer(&cli)?;
            server::run(bind, AppState { issuer, metrics }).await?;
        }
        Command::Issue => {
            let (issuer, _) = open_issuer(&cli)?;
            let phone = issuer.issue()?;
            println!("{}\t{}", phone, classify(&phone));
        }
        Command::Record { phone } => {
            let (issuer, _) = open_issuer(&cli)?;
            if issuer.record_used(phone)? {
                println!("recorded");
            } else {
                println!("already used");
            }
        }
        Command::Dedup => {
            let (issuer, _) = open_issuer(&cli)?;
            println!("removed {} duplicate(s)", issuer.dedup()?);
        }
    }

    Ok(())
}
