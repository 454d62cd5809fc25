//! Storefront CLI — variant inspection, site config refresh, and catalogue patching.
//!
//! Operates on the variant catalogue shared by every white-label storefront
//! skin and the tenant's remote site configuration.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
