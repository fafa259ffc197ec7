//! Meme Sniper - pump.fun launch scanner
//!
//! Scores new memecoin listings over a time-boxed session.

use anyhow::Result;

use meme_sniper::adapters::cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (PUMPFUN_API_URL may live there)
    dotenvy::dotenv().ok();

    let app = cli::init();
    cli::execute(app).await
}
