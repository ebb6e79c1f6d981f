//! Basic usage: authorize, discover nearby profiles and like the first one.
//!
//! Run with:
//! ```sh
//! FACEBOOK_TOKEN=... cargo run -p mint-api --example basic --features trace
//! ```

use mint_api::{Client, Error};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "trace")]
    mint_api::observability::init_tracing();

    let facebook_token = std::env::var("FACEBOOK_TOKEN")?;
    let client = Client::from_env()?;

    let auth = client.oauth().authorize(&facebook_token).await?;
    println!("Authorized as {}", auth.user_id);

    let profiles = match client.profiles().recommendations(52.52, 13.40).await {
        Ok(profiles) => profiles,
        Err(Error::CircuitOpen) => {
            eprintln!("Backend is degraded, try again later");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    println!("{} recommendations", profiles.len());

    if let Some(profile) = profiles.first() {
        client.favorites().like(&profile.id).await?;
        client
            .chats()
            .send_message(&profile.id, None, "Hi there!")
            .await?;
        println!("Liked and messaged {}", profile.id);
    }

    let stats = client.circuit_breaker().stats();
    println!(
        "Breaker {}: {} ok, {} failed",
        stats.state, stats.successes, stats.failures
    );

    Ok(())
}
