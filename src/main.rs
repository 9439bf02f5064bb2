use log::error;
use spotify_playlist_driver::config;
use spotify_playlist_driver::{ServiceDriver, SpotifyDriver};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let config = config::load_config().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Authenticate with Spotify
    let driver = SpotifyDriver::connect(&config).await?;

    for playlist in driver.get_user_playlists(None).await? {
        println!("{}\t{}", playlist.id, playlist.name);
    }

    Ok(())
}
