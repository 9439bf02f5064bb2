pub mod api;
pub mod auth;
pub mod client;
pub mod data;
pub mod driver;
pub mod error;
pub mod mapper;

pub use api::SpotifyApi;
pub use client::SpotifyClient;
pub use driver::{SpotifyDriver, SERVICE_NAME};
pub use error::SpotifyError;
pub use mapper::SpotifyMapper;
