pub mod config;
pub mod driver;
pub mod error;
pub mod models;
pub mod spotify;

pub use driver::ServiceDriver;
pub use error::DriverError;
pub use models::{Playlist, Track};
pub use spotify::SpotifyDriver;
