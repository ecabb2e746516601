pub mod credential;
pub mod helix;
pub mod leaderboard;
pub mod snapshot;

pub use credential::AppCredential;
pub use snapshot::{LiveDetails, StreamSnapshot};
