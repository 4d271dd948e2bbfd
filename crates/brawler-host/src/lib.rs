pub mod autopilot;
pub mod config;
pub mod error;
pub mod session;

pub use config::HostConfig;
pub use error::HostError;
pub use session::{
    SessionBroadcast, SessionCommand, SessionHandle, follow_session, spawn_session,
};
