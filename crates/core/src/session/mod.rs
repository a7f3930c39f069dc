pub mod config;
pub mod driver;
pub mod state;

pub use config::SessionConfig;
pub use driver::Session;
pub use state::SessionState;
