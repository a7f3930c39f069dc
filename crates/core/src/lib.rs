pub mod audio;
pub mod progress;
pub mod recognition;
pub mod session;
pub mod shared;
