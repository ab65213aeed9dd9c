// Server module entry point
// Listener binding, connection handling, accept loop and shutdown signals

pub mod connection;
pub mod listener;
pub mod serve;
pub mod signal;

// Re-export commonly used items
pub use listener::bind_listener;
pub use serve::serve;
pub use signal::shutdown_signal;
