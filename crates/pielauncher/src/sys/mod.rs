pub mod daemon;
pub mod runtime;
pub mod server;
pub mod surface;
