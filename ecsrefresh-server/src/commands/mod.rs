pub mod invoke;
pub mod server;
pub mod system;
