pub mod node;
mod server;
pub mod settings;

pub use server::*;
pub use settings::*;
