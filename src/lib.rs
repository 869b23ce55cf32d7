pub mod bot;
mod errors;
pub mod utils;

pub use bot::*;
pub use errors::*;
