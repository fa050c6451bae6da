pub mod browser;
pub mod details;
pub mod favorites;
pub mod filter;
mod generation;
pub mod screen_error;
pub mod search;

pub use generation::Generation;
pub use screen_error::ScreenError;
