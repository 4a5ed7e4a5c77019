pub mod cli;
pub mod config;
mod error;
pub mod models;
pub mod services;
pub mod web;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::GalleryError;
