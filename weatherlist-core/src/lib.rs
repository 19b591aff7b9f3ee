//! Core library for the `weatherlist` app.
//!
//! This crate defines:
//! - The city list controller and its persistence
//! - Abstraction over weather lookup providers
//! - Configuration & credentials handling
//!
//! It is used by `weatherlist-cli`, but any front end can drive a [`WeatherList`].

pub mod config;
pub mod error;
pub mod list;
pub mod model;
pub mod provider;
pub mod storage;

pub use config::{Config, ProviderConfig};
pub use error::{ListError, LookupError};
pub use list::{STORAGE_KEY, WeatherList};
pub use model::{CityWeather, WeatherEntry};
pub use provider::{ProviderId, WeatherLookup};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
