#![doc = include_str!("../README.md")]

mod api;
pub use api::start_provider_mock;

pub mod documents;
