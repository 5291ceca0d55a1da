#![deny(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::complexity)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::perf)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![doc = include_str!("../../README.md")]

pub mod batch;
pub mod images;
pub mod metashape;
pub mod reconstruct;
pub mod sdk;
pub mod settings;
pub mod stats;

mod error;

#[cfg(test)]
mod test;

pub use error::Error;
