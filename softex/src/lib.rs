//! Softex: lane controller and stream fabric of a softmax accelerator.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![allow(clippy::type_complexity)]

pub mod analysis;
pub mod bench;
pub mod config;
pub mod constants;
pub mod controller;
mod error;
pub mod types;

pub use error::Error;
