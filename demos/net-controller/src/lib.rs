//! A network controller that tells its protocol handlers about updates, incoming messages and
//! its own teardown, built on [`observatory::Observatory`].

pub mod config;
mod controller;
mod handler;

pub use controller::*;
pub use handler::*;
