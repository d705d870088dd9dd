#![doc = include_str!("../README.md")]

pub mod auth;
pub mod client;
pub mod error;
pub mod models;

pub use client::Px6Client;
pub use error::{Px6Error, Px6Result};
