#![doc = include_str!("../README.md")]

pub mod account;
pub(crate) mod de;
pub mod models;
pub mod pricing;
pub mod proxy;
