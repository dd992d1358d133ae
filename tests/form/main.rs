#[path = "../common/mod.rs"]
mod common;

mod config;
mod lifecycle;
mod persistence;
mod registry;
mod routing;
mod validation;
