#[path = "../common/mod.rs"]
mod common;

mod crud;
mod persistence;
mod properties;
mod query;
mod take;
