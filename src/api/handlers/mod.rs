//! API request handlers

pub mod admin;
pub mod auth;
pub mod health;
