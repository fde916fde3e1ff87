//! API handlers

pub mod activities;
pub mod auth;
pub mod health;
pub mod profile;
