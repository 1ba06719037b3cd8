//! Route handlers organized by resource

pub mod api;
pub mod health;
pub mod pages;
