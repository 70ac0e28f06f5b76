//! HTTP Routes
//!
//! Route handlers organized by functionality.

pub mod health;
pub mod navigation;
pub mod pages;
pub mod session;
