//! Ceria - Dunia Hewan Ceria
//!
//! Two learning mini-games for young children in the terminal, built around a
//! single observable session store.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
