//! Board use-case services.
//!
//! # Responsibility
//! - Own the live board and orchestrate transitions with persistence.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod board_service;
