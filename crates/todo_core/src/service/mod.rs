//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into screen-level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod todo_service;
