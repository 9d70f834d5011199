//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep outer layers (HTTP/CLI) decoupled from storage details.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - The caller's authenticated user id is threaded through every
//!   operation; services never widen access beyond that owner.

pub mod board_service;
pub mod status_service;
pub mod task_service;
