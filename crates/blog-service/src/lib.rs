//! # blog-service
//!
//! Application layer containing business logic, services, and DTOs.
//!
//! Services are thin orchestration over the store traits from `blog-core`:
//! validation, existence checks, and structured logging live here; atomicity
//! lives in the stores.

pub mod dto;
pub mod services;

pub use services::{
    AuthGuardService, PostService, ReactionService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, UserService,
};
