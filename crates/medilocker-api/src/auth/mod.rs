//! Authentication module
//!
//! This module provides JWT-based authentication with the following components:
//! - Token generation and validation
//! - Password hashing with Argon2
//! - Middleware gating protected routes
//! - Authentication service orchestrating registration and login
//! - Identity model and Postgres repository

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;

pub use jwt::{generate_token, validate_token, Claims, JwtConfig};
pub use middleware::{auth_middleware, AuthenticatedUser};
pub use models::{User, UserPublic};
pub use password::{hash_password, verify_password};
pub use repository::{normalize_email, RepositoryError, UserRepository};
pub use service::{
    AuthResponse, AuthService, LoginRequest, RegisterRequest, UpdateProfileRequest,
};
