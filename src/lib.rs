//! Teamboard API Library
//!
//! Team and project management behind a GraphQL endpoint: users register
//! and sign in with JWT sessions, Admins manage teams and projects, and team
//! members track project status.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;
