// ABOUTME: Core types for the workout diary API
// ABOUTME: Foundation crate with errors, documents, models, responses, and pagination
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Workout Diary Core
//!
//! Shared types for the workout diary server. Kept free of HTTP and storage
//! concerns except for the optional `http-response` and `database-errors`
//! conversions.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, and the HTTP error body
//! - **document**: the `Document` trait and map-driven field updates
//! - **models**: users, roles, catalog data, exercises, and records
//! - **responses**: `DataResponse`, `SimpleResponse`, `JwtResponse`
//! - **pagination**: offset pages with a next-page flag
//! - **time**: 30-minute slots and client date formats

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Document trait and generic field operations
pub mod document;

/// Domain models
pub mod models;

/// Offset pagination
pub mod pagination;

/// Response envelopes
pub mod responses;

/// Date and slot helpers
pub mod time;
