// ABOUTME: Security helpers shared by the auth routes and middleware
// ABOUTME: Currently cookie parsing and Set-Cookie construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cookie parsing and `Set-Cookie` header construction
pub mod cookies;
