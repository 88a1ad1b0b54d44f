// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Events directory REST API contract types and validation
//!
//! This crate defines the wire types consumed by relation pickers: the
//! `{ data: [...] }` list envelope, the `{ id, name }` option shape, and the
//! query strings used to search a collection or resolve identifiers back into
//! labels. These types are shared between the REST client, the mock client,
//! and the picker view model.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;
