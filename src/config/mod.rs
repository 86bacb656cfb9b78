// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Configuration module for vramplan
//!
//! Settings (JSON) and plan files (TOML). Input validation happens here,
//! before anything reaches the metrics engine.

pub mod plan;
pub mod settings;

pub use plan::*;
pub use settings::*;
