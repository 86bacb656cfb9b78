// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Hardware profiles for capacity planning
//!
//! A profile is just the two numbers the metrics engine needs (memory and
//! bandwidth) plus catalog metadata.

pub mod catalog;
pub mod profile;

pub use catalog::*;
pub use profile::*;
