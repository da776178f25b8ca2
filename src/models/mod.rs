// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for capture sessions.

pub mod config;
pub mod label;
pub mod record;
