// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: camera device, dataset store, pixel encoding, config.

pub mod camera;
pub mod dataset;
pub mod media;
pub mod serialization;
