// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview window rendering for the ROICAP application.

pub mod overlay;
