// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: frames, masks, layers and settings.

pub mod config;
pub mod frame;
pub mod history;
pub mod mask;
pub mod session;
