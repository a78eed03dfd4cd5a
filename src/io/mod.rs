// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for frames, masks and settings files.

pub mod frames;
pub mod masks;
pub mod media;
pub mod serialization;
