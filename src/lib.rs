// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Sprint absence sync: Teams calendar absences into Azure DevOps capacity
//!
//! This crate reads out-of-office appointments from a Microsoft Teams
//! channel calendar and writes them into the capacity of an Azure DevOps
//! sprint, replacing the manual "capacity per day = 0" step of sprint
//! planning.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

pub use config::Config;
pub use error::SyncError;
pub use services::{SyncPipeline, SyncReport};
