// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - remote clients, merge engine and pipeline.

pub mod devops;
pub mod graph;
pub mod http;
pub mod identity;
pub mod merge;
pub mod sync;

pub use devops::DevOpsClient;
pub use graph::GraphClient;
pub use identity::{AccessToken, IdentityClient};
pub use merge::{merge_absences, MergeOutcome, MergePolicy, MergeScope};
pub use sync::{SyncPipeline, SyncReport};
