// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the sync pipeline.

pub mod absence;
pub mod appointment;
pub mod capacity;
pub mod sprint;

pub use absence::AbsenceInterval;
pub use appointment::Appointment;
pub use capacity::{ActivityCapacity, CapacityItem, CapacityPlan, CapacityRecord, ABSENCE_ACTIVITY};
pub use sprint::Sprint;
