// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod logs;
pub mod user;

pub use logs::{Exercise, WeightEntry, WorkoutEntry};
pub use user::{Credential, Profile, UserRole};
