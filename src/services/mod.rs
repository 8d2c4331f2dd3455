// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod identity;
pub mod ids;
pub mod links;

pub use identity::IdentityService;
pub use links::TrainerLinkService;
