// SPDX-License-Identifier: MIT

//! Shapeshift: fitness coaching backend
//!
//! This crate provides the backend API for trainees logging body weight
//! and workouts, and for trainers following the progress of trainees
//! linked to them via invite codes.

pub mod access;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{IdentityService, TrainerLinkService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub identity: IdentityService,
    pub links: TrainerLinkService,
}
