//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Sign-in credentials (keyed by normalized email)
    pub const CREDENTIALS: &str = "credentials";
    pub const WEIGHT_LOGS: &str = "weightLogs";
    pub const WORKOUT_LOGS: &str = "workoutLogs";
}
