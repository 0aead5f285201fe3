// SPDX-License-Identifier: MIT

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// Per-subject generation history (keyed by subject id)
    pub const USER_HISTORY: &str = "user_history";
}
