//! Persisted key layout

pub const ACCESS_TOKEN: &str = "access_token";
pub const REFRESH_TOKEN: &str = "refresh_token";
pub const USER_PROFILE: &str = "user_profile";
pub const HISTORY_LOG: &str = "user_history_logs";

/// Session keys, cleared together on logout
pub const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN, REFRESH_TOKEN, USER_PROFILE];

/// Key of the row set belonging to a dataset
pub fn rows_key(dataset_id: i64) -> String {
    format!("rows_{}", dataset_id)
}
