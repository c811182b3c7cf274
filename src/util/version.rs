pub const APP_NAME: &str = "Cabin Bookings";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");

pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{}", APP_VERSION)
    }
}

/// User agent sent to the backing store.
pub fn user_agent() -> String {
    format!("cabin-bookings/{}", version_label().trim_start_matches(['v', 'V']))
}
