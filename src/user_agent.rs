//! Default User-Agent string.

/// Default User-Agent sent when neither `-A` nor the config file sets one.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("hfetch/{version}")
}
