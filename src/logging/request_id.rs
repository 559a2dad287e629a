//! Correlation IDs for system checks

use uuid::Uuid;

/// Generate a new request ID using UUID v4
///
/// Attached to a [`SystemHealth`](crate::system::SystemHealth) snapshot so that
/// log lines and reports from the same check can be matched up.
///
/// # Examples
///
/// ```
/// use healthguard::logging::generate_request_id;
///
/// let request_id = generate_request_id();
/// assert!(!request_id.is_empty());
/// ```
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}
