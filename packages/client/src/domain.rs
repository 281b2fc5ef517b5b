//! Reconnection policy.

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `current_attempt` - Number of failed attempts so far
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(current_attempt: u32, max_attempts: u32) -> bool {
    current_attempt < max_attempts
}
