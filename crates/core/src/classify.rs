//! Response-status classification
//!
//! A closed table, not a heuristic: a status is retryable or a redirect
//! only if it appears below, and everything else counts as success. The
//! success default is deliberately optimistic; unlisted 4xx codes resolve
//! the operation rather than failing it. Transport failures never reach
//! this table; they terminate the operation directly.

/// Statuses worth re-attempting; 0 stands in for "no response delivered"
const RETRYABLE: [u16; 11] = [0, 400, 401, 403, 404, 409, 411, 412, 416, 500, 503];

/// Statuses whose `Location` header points at the real target
const REDIRECT: [u16; 5] = [300, 301, 303, 304, 307];

/// What the controller should do with a delivered response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Resolve the operation with this response
    Success,
    /// Re-attempt against the same target, spending retry budget
    Retry,
    /// Re-attempt against the target named by the `Location` header
    Redirect,
}

/// Classify a delivered HTTP status code
pub fn classify(status: u16) -> Disposition {
    if RETRYABLE.contains(&status) {
        Disposition::Retry
    } else if REDIRECT.contains(&status) {
        Disposition::Redirect
    } else {
        Disposition::Success
    }
}
