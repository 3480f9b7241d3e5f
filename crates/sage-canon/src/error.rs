//! Errors raised while building an RFC-9421 signature base.
//!
//! These are consistency errors (spec.md §7): the caller asked for a
//! component the message does not have, or asked for something that does
//! not make sense on a request. They are always raised, never folded into a
//! verification verdict.

use thiserror::Error;

/// The signature base could not be built from the given components.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CanonError {
    /// A requested header or `@query-param` value was not present on the
    /// message. Also returned for a multi-valued `@query-param` match, per
    /// the recommendation in spec.md §9 Open Question 1.
    #[error("covered component not found: {0}")]
    ComponentNotFound(String),
    /// `@status` was requested while building a request signature base.
    #[error("@status is not available on a request signature base")]
    StatusOnRequest,
    /// The component identifier string does not parse as a quoted token with
    /// optional `;name=value` parameters.
    #[error("malformed component identifier: {0}")]
    MalformedIdentifier(String),
}
