//! Identity resolution error types.

/// Errors surfaced by the identity resolver.
///
/// Transport, backend and decode failures inside individual strategies never
/// reach this type; they degrade to "no result" and the chain moves on.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdentityError {
    /// No strategy produced a vendor id
    #[error("could not resolve vendor id")]
    Unresolved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_error_display() {
        assert_eq!(
            IdentityError::Unresolved.to_string(),
            "could not resolve vendor id"
        );
    }
}
