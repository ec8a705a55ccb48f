//! Checks the password entered on the log-in page against the dashboard password.

use subtle::ConstantTimeEq;

use crate::Error;

/// Check that `entered` equals `expected`.
///
/// The comparison takes the same time for every password of a given length
/// so the response time does not reveal how many leading characters match.
///
/// # Errors
/// Returns [Error::InvalidCredentials] if the passwords differ.
pub fn verify_password(expected: &str, entered: &str) -> Result<(), Error> {
    if bool::from(expected.as_bytes().ct_eq(entered.as_bytes())) {
        Ok(())
    } else {
        Err(Error::InvalidCredentials)
    }
}
