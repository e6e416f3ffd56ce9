//! Port for signing and decoding session claims.
//!
//! Signers check integrity only. Expiry and token kind are judged by
//! [`crate::domain::TokenService`] against its clock.

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::domain::SessionClaims;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token signing adapters.
    pub enum TokenSignerError {
        /// Structure, encoding or signature check failed.
        Malformed { message: String } => "token is malformed: {message}",
        /// Signature verified but the claims could not be accepted.
        Invalid { message: String } => "token is invalid: {message}",
        /// Claims could not be signed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenSigner: Send + Sync {
    /// Sign `claims` into a compact token.
    fn sign(&self, claims: &SessionClaims) -> Result<String, TokenSignerError>;

    /// Check the token's integrity and decode its claims.
    fn verify(&self, token: &str) -> Result<SessionClaims, TokenSignerError>;
}

/// Deterministic signer for tests: JSON claims followed by a checksum.
///
/// Offers tamper detection but no secrecy.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTokenSigner;

impl FixtureTokenSigner {
    fn checksum(payload: &str) -> String {
        let mut hasher = DefaultHasher::new();
        payload.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }
}

impl TokenSigner for FixtureTokenSigner {
    fn sign(&self, claims: &SessionClaims) -> Result<String, TokenSignerError> {
        let payload =
            serde_json::to_string(claims).map_err(|err| TokenSignerError::signing(err.to_string()))?;
        let checksum = Self::checksum(&payload);
        Ok(format!("{payload}|{checksum}"))
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, TokenSignerError> {
        let (payload, checksum) = token
            .rsplit_once('|')
            .ok_or_else(|| TokenSignerError::malformed("missing checksum"))?;
        if Self::checksum(payload) != checksum {
            return Err(TokenSignerError::malformed("checksum mismatch"));
        }
        serde_json::from_str(payload).map_err(|err| TokenSignerError::invalid(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Role, TokenKind, UserId};
    use rstest::rstest;

    fn claims() -> SessionClaims {
        SessionClaims {
            sub: UserId::random(),
            role: Role::Applicant,
            username: "ada".to_owned(),
            iat: 1_700_000_000,
            exp: 1_700_000_900,
            kind: TokenKind::Access,
        }
    }

    #[rstest]
    fn fixture_signer_round_trips() {
        let claims = claims();
        let token = FixtureTokenSigner.sign(&claims).expect("sign");
        assert_eq!(FixtureTokenSigner.verify(&token), Ok(claims));
    }

    #[rstest]
    #[case("no separator")]
    #[case("{}|0000000000000000")]
    fn fixture_signer_detects_tampering(#[case] token: &str) {
        assert!(matches!(
            FixtureTokenSigner.verify(token),
            Err(TokenSignerError::Malformed { .. })
        ));
    }

    #[rstest]
    fn unknown_role_is_invalid() {
        let payload = r#"{"sub":"3fa85f64-5717-4562-b3fc-2c963f66afa6","role":"root","username":"x","iat":0,"exp":1,"kind":"access"}"#;
        let token = format!("{payload}|{}", FixtureTokenSigner::checksum(payload));
        assert!(matches!(
            FixtureTokenSigner.verify(&token),
            Err(TokenSignerError::Invalid { .. })
        ));
    }
}
