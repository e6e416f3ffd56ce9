//! HS256 JSON Web Token adapter for the `TokenSigner` port.
//!
//! Only integrity is checked here. Built-in `exp` validation is switched off
//! because expiry belongs to the token service and its injected clock.

use std::collections::HashSet;

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::domain::SessionClaims;
use crate::domain::ports::{TokenSigner, TokenSignerError};

/// Shortest secret accepted for HMAC signing.
pub const MIN_SECRET_BYTES: usize = 32;

/// Signs session claims as compact HS256 JWTs.
#[derive(Clone)]
pub struct JwtTokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenSigner {
    /// Build a signer from raw secret bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TokenSignerError::Signing`] when the secret is shorter than
    /// [`MIN_SECRET_BYTES`].
    ///
    /// # Examples
    ///
    /// ```
    /// use recruitment::outbound::security::JwtTokenSigner;
    ///
    /// assert!(JwtTokenSigner::from_secret(&[7_u8; 32]).is_ok());
    /// assert!(JwtTokenSigner::from_secret(b"short").is_err());
    /// ```
    pub fn from_secret(secret: &[u8]) -> Result<Self, TokenSignerError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(TokenSignerError::signing(format!(
                "token secret must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }
}

fn map_decode_error(error: &JwtError) -> TokenSignerError {
    match error.kind() {
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::Base64(_)
        | ErrorKind::Utf8(_) => TokenSignerError::malformed(error.to_string()),
        _ => TokenSignerError::invalid(error.to_string()),
    }
}

impl TokenSigner for JwtTokenSigner {
    fn sign(&self, claims: &SessionClaims) -> Result<String, TokenSignerError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|err| TokenSignerError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, TokenSignerError> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| map_decode_error(&err))
    }
}

#[cfg(test)]
mod tests {
    //! Signing, tamper detection and error classification.
    use super::*;
    use crate::domain::{Role, TokenKind, UserId};
    use rstest::{fixture, rstest};

    #[fixture]
    fn signer() -> JwtTokenSigner {
        JwtTokenSigner::from_secret(&[42_u8; 32]).expect("valid secret")
    }

    fn claims(exp: i64) -> SessionClaims {
        SessionClaims {
            sub: UserId::random(),
            role: Role::Applicant,
            username: "ada".to_owned(),
            iat: 1_700_000_000,
            exp,
            kind: TokenKind::Access,
        }
    }

    #[rstest]
    fn signed_claims_round_trip(signer: JwtTokenSigner) {
        let original = claims(1_700_000_900);
        let token = signer.sign(&original).expect("sign");
        assert_eq!(signer.verify(&token).expect("verify"), original);
    }

    #[rstest]
    fn long_expired_claims_still_decode(signer: JwtTokenSigner) {
        let token = signer.sign(&claims(1)).expect("sign");
        assert_eq!(signer.verify(&token).expect("decode").exp, 1);
    }

    #[rstest]
    fn tampered_signature_is_malformed(signer: JwtTokenSigner) {
        let token = signer.sign(&claims(1_700_000_900)).expect("sign");
        let (head, signature) = token.rsplit_once('.').expect("three segments");
        let flipped = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{head}.{flipped}{}", signature.get(1..).unwrap_or_default());
        let err = signer.verify(&tampered).expect_err("tampered");
        assert!(matches!(err, TokenSignerError::Malformed { .. }));
    }

    #[rstest]
    fn foreign_secret_is_malformed(signer: JwtTokenSigner) {
        let other = JwtTokenSigner::from_secret(&[9_u8; 32]).expect("valid secret");
        let token = other.sign(&claims(1_700_000_900)).expect("sign");
        let err = signer.verify(&token).expect_err("wrong key");
        assert!(matches!(err, TokenSignerError::Malformed { .. }));
    }

    #[rstest]
    #[case("not-a-token")]
    #[case("")]
    fn garbage_is_malformed(signer: JwtTokenSigner, #[case] token: &str) {
        let err = signer.verify(token).expect_err("garbage");
        assert!(matches!(err, TokenSignerError::Malformed { .. }));
    }

    #[rstest]
    fn unexpected_algorithm_is_invalid(signer: JwtTokenSigner) {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims(1_700_000_900),
            &EncodingKey::from_secret(&[42_u8; 32]),
        )
        .expect("sign");
        let err = signer.verify(&token).expect_err("algorithm mismatch");
        assert!(matches!(err, TokenSignerError::Invalid { .. }));
    }
}
