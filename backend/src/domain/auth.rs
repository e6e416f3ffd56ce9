//! Authentication primitives: login credentials, registrations and new
//! passwords.
//!
//! Inbound adapters hand raw strings to these constructors; everything past
//! this point works with validated values only.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{
    EmailAddress, NationalId, PersonName, UserValidationError, Username,
};

/// Minimum password length in bytes.
pub const PASSWORD_MIN_BYTES: usize = 8;
/// Maximum password length in bytes; bcrypt ignores anything beyond 72.
pub const PASSWORD_MAX_BYTES: usize = 72;

/// Domain error returned when authentication payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    /// Login identifier was missing or blank once trimmed.
    #[error("login identifier must not be empty")]
    EmptyIdentifier,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password length outside the accepted range.
    #[error("password must be {min}-{max} bytes long")]
    PasswordLength { min: usize, max: usize },
    /// A registration field failed validation.
    #[error(transparent)]
    Field(#[from] UserValidationError),
}

/// Which unique column a login identifier addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Email(EmailAddress),
    NationalId(NationalId),
    Username(String),
}

impl LoginIdentifier {
    /// Classify a raw identifier: `@` means email, the national id shape
    /// means national id, anything else is treated as a username.
    ///
    /// # Examples
    /// ```
    /// use recruitment::domain::LoginIdentifier;
    ///
    /// let id = LoginIdentifier::detect("19900115-1234").unwrap();
    /// assert!(matches!(id, LoginIdentifier::NationalId(_)));
    /// ```
    pub fn detect(raw: &str) -> Result<Self, CredentialValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CredentialValidationError::EmptyIdentifier);
        }
        if trimmed.contains('@') {
            return Ok(Self::Email(EmailAddress::new(trimmed)?));
        }
        if NationalId::looks_like(trimmed) {
            return Ok(Self::NationalId(NationalId::new(trimmed)?));
        }
        Ok(Self::Username(trimmed.to_owned()))
    }

    /// Column name used in logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::NationalId(_) => "national_id",
            Self::Username(_) => "username",
        }
    }
}

impl fmt::Display for LoginIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(value) => value.fmt(f),
            Self::NationalId(value) => value.fmt(f),
            Self::Username(value) => f.write_str(value),
        }
    }
}

/// Validated login credentials used by the authentication service.
///
/// ## Invariants
/// - `identifier` has already been classified.
/// - `password` is non-empty and keeps caller-provided whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identifier: LoginIdentifier,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw identifier/password inputs.
    pub fn try_from_parts(identifier: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let identifier = LoginIdentifier::detect(identifier)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            identifier,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Classified login identifier.
    pub fn identifier(&self) -> &LoginIdentifier {
        &self.identifier
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Plaintext password that satisfies the length policy. Zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Validate a password against the length policy.
    pub fn new(raw: &str) -> Result<Self, CredentialValidationError> {
        if raw.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        if !(PASSWORD_MIN_BYTES..=PASSWORD_MAX_BYTES).contains(&raw.len()) {
            return Err(CredentialValidationError::PasswordLength {
                min: PASSWORD_MIN_BYTES,
                max: PASSWORD_MAX_BYTES,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Plaintext for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(<redacted>)")
    }
}

/// Raw registration fields as received from an adapter.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationInput<'a> {
    pub name: &'a str,
    pub surname: &'a str,
    pub national_id: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Validated registration request. New identities are always applicants.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: PersonName,
    pub surname: PersonName,
    pub national_id: NationalId,
    pub username: Username,
    pub email: EmailAddress,
    pub password: NewPassword,
}

impl Registration {
    /// Validate every field, reporting the first failure.
    pub fn try_from_input(input: RegistrationInput<'_>) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            name: PersonName::for_field("name", input.name)?,
            surname: PersonName::for_field("surname", input.surname)?,
            national_id: NationalId::new(input.national_id)?,
            username: Username::new(input.username)?,
            email: EmailAddress::new(input.email)?,
            password: NewPassword::new(input.password)?,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com", "email")]
    #[case("19900115-1234", "national_id")]
    #[case("199001151234", "national_id")]
    #[case("ada_l", "username")]
    #[case("12345", "username")]
    fn detect_classifies_identifiers(#[case] raw: &str, #[case] kind: &str) {
        let id = LoginIdentifier::detect(raw).expect("identifier should classify");
        assert_eq!(id.kind(), kind);
    }

    #[rstest]
    #[case("", "pw", CredentialValidationError::EmptyIdentifier)]
    #[case("   ", "pw", CredentialValidationError::EmptyIdentifier)]
    #[case("user", "", CredentialValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] identifier: &str,
        #[case] password: &str,
        #[case] expected: CredentialValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(identifier, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn credentials_keep_password_whitespace() {
        let creds = LoginCredentials::try_from_parts("  alice  ", " secret ")
            .expect("valid inputs should succeed");
        assert_eq!(creds.identifier(), &LoginIdentifier::Username("alice".into()));
        assert_eq!(creds.password(), " secret ");
    }

    #[rstest]
    #[case("short")]
    #[case(&"x".repeat(73))]
    fn new_password_enforces_length(#[case] raw: &str) {
        assert!(matches!(
            NewPassword::new(raw),
            Err(CredentialValidationError::PasswordLength { .. })
        ));
    }

    #[rstest]
    fn registration_reports_field_errors() {
        let input = RegistrationInput {
            name: "Ada",
            surname: "Lovelace",
            national_id: "not-an-id",
            username: "ada",
            email: "ada@example.com",
            password: "correct horse",
        };
        let err = Registration::try_from_input(input).expect_err("bad national id");
        assert_eq!(
            err,
            CredentialValidationError::Field(UserValidationError::InvalidNationalId)
        );
    }

    #[rstest]
    fn new_password_debug_is_redacted() {
        let password = NewPassword::new("hunter2hunter2").expect("valid password");
        assert!(!format!("{password:?}").contains("hunter2"));
    }
}
