//! Identity data model: user ids, roles, and validated profile fields.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors for identity fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("username must be {min}-{max} characters")]
    UsernameLength { min: usize, max: usize },
    #[error("username may only contain letters, digits, '.', '_' or '-'")]
    UsernameCharacters,
    #[error("username must not have the shape of a national id")]
    UsernameLooksLikeNationalId,
    #[error("email address is not well formed")]
    InvalidEmail,
    #[error("national id must look like YYYYMMDD-XXXX")]
    InvalidNationalId,
    #[error("role must be applicant or admin")]
    UnknownRole,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Closed set of roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Applicant,
    Admin,
}

impl Role {
    /// Persisted and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applicant => "applicant",
            Self::Admin => "admin",
        }
    }

    /// Whether the role bypasses ownership checks.
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applicant" => Ok(Self::Applicant),
            "admin" => Ok(Self::Admin),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

/// Maximum length for given names and surnames.
pub const PERSON_NAME_MAX: usize = 64;
/// Minimum username length.
pub const USERNAME_MIN: usize = 3;
/// Maximum username length.
pub const USERNAME_MAX: usize = 32;
/// Maximum email length, matching the `users.email` column.
pub const EMAIL_MAX: usize = 254;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static NATIONAL_ID_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern).unwrap_or_else(|error| panic!("regex {pattern} failed to compile: {error}"))
    })
}

fn username_regex() -> &'static Regex {
    compiled(&USERNAME_RE, r"^[A-Za-z0-9_.\-]+$")
}

fn national_id_regex() -> &'static Regex {
    compiled(
        &NATIONAL_ID_RE,
        r"^(?P<date>[0-9]{4}(?P<month>[0-9]{2})(?P<day>[0-9]{2}))-?(?P<serial>[0-9]{4})$",
    )
}

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = UserValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

string_newtype! {
    /// Given name or surname, trimmed.
    PersonName
}

impl PersonName {
    /// Validate a name for the given field label.
    pub fn for_field(field: &'static str, raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::Empty { field });
        }
        if trimmed.chars().count() > PERSON_NAME_MAX {
            return Err(UserValidationError::TooLong {
                field,
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    fn new(raw: String) -> Result<Self, UserValidationError> {
        Self::for_field("name", &raw)
    }
}

string_newtype! {
    /// Login handle, unique across identities.
    Username
}

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::Empty { field: "username" });
        }
        let length = trimmed.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(UserValidationError::UsernameLength {
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            });
        }
        if !username_regex().is_match(trimmed) {
            return Err(UserValidationError::UsernameCharacters);
        }
        // Login detection would read such a handle as a national id.
        if NationalId::looks_like(trimmed) {
            return Err(UserValidationError::UsernameLooksLikeNationalId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

string_newtype! {
    /// Email address, lower-cased so uniqueness is case-insensitive.
    EmailAddress
}

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let normalised = raw.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::Empty { field: "email" });
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::TooLong {
                field: "email",
                max: EMAIL_MAX,
            });
        }
        let mut parts = normalised.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(UserValidationError::InvalidEmail);
        };
        let domain_ok = domain.split('.').count() >= 2 && domain.split('.').all(|label| !label.is_empty());
        if local.is_empty() || !domain_ok || normalised.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

string_newtype! {
    /// Personal identity number, normalised to `YYYYMMDD-XXXX`.
    NationalId
}

impl NationalId {
    /// Validate and normalise a national identity number.
    ///
    /// # Examples
    /// ```
    /// use recruitment::domain::NationalId;
    ///
    /// let id = NationalId::new("199001151234").unwrap();
    /// assert_eq!(id.as_ref(), "19900115-1234");
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let captures = national_id_regex()
            .captures(raw.trim())
            .ok_or(UserValidationError::InvalidNationalId)?;
        let field = |name: &str| captures.name(name).map(|m| m.as_str()).unwrap_or_default();
        let month: u32 = field("month").parse().unwrap_or(0);
        let day: u32 = field("day").parse().unwrap_or(0);
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(UserValidationError::InvalidNationalId);
        }
        Ok(Self(format!("{}-{}", field("date"), field("serial"))))
    }

    /// Whether `raw` has the shape of a national id (used for login detection).
    pub fn looks_like(raw: &str) -> bool {
        national_id_regex().is_match(raw.trim())
    }
}

/// Salted password hash as produced by the configured hasher.
///
/// `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash string read from storage or produced by a hasher.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Raw hash text for persistence or verification.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Registered identity as exposed to callers. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    pub name: PersonName,
    pub surname: PersonName,
    pub national_id: NationalId,
    pub username: Username,
    pub email: EmailAddress,
    pub role: Role,
}

/// Identity together with its stored password hash, for credential checks.
#[derive(Debug, Clone)]
pub struct StoredIdentity {
    pub identity: Identity,
    pub password_hash: PasswordHash,
}

/// Insert payload for a new identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub id: UserId,
    pub name: PersonName,
    pub surname: PersonName,
    pub national_id: NationalId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub role: Role,
}

impl NewIdentity {
    /// Public view of the identity once stored.
    pub fn to_identity(&self) -> Identity {
        Identity {
            id: self.id,
            name: self.name.clone(),
            surname: self.surname.clone(),
            national_id: self.national_id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}
