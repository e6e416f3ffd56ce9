//! Role and ownership gate applied before every owner-scoped operation.

use serde_json::json;

use super::session::SessionClaims;
use super::user::{Role, UserId};
use super::Error;

/// Authenticated principal derived from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub role: Role,
}

impl Caller {
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&SessionClaims> for Caller {
    fn from(claims: &SessionClaims) -> Self {
        Self::new(claims.sub, claims.role)
    }
}

/// Reason an operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    /// No verified caller.
    #[error("authentication required")]
    Unauthenticated,
    /// Non-admin caller and no resource owner could be resolved.
    #[error("resource owner is required")]
    MissingOwner,
    /// Caller is neither admin nor the owner.
    #[error("not permitted to access this resource")]
    Forbidden,
}

impl From<AccessDenied> for Error {
    fn from(value: AccessDenied) -> Self {
        match value {
            AccessDenied::Unauthenticated => Error::unauthorized(value.to_string()),
            AccessDenied::MissingOwner => Error::invalid_request(value.to_string())
                .with_details(json!({ "field": "owner", "code": "missing_owner" })),
            AccessDenied::Forbidden => Error::forbidden(value.to_string()),
        }
    }
}

/// Decide whether `caller` may act on resources owned by `owner`.
///
/// Admins may act on anything. Everyone else needs a resolved owner equal to
/// their own id.
///
/// # Examples
/// ```
/// use recruitment::domain::{authorize, AccessDenied, Caller, Role, UserId};
///
/// let me = Caller::new(UserId::random(), Role::Applicant);
/// assert_eq!(authorize(Some(&me), Some(&me.id)), Ok(()));
/// assert_eq!(authorize(None, Some(&me.id)), Err(AccessDenied::Unauthenticated));
/// ```
pub fn authorize(caller: Option<&Caller>, owner: Option<&UserId>) -> Result<(), AccessDenied> {
    let caller = caller.ok_or(AccessDenied::Unauthenticated)?;
    if caller.is_admin() {
        return Ok(());
    }
    match owner {
        None => Err(AccessDenied::MissingOwner),
        Some(owner) if *owner == caller.id => Ok(()),
        Some(_) => Err(AccessDenied::Forbidden),
    }
}

/// Resolve the target owner: an explicit parameter wins, otherwise the
/// caller's own id. A malformed parameter resolves to no owner.
pub fn resolve_owner(param: Option<&str>, caller: Option<&Caller>) -> Option<UserId> {
    match param {
        Some(raw) => UserId::new(raw).ok(),
        None => caller.map(|caller| caller.id),
    }
}

/// [`resolve_owner`] followed by [`authorize`], yielding the owner to act on.
pub fn authorize_owner(param: Option<&str>, caller: Option<&Caller>) -> Result<UserId, AccessDenied> {
    let owner = resolve_owner(param, caller);
    authorize(caller, owner.as_ref())?;
    owner.ok_or(AccessDenied::MissingOwner)
}

#[cfg(test)]
mod tests {
    //! Decision table coverage for the gate.
    use super::*;
    use rstest::rstest;

    fn caller(role: Role) -> Caller {
        Caller::new(UserId::random(), role)
    }

    #[rstest]
    fn anonymous_is_unauthenticated() {
        let owner = UserId::random();
        assert_eq!(authorize(None, Some(&owner)), Err(AccessDenied::Unauthenticated));
        assert_eq!(authorize(None, None), Err(AccessDenied::Unauthenticated));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(UserId::random()))]
    fn admin_is_always_allowed(#[case] owner: Option<UserId>) {
        assert_eq!(authorize(Some(&caller(Role::Admin)), owner.as_ref()), Ok(()));
    }

    #[rstest]
    fn applicant_may_act_on_self_only() {
        let me = caller(Role::Applicant);
        let other = UserId::random();
        assert_eq!(authorize(Some(&me), Some(&me.id)), Ok(()));
        assert_eq!(authorize(Some(&me), Some(&other)), Err(AccessDenied::Forbidden));
        assert_eq!(authorize(Some(&me), None), Err(AccessDenied::MissingOwner));
    }

    #[rstest]
    fn explicit_parameter_wins_over_token() {
        let me = caller(Role::Applicant);
        let other = UserId::random();
        let raw = other.to_string();
        assert_eq!(resolve_owner(Some(&raw), Some(&me)), Some(other));
        assert_eq!(resolve_owner(None, Some(&me)), Some(me.id));
        assert_eq!(resolve_owner(None, None), None);
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    fn malformed_parameter_is_missing_owner(#[case] raw: &str) {
        let me = caller(Role::Applicant);
        assert_eq!(resolve_owner(Some(raw), Some(&me)), None);
        assert_eq!(authorize_owner(Some(raw), Some(&me)), Err(AccessDenied::MissingOwner));
    }

    #[rstest]
    fn admin_without_resolvable_owner_is_missing_owner() {
        let admin = caller(Role::Admin);
        assert_eq!(
            authorize_owner(Some("bogus"), Some(&admin)),
            Err(AccessDenied::MissingOwner)
        );
    }

    #[rstest]
    #[case(AccessDenied::Unauthenticated, crate::domain::ErrorCode::Unauthorized)]
    #[case(AccessDenied::MissingOwner, crate::domain::ErrorCode::InvalidRequest)]
    #[case(AccessDenied::Forbidden, crate::domain::ErrorCode::Forbidden)]
    fn denials_map_to_error_codes(
        #[case] denied: AccessDenied,
        #[case] code: crate::domain::ErrorCode,
    ) {
        assert_eq!(Error::from(denied).code(), code);
    }
}
