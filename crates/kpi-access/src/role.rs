//! Role resolution

use crate::error::AccessError;
use kpi_store::UserRecord;

/// Maps an admitted identifier to its role id
#[derive(Debug, Clone, Copy)]
pub struct RoleResolver<'a> {
    users: &'a [UserRecord],
}

impl<'a> RoleResolver<'a> {
    /// Create resolver over the user table
    #[inline]
    #[must_use]
    pub fn new(users: &'a [UserRecord]) -> Self {
        Self { users }
    }

    /// Role id of the first user row matching `identifier`
    ///
    /// # Errors
    /// Returns [`AccessError::UserNotFound`]; there is no default role.
    pub fn resolve(&self, identifier: &str) -> Result<i64, AccessError> {
        self.users
            .iter()
            .find(|u| u.identifier == identifier)
            .map(|u| u.role_id)
            .ok_or_else(|| AccessError::UserNotFound {
                identifier: identifier.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(identifier: &str, role_id: i64) -> UserRecord {
        UserRecord {
            identifier: identifier.into(),
            role_id,
        }
    }

    #[test]
    fn first_match_wins() {
        let users = vec![user("a", 1), user("b", 2), user("a", 3)];
        assert_eq!(RoleResolver::new(&users).resolve("a").unwrap(), 1);
    }

    #[test]
    fn unknown_user_is_not_found() {
        let users = vec![user("a", 1)];
        let err = RoleResolver::new(&users).resolve("z").unwrap_err();
        assert!(err.is_not_found());
    }
}
