use crate::modules::user::application::domain::entities::Role;

/// The verified caller of a request, loaded from storage after the token
/// checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins act on anything; everyone else only on what they own.
    pub fn may_act_on(&self, owner_id: &str) -> bool {
        self.is_admin() || self.id == owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: "u-1".to_string(),
            email: "jane@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn users_act_only_on_their_own_resources() {
        let user = caller(Role::User);

        assert!(user.may_act_on("u-1"));
        assert!(!user.may_act_on("u-2"));
    }

    #[test]
    fn admins_act_on_any_resource() {
        assert!(caller(Role::Admin).may_act_on("u-2"));
    }
}
