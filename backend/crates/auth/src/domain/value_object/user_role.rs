use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[display("admin")]
    Admin,
    #[default]
    #[display("user")]
    User,
}

impl UserRole {
    pub const ALL: [UserRole; 2] = [UserRole::Admin, UserRole::User];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "admin" => Some(UserRole::Admin),
            "user" => Some(UserRole::User),
            _ => None,
        }
    }

    #[inline]
    const fn bit(&self) -> u8 {
        match self {
            UserRole::Admin => 1 << 0,
            UserRole::User => 1 << 1,
        }
    }
}

/// Closed set of roles
///
/// The empty set means "any authenticated principal" wherever it gates
/// access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const EMPTY: RoleSet = RoleSet(0);
    pub const ADMIN: RoleSet = RoleSet::of(&[UserRole::Admin]);
    pub const MEMBERS: RoleSet = RoleSet::of(&[UserRole::Admin, UserRole::User]);

    pub const fn of(roles: &[UserRole]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < roles.len() {
            bits |= roles[i].bit();
            i += 1;
        }
        RoleSet(bits)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(&self, role: UserRole) -> bool {
        self.0 & role.bit() != 0
    }

    pub const fn with(self, role: UserRole) -> Self {
        RoleSet(self.0 | role.bit())
    }

    pub fn iter(&self) -> impl Iterator<Item = UserRole> + '_ {
        UserRole::ALL.into_iter().filter(|r| self.contains(*r))
    }
}

impl FromIterator<UserRole> for RoleSet {
    fn from_iter<I: IntoIterator<Item = UserRole>>(iter: I) -> Self {
        iter.into_iter().fold(RoleSet::EMPTY, RoleSet::with)
    }
}

impl std::fmt::Display for RoleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("any");
        }
        let codes: Vec<&str> = self.iter().map(|r| r.code()).collect();
        f.write_str(&codes.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_code("user"), Some(UserRole::User));
        assert_eq!(UserRole::from_code("moderator"), None);
    }

    #[test]
    fn test_user_role_display_and_serde() {
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(UserRole::User.to_string(), "user");
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let parsed: UserRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, UserRole::User);
        assert!(serde_json::from_str::<UserRole>("\"root\"").is_err());
    }

    #[test]
    fn test_role_set_membership() {
        assert!(RoleSet::ADMIN.contains(UserRole::Admin));
        assert!(!RoleSet::ADMIN.contains(UserRole::User));
        assert!(RoleSet::MEMBERS.contains(UserRole::User));
        assert!(RoleSet::EMPTY.is_empty());
        assert!(!RoleSet::EMPTY.contains(UserRole::Admin));
    }

    #[test]
    fn test_role_set_collect_and_display() {
        let set: RoleSet = [UserRole::User, UserRole::Admin].into_iter().collect();
        assert_eq!(set, RoleSet::MEMBERS);
        assert_eq!(set.to_string(), "admin,user");
        assert_eq!(RoleSet::EMPTY.to_string(), "any");
    }
}
