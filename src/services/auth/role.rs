use std::fmt;
use std::str::FromStr;

/// Closed set of account roles.
///
/// The hierarchy is flat: ADMIN does not imply PROPOSER. Authorization
/// decisions compare roles exactly (see `middleware::auth::policy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Visitor,
    Proposer,
    Admin,
}

impl Role {
    /// Canonical wire/storage spelling (uppercase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Visitor => "VISITOR",
            Role::Proposer => "PROPOSER",
            Role::Admin => "ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = ();

    // Case-insensitive on input; everything outside the closed set is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "VISITOR" => Ok(Role::Visitor),
            "PROPOSER" => Ok(Role::Proposer),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles_case_insensitively() {
        assert_eq!(Role::from_str("ADMIN"), Ok(Role::Admin));
        assert_eq!(Role::from_str("admin"), Ok(Role::Admin));
        assert_eq!(Role::from_str("Proposer"), Ok(Role::Proposer));
        assert_eq!(Role::from_str("visitor"), Ok(Role::Visitor));
    }

    #[test]
    fn rejects_unknown_roles() {
        assert_eq!(Role::from_str(""), Err(()));
        assert_eq!(Role::from_str("SUPERUSER"), Err(()));
        assert_eq!(Role::from_str("ADMINISTRATOR"), Err(()));
    }

    #[test]
    fn round_trips_through_canonical_spelling() {
        for role in [Role::Visitor, Role::Proposer, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()), Ok(role));
        }
    }
}
