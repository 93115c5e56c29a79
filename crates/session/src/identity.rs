use gavel_core::UserId;
use serde::{Deserialize, Serialize};

/// Account role, as issued by the auth backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Bidder,
    Seller,
    Admin,
}

impl Role {
    /// Only bidder accounts may submit bids
    pub fn can_place_bids(&self) -> bool {
        matches!(self, Role::Bidder)
    }

    /// Sellers and admins manage listings (enable, disable, declare winner)
    pub fn manages_listings(&self) -> bool {
        matches!(self, Role::Seller | Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Bidder => "BIDDER",
            Role::Seller => "SELLER",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who the session belongs to
///
/// The user id selects the notification topic and identifies the session's
/// own bids in end-of-auction deltas; the role selects which snapshot
/// endpoint feeds the working set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: UserId,
    pub role: Role,
    pub token: Option<String>,
}

impl SessionIdentity {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self {
            user_id,
            role,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_bidders_place_bids() {
        assert!(Role::Bidder.can_place_bids());
        assert!(!Role::Seller.can_place_bids());
        assert!(!Role::Admin.can_place_bids());
    }

    #[test]
    fn test_role_wire_form_is_uppercase() {
        let role: Role = serde_json::from_str(r#""SELLER""#).unwrap();
        assert_eq!(role, Role::Seller);
        assert_eq!(serde_json::to_string(&Role::Bidder).unwrap(), r#""BIDDER""#);
    }

    #[test]
    fn test_authentication_requires_a_token() {
        let anonymous = SessionIdentity::new(7, Role::Bidder);
        assert!(!anonymous.is_authenticated());
        assert!(anonymous.with_token("jwt").is_authenticated());
    }
}
