//! Accept/reject decisions, the input to mutual-match detection.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// The two judgments a user can record about a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Accept,
    Reject,
}

impl DecisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Accept => "accept",
            DecisionKind::Reject => "reject",
        }
    }
}

impl std::str::FromStr for DecisionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(DecisionKind::Accept),
            "reject" => Ok(DecisionKind::Reject),
            other => Err(format!("unknown decision kind '{other}'")),
        }
    }
}

/// One user's recorded judgment about another.
///
/// Unique per ordered `(actor, target)` pair; re-deciding overwrites the
/// kind and timestamp rather than creating a second record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub actor: UserId,
    pub target: UserId,
    pub kind: DecisionKind,
    pub updated_at: Timestamp,
}

impl Decision {
    pub fn new(actor: UserId, target: UserId, kind: DecisionKind, updated_at: Timestamp) -> Self {
        Self {
            actor,
            target,
            kind,
            updated_at,
        }
    }

    pub fn is_accept(&self) -> bool {
        self.kind == DecisionKind::Accept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_from_wire_form() {
        assert_eq!("accept".parse::<DecisionKind>().unwrap(), DecisionKind::Accept);
        assert_eq!("reject".parse::<DecisionKind>().unwrap(), DecisionKind::Reject);
        assert!("like".parse::<DecisionKind>().is_err());
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DecisionKind::Accept).unwrap(), "\"accept\"");
    }
}
