//! Static roster of known identities.
//!
//! Loaded once at startup from a TOML file (or the compiled-in default)
//! and read-only thereafter. Declaration order is preserved; daily
//! snapshots report members in this order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("duplicate roster name: {0}")]
    DuplicateName(String),
    #[error("roster has no members")]
    Empty,
    #[error("bad roster TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One known identity: display name plus a stable numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub id: u32,
}

/// Top-level roster file structure (`[[member]]` tables).
#[derive(Debug, Deserialize)]
struct RosterFile {
    member: Vec<Member>,
}

/// Fixed registry of known identities. Names are unique.
#[derive(Debug, Clone)]
pub struct Roster {
    members: Vec<Member>,
}

impl Roster {
    /// Build a roster, rejecting duplicate names and empty rosters.
    pub fn new(members: Vec<Member>) -> Result<Self, RosterError> {
        if members.is_empty() {
            return Err(RosterError::Empty);
        }
        for (i, m) in members.iter().enumerate() {
            if members[..i].iter().any(|prev| prev.name == m.name) {
                return Err(RosterError::DuplicateName(m.name.clone()));
            }
        }
        Ok(Self { members })
    }

    /// Parse a roster from TOML `[[member]]` tables.
    pub fn from_toml_str(src: &str) -> Result<Self, RosterError> {
        let file: RosterFile = toml::from_str(src)?;
        Self::new(file.member)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `name` is a known identity.
    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, id: u32) -> Member {
        Member {
            name: name.to_string(),
            id,
        }
    }

    #[test]
    fn test_roster_preserves_order() {
        let roster = Roster::new(vec![
            member("Ashok", 100),
            member("Priyansh", 101),
            member("Vrajesh", 102),
        ])
        .unwrap();
        let names: Vec<&str> = roster.members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Ashok", "Priyansh", "Vrajesh"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = Roster::new(vec![member("Ashok", 100), member("Ashok", 101)]).unwrap_err();
        assert!(matches!(err, RosterError::DuplicateName(name) if name == "Ashok"));
    }

    #[test]
    fn test_empty_roster_rejected() {
        assert!(matches!(Roster::new(vec![]), Err(RosterError::Empty)));
    }

    #[test]
    fn test_from_toml() {
        let roster = Roster::from_toml_str(
            r#"
            [[member]]
            name = "Ashok"
            id = 100

            [[member]]
            name = "Priyansh"
            id = 101
            "#,
        )
        .unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster.contains("Priyansh"));
        assert!(!roster.contains("Vrajesh"));
    }

    #[test]
    fn test_bad_toml_rejected() {
        assert!(matches!(
            Roster::from_toml_str("member = 3"),
            Err(RosterError::Parse(_))
        ));
    }
}
