use std::fmt;

use serde::{Deserialize, Serialize};

/// Permission class of the acting party.
///
/// Codes are the ones the identity layer hands out; `0` means the caller is
/// not registered and maps to no role at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Producer,
    Processor,
    Retailer,
    Certifier,
}

impl Role {
    /// All roles in code order.
    pub const ALL: [Role; 4] = [
        Role::Producer,
        Role::Processor,
        Role::Retailer,
        Role::Certifier,
    ];

    /// Map an identity-layer role code. Unrecognized codes yield `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Producer),
            2 => Some(Self::Processor),
            3 => Some(Self::Retailer),
            4 => Some(Self::Certifier),
            _ => None,
        }
    }

    /// The identity-layer code for this role.
    pub fn code(&self) -> u8 {
        match self {
            Self::Producer => 1,
            Self::Processor => 2,
            Self::Retailer => 3,
            Self::Certifier => 4,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Producer => "Producer",
            Self::Processor => "Processor",
            Self::Retailer => "Retailer",
            Self::Certifier => "Certifier",
        };
        write!(f, "{s}")
    }
}

/// Ledger address of an actor.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display: first 6 and last 4 characters.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 10 {
            return self.0.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.short())
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The caller as supplied by the identity layer. Read-only inside agtrace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Human-readable name, recorded in event payloads.
    pub label: String,
    pub address: ActorId,
    /// Raw role code from the identity layer.
    pub role_code: u8,
}

impl Actor {
    pub fn new(label: impl Into<String>, address: ActorId, role_code: u8) -> Self {
        Self {
            label: label.into(),
            address,
            role_code,
        }
    }

    /// The caller's role, or `None` if the code is not recognized.
    pub fn role(&self) -> Option<Role> {
        Role::from_code(self.role_code)
    }
}
