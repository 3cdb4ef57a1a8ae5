use serde::{Deserialize, Serialize};

/// A session identifier.
///
/// Both parties of a session must use the same identifier.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    /// Creates a new session identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the identifier as a `u64`.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

/// A party identifier.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyId(u32);

impl PartyId {
    /// Creates a new party identifier.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PartyId({})", self.0)
    }
}

/// A simple monotonic counter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counter(u64);

impl Counter {
    /// Returns the current value.
    pub fn current(&self) -> u64 {
        self.0
    }

    /// Returns the current value, incrementing the counter in-place.
    pub fn next(&mut self) -> u64 {
        let n = self.0;
        self.0 += 1;
        n
    }
}
