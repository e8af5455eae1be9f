use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Identifier of one drawing session and of the geometry it commits.
///
/// The preview line is named `"{id}polyline"` and every marker of the session
/// is grouped under `"{id}"`, which is how an edit pick finds its way back.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeometryId(pub u64);

impl GeometryId {
    pub fn line_name(self) -> String {
        format!("{}polyline", self.0)
    }

    pub fn group(self) -> String {
        self.0.to_string()
    }

    pub fn from_group(group: &str) -> Option<Self> {
        group.parse().ok().map(GeometryId)
    }
}

impl fmt::Display for GeometryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out session ids from a millisecond clock.
///
/// Ids are strictly increasing: when the clock has not moved (or went
/// backwards) the previous id plus one is used.
#[derive(Debug, Clone)]
pub struct SessionIds {
    clock: fn() -> u64,
    last: Option<u64>,
}

impl SessionIds {
    pub fn new() -> Self {
        Self::with_clock(unix_millis)
    }

    pub fn with_clock(clock: fn() -> u64) -> Self {
        Self { clock, last: None }
    }

    pub fn next_id(&mut self) -> GeometryId {
        let now = (self.clock)();
        let id = match self.last {
            Some(last) => now.max(last + 1),
            None => now,
        };
        self.last = Some(id);
        GeometryId(id)
    }
}

impl Default for SessionIds {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{GeometryId, SessionIds};

    #[test]
    fn ids_increase_even_with_a_frozen_clock() {
        let mut ids = SessionIds::with_clock(|| 1_700_000_000_000);
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert_eq!(a, GeometryId(1_700_000_000_000));
        assert!(a < b && b < c);
    }

    #[test]
    fn naming_round_trips_through_group() {
        let id = GeometryId(42);
        assert_eq!(id.line_name(), "42polyline");
        assert_eq!(GeometryId::from_group(&id.group()), Some(id));
        assert_eq!(GeometryId::from_group("Region 1"), None);
    }
}
