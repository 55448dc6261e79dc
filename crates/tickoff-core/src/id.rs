use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Identifier of a task (random UUID v4).
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TaskId(pub Uuid);

impl TaskId {
    #[must_use]
    /// Generate a fresh task identifier.
    pub fn new() -> Self {
        // Random bits only: independent stores never coordinate on ids.
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Serialize for TaskId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn task_id_uses_uuid_v4() {
        let id = TaskId::new();
        assert_eq!(id.0.get_version_num(), 4);
    }

    #[test]
    fn task_ids_do_not_repeat() {
        let ids: HashSet<TaskId> = (0..1_000).map(|_| TaskId::new()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn task_id_roundtrip() -> Result<(), uuid::Error> {
        let uuid = Uuid::new_v4();
        let parsed: TaskId = uuid.to_string().parse()?;
        assert_eq!(parsed.0, uuid);
        Ok(())
    }

    #[test]
    fn task_id_rejects_garbage() {
        assert!("not-a-task".parse::<TaskId>().is_err());
        assert!("".parse::<TaskId>().is_err());
    }

    #[test]
    fn task_id_serializes_as_plain_string() -> Result<(), serde_json::Error> {
        let id = TaskId::new();
        let json = serde_json::to_string(&id)?;
        assert_eq!(json, format!("\"{id}\""));
        let back: TaskId = serde_json::from_str(&json)?;
        assert_eq!(back, id);
        Ok(())
    }
}
