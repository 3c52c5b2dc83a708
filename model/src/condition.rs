use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single entry in the `status.conditions` list of an AppStudio resource. Mirrors the shape of
/// the standard Kubernetes condition, but leaves every field other than `type` and `status`
/// optional because reconcilers do not always fill them.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// The condition type, e.g. `Created` or `Updated`.
    #[serde(rename = "type")]
    pub type_: String,
    /// One of `True`, `False` or `Unknown`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// RFC 3339 timestamp of the last status change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

impl Condition {
    pub fn new<S1, S2>(type_: S1, status: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            type_: type_.into(),
            status: status.into(),
            ..Default::default()
        }
    }

    pub fn with_reason<S: Into<String>>(mut self, reason: S) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Read access to the `status.conditions` list that every AppStudio resource carries. A resource
/// that has not been reconciled yet (no `status`) reports an empty list.
pub trait Conditions {
    fn conditions(&self) -> &[Condition];

    /// The number of condition entries written so far.
    fn condition_count(&self) -> usize {
        self.conditions().len()
    }

    /// Find the first condition of the given type.
    fn condition(&self, type_: &str) -> Option<&Condition> {
        self.conditions().iter().find(|c| c.type_ == type_)
    }

    /// Whether a condition of the given type exists and has status `True`.
    fn is_condition_true(&self, type_: &str) -> bool {
        self.condition(type_)
            .map(|c| c.status == crate::constants::CONDITION_STATUS_TRUE)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    struct Fixture(Vec<Condition>);

    impl Conditions for Fixture {
        fn conditions(&self) -> &[Condition] {
            &self.0
        }
    }

    #[test]
    fn condition_serializes_type_field() {
        let condition = Condition::new("Created", "True").with_reason("OK");
        let value = serde_json::to_value(&condition).unwrap();
        assert_eq!(
            value,
            json!({"type": "Created", "status": "True", "reason": "OK"})
        );
    }

    #[test]
    fn condition_lookup() {
        let fixture = Fixture(vec![
            Condition::new("Created", "True"),
            Condition::new("Updated", "False"),
        ]);
        assert_eq!(fixture.condition_count(), 2);
        assert!(fixture.is_condition_true("Created"));
        assert!(!fixture.is_condition_true("Updated"));
        assert!(fixture.condition("Deleted").is_none());
    }
}
