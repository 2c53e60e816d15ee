use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a running service instance, reported by `/info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub instance_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rubric: Option<String>,
}

impl ServiceInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            instance_id: Uuid::new_v4(),
            rubric: None,
        }
    }

    /// Attach the `<entity>/<method>` rubric the service was started with.
    pub fn with_rubric(mut self, entity_type: &str, scoring_method: &str) -> Self {
        self.rubric = Some(format!("{entity_type}/{scoring_method}"));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rubric_is_omitted_until_set() {
        let info = ServiceInfo::new("resolver-api");
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("rubric").is_none());

        let info = info.with_rubric("team", "weighted");
        assert_eq!(info.rubric.as_deref(), Some("team/weighted"));
    }
}
