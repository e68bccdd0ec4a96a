use serde_json::{Map, Value};

/// One schedulable resource, extracted from a single catalog entry.
///
/// `record` is the normalized merge of advertisement-level routing
/// fields and entry fields, insertion-ordered; `entry` is a copy of the
/// raw catalog entry, kept for requirement-expression evaluation.
#[derive(Debug, Clone)]
pub struct Resource {
    record: Map<String, Value>,
    entry: Map<String, Value>,
}

impl Resource {
    pub(crate) fn new(record: Map<String, Value>, entry: Map<String, Value>) -> Self {
        Self { record, entry }
    }

    /// Full normalized record.
    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    /// Raw originating catalog entry.
    pub fn entry(&self) -> &Map<String, Value> {
        &self.entry
    }

    /// Resource identifier; empty when the entry carries none.
    pub fn name(&self) -> &str {
        self.record.get("Name").and_then(Value::as_str).unwrap_or("")
    }

    /// Available CPU count.
    pub fn cpus(&self) -> i64 {
        self.int_field("CPUs")
    }

    /// Available memory in MB.
    pub fn memory(&self) -> i64 {
        self.int_field("Memory")
    }

    /// Wall-time ceiling in minutes. `None` when the field is absent or
    /// not an integer; zero means unbounded.
    pub fn max_wall_time(&self) -> Option<i64> {
        self.record.get("MaxWallTime").and_then(Value::as_i64)
    }

    /// Affiliation tags admitted by this resource. Empty means
    /// unrestricted.
    pub fn allowed_vos(&self) -> Vec<&str> {
        self.record
            .get("AllowedVOs")
            .and_then(Value::as_array)
            .map(|vos| vos.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Requirement expression attached to the entry, if any.
    pub fn requirements(&self) -> Option<&str> {
        self.record.get("Requirements").and_then(Value::as_str)
    }

    fn int_field(&self, field: &str) -> i64 {
        self.record.get(field).and_then(Value::as_i64).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(record: Value) -> Resource {
        let Value::Object(map) = record else {
            panic!("record fixture must be an object");
        };
        Resource::new(map.clone(), map)
    }

    #[test]
    fn test_typed_accessors() {
        let r = resource(json!({
            "Name": "site1",
            "CPUs": 4,
            "Memory": 8192,
            "MaxWallTime": 1440,
            "AllowedVOs": ["osg", "fermi"],
            "Requirements": "RequestCPUs <= CPUs",
        }));
        assert_eq!(r.name(), "site1");
        assert_eq!(r.cpus(), 4);
        assert_eq!(r.memory(), 8192);
        assert_eq!(r.max_wall_time(), Some(1440));
        assert_eq!(r.allowed_vos(), vec!["osg", "fermi"]);
        assert_eq!(r.requirements(), Some("RequestCPUs <= CPUs"));
    }

    #[test]
    fn test_absent_fields_are_defensive() {
        let r = resource(json!({}));
        assert_eq!(r.name(), "");
        assert_eq!(r.cpus(), 0);
        assert_eq!(r.memory(), 0);
        assert_eq!(r.max_wall_time(), None);
        assert!(r.allowed_vos().is_empty());
        assert!(r.requirements().is_none());
    }

    #[test]
    fn test_wrong_typed_fields_do_not_panic() {
        let r = resource(json!({
            "Name": 42,
            "CPUs": "four",
            "MaxWallTime": "soon",
            "AllowedVOs": "osg",
        }));
        assert_eq!(r.name(), "");
        assert_eq!(r.cpus(), 0);
        assert_eq!(r.max_wall_time(), None);
        assert!(r.allowed_vos().is_empty());
    }

    #[test]
    fn test_allowed_vos_skips_non_string_members() {
        let r = resource(json!({"AllowedVOs": ["osg", 7, "fermi"]}));
        assert_eq!(r.allowed_vos(), vec!["osg", "fermi"]);
    }
}
