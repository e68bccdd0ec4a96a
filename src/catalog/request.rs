use serde_json::{Map, Value};

/// The per-invocation constraint record matched against requirement
/// expressions. Built once from the command line, never persisted.
#[derive(Debug, Clone)]
pub struct Request {
    pub cpus: i64,
    pub memory: i64,
    pub vo: Option<String>,
}

impl Request {
    pub fn new(cpus: i64, memory: i64, vo: Option<String>) -> Self {
        Self { cpus, memory, vo }
    }

    /// Attribute view used for expression evaluation.
    ///
    /// The VO key is omitted entirely when no tag was supplied:
    /// expression evaluation distinguishes an absent attribute from an
    /// empty one.
    pub fn attributes(&self) -> Map<String, Value> {
        let mut attrs = Map::new();
        attrs.insert("RequestCPUs".to_string(), Value::from(self.cpus));
        attrs.insert("RequestMemory".to_string(), Value::from(self.memory));
        if let Some(vo) = &self.vo {
            attrs.insert("VO".to_string(), Value::from(vo.clone()));
        }
        attrs
    }
}
