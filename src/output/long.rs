use crate::catalog::Resource;

pub struct LongFormatter;

impl LongFormatter {
    /// Pretty-print one resource's full normalized record, field order
    /// preserved.
    pub fn format(resource: &Resource) -> String {
        serde_json::to_string_pretty(resource.record()).unwrap_or_else(|_| "{}".to_string())
    }
}
