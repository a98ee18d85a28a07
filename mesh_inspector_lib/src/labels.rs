use std::collections::BTreeMap;

pub type Labels = BTreeMap<String, String>;

/// Equality-based selector test: every key of `selector` must be present in
/// `labels` with the same value. An empty selector matches anything, so callers
/// that must not select everything check for emptiness themselves.
pub fn matches(selector: &Labels, labels: &Labels) -> bool {
    selector.iter()
        .all(|(key, value)| labels.get(key) == Some(value))
}
