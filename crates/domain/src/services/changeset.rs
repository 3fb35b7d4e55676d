//! Change-set extraction for update events.
//!
//! Given two attribute snapshots of the same entity, computes the before/after
//! payloads restricted to the fields that actually changed, minus the
//! non-semantic exclusion list and the sensitive denylist. An update touching
//! only excluded fields yields no change set at all, and the caller writes no
//! record.

use crate::models::AttributeMap;
use crate::services::sanitize::{is_sensitive, sanitize};

/// Non-semantic fields never reported in a change set.
pub const EXCLUDED_FIELDS: [&str; 1] = ["updated_at"];

fn is_excluded(field: &str) -> bool {
    EXCLUDED_FIELDS.contains(&field)
}

/// Names of attributes whose values differ between the two snapshots,
/// including keys present on only one side.
pub fn changed_keys(before: &AttributeMap, after: &AttributeMap) -> Vec<String> {
    let mut keys: Vec<String> = before
        .iter()
        .filter(|(key, old)| after.get(key.as_str()) != Some(*old))
        .map(|(key, _)| key.clone())
        .collect();
    for key in after.keys() {
        if !before.contains_key(key) {
            keys.push(key.clone());
        }
    }
    keys
}

/// Restrict both snapshots to `changed` keys, drop excluded fields, sanitize,
/// and return the pair. `None` signals an empty change set.
pub fn extract_change_set(
    before: &AttributeMap,
    after: &AttributeMap,
    changed: &[String],
) -> Option<(AttributeMap, AttributeMap)> {
    let relevant: Vec<&String> = changed
        .iter()
        .filter(|key| !is_excluded(key) && !is_sensitive(key))
        .collect();

    if relevant.is_empty() {
        return None;
    }

    let restrict = |snapshot: &AttributeMap| -> AttributeMap {
        relevant
            .iter()
            .filter_map(|key| {
                snapshot
                    .get(key.as_str())
                    .map(|value| ((*key).clone(), value.clone()))
            })
            .collect()
    };

    // Sanitize again after restriction; cheap on already-filtered keys and
    // keeps the denylist guarantee local to this function.
    let before_out = sanitize(&restrict(before));
    let after_out = sanitize(&restrict(after));

    if before_out.is_empty() && after_out.is_empty() {
        return None;
    }

    Some((before_out, after_out))
}
