//! The recursive merge algorithm.
//!
//! Objects merge key by key, arrays go through the array policy, and
//! everything else (scalars, type mismatches, empty values) goes through
//! the gap/conflict rule:
//!
//! | existing  | incoming  | outcome                                  |
//! |-----------|-----------|------------------------------------------|
//! | empty     | empty     | existing, no record                      |
//! | empty     | non-empty | incoming, `fill`                         |
//! | non-empty | empty     | existing, `keep`                         |
//! | equal     | equal     | existing, no record                      |
//! | differ    | differ    | incoming + `force`, or existing + `skip` |

use std::collections::{HashMap, HashSet, VecDeque};

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::change::{ChangeAction, ChangeRecord, MergeResult};
use crate::document::{all_objects, all_strings, is_empty, preview};
use crate::policy::MergePolicy;

/// Merge `incoming` into `existing` with the default policy.
///
/// With `force` set, conflicting non-empty values are replaced by the
/// incoming value; otherwise they are kept and recorded as `skip`.
pub fn merge(existing: &Value, incoming: &Value, force: bool) -> MergeResult {
    merge_with(existing, incoming, &MergePolicy::with_force(force))
}

/// Merge `incoming` into `existing` under an explicit policy.
pub fn merge_with(existing: &Value, incoming: &Value, policy: &MergePolicy) -> MergeResult {
    let mut merger = Merger {
        policy,
        changes: Vec::new(),
    };
    let merged = merger.merge_node("", existing, incoming);
    let result = MergeResult {
        merged,
        changes: merger.changes,
    };
    debug!(
        force = policy.force_overwrite,
        records = result.changes.len(),
        summary = %result.summary(),
        "merge complete"
    );
    result
}

struct Merger<'p> {
    policy: &'p MergePolicy,
    changes: Vec<ChangeRecord>,
}

impl Merger<'_> {
    fn merge_node(&mut self, path: &str, existing: &Value, incoming: &Value) -> Value {
        match (existing, incoming) {
            (Value::Object(old), Value::Object(new)) => Value::Object(self.merge_objects(path, old, new)),
            (Value::Array(old), Value::Array(new)) => match self.merge_arrays(path, old, new) {
                Some(merged) => merged,
                None => self.merge_scalar(path, existing, incoming),
            },
            _ => self.merge_scalar(path, existing, incoming),
        }
    }

    fn merge_objects(
        &mut self,
        path: &str,
        old: &Map<String, Value>,
        new: &Map<String, Value>,
    ) -> Map<String, Value> {
        let mut out = old.clone();
        for (key, new_val) in new {
            let child = child_path(path, key);
            match old.get(key) {
                Some(old_val) => {
                    let merged = self.merge_node(&child, old_val, new_val);
                    // Re-inserting an existing key keeps its position.
                    out.insert(key.clone(), merged);
                }
                None if is_empty(new_val) => {
                    trace!(path = %display_path(&child), "dropping empty new key");
                }
                None => {
                    self.push(
                        &child,
                        ChangeAction::Fill,
                        Some("null".to_string()),
                        Some(self.preview(new_val)),
                    );
                    out.insert(key.clone(), new_val.clone());
                }
            }
        }
        out
    }

    /// Returns `None` when the pair must be treated as one atomic value.
    fn merge_arrays(&mut self, path: &str, old: &[Value], new: &[Value]) -> Option<Value> {
        if new.is_empty() {
            return Some(Value::Array(old.to_vec()));
        }
        if old.is_empty() {
            self.push(
                path,
                ChangeAction::Fill,
                Some("[]".to_string()),
                Some(format!("{} item(s)", new.len())),
            );
            return Some(Value::Array(new.to_vec()));
        }
        if all_strings(old) && all_strings(new) {
            return Some(self.union_strings(path, old, new));
        }
        if all_objects(old) && all_objects(new) {
            let policy = self.policy;
            match policy.match_keys.resolve(new) {
                Some(key) => return Some(self.merge_keyed(path, old, new, key)),
                None => debug!(path = %display_path(path), "no match key; merging array atomically"),
            }
        }
        None
    }

    fn union_strings(&mut self, path: &str, old: &[Value], new: &[Value]) -> Value {
        let mut out = old.to_vec();
        let mut seen: HashSet<&str> = old.iter().filter_map(Value::as_str).collect();
        let mut added = 0usize;
        for item in new {
            if let Some(s) = item.as_str() {
                if seen.insert(s) {
                    out.push(item.clone());
                    added += 1;
                }
            }
        }
        if added > 0 {
            self.push(path, ChangeAction::Append, None, Some(format!("+{added} item(s)")));
        }
        Value::Array(out)
    }

    /// Merge arrays of objects correlated by `key`.
    ///
    /// The n-th incoming element carrying a key value pairs with the n-th
    /// existing element carrying the same value. Elements whose key value is
    /// empty are never matched: existing ones stay untouched, incoming ones
    /// are appended.
    fn merge_keyed(&mut self, path: &str, old: &[Value], new: &[Value], key: &str) -> Value {
        let mut slots: HashMap<String, VecDeque<usize>> = HashMap::new();
        for (pos, item) in old.iter().enumerate() {
            if let Some(value) = key_value(item, key) {
                slots.entry(value.to_string()).or_default().push_back(pos);
            }
        }
        trace!(path = %display_path(path), key, indexed = slots.len(), "merging keyed array");

        let mut out = old.to_vec();
        for item in new {
            let value = key_value(item, key);
            let slot = value
                .and_then(|v| slots.get_mut(&v.to_string()))
                .and_then(VecDeque::pop_front);
            let item_path = match value {
                Some(v) => format!("{path}[{key}={}]", self.preview(v)),
                None => path.to_string(),
            };

            match slot {
                Some(pos) => {
                    let merged = self.merge_node(&item_path, &out[pos], item);
                    out[pos] = merged;
                }
                None if out.contains(item) => {
                    trace!(path = %display_path(&item_path), "identical item already present");
                }
                None => {
                    let description = match value {
                        Some(v) => format!("new item ({key}={})", self.preview(v)),
                        None => format!("new item ({key} missing)"),
                    };
                    self.push(&item_path, ChangeAction::Append, None, Some(description));
                    out.push(item.clone());
                }
            }
        }
        Value::Array(out)
    }

    fn merge_scalar(&mut self, path: &str, existing: &Value, incoming: &Value) -> Value {
        match (is_empty(existing), is_empty(incoming)) {
            (true, true) => existing.clone(),
            (true, false) => {
                self.push(
                    path,
                    ChangeAction::Fill,
                    Some(self.preview(existing)),
                    Some(self.preview(incoming)),
                );
                incoming.clone()
            }
            (false, true) => {
                self.push(path, ChangeAction::Keep, Some(self.preview(existing)), None);
                existing.clone()
            }
            (false, false) if existing == incoming => existing.clone(),
            (false, false) => {
                let action = if self.policy.force_overwrite {
                    ChangeAction::Force
                } else {
                    ChangeAction::Skip
                };
                self.push(
                    path,
                    action,
                    Some(self.preview(existing)),
                    Some(self.preview(incoming)),
                );
                if self.policy.force_overwrite {
                    incoming.clone()
                } else {
                    existing.clone()
                }
            }
        }
    }

    fn preview(&self, value: &Value) -> String {
        preview(value, self.policy.preview_width)
    }

    fn push(&mut self, path: &str, action: ChangeAction, old: Option<String>, new: Option<String>) {
        let path = display_path(path);
        trace!(%path, %action, "merge decision");
        self.changes.push(ChangeRecord::new(path, action, old, new));
    }
}

fn key_value<'a>(item: &'a Value, key: &str) -> Option<&'a Value> {
    item.get(key).filter(|v| !is_empty(v))
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        path.to_string()
    }
}
