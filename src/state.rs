//! Component state merging.
//!
//! State is an arbitrary JSON-like tree. Patches merge into keyed mappings
//! recursively; everything else (scalars, arrays) is replaced as a whole.

use serde_json::{Map, Value};

use crate::error::{VdomError, VdomResult};

/// Merge `patch` into `state`.
///
/// - absent or non-object state is replaced by the patch
/// - object state requires an object patch ([`VdomError::UnmergeablePatch`]
///   otherwise, leaving the state untouched)
/// - per key: object into object recurses, anything else overwrites
///
/// The two levels differ. A nested key is data owned by the
/// component, so `{ "b": null }` clears `b` whatever it held. The root is the
/// state itself: components read it with JSON pointers, and a patch that
/// would turn it into a scalar or array is almost always a caller bug, so it
/// is refused rather than silently discarding every key.
///
/// ```
/// use anchor_vdom::state::merge_state;
/// use serde_json::json;
///
/// let mut state = Some(json!({ "a": { "b": 1, "c": 2 } }));
/// merge_state(&mut state, json!({ "a": { "b": 5 } })).unwrap();
/// assert_eq!(state, Some(json!({ "a": { "b": 5, "c": 2 } })));
/// ```
pub fn merge_state(state: &mut Option<Value>, patch: Value) -> VdomResult<()> {
    match state {
        Some(Value::Object(target)) => match patch {
            Value::Object(patch) => {
                merge_object(target, patch);
                Ok(())
            }
            _ => Err(VdomError::UnmergeablePatch),
        },
        _ => {
            *state = Some(patch);
            Ok(())
        }
    }
}

fn merge_object(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        match value {
            Value::Object(nested) => match target.get_mut(&key) {
                Some(Value::Object(existing)) => merge_object(existing, nested),
                _ => {
                    target.insert(key, Value::Object(nested));
                }
            },
            value => {
                target.insert(key, value);
            }
        }
    }
}
