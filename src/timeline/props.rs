//! Free-form entity props and patch semantics.
//!
//! Props are a flat JSON object. A patch is another object whose keys
//! overwrite the corresponding top-level props keys; nested values are
//! replaced as whole values, never deep-merged. Models read props through
//! the typed getters here so a wrong-typed patch value simply leaves the
//! prior state untouched.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde_json::{Map, Value};

/// Flat props mapping attached to every entity.
pub type Props = Map<String, Value>;

/// Overwrite top-level keys of `props` with the entries of `patch`.
pub fn apply_patch(props: &mut Props, patch: &Props) {
    for (key, value) in patch {
        props.insert(key.clone(), value.clone());
    }
}

/// Interpret a raw JSON value as a patch. Non-objects are not patches.
pub fn as_patch(value: &Value) -> Option<&Props> {
    value.as_object()
}

pub fn get_str<'a>(props: &'a Props, key: &str) -> Option<&'a str> {
    props.get(key).and_then(Value::as_str)
}

pub fn get_bool(props: &Props, key: &str) -> Option<bool> {
    props.get(key).and_then(Value::as_bool)
}

pub fn get_array<'a>(props: &'a Props, key: &str) -> Option<&'a Vec<Value>> {
    props.get(key).and_then(Value::as_array)
}

/// Hash the props a renderer declares relevant, or every key when it
/// declares none.
///
/// Declared keys are hashed in declared order; the undeclared case walks
/// keys in sorted order so the result does not depend on map insertion
/// order. Values are hashed through their compact JSON serialization, which
/// is stable for a given value.
pub fn props_hash(props: &Props, relevant: Option<&[&str]>) -> u64 {
    let mut hasher = DefaultHasher::new();
    match relevant {
        Some(keys) => {
            for key in keys {
                key.hash(&mut hasher);
                if let Some(value) = props.get(*key) {
                    value.to_string().hash(&mut hasher);
                }
            }
        }
        None => {
            let mut keys: Vec<&String> = props.keys().collect();
            keys.sort();
            for key in keys {
                key.hash(&mut hasher);
                if let Some(value) = props.get(key) {
                    value.to_string().hash(&mut hasher);
                }
            }
        }
    }
    hasher.finish()
}
