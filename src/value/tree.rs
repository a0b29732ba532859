//! Tree reads and writes
//!
//! Get, set, and delete at a path inside a `serde_json::Value`. Reads are
//! total: a missing or wrong-kind intermediate yields `None`, never a
//! panic. Writes create missing intermediates on demand, choosing map or
//! array from the next segment's kind.

use serde_json::{Map, Value};

use super::path::{Path, Segment};

/// Reads the value at `path`. `None` when any intermediate is missing or
/// of the wrong kind.
pub fn get_path<'a>(tree: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = tree;
    for segment in path.segments() {
        current = match (segment, current) {
            (Segment::Key(name), Value::Object(map)) => map.get(name.as_str())?,
            (Segment::Index(index), Value::Array(items)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Mutable variant of [`get_path`].
pub fn get_path_mut<'a>(tree: &'a mut Value, path: &Path) -> Option<&'a mut Value> {
    let mut current = tree;
    for segment in path.segments() {
        current = match (segment, current) {
            (Segment::Key(name), Value::Object(map)) => map.get_mut(name.as_str())?,
            (Segment::Index(index), Value::Array(items)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Writes `value` at `path`, creating missing intermediates on demand.
///
/// A key segment materializes a map, an index segment materializes an
/// array padded with nulls up to the index. An intermediate of the wrong
/// kind is replaced by the kind the segment requires. Writing at the root
/// path replaces the whole tree.
pub fn set_path(tree: &mut Value, path: &Path, value: Value) {
    let segments = path.segments();
    let mut current = tree;
    for (position, segment) in segments.iter().enumerate() {
        let last = position + 1 == segments.len();
        match segment {
            Segment::Key(name) => {
                if !current.is_object() {
                    *current = Value::Object(Map::new());
                }
                let map = match current {
                    Value::Object(map) => map,
                    _ => return,
                };
                if last {
                    map.insert(name.clone(), value);
                    return;
                }
                current = map.entry(name.clone()).or_insert(Value::Null);
            }
            Segment::Index(index) => {
                if !current.is_array() {
                    *current = Value::Array(Vec::new());
                }
                let items = match current {
                    Value::Array(items) => items,
                    _ => return,
                };
                while items.len() <= *index {
                    items.push(Value::Null);
                }
                if last {
                    items[*index] = value;
                    return;
                }
                current = &mut items[*index];
            }
        }
    }
    // Only the root path reaches here.
    *current = value;
}

/// Removes and returns the value at `path`.
///
/// Removing an array element shifts the later elements down. `None` when
/// the path is the root or nothing exists there.
pub fn delete_path(tree: &mut Value, path: &Path) -> Option<Value> {
    let (parent_path, last) = path.split_last()?;
    let parent = get_path_mut(tree, &parent_path)?;
    match (last, parent) {
        (Segment::Key(name), Value::Object(map)) => map.shift_remove(name.as_str()),
        (Segment::Index(index), Value::Array(items)) if *index < items.len() => {
            Some(items.remove(*index))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(encoded: &str) -> Path {
        Path::parse(encoded).unwrap()
    }

    #[test]
    fn test_get_nested() {
        let tree = json!({"a": {"b": [{"c": 7}]}});
        assert_eq!(get_path(&tree, &parse("a.b[0].c")), Some(&json!(7)));
        assert_eq!(get_path(&tree, &parse("a.b")), Some(&json!([{"c": 7}])));
    }

    #[test]
    fn test_get_root() {
        let tree = json!({"a": 1});
        assert_eq!(get_path(&tree, &Path::root()), Some(&tree));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let tree = json!({"a": {"b": 1}});
        assert_eq!(get_path(&tree, &parse("a.c")), None);
        assert_eq!(get_path(&tree, &parse("a.b.c")), None);
        assert_eq!(get_path(&tree, &parse("a.b[0]")), None);
        assert_eq!(get_path(&tree, &parse("z[9].q")), None);
    }

    #[test]
    fn test_get_wrong_kind_returns_none() {
        let tree = json!({"a": [1, 2]});
        // Key segment into an array and index segment into a map.
        assert_eq!(get_path(&tree, &parse("a.b")), None);
        assert_eq!(get_path(&tree, &parse("a[0].b")), None);
    }

    #[test]
    fn test_set_existing_leaf() {
        let mut tree = json!({"a": {"b": 1}});
        set_path(&mut tree, &parse("a.b"), json!(2));
        assert_eq!(tree, json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_set_creates_intermediate_maps() {
        let mut tree = json!({});
        set_path(&mut tree, &parse("a.b.c"), json!("x"));
        assert_eq!(tree, json!({"a": {"b": {"c": "x"}}}));
    }

    #[test]
    fn test_set_creates_arrays_with_null_fill() {
        let mut tree = json!({});
        set_path(&mut tree, &parse("a[2]"), json!("x"));
        assert_eq!(tree, json!({"a": [null, null, "x"]}));
    }

    #[test]
    fn test_set_mixed_creation() {
        let mut tree = json!({});
        set_path(&mut tree, &parse("a[0].b"), json!(true));
        assert_eq!(tree, json!({"a": [{"b": true}]}));
    }

    #[test]
    fn test_set_replaces_wrong_kind_intermediate() {
        let mut tree = json!({"a": "scalar"});
        set_path(&mut tree, &parse("a.b"), json!(1));
        assert_eq!(tree, json!({"a": {"b": 1}}));

        let mut tree = json!({"a": {"b": 1}});
        set_path(&mut tree, &parse("a[0]"), json!(2));
        assert_eq!(tree, json!({"a": [2]}));
    }

    #[test]
    fn test_set_root_replaces_tree() {
        let mut tree = json!({"a": 1});
        set_path(&mut tree, &Path::root(), json!([1, 2]));
        assert_eq!(tree, json!([1, 2]));
    }

    #[test]
    fn test_delete_map_key() {
        let mut tree = json!({"a": {"b": 1, "c": 2}});
        assert_eq!(delete_path(&mut tree, &parse("a.b")), Some(json!(1)));
        assert_eq!(tree, json!({"a": {"c": 2}}));
    }

    #[test]
    fn test_delete_array_element_shifts() {
        let mut tree = json!({"a": [10, 20, 30]});
        assert_eq!(delete_path(&mut tree, &parse("a[1]")), Some(json!(20)));
        assert_eq!(tree, json!({"a": [10, 30]}));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut tree = json!({"a": [1]});
        assert_eq!(delete_path(&mut tree, &parse("a[5]")), None);
        assert_eq!(delete_path(&mut tree, &parse("b.c")), None);
        assert_eq!(delete_path(&mut tree, &Path::root()), None);
        assert_eq!(tree, json!({"a": [1]}));
    }
}
