//! snake_case <-> camelCase key renaming.

use serde_json::{Map, Value};

use super::ID;

/// `stroke_width` -> `strokeWidth`.
///
/// An underscore followed by an ASCII letter is removed and the letter is
/// upper-cased; any other underscore is kept. `id` is returned unchanged.
pub fn snake_to_camel(key: &str) -> String {
    if key == ID {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('_', Some(next)) if next.is_ascii_alphabetic() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// `strokeWidth` -> `stroke_width`.
///
/// An underscore is inserted before every uppercase letter except a
/// leading one, then the whole key is lower-cased.
pub fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Rename every key of `map` (recursing into nested objects) with `rename`.
pub fn rename_keys(map: Map<String, Value>, rename: fn(&str) -> String) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Object(inner) => Value::Object(rename_keys(inner, rename)),
                other => other,
            };
            (rename(&key), value)
        })
        .collect()
}
