//! Dotted/bracketed variable paths such as `party[0].attributes.strength`.

use serde_json::Value;

/// One step of a variable path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Parse a path. Returns `None` for malformed paths.
pub fn parse_path(path: &str) -> Option<Vec<PathSegment>> {
    let mut segments = Vec::new();
    let mut chars = path.trim().chars().peekable();
    let mut key = String::new();
    // Set after `]` so that `a[0]b` is rejected but `a[0].b` and `a[0][1]` are fine.
    let mut after_bracket = false;

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if key.is_empty() && !after_bracket {
                    return None;
                }
                if !key.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut key)));
                }
                after_bracket = false;
                if chars.peek().is_none() {
                    return None;
                }
            }
            '[' => {
                if !key.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut key)));
                } else if segments.is_empty() {
                    return None;
                }
                let mut inner = String::new();
                loop {
                    match chars.next()? {
                        ']' => break,
                        ch => inner.push(ch),
                    }
                }
                segments.push(parse_bracket(inner.trim())?);
                after_bracket = true;
            }
            ']' => return None,
            _ => {
                if after_bracket {
                    return None;
                }
                key.push(c);
            }
        }
    }

    if !key.is_empty() {
        segments.push(PathSegment::Key(key));
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

fn parse_bracket(inner: &str) -> Option<PathSegment> {
    if let Ok(index) = inner.parse::<usize>() {
        return Some(PathSegment::Index(index));
    }
    let quoted = inner
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| inner.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))?;
    Some(PathSegment::Key(quoted.to_string()))
}

/// Walk `segments` from `root`. `None` means the path does not resolve.
pub fn resolve_segments(root: &Value, segments: &[PathSegment]) -> Option<Value> {
    let mut current = root;
    for (position, segment) in segments.iter().enumerate() {
        let next = match (current, segment) {
            (Value::Object(map), PathSegment::Key(key)) => map.get(key),
            (Value::Object(map), PathSegment::Index(index)) => map.get(&index.to_string()),
            (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
            (Value::Array(items), PathSegment::Key(key)) => match key.parse::<usize>() {
                Ok(index) => items.get(index),
                Err(_) if key == "length" && position + 1 == segments.len() => {
                    return Some(Value::from(items.len()));
                }
                Err(_) => None,
            },
            (Value::String(text), PathSegment::Key(key))
                if key == "length" && position + 1 == segments.len() =>
            {
                return Some(Value::from(text.chars().count()));
            }
            _ => None,
        };
        current = next?;
    }
    Some(current.clone())
}
