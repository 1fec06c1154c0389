//! Display-oriented YAML formatting for JSON values.
//!
//! Tool inputs and log metadata arrive as JSON but read much better as
//! YAML in a terminal. This is a one-way formatter for display only; it
//! quotes exactly the scalars that would be ambiguous and never attempts
//! to be parseable back.

use serde_json::{Map, Value};

/// Render a JSON value as indented display YAML. No trailing newline.
pub fn to_display_yaml(value: &Value) -> String {
    let mut lines = Vec::new();
    match value {
        Value::Object(map) if !map.is_empty() => push_object(&mut lines, map, 0),
        Value::Array(items) if !items.is_empty() => push_array(&mut lines, items, 0),
        other => lines.push(scalar(other)),
    }
    lines.join("\n")
}

fn push_object(lines: &mut Vec<String>, map: &Map<String, Value>, indent: usize) {
    let pad = " ".repeat(indent);
    for (key, value) in map {
        let key = quote_if_needed(key);
        match value {
            Value::Object(inner) if inner.is_empty() => lines.push(format!("{pad}{key}: {{}}")),
            Value::Array(inner) if inner.is_empty() => lines.push(format!("{pad}{key}: []")),
            Value::Object(inner) => {
                lines.push(format!("{pad}{key}:"));
                push_object(lines, inner, indent + 2);
            }
            Value::Array(inner) => {
                lines.push(format!("{pad}{key}:"));
                push_array(lines, inner, indent + 2);
            }
            scalar_value => lines.push(format!("{pad}{key}: {}", scalar(scalar_value))),
        }
    }
}

fn push_array(lines: &mut Vec<String>, items: &[Value], indent: usize) {
    let pad = " ".repeat(indent);
    for item in items {
        match item {
            Value::Object(map) if !map.is_empty() => {
                // First entry shares the dash line, the rest align under it.
                let mut inner = Vec::new();
                push_object(&mut inner, map, 0);
                let mut first = true;
                for line in inner {
                    if first {
                        lines.push(format!("{pad}- {line}"));
                        first = false;
                    } else {
                        lines.push(format!("{pad}  {line}"));
                    }
                }
            }
            Value::Array(nested) if !nested.is_empty() => {
                lines.push(format!("{pad}-"));
                push_array(lines, nested, indent + 2);
            }
            other => lines.push(format!("{pad}- {}", scalar(other))),
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote_if_needed(s),
        Value::Object(_) => "{}".to_string(),
        Value::Array(_) => "[]".to_string(),
    }
}

fn quote_if_needed(text: &str) -> String {
    if needs_quotes(text) {
        // JSON string escaping doubles as YAML double-quote escaping here.
        Value::String(text.to_string()).to_string()
    } else {
        text.to_string()
    }
}

fn needs_quotes(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        return true;
    }
    if matches!(text, "true" | "false" | "null" | "~" | "yes" | "no") {
        return true;
    }
    if text.parse::<f64>().is_ok() {
        return true;
    }
    if text
        .starts_with(['-', '?', '#', '&', '*', '!', '|', '>', '%', '@', '`', '"', '\''])
    {
        return true;
    }
    text.contains('\n') || text.contains(": ") || text.ends_with(':') || text.contains(" #")
}
