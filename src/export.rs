//! JSON text output.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// How `Topology::to_json()` writes text.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonOptions {
    /// Embed the TopoOptions the Topology was built with.
    pub options: bool,
    /// Break long arrays and objects across lines.
    pub pretty: bool,
    /// Spaces per nesting level, when pretty.
    pub indent: usize,
    /// Arrays and objects that fit in this many columns stay on one line,
    /// when pretty.
    pub max_line_length: usize,
}

impl Default for JsonOptions {
    fn default() -> JsonOptions {
        JsonOptions {
            options: false,
            pretty: false,
            indent: 4,
            max_line_length: 88,
        }
    }
}

pub fn to_string<T: Serialize>(value: &T, json_options: &JsonOptions) -> Result<String> {
    if !json_options.pretty {
        return Ok(serde_json::to_string(value)?);
    }

    let value = serde_json::to_value(value)?;
    let mut out = String::new();
    write_pretty(&value, json_options, 0, 0, &mut out)?;
    Ok(out)
}

/// Appends `value` to `out`, which is at `column` on its current line.
fn write_pretty(value: &Value, json_options: &JsonOptions, depth: usize, column: usize, out: &mut String) -> Result<()> {
    let compact = serde_json::to_string(value)?;

    if column + compact.len() <= json_options.max_line_length {
        out.push_str(&compact);
        return Ok(());
    }

    let inner_indent = " ".repeat(json_options.indent * (depth + 1));
    let outer_indent = " ".repeat(json_options.indent * depth);

    match value {
        Value::Array(items) if !items.is_empty() => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('\n');
                out.push_str(&inner_indent);
                write_pretty(item, json_options, depth + 1, inner_indent.len(), out)?;
            }
            out.push('\n');
            out.push_str(&outer_indent);
            out.push(']');
        }
        Value::Object(map) if !map.is_empty() => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('\n');
                out.push_str(&inner_indent);
                let key = serde_json::to_string(key)?;
                out.push_str(&key);
                out.push_str(": ");
                write_pretty(item, json_options, depth + 1, inner_indent.len() + key.len() + 2, out)?;
            }
            out.push('\n');
            out.push_str(&outer_indent);
            out.push('}');
        }
        _ => out.push_str(&compact),
    }

    Ok(())
}
