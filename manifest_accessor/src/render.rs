//! Text rendering of parsed manifests.
//!
//! Tool output has always used the Python-literal notation clients already
//! parse: `{'replicas': 3}`, `['a', 'b']`, `True`, `None`. Top-level strings
//! are emitted bare; strings nested in collections are quoted.

use serde_yaml_ng::Value;

/// True for documents that carry no content at all.
pub fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Sequence(items) => items.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        Value::Tagged(tagged) => is_empty_document(&tagged.value),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Render a whole document. Empty documents render as the empty string.
pub fn render_document(value: &Value) -> String {
    if is_empty_document(value) {
        return String::new();
    }
    match value {
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => render_document(&tagged.value),
        other => render_value(other),
    }
}

/// Render a value nested inside a document.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                render_float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => quote(s),
        Value::Sequence(items) => {
            let inner: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Mapping(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", render_value(k), render_value(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
        Value::Tagged(tagged) => render_value(&tagged.value),
    }
}

fn render_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        // 1e20 -> "1e+20", 1.5e-7 -> "1.5e-07"
        let formatted = format!("{:e}", f);
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    if f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

fn quote(s: &str) -> String {
    let delimiter = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(delimiter);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}
