//! InfluxDB line protocol encoding
//!
//! `measurement,tag=value field=value timestamp`, one point per line.
//! Tags with an empty value are left out of the line, since the protocol has
//! no way to express them.

use crate::metric::MetricPoint;

/// Encodes a single point as one line (without a trailing newline)
pub fn to_line_protocol(point: &MetricPoint) -> String {
    let mut line = escape(&point.measurement, &[',', ' ']);

    for (key, value) in &point.tags {
        if key.is_empty() || value.is_empty() {
            continue;
        }
        line.push(',');
        line.push_str(&escape(key, &[',', '=', ' ']));
        line.push('=');
        line.push_str(&escape(value, &[',', '=', ' ']));
    }

    let fields: Vec<String> = point
        .fields
        .iter()
        .filter(|(_, value)| value.is_finite())
        .map(|(key, value)| format!("{}={}", escape(key, &[',', '=', ' ']), value))
        .collect();

    line.push(' ');
    line.push_str(&fields.join(","));
    line.push(' ');
    line.push_str(&point.time.to_string());
    line
}

/// Encodes a batch of points, newline separated
pub fn encode_batch<'a, I>(points: I) -> String
where
    I: IntoIterator<Item = &'a MetricPoint>,
{
    points
        .into_iter()
        .map(to_line_protocol)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Backslash-escapes `special`; line breaks and tabs become `\n`, `\r`, `\t`
fn escape(raw: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if special.contains(&c) => {
                escaped.push('\\');
                escaped.push(c);
            }
            c => escaped.push(c),
        }
    }
    escaped
}
