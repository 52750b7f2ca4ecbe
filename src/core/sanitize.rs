// src/core/sanitize.rs

/// Collapse whitespace runs to one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Leading-integer parse: optional sign then digits, trailing junk ignored.
/// `" 12 members"` → 12, `"n/a"` → None.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let t = s.trim_start();
    let (neg, digits) = match t.as_bytes().first() {
        Some(b'-') => (true, &t[1..]),
        Some(b'+') => (false, &t[1..]),
        _ => (false, t),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let v: i64 = digits[..end].parse().ok()?;
    Some(if neg { -v } else { v })
}

/// Split a comma-joined group cell, dropping the placeholder and empties.
pub fn split_groups(cell: &str, placeholder: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != placeholder)
        .map(String::from)
        .collect()
}

/// Keep only characters that are safe in a file name on every platform.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let out: String = name
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let out = out.trim().trim_matches('.').to_string();
    if out.is_empty() { s!(fallback) } else { out }
}
