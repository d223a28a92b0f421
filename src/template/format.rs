//! Numeric format strings for `${path:format}` substitutions.
//!
//! | Format | Meaning | `1234.5` | `42` |
//! |--------|---------|----------|------|
//! | `F`n | fixed point, n decimals (default 2) | `F1` → `1234.5` | `F2` → `42.00` |
//! | `N`n | fixed point with thousands separators | `N2` → `1,234.50` | `N0` → `42` |
//! | `P`n | percentage, value × 100 | `P0` → `123,450 %` | |
//! | `D`n | integer zero-padded to n digits | | `D4` → `0042` |
//! | `X`n / `x`n | hexadecimal, zero-padded | | `X` → `2A` |
//! | custom | `0` digit, `#` optional digit, `.`, `,` | `#,##0.00` → `1,234.50` | `000` → `042` |
//!
//! Anything else yields `None` and the caller falls back to the plain form.

/// Format an integer.
pub fn format_int(n: i64, spec: &str) -> Option<String> {
    let (kind, precision) = split_standard(spec)?;
    match kind {
        'D' | 'd' => {
            let digits = n.unsigned_abs().to_string();
            let width = precision.unwrap_or(0);
            let sign = if n < 0 { "-" } else { "" };
            Some(format!("{}{:0>width$}", sign, digits, width = width))
        }
        'X' => Some(format!("{:0width$X}", n, width = precision.unwrap_or(0))),
        'x' => Some(format!("{:0width$x}", n, width = precision.unwrap_or(0))),
        _ => format_float(n as f64, spec),
    }
}

/// Format a floating-point number.
pub fn format_float(f: f64, spec: &str) -> Option<String> {
    if !f.is_finite() {
        return None;
    }
    if is_custom(spec) {
        return Some(format_custom(f, spec));
    }
    let (kind, precision) = split_standard(spec)?;
    let decimals = precision.unwrap_or(2);
    match kind {
        'F' | 'f' => Some(format!("{:.*}", decimals, f)),
        'N' | 'n' => Some(grouped(f, decimals)),
        'P' | 'p' => Some(format!("{} %", grouped(f * 100.0, decimals))),
        _ => None,
    }
}

/// `F2` → (`F`, Some(2)); custom patterns and unknown letters → None.
fn split_standard(spec: &str) -> Option<(char, Option<usize>)> {
    let mut chars = spec.chars();
    let kind = chars.next()?;
    if !matches!(kind, 'F' | 'f' | 'N' | 'n' | 'P' | 'p' | 'D' | 'd' | 'X' | 'x') {
        if is_custom(spec) {
            return Some(('C', None));
        }
        return None;
    }
    let rest = chars.as_str();
    if rest.is_empty() {
        return Some((kind, None));
    }
    let precision: usize = rest.parse().ok()?;
    (precision <= 99).then_some((kind, Some(precision)))
}

fn is_custom(spec: &str) -> bool {
    !spec.is_empty()
        && spec.contains(['0', '#'])
        && spec.chars().all(|c| matches!(c, '0' | '#' | '.' | ','))
        && spec.matches('.').count() <= 1
}

/// Fixed-point with `,` between thousands.
fn grouped(f: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, f.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (fixed.as_str(), None),
    };
    let mut out = String::new();
    if f < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(d) = frac_part {
        out.push('.');
        out.push_str(d);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_custom(f: f64, spec: &str) -> String {
    let (int_pat, frac_pat) = spec.split_once('.').unwrap_or((spec, ""));
    let min_int = int_pat.matches('0').count();
    let min_frac = frac_pat.matches('0').count();
    let max_frac = min_frac + frac_pat.matches('#').count();
    let grouping = int_pat.contains(',');

    let fixed = format!("{:.*}", max_frac, f.abs());
    let (int_digits, frac_digits) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut frac = frac_digits.to_string();
    while frac.len() > min_frac && frac.ends_with('0') {
        frac.pop();
    }

    let mut int = int_digits.trim_start_matches('0').to_string();
    while int.len() < min_int {
        int.insert(0, '0');
    }
    if grouping {
        int = group_thousands(&int);
    }

    let mut out = String::new();
    if f < 0.0 && (int.chars().chain(frac.chars())).any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&int);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    out
}
