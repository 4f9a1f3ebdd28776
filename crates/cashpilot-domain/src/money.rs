//! Monetary amounts expressed as signed integers in minor currency units.

/// Renders a minor-unit amount as a pound figure with two decimal places.
///
/// All balance arithmetic stays in integer pence; this helper exists purely
/// for user-facing text such as alert messages.
pub fn format_minor(amount_minor: i64) -> String {
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    format!("{sign}\u{a3}{}.{:02}", abs / 100, abs % 100)
}
