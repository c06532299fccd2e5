// Formatting and logging helpers shared by the views.

/// Two-decimal score text without trailing zeros: `4`, `4.5`, `4.25`.
pub fn format_score(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        s => s.to_string(),
    }
}

pub fn clog(msg: &str) {
    gloo::console::log!(msg);
}
