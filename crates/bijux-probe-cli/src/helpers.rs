use bijux_probe_core::parse_bool_flag;
use serde_json::Value;

/// Writes a `--json` payload as one line on stdout.
pub(crate) fn emit_ok(payload: &Value) -> Result<(), String> {
    println!(
        "{}",
        serde_json::to_string(payload).map_err(|e| e.to_string())?
    );
    Ok(())
}

pub(crate) fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .as_deref()
        .and_then(parse_bool_flag)
        .unwrap_or(default)
}

/// Cuts `text` to at most `max_chars` characters, marking the cut with `...`.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let head: String = text.chars().take(keep).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 72), "short");
        assert_eq!(truncate("ééééé", 4), "é...");
        assert_eq!(truncate(&"x".repeat(80), 72).chars().count(), 72);
    }
}
