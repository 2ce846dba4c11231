#[must_use]
pub(super) fn read_non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[must_use]
pub(super) fn read_env_or(name: &str, default_value: &str) -> String {
    read_non_empty_env(name).unwrap_or_else(|| default_value.to_string())
}

#[must_use]
pub(super) fn read_env_flag(name: &str) -> bool {
    let raw = std::env::var(name).ok();
    parse_enabled_default_false(raw.as_deref())
}

#[must_use]
pub(super) fn read_env_u64(name: &str, default_value: u64, min_value: u64) -> u64 {
    let raw = std::env::var(name).ok();
    parse_u64(raw.as_deref(), default_value, min_value)
}

#[must_use]
pub(super) fn parse_u64(raw: Option<&str>, default_value: u64, min_value: u64) -> u64 {
    raw.and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|value| *value >= min_value)
        .unwrap_or(default_value)
}

/// Percentages outside `0..=100` are clamped rather than rejected.
#[must_use]
pub(super) fn parse_percentage(raw: Option<&str>, default_value: u8) -> u8 {
    raw.and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .map_or(default_value, |value| value.clamp(0.0, 100.0).round() as u8)
}

#[must_use]
pub(super) fn parse_enabled_default_false(raw: Option<&str>) -> bool {
    let normalized = raw.map(|value| value.trim().to_ascii_lowercase());
    matches!(normalized.as_deref(), Some("on" | "1" | "true" | "yes"))
}
