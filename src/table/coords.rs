/// Parses one coordinate cell. Surrounding whitespace is ignored; anything
/// that is not a finite number is rejected.
pub fn parse_coordinate(raw: &str) -> Result<f64, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err("missing coordinate".to_string());
    }

    let parsed: f64 = value
        .parse()
        .map_err(|_| "not a number".to_string())?;
    if !parsed.is_finite() {
        return Err("not a finite number".to_string());
    }
    Ok(parsed)
}
