// Fixed-width percentage gauge bar

use super::RenderError;

/// Render a 0-100 percentage as a fixed-width block bar. Out-of-range
/// inputs clamp; only a zero width is a caller bug.
pub fn gauge(percent: f64, width: usize) -> Result<String, RenderError> {
    if width == 0 {
        return Err(RenderError::ZeroWidth);
    }
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).floor() as usize;
    let filled = filled.min(width);
    Ok(format!(
        "{}{}",
        "█".repeat(filled),
        " ".repeat(width - filled)
    ))
}
