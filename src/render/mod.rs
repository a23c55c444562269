// Text rendering: sparkline grids, gauge bars, placeholders.
// Everything here is a pure function of its arguments; repeated renders of
// unchanged data produce byte-identical output.

mod gauge;
mod sparkline;

pub use gauge::gauge;
pub use sparkline::{FillMode, GlyphMode, axis_labels, sparkline, sparkline_labeled};

use thiserror::Error;

/// Contract violations from the renderer. The caller controls dimensions,
/// so these indicate a caller bug rather than an environmental condition;
/// this is the only error class in the crate that propagates hard.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("render width must be > 0")]
    ZeroWidth,
    #[error("render height must be > 0")]
    ZeroHeight,
    #[error("y_max must not be below y_min")]
    InvertedAxis,
}

/// Explicit "no data" line for an unavailable or failed sub-metric, so the
/// user can tell "not measured" from "truly zero".
pub fn placeholder(width: usize) -> String {
    let msg = "no data";
    if width <= msg.len() {
        return msg[..width].to_string();
    }
    let left = (width - msg.len()) / 2;
    let right = width - msg.len() - left;
    format!("{}{}{}", " ".repeat(left), msg, " ".repeat(right))
}
