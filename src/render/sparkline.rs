// History window to quantized glyph grid

use super::RenderError;

/// Cell encoding for one sample column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphMode {
    /// Braille dots, 4 vertical levels per cell row.
    Dots,
    /// Full blocks, 1 level per cell row.
    Blocks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// Light all levels up to the mapped level (area/bar look).
    Filled,
    /// Light only the mapped level (line look).
    Outline,
}

/// Braille dot bits per visual dot row, top to bottom; the left and right
/// dot columns are lit together so a one-cell column reads as solid.
const DOT_BITS: [u32; 4] = [0x01 | 0x08, 0x02 | 0x10, 0x04 | 0x20, 0x40 | 0x80];
const BRAILLE_BASE: u32 = 0x2800;

impl GlyphMode {
    fn levels_per_row(self) -> usize {
        match self {
            GlyphMode::Dots => 4,
            GlyphMode::Blocks => 1,
        }
    }
}

/// Quantize the last `width` samples of `series` onto a `width` x `height`
/// glyph grid, top row first. Values map linearly from `[y_min, y_max]`
/// to `[0, height * levels_per_row]`; a degenerate axis (`y_max == y_min`)
/// is widened by one so the mapping stays defined. Short series are
/// left-padded with blank columns.
pub fn sparkline(
    series: &[f64],
    width: usize,
    height: usize,
    y_min: f64,
    y_max: f64,
    glyph: GlyphMode,
    fill: FillMode,
) -> Result<Vec<String>, RenderError> {
    if width == 0 {
        return Err(RenderError::ZeroWidth);
    }
    if height == 0 {
        return Err(RenderError::ZeroHeight);
    }
    if y_max < y_min {
        return Err(RenderError::InvertedAxis);
    }
    let y_max = if y_max == y_min { y_min + 1.0 } else { y_max };

    let levels_per_row = glyph.levels_per_row();
    let total_levels = height * levels_per_row;
    let span = y_max - y_min;

    let skip = series.len().saturating_sub(width);
    let window = &series[skip..];
    let pad = width - window.len();
    let levels: Vec<usize> = (0..width)
        .map(|col| {
            if col < pad {
                0
            } else {
                let t = ((window[col - pad] - y_min) / span).clamp(0.0, 1.0);
                (t * total_levels as f64).floor() as usize
            }
        })
        .collect();

    let mut rows = Vec::with_capacity(height);
    for row in 0..height {
        let row_base = (height - 1 - row) * levels_per_row;
        let mut line = String::with_capacity(width * 3);
        for &level in &levels {
            let ch = match glyph {
                GlyphMode::Dots => {
                    let bits: u32 = match fill {
                        FillMode::Filled => {
                            let lit = level.saturating_sub(row_base).min(levels_per_row);
                            // Dots light from the bottom of the cell up.
                            (0..4).filter(|d| *d >= 4 - lit).map(|d| DOT_BITS[d]).sum()
                        }
                        FillMode::Outline => match level.checked_sub(1) {
                            Some(top) if (row_base..row_base + levels_per_row).contains(&top) => {
                                DOT_BITS[3 - (top - row_base)]
                            }
                            _ => 0,
                        },
                    };
                    if bits == 0 {
                        ' '
                    } else {
                        char::from_u32(BRAILLE_BASE + bits).unwrap_or(' ')
                    }
                }
                GlyphMode::Blocks => {
                    let lit = match fill {
                        FillMode::Filled => level > row_base,
                        FillMode::Outline => level == row_base + 1,
                    };
                    if lit { '█' } else { ' ' }
                }
            };
            line.push(ch);
        }
        rows.push(line);
    }
    Ok(rows)
}

/// Axis labels for a grid of `height` rows: `y_max` on the top row,
/// `y_min` on the bottom, interior rows blank, all padded to one width.
pub fn axis_labels(y_min: f64, y_max: f64, height: usize) -> Vec<String> {
    let y_max = if y_max == y_min { y_min + 1.0 } else { y_max };
    let top = format_axis_value(y_max);
    let bottom = format_axis_value(y_min);
    let label_width = top.len().max(bottom.len());
    (0..height)
        .map(|row| {
            if row == 0 {
                format!("{top:>label_width$}")
            } else if row + 1 == height {
                format!("{bottom:>label_width$}")
            } else {
                " ".repeat(label_width)
            }
        })
        .collect()
}

/// Grid rows with axis labels attached.
pub fn sparkline_labeled(
    series: &[f64],
    width: usize,
    height: usize,
    y_min: f64,
    y_max: f64,
    glyph: GlyphMode,
    fill: FillMode,
) -> Result<Vec<String>, RenderError> {
    let rows = sparkline(series, width, height, y_min, y_max, glyph, fill)?;
    let labels = axis_labels(y_min, y_max, height);
    Ok(rows
        .into_iter()
        .zip(labels)
        .map(|(row, label)| format!("{label}│{row}"))
        .collect())
}

fn format_axis_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}
