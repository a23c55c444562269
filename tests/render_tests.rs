// Sparkline/gauge rendering: purity, quantization, axis handling

use sysdash::render::{
    FillMode, GlyphMode, RenderError, axis_labels, gauge, placeholder, sparkline,
    sparkline_labeled,
};

const FULL_BRAILLE: char = '\u{28FF}';

#[test]
fn test_render_is_deterministic() {
    let series: Vec<f64> = (0..50).map(|i| (i as f64 * 7.3) % 100.0).collect();
    let a = sparkline(&series, 30, 4, 0.0, 100.0, GlyphMode::Dots, FillMode::Filled).unwrap();
    let b = sparkline(&series, 30, 4, 0.0, 100.0, GlyphMode::Dots, FillMode::Filled).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_spike_scenario_lights_only_last_column() {
    // 30 samples, all zero except the last at 100: last column fully lit,
    // every prior column unlit.
    let mut series = vec![0.0; 29];
    series.push(100.0);
    let rows = sparkline(&series, 30, 4, 0.0, 100.0, GlyphMode::Dots, FillMode::Filled).unwrap();
    assert_eq!(rows.len(), 4);
    for row in &rows {
        let expected: String = " ".repeat(29) + &FULL_BRAILLE.to_string();
        assert_eq!(row, &expected);
    }
}

#[test]
fn test_blocks_filled_half_value() {
    let rows = sparkline(&[50.0], 1, 4, 0.0, 100.0, GlyphMode::Blocks, FillMode::Filled).unwrap();
    // 50% of 4 block levels: bottom two rows lit.
    assert_eq!(rows, vec![" ", " ", "█", "█"]);
}

#[test]
fn test_blocks_outline_lights_single_level() {
    let rows = sparkline(&[50.0], 1, 4, 0.0, 100.0, GlyphMode::Blocks, FillMode::Outline).unwrap();
    assert_eq!(rows, vec![" ", " ", "█", " "]);
    // Zero maps to no lit level at all.
    let zero = sparkline(&[0.0], 1, 4, 0.0, 100.0, GlyphMode::Blocks, FillMode::Outline).unwrap();
    assert_eq!(zero, vec![" ", " ", " ", " "]);
}

#[test]
fn test_short_series_left_pads_blank() {
    let rows = sparkline(&[100.0], 5, 2, 0.0, 100.0, GlyphMode::Blocks, FillMode::Filled).unwrap();
    assert_eq!(rows, vec!["    █", "    █"]);
}

#[test]
fn test_degenerate_axis_is_widened_not_divided_by_zero() {
    let rows = sparkline(&[5.0, 5.0], 2, 2, 5.0, 5.0, GlyphMode::Blocks, FillMode::Filled).unwrap();
    // Axis becomes [5, 6]; the values sit at the bottom, nothing lit.
    assert_eq!(rows, vec!["  ", "  "]);
}

#[test]
fn test_growing_y_max_lowers_glyph_heights_monotonically() {
    let series = vec![50.0; 8];
    let lit = |y_max: f64| -> usize {
        sparkline(&series, 8, 4, 0.0, y_max, GlyphMode::Blocks, FillMode::Filled)
            .unwrap()
            .iter()
            .map(|row| row.chars().filter(|c| *c == '█').count())
            .sum()
    };
    let mut previous = usize::MAX;
    for y_max in [50.0, 100.0, 200.0, 400.0] {
        let count = lit(y_max);
        assert!(count <= previous, "raising y_max must never raise glyphs");
        previous = count;
    }
    assert_eq!(lit(50.0), 32);
    assert_eq!(lit(100.0), 16);
}

#[test]
fn test_values_clamp_to_axis() {
    let rows = sparkline(
        &[-10.0, 500.0],
        2,
        2,
        0.0,
        100.0,
        GlyphMode::Blocks,
        FillMode::Filled,
    )
    .unwrap();
    assert_eq!(rows, vec![" █", " █"]);
}

#[test]
fn test_axis_labels_top_max_bottom_min() {
    let labels = axis_labels(0.0, 100.0, 4);
    assert_eq!(labels, vec!["100", "   ", "   ", "  0"]);
    let fractional = axis_labels(0.5, 2.5, 2);
    assert_eq!(fractional, vec!["2.5", "0.5"]);
}

#[test]
fn test_labeled_rows_join_axis_and_grid() {
    let mut series = vec![0.0; 9];
    series.push(100.0);
    let rows =
        sparkline_labeled(&series, 10, 2, 0.0, 100.0, GlyphMode::Dots, FillMode::Filled).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("100│"));
    assert!(rows[1].starts_with("  0│"));
    assert!(rows[0].ends_with(FULL_BRAILLE));
}

#[test]
fn test_malformed_dimensions_are_hard_failures() {
    let series = [1.0];
    assert_eq!(
        sparkline(&series, 0, 4, 0.0, 1.0, GlyphMode::Dots, FillMode::Filled),
        Err(RenderError::ZeroWidth)
    );
    assert_eq!(
        sparkline(&series, 4, 0, 0.0, 1.0, GlyphMode::Dots, FillMode::Filled),
        Err(RenderError::ZeroHeight)
    );
    assert_eq!(
        sparkline(&series, 4, 4, 10.0, 0.0, GlyphMode::Dots, FillMode::Filled),
        Err(RenderError::InvertedAxis)
    );
    assert_eq!(gauge(50.0, 0), Err(RenderError::ZeroWidth));
}

#[test]
fn test_gauge_quantizes_and_clamps() {
    assert_eq!(gauge(50.0, 10).unwrap(), "█████     ");
    assert_eq!(gauge(0.0, 4).unwrap(), "    ");
    assert_eq!(gauge(100.0, 4).unwrap(), "████");
    // Out-of-range input clamps instead of erroring.
    assert_eq!(gauge(250.0, 4).unwrap(), "████");
    assert_eq!(gauge(-5.0, 4).unwrap(), "    ");
}

#[test]
fn test_placeholder_is_distinct_from_zero() {
    let line = placeholder(11);
    assert_eq!(line, "  no data  ");
    assert_eq!(line.chars().count(), 11);
    assert_eq!(placeholder(3), "no ");
}
