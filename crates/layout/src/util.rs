/// Robust floating point comparison for layout calculations.
pub fn floats_fuzzy_eq(a: f32, b: f32) -> bool {
    const EPSILON: f32 = 0.01;
    (a - b).abs() < EPSILON
}

/// Collapses two adjoining margins: the largest positive plus the most negative.
pub fn collapse_values(a: f32, b: f32) -> f32 {
    let positive = a.max(b).max(0.0);
    let negative = a.min(b).min(0.0);
    positive + negative
}

/// Half the extra space a line box adds above and below its glyphs.
pub fn half_leading(line_height: Option<f32>, height: f32, lines: u32) -> f32 {
    match line_height {
        Some(line_height) if lines > 0 => {
            let glyphs = height / lines as f32;
            ((line_height - glyphs) / 2.0).max(0.0)
        }
        _ => 0.0,
    }
}
