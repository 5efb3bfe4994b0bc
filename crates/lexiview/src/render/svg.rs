// Size fitting for dependency-tree SVGs before they are exported.

pub const MAX_WIDTH: f64 = 600.0;
pub const MAX_HEIGHT: f64 = 400.0;

/// Position and parsed values of the first `width="W" height="H"` pair.
struct SizeAttrs {
    start: usize,
    end: usize,
    width: f64,
    height: f64,
}

fn find_size_attrs(svg: &str) -> Option<SizeAttrs> {
    let mut from = 0;
    while let Some(rel) = svg[from..].find("width=\"") {
        let start = from + rel;
        from = start + 1;

        let w_value_start = start + "width=\"".len();
        let w_len = svg[w_value_start..].find('"')?;
        let w_raw = &svg[w_value_start..w_value_start + w_len];
        let after_w = w_value_start + w_len + 1;

        let rest = &svg[after_w..];
        let trimmed = rest.trim_start();
        if trimmed.len() == rest.len() || !trimmed.starts_with("height=\"") {
            continue;
        }
        let h_value_start = after_w + (rest.len() - trimmed.len()) + "height=\"".len();
        let h_len = svg[h_value_start..].find('"')?;
        let h_raw = &svg[h_value_start..h_value_start + h_len];

        return Some(SizeAttrs {
            start,
            end: h_value_start + h_len + 1,
            width: leading_number(w_raw)?,
            height: leading_number(h_raw)?,
        });
    }
    None
}

/// Parse the numeric prefix of an attribute value (`"1200px"` -> 1200).
fn leading_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let end = raw
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+'))
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    raw[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Declared `(width, height)` of the SVG, if it has a parseable pair.
pub fn dimensions(svg: &str) -> Option<(f64, f64)> {
    find_size_attrs(svg).map(|a| (a.width, a.height))
}

/// Target size after fitting into the 600x400 box. Never scales up.
pub fn fitted_size(width: f64, height: f64) -> Option<(u32, u32)> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let scale = (MAX_WIDTH / width).min(MAX_HEIGHT / height).min(1.0);
    Some(((width * scale).round() as u32, (height * scale).round() as u32))
}

/// Rewrite the first size attribute pair so the image fits 600x400.
/// SVGs without a usable pair are returned unchanged.
pub fn fit_svg(svg: &str) -> String {
    let Some(attrs) = find_size_attrs(svg) else {
        return svg.to_string();
    };
    let Some((w, h)) = fitted_size(attrs.width, attrs.height) else {
        return svg.to_string();
    };
    format!(
        "{}width=\"{}\" height=\"{}\"{}",
        &svg[..attrs.start],
        w,
        h,
        &svg[attrs.end..]
    )
}
