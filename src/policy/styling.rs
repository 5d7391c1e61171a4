//! The styling variant of the policy (spec §4.9): converts a sanitized
//! `style` attribute into the attributes of a synthesized `<font>` child.
//!
//! Grounded in the CSS property sanitizer of [`crate::css`]; this module
//! only does the legacy `style` → `<font>` attribute mapping on top of an
//! already-canonicalized `name:value;name:value` declaration string.

/// Legacy HTML `size="1".."7"` thresholds for `font-size` pixel values,
/// following the mapping most rich-text editors (e.g. TinyMCE) use when
/// downgrading CSS font sizes to the `<font>` legacy attribute.
const PX_SIZE_THRESHOLDS: [(f64, u8); 6] = [
    (9.0, 1),
    (10.0, 2),
    (13.0, 3),
    (16.0, 4),
    (18.0, 5),
    (24.0, 6),
];

/// Extract and convert the host's `style` attribute (if any) into the
/// derived attribute list for a synthesized `<font>` open-tag (spec §4.9:
/// face/color/size/align/dir, plus a residual `style` for whatever wasn't
/// mapped). `attrs` has its `style` entry removed as a side effect whether
/// or not conversion produces anything, since the host never keeps a raw
/// `style` attribute once the styling variant is in play.
///
/// Returns `None` if there was no `style` attribute, or sanitizing it left
/// nothing usable (spec's "empty output -> rejected" rule, extended here to
/// "nothing to synthesize").
#[must_use]
pub fn extract_style(attrs: &mut Vec<(String, String)>) -> Option<Vec<(String, String)>> {
    let idx = attrs.iter().position(|(name, _)| name == "style")?;
    let (_, raw_style) = attrs.remove(idx);

    let sanitized = crate::css::sanitize_style(&raw_style)?;
    let declarations = parse_declarations(&sanitized);

    let mut font_attrs = Vec::new();
    let mut residual = Vec::new();

    for (name, value) in declarations {
        match name.as_str() {
            "font-family" => font_attrs.push(("face".to_string(), strip_quotes(&value))),
            "color" => font_attrs.push(("color".to_string(), value)),
            "font-size" => match legacy_font_size(&value) {
                Some(n) => font_attrs.push(("size".to_string(), n.to_string())),
                None => residual.push((name, value)),
            },
            "text-align" => font_attrs.push(("align".to_string(), value)),
            "direction" => font_attrs.push(("dir".to_string(), value)),
            _ => residual.push((name, value)),
        }
    }

    if !residual.is_empty() {
        let style_value = residual
            .iter()
            .map(|(name, value)| format!("{name}:{value}"))
            .collect::<Vec<_>>()
            .join(";");
        font_attrs.push(("style".to_string(), style_value));
    }

    if font_attrs.is_empty() {
        None
    } else {
        Some(font_attrs)
    }
}

/// Split a canonical `name:value;name:value` string (as produced by
/// [`crate::css::sanitize_style`]) back into `(name, value)` pairs.
fn parse_declarations(sanitized: &str) -> Vec<(String, String)> {
    sanitized
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn strip_quotes(value: &str) -> String {
    value.trim_matches('\'').trim_matches('"').to_string()
}

/// Map a sanitized `font-size` value (a keyword or a `px`/unitless
/// quantity) to the legacy `1`..`7` `<font size>` scale. Units other than
/// `px` (e.g. `em`, `%`) aren't meaningfully convertible without knowing
/// the inherited base size, so they fall through to the residual `style`.
fn legacy_font_size(value: &str) -> Option<u8> {
    match value {
        "xx-small" => return Some(1),
        "x-small" => return Some(2),
        "small" | "smaller" => return Some(3),
        "medium" => return Some(4),
        "large" | "larger" => return Some(5),
        "x-large" => return Some(6),
        "xx-large" => return Some(7),
        _ => {}
    }

    let px = value.strip_suffix("px")?;
    let px: f64 = px.parse().ok()?;
    for (threshold, size) in PX_SIZE_THRESHOLDS {
        if px <= threshold {
            return Some(size);
        }
    }
    Some(7)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_color_and_family() {
        let mut attrs = vec![(
            "style".to_string(),
            "color: red; font-family: Arial".to_string(),
        )];
        let font_attrs = extract_style(&mut attrs).unwrap();
        assert!(attrs.is_empty());
        assert!(font_attrs.contains(&("color".to_string(), "#f00".to_string())));
        assert!(font_attrs.contains(&("face".to_string(), "Arial".to_string())));
    }

    #[test]
    fn residual_properties_go_to_style() {
        let mut attrs = vec![(
            "style".to_string(),
            "color: red; text-decoration: underline".to_string(),
        )];
        let font_attrs = extract_style(&mut attrs).unwrap();
        let style = font_attrs
            .iter()
            .find(|(name, _)| name == "style")
            .map(|(_, v)| v.as_str());
        assert_eq!(style, Some("text-decoration:underline"));
    }

    #[test]
    fn no_style_attribute_returns_none() {
        let mut attrs = vec![("href".to_string(), "x".to_string())];
        assert_eq!(extract_style(&mut attrs), None);
    }

    #[test]
    fn font_size_px_thresholds() {
        assert_eq!(legacy_font_size("8px"), Some(1));
        assert_eq!(legacy_font_size("16px"), Some(4));
        assert_eq!(legacy_font_size("40px"), Some(7));
        assert_eq!(legacy_font_size("large"), Some(5));
    }
}
