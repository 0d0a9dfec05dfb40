/// Color applied to markers created without an explicit color: blue stroke
/// with a faint fill, matching the circle styling of the map surface.
pub const DEFAULT_COLOR: &str = "0000ff1a";

/// CSS-ready styling derived from an `RRGGBBAA` color code.
#[derive(Debug, Clone, PartialEq)]
pub struct Rgba {
    pub stroke: String,
    pub fill: String,
    pub fill_opacity: f64,
}

/// A color code is exactly eight ASCII hex digits (`RRGGBBAA`).
pub fn is_valid(code: &str) -> bool {
    code.len() == 8 && code.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parse an `RRGGBBAA` code into CSS stroke/fill strings. Returns `None`
/// for anything that is not eight hex digits.
pub fn parse_rrggbbaa(code: &str) -> Option<Rgba> {
    if !is_valid(code) {
        return None;
    }

    let r = u8::from_str_radix(&code[0..2], 16).ok()?;
    let g = u8::from_str_radix(&code[2..4], 16).ok()?;
    let b = u8::from_str_radix(&code[4..6], 16).ok()?;
    let a = f64::from(u8::from_str_radix(&code[6..8], 16).ok()?) / 255.0;

    Some(Rgba {
        stroke: format!("rgb({},{},{})", r, g, b),
        fill: format!("rgba({},{},{},{:.3})", r, g, b, a),
        fill_opacity: a,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_opaque_red() {
        let rgba = parse_rrggbbaa("ff0000ff").unwrap();
        assert_eq!(rgba.stroke, "rgb(255,0,0)");
        assert_eq!(rgba.fill, "rgba(255,0,0,1.000)");
        assert!((rgba.fill_opacity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_uppercase_hex() {
        let rgba = parse_rrggbbaa("00FF0080").unwrap();
        assert_eq!(rgba.stroke, "rgb(0,255,0)");
        assert!((rgba.fill_opacity - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_default_color() {
        let rgba = parse_rrggbbaa(DEFAULT_COLOR).unwrap();
        assert_eq!(rgba.stroke, "rgb(0,0,255)");
        assert!((rgba.fill_opacity - 26.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(parse_rrggbbaa("ff0000").is_none());
        assert!(parse_rrggbbaa("ff0000ff00").is_none());
        assert!(parse_rrggbbaa("").is_none());
    }

    #[test]
    fn test_rejects_non_hex() {
        assert!(parse_rrggbbaa("gg0000ff").is_none());
        assert!(parse_rrggbbaa("ff 000ff").is_none());
        assert!(parse_rrggbbaa("#ff0000f").is_none());
    }

    #[test]
    fn test_is_valid_matches_parse() {
        for code in ["ff0000ff", "0000ff1a", "ABCDEF01"] {
            assert!(is_valid(code));
            assert!(parse_rrggbbaa(code).is_some());
        }
        for code in ["xyz", "ff0000f", "ff0000ff0"] {
            assert!(!is_valid(code));
            assert!(parse_rrggbbaa(code).is_none());
        }
    }
}
