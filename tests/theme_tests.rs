// Host-side tests for color parsing and theme helpers.

use petalfield::color::*;
use petalfield::constants::{FILL_ALPHA_DARK, FILL_ALPHA_LIGHT, STROKE_ALPHA};
use petalfield::theme::*;

#[test]
fn parses_hex_forms() {
    assert_eq!(Rgb::parse("#fff"), Ok(Rgb::new(255, 255, 255)));
    assert_eq!(Rgb::parse("#ff8fab"), Ok(Rgb::new(255, 143, 171)));
    assert_eq!(Rgb::parse("  #0A0b0C "), Ok(Rgb::new(10, 11, 12)));
}

#[test]
fn parses_rgb_function_forms() {
    assert_eq!(Rgb::parse("rgb(1, 2, 3)"), Ok(Rgb::new(1, 2, 3)));
    assert_eq!(Rgb::parse("RGBA(10,20,30,0.5)"), Ok(Rgb::new(10, 20, 30)));
    assert_eq!(Rgb::parse("rgb(10 20 30 / 50)"), Ok(Rgb::new(10, 20, 30)));
    assert_eq!(Rgb::parse("rgb(300, -4, 12.6)"), Ok(Rgb::new(255, 0, 13)));
}

#[test]
fn rejects_malformed_colors() {
    assert_eq!(Rgb::parse(""), Err(ColorParseError::Empty));
    assert!(matches!(Rgb::parse("#ggg"), Err(ColorParseError::InvalidHex(_))));
    assert!(matches!(Rgb::parse("#abcd"), Err(ColorParseError::InvalidHex(_))));
    assert!(matches!(Rgb::parse("rgb(1, 2)"), Err(ColorParseError::InvalidRgb(_))));
    assert!(matches!(Rgb::parse("hsl(1, 2%, 3%)"), Err(ColorParseError::Unsupported(_))));
}

#[test]
fn css_value_falls_back_to_default_accent() {
    let fallback = ThemeColors::from_css_value("", ThemeMode::Dark);
    assert_eq!(fallback.fill.rgb, fallback_accent());
    let garbage = ThemeColors::from_css_value("not-a-color", ThemeMode::Dark);
    assert_eq!(garbage, fallback);
}

#[test]
fn fill_and_stroke_alphas_follow_mode() {
    let dark = ThemeColors::from_css_value("#000000", ThemeMode::Dark);
    let light = ThemeColors::from_css_value("#000000", ThemeMode::Light);
    assert_eq!(dark.fill.alpha, FILL_ALPHA_DARK);
    assert_eq!(light.fill.alpha, FILL_ALPHA_LIGHT);
    assert_eq!(dark.stroke.alpha, STROKE_ALPHA);
}

#[test]
fn rgba_formats_for_canvas() {
    let c = Rgb::new(1, 2, 3).with_alpha(0.5);
    assert_eq!(c.to_string(), "rgba(1, 2, 3, 0.500)");
    assert_eq!(Rgb::new(1, 2, 3).with_alpha(3.0).alpha, 1.0);
}

#[test]
fn theme_classes_and_attributes() {
    let mut t = Theme::new(ThemeMode::Dark, Accent::Blue);
    assert_eq!(t.root_classes().as_slice(), ["dark", "accent-blue"]);
    assert_eq!(t.data_theme(), "dark");
    t.toggle_mode();
    assert_eq!(t.mode, ThemeMode::Light);
    assert_eq!(t.accent_hex(), "#2563eb");
    let all: Vec<String> = Theme::all_theme_classes().collect();
    assert_eq!(all.len(), 2 + Accent::ALL.len());
    assert!(all.iter().any(|c| c == "accent-orange"));
}

#[test]
fn accents_parse_by_name() {
    for a in Accent::ALL {
        assert_eq!(a.as_str().parse::<Accent>(), Ok(a));
    }
    assert_eq!(" Green ".parse::<Accent>(), Ok(Accent::Green));
    assert!("teal".parse::<Accent>().is_err());
}

#[test]
fn theme_colors_use_accent_swatch() {
    let t = Theme::new(ThemeMode::Dark, Accent::Pink);
    assert_eq!(t.colors().fill.rgb, Rgb::new(0xff, 0x8f, 0xab));
}
