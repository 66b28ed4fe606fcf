use super::*;
use crate::foundation::core::Color;

fn clock_style() -> TextStyle {
    TextStyle {
        weight: 700,
        size_px: 14.0,
        family: "Arial",
        color: Color::WHITE,
    }
}

#[test]
fn escape_xml_handles_markup() {
    assert_eq!(escape_xml(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    assert_eq!(escape_xml("plain"), "plain");
}

#[test]
fn label_svg_embeds_style_and_escaped_text() {
    let svg = label_svg("R&D", &clock_style(), 40.0, 21.0);
    assert!(svg.contains(r#"font-weight="700""#));
    assert!(svg.contains(r#"font-size="14""#));
    assert!(svg.contains("R&amp;D"));
    assert!(svg.ends_with("</text></svg>"));
}

#[test]
fn raster_size_follows_scale_and_is_cached() {
    let mut r = TextRasterizer::new();
    let one = r.raster("00:09.0", &clock_style(), 1.0).unwrap();
    let two = r.raster("00:09.0", &clock_style(), 2.0).unwrap();
    assert!(two.width.abs_diff(one.width * 2) <= 1);
    assert_eq!(two.height, one.height * 2);
    assert_eq!(one.rgba8_premul.len(), (one.width * one.height * 4) as usize);

    let again = r.raster("00:09.0", &clock_style(), 1.0).unwrap();
    assert!(Arc::ptr_eq(&one.rgba8_premul, &again.rgba8_premul));
}

#[test]
fn oversize_rasters_are_rejected() {
    assert!(to_px(0.0).is_err());
    assert!(to_px(f64::NAN).is_err());
    assert!(to_px(1e9).is_err());
    assert_eq!(to_px(10.2).unwrap(), 11);
}

fn tree(svg: &str) -> usvg::Tree {
    usvg::Tree::from_str(svg, &usvg::Options::default()).unwrap()
}

#[test]
fn measured_width_covers_content_past_the_layout_box() {
    let t = tree(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10"><rect x="2" y="0" width="35" height="5" fill="white"/></svg>"#,
    );
    let w = measured_width(&t, 10.0);
    assert!((w - 38.0).abs() < 1e-3, "width {w}");
}

#[test]
fn measured_width_of_empty_layout_is_one() {
    let t = tree(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10"></svg>"#,
    );
    assert_eq!(measured_width(&t, 32.0), 1.0);
}
