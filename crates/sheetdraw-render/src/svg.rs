//! Scene to SVG document conversion.

use kurbo::{Affine, Size};
use sheetdraw_core::objects::{
    Asset, Image, LINE_HEIGHT, ObjectTrait, SceneObject, SerializableColor, Stroke, Text, data_uri,
};
use sheetdraw_core::pipeline::AssetResolver;
use sheetdraw_core::scene::Scene;

/// Build a standalone SVG document for `scene` at `size` logical units.
///
/// Asset bytes are fetched through `assets` and embedded, so the document
/// does not depend on where it is rendered.
pub fn scene_to_svg(scene: &Scene, size: Size, assets: &dyn AssetResolver) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = size.width,
        h = size.height,
    );
    svg.push_str(&format!(
        r#"<rect width="{}" height="{}" {}/>"#,
        size.width,
        size.height,
        paint("fill", scene.background),
    ));

    for object in &scene.objects {
        let affine = object.transform().affine(object.intrinsic_size());
        svg.push_str(&format!(r#"<g transform="{}">"#, matrix(affine)));
        match object {
            SceneObject::Stroke(stroke) => push_stroke(&mut svg, stroke),
            SceneObject::Image(image) => push_image(&mut svg, image),
            SceneObject::Asset(asset) => push_asset(&mut svg, asset, assets),
            SceneObject::Text(text) => push_text(&mut svg, text),
        }
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

fn matrix(affine: Affine) -> String {
    // Adding zero folds -0 into 0.
    let [a, b, c, d, e, f] = affine.as_coeffs().map(|v| v + 0.0);
    format!("matrix({} {} {} {} {} {})", a, b, c, d, e, f)
}

/// `fill="#rrggbb"` plus an opacity attribute when not opaque.
fn paint(attribute: &str, color: SerializableColor) -> String {
    if color.a == 255 {
        format!(r#"{}="{}""#, attribute, color.to_hex())
    } else {
        format!(
            r#"{}="{}" {}-opacity="{}""#,
            attribute,
            color.to_hex(),
            attribute,
            color.opacity()
        )
    }
}

fn push_stroke(svg: &mut String, stroke: &Stroke) {
    let Some(first) = stroke.points.first() else {
        return;
    };
    let mut d = format!("M {} {}", first.x, first.y);
    if stroke.points.len() == 1 {
        // A click without movement still leaves a round dot.
        d.push_str(&format!(" L {} {}", first.x, first.y));
    }
    for point in &stroke.points[1..] {
        d.push_str(&format!(" L {} {}", point.x, point.y));
    }
    svg.push_str(&format!(
        r#"<path d="{}" fill="none" {} stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
        d,
        paint("stroke", stroke.stroke_color),
        stroke.stroke_width,
    ));
}

fn push_bitmap(svg: &mut String, href: &str, size: Size) {
    svg.push_str(&format!(
        r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" xlink:href="{}"/>"#,
        -size.width / 2.0,
        -size.height / 2.0,
        size.width,
        size.height,
        escape(href),
    ));
}

fn push_image(svg: &mut String, image: &Image) {
    push_bitmap(svg, &image.data_uri(), image.intrinsic_size());
}

fn push_asset(svg: &mut String, asset: &Asset, assets: &dyn AssetResolver) {
    let href = match assets.fetch(&asset.source) {
        Ok(bytes) => data_uri(&bytes),
        Err(e) => {
            log::warn!("Skipping asset in export: {}", e);
            return;
        }
    };
    match href {
        Some(href) => push_bitmap(svg, &href, asset.intrinsic_size()),
        None => log::warn!("Skipping asset in export: {}: not a PNG or JPEG", asset.source),
    }
}

fn push_text(svg: &mut String, text: &Text) {
    let size = text.intrinsic_size();
    let line_height = text.font_size * LINE_HEIGHT;
    let top = -size.height / 2.0;

    svg.push_str(&format!(
        r#"<text font-family="{}" font-size="{}" font-weight="{}" text-anchor="middle" {}>"#,
        escape(&text.font_family),
        text.font_size,
        text.font_weight.css_value(),
        paint("fill", text.color),
    ));
    for (i, line) in text.lines().iter().enumerate() {
        // Approximate baseline: ascent is taken as 0.9 em.
        let baseline = top + line_height * i as f64 + text.font_size * 0.9;
        svg.push_str(&format!(r#"<tspan x="0" y="{}">{}</tspan>"#, baseline, escape(line)));
    }
    svg.push_str("</text>");
}

/// Escape text for use in XML content and attribute values.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
