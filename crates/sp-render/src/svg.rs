//! Export frame → standalone SVG document.
//!
//! Unlike the PNG backend this one carries the label and dimension text of
//! every element, so it is the preferred raster source for documents when
//! the host can rasterize SVG itself.

use crate::export::ExportFrame;
use crate::presentation::{BoxShape, PlanBox};

pub fn render_svg(frame: &ExportFrame) -> String {
    let (width, height) = (frame.width, frame.height);
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
    ));
    svg.push_str("<style>\n");
    svg.push_str("  text { font-family: Arial, sans-serif; text-anchor: middle; }\n");
    svg.push_str("</style>\n");
    svg.push_str(&format!(
        "<rect width=\"{width}\" height=\"{height}\" fill=\"{}\" />\n",
        frame.background.to_hex()
    ));

    let grid = frame.grid.to_hex();
    let (columns, rows) = frame.grid_lines();
    svg.push_str(&format!("<g stroke=\"{grid}\" stroke-width=\"1\">\n"));
    for x in columns {
        svg.push_str(&format!("  <line x1=\"{x}\" y1=\"0\" x2=\"{x}\" y2=\"{height}\" />\n"));
    }
    for y in rows {
        svg.push_str(&format!("  <line x1=\"0\" y1=\"{y}\" x2=\"{width}\" y2=\"{y}\" />\n"));
    }
    svg.push_str("</g>\n");

    // Items stay in plan coordinates inside one translated group.
    svg.push_str(&format!(
        "<g transform=\"translate({}, {})\">\n",
        -frame.origin_x, -frame.origin_y
    ));
    for item in &frame.items {
        render_item(&mut svg, item);
    }
    svg.push_str("</g>\n</svg>");
    svg
}

fn render_item(out: &mut String, item: &PlanBox) {
    let b = &item.bounds;
    let (cx, cy) = b.center();
    let fill = item.fill.to_hex();
    out.push_str(&format!(
        "<g transform=\"rotate({}, {cx}, {cy})\">\n",
        item.rotation
    ));
    match item.shape {
        BoxShape::Ellipse => out.push_str(&format!(
            "  <ellipse cx=\"{cx}\" cy=\"{cy}\" rx=\"{}\" ry=\"{}\" fill=\"{fill}\" stroke=\"#000000\" stroke-width=\"1\" />\n",
            b.width / 2.0,
            b.height / 2.0
        )),
        BoxShape::Rect | BoxShape::Line => out.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{fill}\" stroke=\"#000000\" stroke-width=\"1\" />\n",
            b.x, b.y, b.width, b.height
        )),
    }
    out.push_str(&format!(
        "  <text x=\"{cx}\" y=\"{cy}\" font-size=\"10\" fill=\"#FFFFFF\" dominant-baseline=\"middle\">{}</text>\n",
        escape(&item.label)
    ));
    out.push_str(&format!(
        "  <text x=\"{cx}\" y=\"{}\" font-size=\"8\" fill=\"#000000\" dominant-baseline=\"hanging\">{}</text>\n",
        b.bottom() + 5.0,
        escape(&item.dimensions)
    ));
    out.push_str("</g>\n");
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use sp_core::config::EditorConfig;
    use sp_core::geometry::Bounds;
    use sp_core::labels::StaticLabels;
    use sp_core::model::{ElementType, SpatialElement};
    use sp_core::store::ElementStore;

    #[test]
    fn svg_carries_grid_shapes_and_text() {
        let mut store = ElementStore::new();
        let mut plant = SpatialElement::new(ElementType::Plant, Bounds::new(0.0, 0.0, 40.0, 40.0), 100.0);
        plant.rotation = 30.0;
        store.add(plant);
        let frame = ExportFrame::build(&store, &StaticLabels::default(), &EditorConfig::default());
        let svg = render_svg(&frame);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("fill=\"#F8F8F8\""));
        assert!(svg.contains("stroke=\"#DDDDDD\""));
        assert!(svg.contains("translate(50, 50)"));
        assert!(svg.contains("rotate(30, 20, 20)"));
        assert!(svg.contains("<ellipse"));
        assert!(svg.contains(">Plante</text>"));
        assert!(svg.contains(">40cm × 40cm × 100cm</text>"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape("A&B <C>"), "A&amp;B &lt;C&gt;");
    }
}
