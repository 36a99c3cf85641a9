use crate::models::{Scene, SceneEdge, SceneNode};

use super::viewport::ViewTransform;

const BACKGROUND: &str = "#0f172a";
const CARD_FILL: &str = "#1e293b";
const TEXT_COLOR: &str = "#e2e8f0";
const MUTED_TEXT: &str = "#94a3b8";
const EMPTY_SEGMENT: &str = "#334155";
const FONT_FAMILY: &str = "-apple-system, 'Segoe UI', sans-serif";

/// Serializes a scene as a standalone SVG document. Grid, edges and nodes sit
/// in one group so the viewport transform moves them together.
pub fn render_svg(scene: &Scene, transform: &ViewTransform) -> String {
    let canvas = scene.canvas();
    let width = canvas.width;
    let height = canvas.height;
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        BACKGROUND
    ));

    match scene {
        Scene::Empty { message, .. } => {
            let cx = width / 2.0;
            let cy = height / 2.0;
            svg.push_str(&format!(
                "<text class=\"empty-state\" x=\"{cx:.2}\" y=\"{cy:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"15\" fill=\"{}\">{}</text>",
                FONT_FAMILY,
                MUTED_TEXT,
                escape_xml(message)
            ));
        }
        Scene::Flow { grid, edges, nodes, .. } => {
            svg.push_str(&format!("<g id=\"flow\" transform=\"{}\">", transform_attr(transform)));

            svg.push_str("<g id=\"grid\">");
            for line in grid {
                svg.push_str(&format!(
                    "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"#ffffff\" stroke-opacity=\"{:.2}\" stroke-width=\"0.5\"/>",
                    line.from.x, line.from.y, line.to.x, line.to.y, line.opacity
                ));
            }
            svg.push_str("</g>");

            svg.push_str("<g id=\"edges\">");
            for edge in edges {
                svg.push_str(&edge_svg(edge));
            }
            svg.push_str("</g>");

            svg.push_str("<g id=\"nodes\">");
            for node in nodes {
                svg.push_str(&node_svg(node));
            }
            svg.push_str("</g>");

            svg.push_str("</g>");
        }
    }

    svg.push_str("</svg>");
    svg
}

fn transform_attr(t: &ViewTransform) -> String {
    // Right-to-left: move anchor to origin, scale, move back, then pan.
    format!(
        "translate({:.2} {:.2}) translate({:.2} {:.2}) scale({:.4}) translate({:.2} {:.2})",
        t.offset.x, t.offset.y, t.anchor.x, t.anchor.y, t.scale, -t.anchor.x, -t.anchor.y
    )
}

fn edge_svg(edge: &SceneEdge) -> String {
    let head = &edge.arrowhead;
    format!(
        "<g class=\"cascade\" data-id=\"{}\" stroke=\"{}\" stroke-opacity=\"{:.3}\" stroke-width=\"{:.2}\" fill=\"none\" stroke-linecap=\"round\">\
         <path d=\"M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}\"/>\
         <path d=\"M {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2}\"/></g>",
        edge.cascade_id,
        edge.color,
        edge.opacity,
        edge.width,
        edge.start.x,
        edge.start.y,
        edge.control1.x,
        edge.control1.y,
        edge.control2.x,
        edge.control2.y,
        edge.end.x,
        edge.end.y,
        head.left.x,
        head.left.y,
        head.tip.x,
        head.tip.y,
        head.right.x,
        head.right.y,
    )
}

fn node_svg(node: &SceneNode) -> String {
    let x = node.center.x - node.size.width / 2.0;
    let y = node.center.y - node.size.height / 2.0;
    let mut out = String::new();

    out.push_str(&format!(
        "<g class=\"pattern\" data-id=\"{}\" data-icon=\"{}\">",
        node.pattern_id,
        escape_xml(&node.icon)
    ));
    out.push_str(&format!(
        "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"12\" ry=\"12\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.5\"/>",
        node.size.width, node.size.height, CARD_FILL, node.color
    ));
    // Icon badge: colored dot in the top-left corner.
    out.push_str(&format!(
        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"8\" fill=\"{}\"/>",
        x + 16.0,
        y + 18.0,
        node.color
    ));
    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"13\" fill=\"{}\">{}</text>",
        x + 30.0,
        y + 22.0,
        FONT_FAMILY,
        TEXT_COLOR,
        escape_xml(&node.label)
    ));

    let segments = node.total_segments.max(1) as f64;
    let bar_x = x + 12.0;
    let bar_y = y + node.size.height - 18.0;
    let gap = 3.0;
    let seg_w = (node.size.width - 24.0 - gap * (segments - 1.0)) / segments;
    for i in 0..node.total_segments {
        let fill = if i < node.filled_segments { node.color.as_str() } else { EMPTY_SEGMENT };
        out.push_str(&format!(
            "<rect class=\"segment\" x=\"{:.2}\" y=\"{bar_y:.2}\" width=\"{seg_w:.2}\" height=\"6\" rx=\"2\" fill=\"{}\"/>",
            bar_x + i as f64 * (seg_w + gap),
            fill
        ));
    }

    out.push_str("</g>");
    out
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Point, Size};

    #[test]
    fn empty_scene_shows_placeholder_text() {
        let scene = Scene::Empty {
            canvas: Size::new(400.0, 300.0),
            message: "Nothing <yet>".to_string(),
        };
        let svg = render_svg(&scene, &ViewTransform::identity(Point::new(200.0, 150.0)));
        assert!(svg.contains("empty-state"));
        assert!(svg.contains("Nothing &lt;yet&gt;"));
        assert!(!svg.contains("id=\"flow\""));
    }

    #[test]
    fn flow_group_carries_viewport_transform() {
        let scene = Scene::Flow {
            canvas: Size::new(400.0, 300.0),
            grid: vec![],
            edges: vec![],
            nodes: vec![],
        };
        let transform = ViewTransform {
            scale: 2.0,
            offset: Point::new(15.0, -5.0),
            anchor: Point::new(200.0, 150.0),
        };
        let svg = render_svg(&scene, &transform);
        assert!(svg.contains(
            "transform=\"translate(15.00 -5.00) translate(200.00 150.00) scale(2.0000) translate(-200.00 -150.00)\""
        ));
    }
}
