use std::collections::HashSet;

use uuid::Uuid;

use super::layout_engine::PositionMap;
use crate::models::{
    Arrowhead, Cascade, CategoryPalette, GridLine, LayoutSettings, Pattern, Point, RenderSettings, Scene, SceneEdge,
    SceneNode, Size,
};

const EDGE_COLOR: &str = "#94a3b8";

/// Intensity bar length; 0..=10 intensity fills half a segment per point.
pub const INTENSITY_SEGMENTS: u8 = 5;

/// Upper bound on grid lines along one axis.
const MAX_GRID_LINES: f64 = 512.0;

/// Builds the static scene for a computed layout. Positions are taken as
/// given; nothing here moves a node.
pub fn render_scene(
    positions: &PositionMap,
    patterns: &[Pattern],
    cascades: &[Cascade],
    canvas: Size,
    palette: &CategoryPalette,
    layout: &LayoutSettings,
    settings: &RenderSettings,
) -> Scene {
    if patterns.is_empty() {
        return Scene::Empty {
            canvas,
            message: settings.empty_message.clone(),
        };
    }

    let grid = build_grid(canvas, settings);
    let edges = build_edges(positions, cascades, settings);

    let mut nodes = Vec::with_capacity(positions.len());
    let mut placed: HashSet<Uuid> = HashSet::new();
    for pattern in patterns {
        let Some(center) = positions.get(&pattern.id) else {
            continue;
        };
        if !placed.insert(pattern.id) {
            continue;
        }
        let style = palette.style_for(&pattern.category);
        nodes.push(SceneNode {
            pattern_id: pattern.id,
            center: *center,
            size: Size::new(layout.node_width, layout.node_height),
            label: truncate_label(&pattern.pattern_type, settings.label_max_chars),
            icon: style.icon.clone(),
            color: style.color.clone(),
            intensity: pattern.intensity,
            filled_segments: filled_segments(pattern.intensity),
            total_segments: INTENSITY_SEGMENTS,
        });
    }

    Scene::Flow {
        canvas,
        grid,
        edges,
        nodes,
    }
}

/// 0..=10 intensity onto 0..=5 filled bar segments.
pub fn filled_segments(intensity: u8) -> u8 {
    intensity.min(10) / 2
}

pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let kept: String = label.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

fn build_grid(canvas: Size, settings: &RenderSettings) -> Vec<GridLine> {
    let mut lines = Vec::new();
    if !canvas.is_drawable() {
        log::warn!("[FlowRenderer] skipping grid for canvas {}x{}", canvas.width, canvas.height);
        return lines;
    }
    let extent = canvas.width.max(canvas.height);
    let step = if settings.grid_spacing.is_finite() {
        settings.grid_spacing.max(extent / MAX_GRID_LINES)
    } else {
        extent / MAX_GRID_LINES
    };

    let mut x = 0.0;
    while x <= canvas.width {
        lines.push(GridLine {
            from: Point::new(x, 0.0),
            to: Point::new(x, canvas.height),
            opacity: settings.grid_opacity,
        });
        x += step;
    }

    let mut y = 0.0;
    while y <= canvas.height {
        lines.push(GridLine {
            from: Point::new(0.0, y),
            to: Point::new(canvas.width, y),
            opacity: settings.grid_opacity,
        });
        y += step;
    }

    lines
}

fn build_edges(positions: &PositionMap, cascades: &[Cascade], settings: &RenderSettings) -> Vec<SceneEdge> {
    let mut edges = Vec::new();

    for cascade in cascades {
        let endpoints = cascade
            .endpoints()
            .and_then(|(from, to)| Some((*positions.get(&from)?, *positions.get(&to)?)));
        let Some((start, end)) = endpoints else {
            log::debug!("[FlowRenderer] skipping cascade {} with unplaced endpoint", cascade.id);
            continue;
        };

        let confidence = cascade.clamped_confidence();
        let mid_x = (start.x + end.x) / 2.0;
        let control1 = Point::new(mid_x, start.y);
        let control2 = Point::new(mid_x, end.y);

        edges.push(SceneEdge {
            cascade_id: cascade.id,
            start,
            control1,
            control2,
            end,
            width: settings.min_edge_width + (settings.max_edge_width - settings.min_edge_width) * confidence,
            opacity: confidence,
            color: EDGE_COLOR.to_string(),
            arrowhead: arrowhead(start, control2, end, settings),
        });
    }

    edges
}

/// Arrowhead at `end`, oriented along the curve's final tangent
/// (`control2` -> `end` for a cubic Bézier). When the two coincide, as on a
/// same-column edge, the limit tangent `end - start` is used instead.
fn arrowhead(start: Point, control2: Point, end: Point, settings: &RenderSettings) -> Arrowhead {
    let angle = direction(control2, end)
        .or_else(|| direction(start, end))
        .unwrap_or(0.0);
    let spread = settings.arrow_angle_degrees.to_radians();
    let back = |a: f64| {
        Point::new(
            end.x - settings.arrow_length * a.cos(),
            end.y - settings.arrow_length * a.sin(),
        )
    };

    Arrowhead {
        tip: end,
        left: back(angle - spread),
        right: back(angle + spread),
    }
}

fn direction(from: Point, to: Point) -> Option<f64> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() < f64::EPSILON && dy.abs() < f64::EPSILON {
        None
    } else {
        Some(dy.atan2(dx))
    }
}
