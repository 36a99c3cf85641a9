use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Point, Size};

/// Static picture of one day's cascade flow, in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scene {
    Empty {
        canvas: Size,
        message: String,
    },
    Flow {
        canvas: Size,
        grid: Vec<GridLine>,
        edges: Vec<SceneEdge>,
        nodes: Vec<SceneNode>,
    },
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        matches!(self, Scene::Empty { .. })
    }

    pub fn canvas(&self) -> Size {
        match self {
            Scene::Empty { canvas, .. } | Scene::Flow { canvas, .. } => *canvas,
        }
    }

    pub fn nodes(&self) -> &[SceneNode] {
        match self {
            Scene::Flow { nodes, .. } => nodes,
            Scene::Empty { .. } => &[],
        }
    }

    pub fn edges(&self) -> &[SceneEdge] {
        match self {
            Scene::Flow { edges, .. } => edges,
            Scene::Empty { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub from: Point,
    pub to: Point,
    pub opacity: f64,
}

/// Cubic curve from `start` to `end` through `control1`/`control2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEdge {
    pub cascade_id: Uuid,
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
    pub width: f64,
    pub opacity: f64,
    pub color: String,
    pub arrowhead: Arrowhead,
}

/// Two short strokes meeting at `tip`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrowhead {
    pub tip: Point,
    pub left: Point,
    pub right: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub pattern_id: Uuid,
    pub center: Point,
    pub size: Size,
    pub label: String,
    pub icon: String,
    pub color: String,
    pub intensity: u8,
    pub filled_segments: u8,
    pub total_segments: u8,
}
