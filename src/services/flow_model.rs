use crate::error::{FlowError, Result};
use crate::models::{Cascade, Pattern, Scene, Settings, Size};

use super::flow_renderer::render_scene;
use super::layout_engine::{compute_layout, PositionMap};
use super::svg::render_svg;
use super::viewport::ViewportController;

/// Owns one day's flow: the input snapshot, its layout and scene, and the
/// viewport the host drives with gestures.
///
/// Data only changes through [`FlowModel::refresh`] and [`FlowModel::resize`],
/// both of which recompute the position map and scene from scratch.
#[derive(Debug, Clone)]
pub struct FlowModel {
    settings: Settings,
    canvas: Size,
    patterns: Vec<Pattern>,
    cascades: Vec<Cascade>,
    positions: PositionMap,
    scene: Scene,
    viewport: ViewportController,
    generation: u64,
}

impl FlowModel {
    /// Fails with [`FlowError::InvalidSettings`] when the settings or the
    /// canvas size would not render.
    pub fn new(settings: Settings, canvas: Size) -> Result<Self> {
        settings.validate()?;
        check_canvas(canvas)?;
        let viewport = ViewportController::new(settings.viewport.clone(), canvas);
        let scene = Scene::Empty {
            canvas,
            message: settings.render.empty_message.clone(),
        };
        Ok(Self {
            settings,
            canvas,
            patterns: Vec::new(),
            cascades: Vec::new(),
            positions: PositionMap::new(),
            scene,
            viewport,
            generation: 0,
        })
    }

    /// Replaces the snapshot wholesale. The previous layout is discarded;
    /// viewport state is left alone.
    pub fn refresh(&mut self, patterns: Vec<Pattern>, cascades: Vec<Cascade>) -> &Self {
        self.patterns = patterns;
        self.cascades = cascades;
        self.generation += 1;
        self.rebuild();
        log::info!(
            "[FlowModel] refresh #{}: {} patterns, {} cascades, {} edges drawn",
            self.generation,
            self.patterns.len(),
            self.cascades.len(),
            self.scene.edges().len()
        );
        self
    }

    /// Relays out for a new canvas. An unusable size is rejected and the
    /// current layout kept.
    pub fn resize(&mut self, canvas: Size) -> Result<()> {
        check_canvas(canvas)?;
        if canvas == self.canvas {
            return Ok(());
        }
        self.canvas = canvas;
        self.viewport.set_canvas(canvas);
        self.rebuild();
        Ok(())
    }

    fn rebuild(&mut self) {
        self.positions = compute_layout(&self.patterns, &self.cascades, self.canvas, &self.settings.layout);
        self.scene = render_scene(
            &self.positions,
            &self.patterns,
            &self.cascades,
            self.canvas,
            &self.settings.palette,
            &self.settings.layout,
            &self.settings.render,
        );
    }

    pub fn positions(&self) -> &PositionMap {
        &self.positions
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn render_svg(&self) -> String {
        render_svg(&self.scene, &self.viewport.transform())
    }
}

fn check_canvas(canvas: Size) -> Result<()> {
    if canvas.is_drawable() {
        Ok(())
    } else {
        Err(FlowError::InvalidSettings(format!(
            "canvas {}x{} must be positive and finite",
            canvas.width, canvas.height
        )))
    }
}
