//! Pan/zoom state for the flow canvas.
//!
//! Each axis keeps a committed value and an in-flight gesture value. What is
//! drawn is always `compose(committed, in_flight)`; ending a gesture folds the
//! in-flight value into the committed one and resets it to identity. Nothing
//! here feeds back into layout.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{Point, Size, ViewportSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewportState {
    Idle,
    Panning,
    Zooming,
    /// Pan and zoom gestures active at the same time.
    PanningAndZooming,
}

/// Scale about `anchor`, then translate by `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset: Point,
    pub anchor: Point,
}

impl ViewTransform {
    pub fn identity(anchor: Point) -> Self {
        Self {
            scale: 1.0,
            offset: Point::ZERO,
            anchor,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.anchor.x + (p.x - self.anchor.x) * self.scale + self.offset.x,
            self.anchor.y + (p.y - self.anchor.y) * self.scale + self.offset.y,
        )
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.offset == Point::ZERO
    }
}

#[derive(Debug, Clone)]
struct ResetAnimation {
    from_scale: f64,
    from_offset: Point,
    elapsed: Duration,
    duration: Duration,
}

impl ResetAnimation {
    fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    settings: ViewportSettings,
    anchor: Point,
    committed_scale: f64,
    in_flight_scale: Option<f64>,
    committed_offset: Point,
    in_flight_offset: Option<Point>,
    reset_animation: Option<ResetAnimation>,
}

impl ViewportController {
    pub fn new(settings: ViewportSettings, canvas: Size) -> Self {
        Self {
            settings,
            anchor: canvas.center(),
            committed_scale: 1.0,
            in_flight_scale: None,
            committed_offset: Point::ZERO,
            in_flight_offset: None,
            reset_animation: None,
        }
    }

    pub fn set_canvas(&mut self, canvas: Size) {
        self.anchor = canvas.center();
    }

    pub fn state(&self) -> ViewportState {
        match (self.in_flight_offset.is_some(), self.in_flight_scale.is_some()) {
            (false, false) => ViewportState::Idle,
            (true, false) => ViewportState::Panning,
            (false, true) => ViewportState::Zooming,
            (true, true) => ViewportState::PanningAndZooming,
        }
    }

    pub fn committed_scale(&self) -> f64 {
        self.committed_scale
    }

    pub fn committed_offset(&self) -> Point {
        self.committed_offset
    }

    pub fn is_animating(&self) -> bool {
        self.reset_animation.is_some()
    }

    // --- magnification ---

    pub fn begin_zoom(&mut self) {
        self.reset_animation = None;
        self.in_flight_scale = Some(1.0);
    }

    /// `multiplier` is the gesture's cumulative magnification since it began.
    pub fn update_zoom(&mut self, multiplier: f64) {
        if self.in_flight_scale.is_none() {
            self.begin_zoom();
        }
        if multiplier.is_finite() && multiplier > 0.0 {
            self.in_flight_scale = Some(multiplier);
        }
    }

    pub fn end_zoom(&mut self) {
        if let Some(multiplier) = self.in_flight_scale.take() {
            self.committed_scale = self.clamp_scale(self.committed_scale * multiplier);
            log::debug!("[Viewport] zoom committed at {:.3}", self.committed_scale);
        }
    }

    pub fn cancel_zoom(&mut self) {
        self.in_flight_scale = None;
    }

    // --- drag ---

    pub fn begin_pan(&mut self) {
        self.reset_animation = None;
        self.in_flight_offset = Some(Point::ZERO);
    }

    /// `translation` is the drag's cumulative delta since it began.
    pub fn update_pan(&mut self, translation: Point) {
        if self.in_flight_offset.is_none() {
            self.begin_pan();
        }
        if translation.x.is_finite() && translation.y.is_finite() {
            self.in_flight_offset = Some(translation);
        }
    }

    pub fn end_pan(&mut self) {
        if let Some(delta) = self.in_flight_offset.take() {
            self.committed_offset = Point::new(self.committed_offset.x + delta.x, self.committed_offset.y + delta.y);
            log::debug!(
                "[Viewport] pan committed at ({:.1}, {:.1})",
                self.committed_offset.x,
                self.committed_offset.y
            );
        }
    }

    pub fn cancel_pan(&mut self) {
        self.in_flight_offset = None;
    }

    // --- reset ---

    /// Double-tap reset. Committed state is identity as soon as this returns;
    /// the displayed transform eases back over `reset_duration_ms`.
    pub fn reset(&mut self) {
        let shown = self.target_transform();
        self.in_flight_scale = None;
        self.in_flight_offset = None;
        self.committed_scale = 1.0;
        self.committed_offset = Point::ZERO;
        self.reset_animation = if shown.is_identity() {
            None
        } else {
            Some(ResetAnimation {
                from_scale: shown.scale,
                from_offset: shown.offset,
                elapsed: Duration::ZERO,
                duration: Duration::from_millis(self.settings.reset_duration_ms),
            })
        };
    }

    /// Advances the reset animation, if any.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(anim) = self.reset_animation.as_mut() {
            anim.elapsed += dt;
            if anim.progress() >= 1.0 {
                self.reset_animation = None;
            }
        }
    }

    /// The transform to draw with right now.
    pub fn transform(&self) -> ViewTransform {
        let target = self.target_transform();
        let Some(anim) = &self.reset_animation else {
            return target;
        };

        let t = ease_in_out(anim.progress());
        ViewTransform {
            scale: lerp(anim.from_scale, target.scale, t),
            offset: Point::new(
                lerp(anim.from_offset.x, target.offset.x, t),
                lerp(anim.from_offset.y, target.offset.y, t),
            ),
            anchor: self.anchor,
        }
    }

    fn target_transform(&self) -> ViewTransform {
        let scale = self.clamp_scale(self.committed_scale * self.in_flight_scale.unwrap_or(1.0));
        let delta = self.in_flight_offset.unwrap_or(Point::ZERO);
        ViewTransform {
            scale,
            offset: Point::new(self.committed_offset.x + delta.x, self.committed_offset.y + delta.y),
            anchor: self.anchor,
        }
    }

    /// Bounds are ordered before clamping; non-finite or non-positive values
    /// read as 1.0.
    fn clamp_scale(&self, scale: f64) -> f64 {
        let finite_or_one = |v: f64| if v.is_finite() && v > 0.0 { v } else { 1.0 };
        let a = finite_or_one(self.settings.min_scale);
        let b = finite_or_one(self.settings.max_scale);
        finite_or_one(scale).max(a.min(b)).min(a.max(b))
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn ease_in_out(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}
