// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop rectangle editor — pointer-driven rectangle selection over a preview.
//
// Pointer events arrive in display coordinates (the scaled preview); the
// rectangle is stored in image pixels. The editor owns the gesture state so
// the UI only forwards down/move/up and redraws `overlay()` and `handles()`.

use crate::error::{KhotiyanError, Result};
use crate::types::CropRect;

/// Smallest crop edge in image pixels (smaller images use their own size).
pub const MIN_SIZE: u32 = 8;

/// Grab distance around a corner handle, in display pixels.
pub const HANDLE_RADIUS: f32 = 8.0;

/// A pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in display coordinates, used for overlay redraw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomLeft => Self::TopRight,
            Self::BottomRight => Self::TopLeft,
        }
    }
}

/// What lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Handle(Corner),
    Inside,
    Outside,
}

/// Gesture in progress. Positions are in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    Drawing { anchor: (f32, f32) },
    Moving { grab: (f32, f32) },
    Resizing { fixed: (f32, f32) },
}

/// Interactive crop rectangle over an image of fixed size.
#[derive(Debug, Clone)]
pub struct CropEditor {
    image_width: u32,
    image_height: u32,
    /// Image pixels per display pixel.
    scale: f32,
    rect: CropRect,
    aspect: Option<f32>,
    gesture: Gesture,
    /// Rectangle at the start of the current gesture, restored by `cancel`.
    before_gesture: CropRect,
}

impl CropEditor {
    /// Editor over a `width` x `height` image, selecting the whole image.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let rect = CropRect::full(width, height);
        Self {
            image_width: width,
            image_height: height,
            scale: 1.0,
            rect,
            aspect: None,
            gesture: Gesture::Idle,
            before_gesture: rect,
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn rect(&self) -> CropRect {
        self.rect
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn aspect(&self) -> Option<f32> {
        self.aspect
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Size of the preview in display pixels.
    pub fn display_size(&self) -> (f32, f32) {
        (
            self.image_width as f32 / self.scale,
            self.image_height as f32 / self.scale,
        )
    }

    // -- Configuration --------------------------------------------------------

    /// Set how many image pixels one display pixel covers.
    pub fn set_display_scale(&mut self, scale: f32) -> Result<()> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(KhotiyanError::InvalidParameter(format!(
                "display scale must be positive, got {scale}"
            )));
        }
        self.scale = scale;
        Ok(())
    }

    /// Scale the preview so it is at most `max_width` display pixels wide.
    /// Small images are shown at their natural size.
    pub fn fit_display_width(&mut self, max_width: f32) -> Result<()> {
        let scale = (self.image_width as f32 / max_width).max(1.0);
        self.set_display_scale(scale)
    }

    /// Lock the width/height ratio, or unlock with `None`. Applies to the
    /// current rectangle immediately.
    pub fn set_aspect(&mut self, aspect: Option<f32>) -> Result<()> {
        if let Some(ratio) = aspect
            && (!ratio.is_finite() || ratio <= 0.0)
        {
            return Err(KhotiyanError::InvalidParameter(format!(
                "aspect ratio must be positive, got {ratio}"
            )));
        }
        self.aspect = aspect;
        if aspect.is_some() {
            let r = self.rect;
            self.rect = self.span(
                (r.x as f32, r.y as f32),
                (r.right() as f32, r.bottom() as f32),
            );
        }
        Ok(())
    }

    /// Numeric entry. The rectangle is fitted into the image.
    pub fn set_rect(&mut self, rect: CropRect) {
        self.rect = self.fit(rect);
    }

    /// Select the whole image again.
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
        self.rect = CropRect::full(self.image_width, self.image_height);
        if self.aspect.is_some() {
            let aspect = self.aspect;
            let _ = self.set_aspect(aspect);
        }
    }

    // -- Coordinates ----------------------------------------------------------

    /// Map a display point into image coordinates.
    pub fn to_image(&self, point: Point) -> (f32, f32) {
        (point.x * self.scale, point.y * self.scale)
    }

    fn corner_image(&self, corner: Corner) -> (f32, f32) {
        let r = self.rect;
        let (x, y) = match corner {
            Corner::TopLeft => (r.x, r.y),
            Corner::TopRight => (r.right(), r.y),
            Corner::BottomLeft => (r.x, r.bottom()),
            Corner::BottomRight => (r.right(), r.bottom()),
        };
        (x as f32, y as f32)
    }

    fn corner_display(&self, corner: Corner) -> Point {
        let (x, y) = self.corner_image(corner);
        Point::new(x / self.scale, y / self.scale)
    }

    /// Classify a display point. Corner handles take priority over the body.
    pub fn hit_test(&self, point: Point) -> Hit {
        for corner in Corner::ALL {
            let c = self.corner_display(corner);
            let (dx, dy) = (point.x - c.x, point.y - c.y);
            if dx * dx + dy * dy <= HANDLE_RADIUS * HANDLE_RADIUS {
                return Hit::Handle(corner);
            }
        }
        let (x, y) = self.to_image(point);
        let r = self.rect;
        if x >= r.x as f32 && x <= r.right() as f32 && y >= r.y as f32 && y <= r.bottom() as f32 {
            Hit::Inside
        } else {
            Hit::Outside
        }
    }

    // -- Pointer events -------------------------------------------------------

    pub fn pointer_down(&mut self, point: Point) {
        self.before_gesture = self.rect;
        let (x, y) = self.to_image(point);
        self.gesture = match self.hit_test(point) {
            Hit::Handle(corner) => Gesture::Resizing {
                fixed: self.corner_image(corner.opposite()),
            },
            Hit::Inside => Gesture::Moving {
                grab: (x - self.rect.x as f32, y - self.rect.y as f32),
            },
            Hit::Outside => {
                let anchor = self.clamp_point((x, y));
                self.rect = self.span(anchor, anchor);
                Gesture::Drawing { anchor }
            }
        };
    }

    /// Returns whether the rectangle changed.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let to = self.to_image(point);
        let next = match self.gesture {
            Gesture::Idle => return false,
            Gesture::Drawing { anchor } => self.span(anchor, to),
            Gesture::Resizing { fixed } => self.span(fixed, to),
            Gesture::Moving { grab } => {
                let max_x = (self.image_width - self.rect.width) as f32;
                let max_y = (self.image_height - self.rect.height) as f32;
                let x = (to.0 - grab.0).clamp(0.0, max_x).round() as u32;
                let y = (to.1 - grab.1).clamp(0.0, max_y).round() as u32;
                CropRect::new(x, y, self.rect.width, self.rect.height)
            }
        };
        let changed = next != self.rect;
        self.rect = next;
        changed
    }

    /// End the gesture and return the final rectangle.
    pub fn pointer_up(&mut self) -> CropRect {
        self.gesture = Gesture::Idle;
        self.rect
    }

    /// Abort the gesture, restoring the rectangle it started from.
    pub fn cancel(&mut self) {
        if self.gesture != Gesture::Idle {
            self.rect = self.before_gesture;
            self.gesture = Gesture::Idle;
        }
    }

    // -- Redraw ---------------------------------------------------------------

    /// The four shaded regions around the crop rectangle in display
    /// coordinates: top, bottom, left, right.
    pub fn overlay(&self) -> [DisplayRect; 4] {
        let (dw, dh) = self.display_size();
        let s = self.scale;
        let (rx, ry) = (self.rect.x as f32 / s, self.rect.y as f32 / s);
        let (rw, rh) = (self.rect.width as f32 / s, self.rect.height as f32 / s);
        [
            DisplayRect {
                left: 0.0,
                top: 0.0,
                width: dw,
                height: ry,
            },
            DisplayRect {
                left: 0.0,
                top: ry + rh,
                width: dw,
                height: (dh - ry - rh).max(0.0),
            },
            DisplayRect {
                left: 0.0,
                top: ry,
                width: rx,
                height: rh,
            },
            DisplayRect {
                left: rx + rw,
                top: ry,
                width: (dw - rx - rw).max(0.0),
                height: rh,
            },
        ]
    }

    /// Corner handle centres in display coordinates.
    pub fn handles(&self) -> [(Corner, Point); 4] {
        Corner::ALL.map(|corner| (corner, self.corner_display(corner)))
    }

    // -- Geometry helpers -----------------------------------------------------

    fn min_width(&self) -> u32 {
        MIN_SIZE.min(self.image_width)
    }

    fn min_height(&self) -> u32 {
        MIN_SIZE.min(self.image_height)
    }

    fn clamp_point(&self, (x, y): (f32, f32)) -> (f32, f32) {
        (
            x.clamp(0.0, self.image_width as f32),
            y.clamp(0.0, self.image_height as f32),
        )
    }

    /// Rectangle spanning `anchor` and `to` in either direction, honouring
    /// the aspect lock, fitted into the image.
    fn span(&self, anchor: (f32, f32), to: (f32, f32)) -> CropRect {
        let anchor = self.clamp_point(anchor);
        let mut to = self.clamp_point(to);

        if let Some(aspect) = self.aspect {
            let dx = to.0 - anchor.0;
            let down = to.1 >= anchor.1;
            let room = if down {
                self.image_height as f32 - anchor.1
            } else {
                anchor.1
            };
            let mut width = dx.abs();
            let mut height = width / aspect;
            if height > room {
                height = room;
                width = height * aspect;
            }
            let sign_x = if dx < 0.0 { -1.0 } else { 1.0 };
            let sign_y = if down { 1.0 } else { -1.0 };
            to = (anchor.0 + sign_x * width, anchor.1 + sign_y * height);
        }

        let (x0, x1) = (anchor.0.min(to.0), anchor.0.max(to.0));
        let (y0, y1) = (anchor.1.min(to.1), anchor.1.max(to.1));
        self.fit(CropRect::new(
            x0.round() as u32,
            y0.round() as u32,
            (x1 - x0).round() as u32,
            (y1 - y0).round() as u32,
        ))
    }

    /// Enforce the minimum size and keep the rectangle inside the image,
    /// shifting it inward rather than shrinking it.
    fn fit(&self, rect: CropRect) -> CropRect {
        let width = rect.width.clamp(self.min_width(), self.image_width);
        let height = rect.height.clamp(self.min_height(), self.image_height);
        let x = rect.x.min(self.image_width - width);
        let y = rect.y.min(self.image_height - height);
        CropRect::new(x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(editor: &mut CropEditor, from: (f32, f32), to: (f32, f32)) -> CropRect {
        editor.pointer_down(Point::new(from.0, from.1));
        editor.pointer_move(Point::new(to.0, to.1));
        editor.pointer_up()
    }

    fn assert_inside(editor: &CropEditor, w: u32, h: u32) {
        let r = editor.rect();
        assert!(r.right() <= w && r.bottom() <= h, "{r:?} escapes {w}x{h}");
        assert!(r.width >= 1 && r.height >= 1);
    }

    #[test]
    fn starts_with_whole_image() {
        let editor = CropEditor::new(400, 300);
        assert_eq!(editor.rect(), CropRect::full(400, 300));
        assert_eq!(editor.gesture(), Gesture::Idle);
    }

    #[test]
    fn drawing_works_in_any_direction() {
        let mut editor = CropEditor::new(400, 300);
        editor.set_rect(CropRect::new(0, 0, 10, 10));

        let forward = drag(&mut editor, (50.0, 60.0), (150.0, 160.0));
        assert_eq!(forward, CropRect::new(50, 60, 100, 100));

        editor.set_rect(CropRect::new(0, 0, 10, 10));
        let backward = drag(&mut editor, (150.0, 160.0), (50.0, 60.0));
        assert_eq!(backward, CropRect::new(50, 60, 100, 100));
    }

    #[test]
    fn drawing_clamps_to_image() {
        let mut editor = CropEditor::new(400, 300);
        editor.set_rect(CropRect::new(0, 0, 10, 10));
        let rect = drag(&mut editor, (350.0, 250.0), (900.0, 900.0));
        assert_eq!(rect, CropRect::new(350, 250, 50, 50));
        assert_inside(&editor, 400, 300);
    }

    #[test]
    fn click_without_drag_gives_minimum_rect() {
        let mut editor = CropEditor::new(400, 300);
        editor.set_rect(CropRect::new(0, 0, 10, 10));
        editor.pointer_down(Point::new(200.0, 100.0));
        let rect = editor.pointer_up();
        assert_eq!(rect, CropRect::new(200, 100, MIN_SIZE, MIN_SIZE));
    }

    #[test]
    fn moving_keeps_size_and_stays_in_bounds() {
        let mut editor = CropEditor::new(400, 300);
        editor.set_rect(CropRect::new(100, 100, 50, 40));
        let rect = drag(&mut editor, (120.0, 120.0), (1000.0, -500.0));
        assert_eq!(rect, CropRect::new(350, 0, 50, 40));

        let rect = drag(&mut editor, (360.0, 10.0), (30.0, 110.0));
        assert_eq!(rect, CropRect::new(20, 100, 50, 40));
    }

    #[test]
    fn resizing_pins_the_opposite_corner() {
        let mut editor = CropEditor::new(400, 300);
        editor.set_rect(CropRect::new(100, 100, 100, 100));
        assert_eq!(editor.hit_test(Point::new(201.0, 199.0)), Hit::Handle(Corner::BottomRight));

        let rect = drag(&mut editor, (200.0, 200.0), (250.0, 280.0));
        assert_eq!(rect, CropRect::new(100, 100, 150, 180));
    }

    #[test]
    fn resizing_past_the_fixed_corner_flips() {
        let mut editor = CropEditor::new(400, 300);
        editor.set_rect(CropRect::new(100, 100, 100, 100));
        let rect = drag(&mut editor, (200.0, 200.0), (50.0, 40.0));
        assert_eq!(rect, CropRect::new(50, 40, 50, 60));
    }

    #[test]
    fn handles_win_over_body() {
        let mut editor = CropEditor::new(400, 300);
        editor.set_rect(CropRect::new(100, 100, 10, 10));
        assert_eq!(editor.hit_test(Point::new(103.0, 103.0)), Hit::Handle(Corner::TopLeft));
        editor.set_rect(CropRect::new(100, 100, 100, 100));
        assert_eq!(editor.hit_test(Point::new(150.0, 150.0)), Hit::Inside);
        assert_eq!(editor.hit_test(Point::new(20.0, 20.0)), Hit::Outside);
    }

    #[test]
    fn cancel_restores_previous_rect() {
        let mut editor = CropEditor::new(400, 300);
        editor.set_rect(CropRect::new(100, 100, 100, 100));
        editor.pointer_down(Point::new(10.0, 10.0));
        editor.pointer_move(Point::new(50.0, 50.0));
        editor.cancel();
        assert_eq!(editor.rect(), CropRect::new(100, 100, 100, 100));
        assert_eq!(editor.gesture(), Gesture::Idle);
    }

    #[test]
    fn move_without_gesture_is_ignored() {
        let mut editor = CropEditor::new(400, 300);
        assert!(!editor.pointer_move(Point::new(10.0, 10.0)));
        assert_eq!(editor.rect(), CropRect::full(400, 300));
    }

    #[test]
    fn display_scale_maps_pointer_to_image() {
        let mut editor = CropEditor::new(2000, 1000);
        editor.fit_display_width(500.0).unwrap();
        assert_eq!(editor.scale(), 4.0);
        assert_eq!(editor.display_size(), (500.0, 250.0));

        editor.set_rect(CropRect::new(0, 0, 10, 10));
        let rect = drag(&mut editor, (100.0, 50.0), (200.0, 100.0));
        assert_eq!(rect, CropRect::new(400, 200, 400, 200));
        assert!(editor.set_display_scale(0.0).is_err());
    }

    #[test]
    fn aspect_lock_shapes_drawn_rect() {
        let mut editor = CropEditor::new(400, 300);
        editor.set_rect(CropRect::new(0, 0, 10, 10));
        editor.set_aspect(Some(2.0)).unwrap();
        let rect = drag(&mut editor, (20.0, 20.0), (120.0, 200.0));
        assert_eq!(rect, CropRect::new(20, 20, 100, 50));

        // Upward drag near the top edge is limited by the available room.
        let rect = drag(&mut editor, (300.0, 20.0), (100.0, 0.0));
        assert_eq!(rect, CropRect::new(260, 0, 40, 20));
    }

    #[test]
    fn setting_aspect_reshapes_current_rect() {
        let mut editor = CropEditor::new(400, 300);
        editor.set_aspect(Some(1.0)).unwrap();
        assert_eq!(editor.rect(), CropRect::new(0, 0, 300, 300));
        assert!(editor.set_aspect(Some(-1.0)).is_err());
        editor.set_aspect(None).unwrap();
        editor.reset();
        assert_eq!(editor.rect(), CropRect::full(400, 300));
    }

    #[test]
    fn overlay_covers_everything_but_the_crop() {
        let mut editor = CropEditor::new(400, 300);
        editor.set_rect(CropRect::new(100, 50, 120, 80));
        let shaded: f32 = editor.overlay().iter().map(|r| r.width * r.height).sum();
        assert_eq!(shaded, 400.0 * 300.0 - 120.0 * 80.0);
    }

    #[test]
    fn tiny_image_never_breaks_invariants() {
        let mut editor = CropEditor::new(3, 2);
        drag(&mut editor, (5.0, 5.0), (-3.0, -3.0));
        assert_inside(&editor, 3, 2);
        drag(&mut editor, (1.0, 1.0), (2.0, 2.0));
        assert_inside(&editor, 3, 2);
    }
}
