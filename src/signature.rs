//! Freehand signature capture surface.
//!
//! Records polyline strokes on a bounded canvas and exports the drawing as
//! a lossless PNG raster. Export while empty is an error; the prescription
//! flow keeps its save action disabled until a first stroke exists.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, Luma};

/// Default canvas size in pixels (4:2 drawing surface, matches the 60×30mm
/// signature box aspect on the printed document).
pub const CANVAS_WIDTH: u32 = 600;
pub const CANVAS_HEIGHT: u32 = 300;

const INK: Luma<u8> = Luma([20]);
const PAPER: Luma<u8> = Luma([255]);

#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("Cannot export an empty signature")]
    Empty,
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Bounded drawing surface holding the signer's strokes.
#[derive(Debug, Clone)]
pub struct SignaturePad {
    width: u32,
    height: u32,
    strokes: Vec<Vec<(f32, f32)>>,
}

impl Default for SignaturePad {
    fn default() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }
}

impl SignaturePad {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            strokes: Vec::new(),
        }
    }

    /// Append one freehand stroke. Points land clamped to the canvas;
    /// empty point lists are ignored.
    pub fn add_stroke(&mut self, points: &[(f32, f32)]) {
        if points.is_empty() {
            return;
        }
        let clamped = points
            .iter()
            .map(|&(x, y)| {
                (
                    x.clamp(0.0, (self.width - 1) as f32),
                    y.clamp(0.0, (self.height - 1) as f32),
                )
            })
            .collect();
        self.strokes.push(clamped);
    }

    /// Erase all strokes and reset the empty state.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// True until the first stroke is drawn.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Render the strokes to a lossless PNG (dark ink on white).
    ///
    /// Callers must guard with [`SignaturePad::is_empty`]; exporting an
    /// empty pad returns [`SignatureError::Empty`].
    pub fn export_png(&self) -> Result<Vec<u8>, SignatureError> {
        if self.is_empty() {
            return Err(SignatureError::Empty);
        }

        let mut canvas = GrayImage::from_pixel(self.width, self.height, PAPER);
        for stroke in &self.strokes {
            if stroke.len() == 1 {
                draw_dot(&mut canvas, stroke[0]);
                continue;
            }
            for pair in stroke.windows(2) {
                draw_segment(&mut canvas, pair[0], pair[1]);
            }
        }

        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(canvas)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .map_err(|e| SignatureError::Encode(e.to_string()))?;
        Ok(bytes)
    }
}

/// Plot a point with a 1px halo so thin pen movements stay legible once
/// the raster is scaled down into the document's signature box.
fn draw_dot(canvas: &mut GrayImage, (x, y): (f32, f32)) {
    let (cx, cy) = (x.round() as i64, y.round() as i64);
    for dy in -1..=1 {
        for dx in -1..=1 {
            let (px, py) = (cx + dx, cy + dy);
            if px >= 0 && py >= 0 && (px as u32) < canvas.width() && (py as u32) < canvas.height() {
                canvas.put_pixel(px as u32, py as u32, INK);
            }
        }
    }
}

fn draw_segment(canvas: &mut GrayImage, from: (f32, f32), to: (f32, f32)) {
    let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil() as u32;
    if steps == 0 {
        draw_dot(canvas, from);
        return;
    }
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = from.0 + (to.0 - from.0) * t;
        let y = from.1 + (to.1 - from.1) * t;
        draw_dot(canvas, (x, y));
    }
}
