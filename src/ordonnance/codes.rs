//! Scannable code rendering for the ordonnance document.
//!
//! Both codes draw directly as filled rectangles on the PDF layer, so the
//! output is vector-exact and independent of any raster encoder. Coordinates
//! are PDF-space millimetres (origin bottom-left).

use barcoders::sym::code128::Code128;
use printpdf::path::PaintMode;
use printpdf::{Color, Mm, PdfLayerReference, Rect, Rgb};
use qrcode::{Color as QrColor, QrCode};

/// Widest bar module we print; narrows when the payload would overflow
/// the allotted width.
const MAX_BAR_MODULE_MM: f32 = 0.33;

#[derive(Debug, thiserror::Error)]
pub enum CodeError {
    #[error("QR encoding failed: {0}")]
    Qr(String),
    #[error("Barcode encoding failed: {0}")]
    Barcode(String),
}

fn ink() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

/// Draw a QR code with its bottom-left corner at (`x`, `y`), sized
/// `size` × `size` mm.
pub fn draw_qr(
    layer: &PdfLayerReference,
    payload: &str,
    x: Mm,
    y: Mm,
    size: Mm,
) -> Result<(), CodeError> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| CodeError::Qr(e.to_string()))?;
    let width = code.width();
    let colors = code.to_colors();
    let module = size.0 / width as f32;

    layer.set_fill_color(ink());
    for row in 0..width {
        for col in 0..width {
            if colors[row * width + col] != QrColor::Dark {
                continue;
            }
            // QR row 0 is the top row; PDF y grows upward
            let llx = x.0 + col as f32 * module;
            let lly = y.0 + size.0 - (row as f32 + 1.0) * module;
            layer.add_rect(
                Rect::new(Mm(llx), Mm(lly), Mm(llx + module), Mm(lly + module))
                    .with_mode(PaintMode::Fill),
            );
        }
    }
    Ok(())
}

/// Encode `payload` as Code128 (character set B) and return the module
/// pattern (1 = bar, 0 = space).
pub fn code128_modules(payload: &str) -> Result<Vec<u8>, CodeError> {
    // Ɓ selects Code128 character set B (printable ASCII)
    let code = Code128::new(format!("Ɓ{payload}")).map_err(|e| CodeError::Barcode(e.to_string()))?;
    Ok(code.encode())
}

/// Draw a Code128 barcode centered on `center_x`, bars rising `height` mm
/// from `y`, never wider than `max_width` mm.
pub fn draw_code128(
    layer: &PdfLayerReference,
    payload: &str,
    center_x: Mm,
    y: Mm,
    height: Mm,
    max_width: Mm,
) -> Result<(), CodeError> {
    let modules = code128_modules(payload)?;
    let module = MAX_BAR_MODULE_MM.min(max_width.0 / modules.len() as f32);
    let total = module * modules.len() as f32;
    let left = center_x.0 - total / 2.0;

    layer.set_fill_color(ink());
    let mut run_start: Option<usize> = None;
    for (i, bit) in modules.iter().chain(std::iter::once(&0u8)).enumerate() {
        match (*bit, run_start) {
            (1, None) => run_start = Some(i),
            (0, Some(start)) => {
                let llx = left + start as f32 * module;
                let urx = left + i as f32 * module;
                layer.add_rect(
                    Rect::new(Mm(llx), y, Mm(urx), Mm(y.0 + height.0)).with_mode(PaintMode::Fill),
                );
                run_start = None;
            }
            _ => {}
        }
    }
    Ok(())
}
