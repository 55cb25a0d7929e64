//! Ordonnance document assembler.
//!
//! Renders a finalized [`Prescription`] into a fixed-layout A4 PDF: colored
//! header band, identification strip with QR code, patient block, outlined
//! medication boxes, footer with the embedded signature raster, Code128
//! barcode. The vertical ordering and the band/QR/signature-box dimensions
//! are contract: printed and scanned medical workflows depend on them.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfLayerReference, Rect, Rgb,
};

use crate::models::prescription::{MedicationItem, Prescription};

use super::codes;

// ─── Page geometry (mm) ───────────────────────────────────────────────────────

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 15.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

pub const HEADER_HEIGHT: f32 = 45.0;
pub const QR_SIZE: f32 = 25.0;
pub const PATIENT_BLOCK_HEIGHT: f32 = 35.0;
pub const MED_BOX_HEIGHT: f32 = 25.0;
const MED_BOX_GAP: f32 = 4.0;
/// Footer band anchor, measured from the bottom edge.
pub const FOOTER_OFFSET: f32 = 50.0;
pub const SIGNATURE_BOX_WIDTH: f32 = 60.0;
pub const SIGNATURE_BOX_HEIGHT: f32 = 30.0;

/// Body content must stay clear of the anchored footer band.
const BODY_LIMIT: f32 = PAGE_HEIGHT - FOOTER_OFFSET - 5.0;

const MM_PER_PT: f32 = 0.352_778;
const SIGNATURE_DPI: f32 = 300.0;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("PDF font error: {0}")]
    Font(String),
    #[error("PDF save error: {0}")]
    Save(String),
    #[error("Signature raster is invalid: {0}")]
    Signature(String),
    #[error("Cannot write document: {0}")]
    Io(#[from] std::io::Error),
}

/// Finished document: bytes plus the deterministic download name.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// `Ordonnance_<patient full name, spaces → underscores>_<YYYY-MM-DD>.pdf`
pub fn document_filename(prescription: &Prescription) -> String {
    format!(
        "Ordonnance_{}_{}.pdf",
        prescription.patient.full_name().replace(' ', "_"),
        prescription.date.format("%Y-%m-%d"),
    )
}

/// Render the full document. Assumes the [`Prescription`] invariants hold
/// (non-empty medication list, signature present), enforced upstream by
/// `Prescription::new` and the API precondition checks.
pub fn render_prescription(prescription: &Prescription) -> Result<RenderedDocument, DocumentError> {
    let (doc, page1, layer1) = PdfDocument::new(
        &prescription.number,
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| DocumentError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| DocumentError::Font(e.to_string()))?;
    let mut layer = doc.get_page(page1).get_layer(layer1);

    draw_header(&layer, &bold, &font, prescription);
    draw_identification(&layer, &bold, &font, prescription);
    let mut y = draw_patient_block(&layer, &bold, &font, prescription);

    if let Some(diagnosis) = prescription.diagnosis.as_deref().filter(|d| !d.trim().is_empty()) {
        layer.use_text("Diagnostic :", 10.5, Mm(MARGIN), from_top(y), &bold);
        layer.use_text(
            diagnosis,
            10.5,
            Mm(MARGIN + text_width_mm("Diagnostic :", 10.5) + 2.0),
            from_top(y),
            &font,
        );
        y += 8.0;
    }

    layer.use_text("TRAITEMENT", 11.5, Mm(MARGIN), from_top(y), &bold);
    y += 7.0;

    for (index, med) in prescription.medications.iter().enumerate() {
        if y + MED_BOX_HEIGHT > BODY_LIMIT {
            layer = next_page(&doc);
            y = MARGIN + 5.0;
        }
        draw_medication_box(&layer, &bold, &font, index, med, y);
        y += MED_BOX_HEIGHT + MED_BOX_GAP;
    }

    if let Some(notes) = prescription
        .recommendations
        .as_deref()
        .filter(|n| !n.trim().is_empty())
    {
        if y + 12.0 > BODY_LIMIT {
            layer = next_page(&doc);
            y = MARGIN + 5.0;
        }
        layer.use_text("Recommandations :", 10.5, Mm(MARGIN), from_top(y), &bold);
        y += 6.0;
        for line in wrap_text(notes, 100) {
            layer.use_text(&line, 9.0, Mm(MARGIN), from_top(y), &font);
            y += 4.5;
        }
    }

    draw_footer(&layer, &bold, &font, prescription)?;
    draw_barcode(&layer, &font, prescription);

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| DocumentError::Save(e.to_string()))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| DocumentError::Save(e.to_string()))?;

    Ok(RenderedDocument {
        filename: document_filename(prescription),
        bytes,
    })
}

/// Render and write to `dir` under the deterministic filename.
pub fn save_prescription_pdf(
    prescription: &Prescription,
    dir: &Path,
) -> Result<PathBuf, DocumentError> {
    let rendered = render_prescription(prescription)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(&rendered.filename);
    fs::write(&path, &rendered.bytes)?;
    Ok(path)
}

// ─── Sections ─────────────────────────────────────────────────────────────────

/// Solid band across the full page width, 0–45mm from the top. Doctor
/// identity left, practice contact right, all in white.
fn draw_header(
    layer: &PdfLayerReference,
    bold: &IndirectFontRef,
    font: &IndirectFontRef,
    prescription: &Prescription,
) {
    layer.set_fill_color(Color::Rgb(Rgb::new(0.11, 0.36, 0.54, None)));
    layer.add_rect(
        Rect::new(Mm(0.0), from_top(HEADER_HEIGHT), Mm(PAGE_WIDTH), from_top(0.0))
            .with_mode(PaintMode::Fill),
    );

    let doctor = &prescription.doctor;
    layer.set_fill_color(Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None)));
    layer.use_text(&doctor.full_name, 16.0, Mm(MARGIN), from_top(16.0), bold);
    layer.use_text(&doctor.specialty, 10.0, Mm(MARGIN), from_top(23.0), font);
    layer.use_text(
        format!("N° d'ordre : {}", doctor.license_number),
        10.0,
        Mm(MARGIN),
        from_top(28.5),
        font,
    );

    for (i, line) in [
        doctor.practice_name.as_str(),
        doctor.practice_address.as_str(),
        doctor.phone.as_str(),
        doctor.email.as_str(),
    ]
    .iter()
    .enumerate()
    {
        right_text(layer, font, line, 9.0, PAGE_WIDTH - MARGIN, 14.0 + i as f32 * 5.5);
    }

    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
}

/// QR at the left margin plus the centered title / number / date column.
fn draw_identification(
    layer: &PdfLayerReference,
    bold: &IndirectFontRef,
    font: &IndirectFontRef,
    prescription: &Prescription,
) {
    match codes::draw_qr(
        layer,
        &prescription.qr_payload,
        Mm(MARGIN),
        from_top(50.0 + QR_SIZE),
        Mm(QR_SIZE),
    ) {
        Ok(()) => {}
        Err(err) => {
            // Same degrade-gracefully contract as the barcode: the document
            // must still come out, carrying the raw payload as text.
            tracing::warn!(%err, "QR generation failed, falling back to text");
            layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
            layer.use_text(
                &prescription.qr_payload,
                6.5,
                Mm(MARGIN),
                from_top(62.0),
                font,
            );
        }
    }

    centered_text(layer, bold, "ORDONNANCE MÉDICALE", 15.0, 57.0);
    centered_text(layer, font, &format!("N° {}", prescription.number), 10.5, 64.0);
    centered_text(
        layer,
        font,
        &format!("le {}", prescription.date.format("%d/%m/%Y")),
        10.5,
        70.0,
    );
}

/// Filled block with four patient detail lines. Returns the y cursor (mm
/// from top) for the section that follows.
fn draw_patient_block(
    layer: &PdfLayerReference,
    bold: &IndirectFontRef,
    font: &IndirectFontRef,
    prescription: &Prescription,
) -> f32 {
    let top = 80.0;
    layer.set_fill_color(Color::Rgb(Rgb::new(0.92, 0.95, 0.97, None)));
    layer.add_rect(
        Rect::new(
            Mm(MARGIN),
            from_top(top + PATIENT_BLOCK_HEIGHT),
            Mm(PAGE_WIDTH - MARGIN),
            from_top(top),
        )
        .with_mode(PaintMode::Fill),
    );

    let patient = &prescription.patient;
    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.use_text("PATIENT", 11.0, Mm(MARGIN + 4.0), from_top(top + 7.0), bold);

    let age = patient.age_on(prescription.date);
    let mut contact = format!("Tél : {}", patient.phone);
    if let Some(weight) = patient.weight_kg {
        contact.push_str(&format!(" - Poids : {weight:.0} kg"));
    }
    let lines = [
        patient.full_name(),
        format!(
            "Né(e) le {} - {} ans - {}",
            patient.date_of_birth.format("%d/%m/%Y"),
            age,
            patient.gender.label(),
        ),
        patient.address.clone(),
        contact,
    ];
    for (i, line) in lines.iter().enumerate() {
        layer.use_text(
            line,
            9.5,
            Mm(MARGIN + 4.0),
            from_top(top + 14.0 + i as f32 * 6.0),
            font,
        );
    }

    top + PATIENT_BLOCK_HEIGHT + 7.0
}

/// Numbered title line inside a medication box, e.g. "1. Paracetamol 500mg".
fn numbered_title(index: usize, med: &MedicationItem) -> String {
    format!("{}. {} {}", index + 1, med.name, med.dosage)
}

/// One outlined box (content width × 25mm) per medication, stacked in
/// list order.
fn draw_medication_box(
    layer: &PdfLayerReference,
    bold: &IndirectFontRef,
    font: &IndirectFontRef,
    index: usize,
    med: &MedicationItem,
    top: f32,
) {
    layer.set_outline_color(Color::Rgb(Rgb::new(0.45, 0.45, 0.45, None)));
    layer.set_outline_thickness(0.8);
    layer.add_rect(
        Rect::new(
            Mm(MARGIN),
            from_top(top + MED_BOX_HEIGHT),
            Mm(PAGE_WIDTH - MARGIN),
            from_top(top),
        )
        .with_mode(PaintMode::Stroke),
    );

    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.use_text(
        numbered_title(index, med),
        10.5,
        Mm(MARGIN + 4.0),
        from_top(top + 7.0),
        bold,
    );

    if med.do_not_substitute {
        layer.set_fill_color(Color::Rgb(Rgb::new(0.78, 0.11, 0.11, None)));
        right_text(
            layer,
            bold,
            "NON SUBSTITUABLE",
            9.5,
            PAGE_WIDTH - MARGIN - 4.0,
            top + 7.0,
        );
        layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    }

    let mut form_line = format!("{} - {}", med.form.label(), med.dosage);
    if let Some(generic) = &med.generic_name {
        form_line.push_str(&format!(" - DCI : {generic}"));
    }
    let mut duration_line = format!(
        "Durée : {} - Quantité : {} {}",
        med.duration, med.quantity, med.unit
    );
    if let Some(instructions) = &med.instructions {
        duration_line.push_str(&format!(" - {instructions}"));
    }

    layer.use_text(&form_line, 9.0, Mm(MARGIN + 4.0), from_top(top + 12.5), font);
    layer.use_text(
        format!("Posologie : {}", med.posology),
        9.0,
        Mm(MARGIN + 4.0),
        from_top(top + 17.0),
        font,
    );
    layer.use_text(&duration_line, 9.0, Mm(MARGIN + 4.0), from_top(top + 21.5), font);
}

/// Renewal mention left, signature box right, anchored 50mm from the
/// bottom edge of the (last) page.
fn draw_footer(
    layer: &PdfLayerReference,
    bold: &IndirectFontRef,
    font: &IndirectFontRef,
    prescription: &Prescription,
) -> Result<(), DocumentError> {
    let top = PAGE_HEIGHT - FOOTER_OFFSET;

    let renewal = if prescription.renewals == 0 {
        "Non renouvelable".to_string()
    } else {
        format!("Renouvelable {} fois", prescription.renewals)
    };
    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.use_text(&renewal, 9.5, Mm(MARGIN), from_top(top + 12.0), font);

    right_text(
        layer,
        bold,
        "Signature et cachet",
        10.0,
        PAGE_WIDTH - MARGIN,
        top + 3.0,
    );

    let box_left = PAGE_WIDTH - MARGIN - SIGNATURE_BOX_WIDTH;
    let box_top = top + 5.0;
    layer.set_outline_color(Color::Rgb(Rgb::new(0.45, 0.45, 0.45, None)));
    layer.set_outline_thickness(0.8);
    layer.add_rect(
        Rect::new(
            Mm(box_left),
            from_top(box_top + SIGNATURE_BOX_HEIGHT),
            Mm(PAGE_WIDTH - MARGIN),
            from_top(box_top),
        )
        .with_mode(PaintMode::Stroke),
    );

    embed_signature(
        layer,
        &prescription.signature_png,
        box_left + 1.5,
        box_top + 1.5,
        SIGNATURE_BOX_WIDTH - 3.0,
        SIGNATURE_BOX_HEIGHT - 3.0,
    )
}

/// Code128 strip centered near the very bottom, human-readable value
/// underneath. Encoding failure degrades to the raw payload as text; the
/// document always completes.
fn draw_barcode(layer: &PdfLayerReference, font: &IndirectFontRef, prescription: &Prescription) {
    match codes::draw_code128(
        layer,
        &prescription.barcode_payload,
        Mm(PAGE_WIDTH / 2.0),
        from_top(290.0),
        Mm(7.0),
        Mm(120.0),
    ) {
        Ok(()) => {
            layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
            centered_text(layer, font, &prescription.barcode_payload, 7.0, 294.0);
        }
        Err(err) => {
            tracing::warn!(%err, "barcode generation failed, falling back to text");
            layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
            centered_text(layer, font, &prescription.barcode_payload, 9.0, 290.0);
        }
    }
}

// ─── Drawing helpers ──────────────────────────────────────────────────────────

/// Convert a distance from the top edge into PDF coordinates (origin
/// bottom-left).
fn from_top(mm: f32) -> Mm {
    Mm(PAGE_HEIGHT - mm)
}

fn next_page(doc: &printpdf::PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    doc.get_page(page).get_layer(layer)
}

/// Helvetica metrics approximation: just over half an em per glyph. Good
/// enough for centering and right-alignment of short label runs.
fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * 0.5 * MM_PER_PT
}

fn centered_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    size_pt: f32,
    y_from_top: f32,
) {
    let x = (PAGE_WIDTH - text_width_mm(text, size_pt)) / 2.0;
    layer.use_text(text, size_pt, Mm(x), from_top(y_from_top), font);
}

fn right_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    size_pt: f32,
    right_edge: f32,
    y_from_top: f32,
) {
    let x = right_edge - text_width_mm(text, size_pt);
    layer.use_text(text, size_pt, Mm(x), from_top(y_from_top), font);
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Decode the signature PNG and place it inside the signature box, scaled
/// to fit and centered.
fn embed_signature(
    layer: &PdfLayerReference,
    png: &[u8],
    left: f32,
    top: f32,
    width: f32,
    height: f32,
) -> Result<(), DocumentError> {
    let decoded = image::load_from_memory(png)
        .map_err(|e| DocumentError::Signature(e.to_string()))?
        .into_luma8();
    let (px_w, px_h) = decoded.dimensions();
    let gray = printpdf::image_crate::GrayImage::from_raw(px_w, px_h, decoded.into_raw())
        .ok_or_else(|| DocumentError::Signature("raster buffer size mismatch".into()))?;
    let pdf_image = Image::from_dynamic_image(&printpdf::image_crate::DynamicImage::ImageLuma8(gray));

    let native_w = px_w as f32 * 25.4 / SIGNATURE_DPI;
    let native_h = px_h as f32 * 25.4 / SIGNATURE_DPI;
    let scale = (width / native_w).min(height / native_h);
    let x = left + (width - native_w * scale) / 2.0;
    let y_bottom = from_top(top + height).0 + (height - native_h * scale) / 2.0;

    pdf_image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y_bottom)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(SIGNATURE_DPI),
            ..Default::default()
        },
    );
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
