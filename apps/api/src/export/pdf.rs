//! Export adapter: `RenderedDocument -> PDF bytes`.
//!
//! Layout happens in two pure stages — blocks become positioned
//! [`LayoutLine`]s, lines become pages — and only the final stage touches
//! printpdf. Pagination is therefore a pure function of the document and is
//! tested without producing bytes. Output is deterministic for a fixed
//! document apart from the creation-date metadata the PDF writer stamps.
//!
//! Failure mode: any writer error surfaces as one [`ExportError`]; no bytes
//! are returned, so a corrupt partial file can never reach the caller.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};
use thiserror::Error;

use crate::models::resume::BasicInfo;
use crate::render::metrics::{get_metrics, DocFont};
use crate::render::template::{DocBlock, RenderedDocument};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

// US letter, uniform margins.
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 20.0;
const USABLE_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
const USABLE_HEIGHT_MM: f32 = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM;

const PT_TO_MM: f32 = 0.352_778;
const LINE_SPACING: f32 = 1.4;
const RULE_HEIGHT_MM: f32 = 1.0;
/// Gap reserved between an entry title and its right-aligned date range.
const COLUMN_GAP_EM: f32 = 2.0;

/// One positioned line of output: wrapped text plus the style it draws with.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    pub text: String,
    /// Right-aligned column text (date ranges); drawn on the same baseline.
    pub right_text: Option<String>,
    pub font_size: f32,
    pub bold: bool,
    pub color: (u8, u8, u8),
    pub gap_before_mm: f32,
    pub rule: bool,
}

impl LayoutLine {
    fn text_line(text: String, font_size: f32, bold: bool, color: (u8, u8, u8), gap: f32) -> Self {
        LayoutLine {
            text,
            right_text: None,
            font_size,
            bold,
            color,
            gap_before_mm: gap,
            rule: false,
        }
    }

    fn height_mm(&self) -> f32 {
        if self.rule {
            RULE_HEIGHT_MM
        } else if self.text.is_empty() && self.right_text.is_none() {
            0.0
        } else {
            self.font_size * PT_TO_MM * LINE_SPACING
        }
    }
}

fn max_width_em(font_size: f32) -> f32 {
    USABLE_WIDTH_MM / (font_size * PT_TO_MM)
}

/// Flattens the block tree into styled, word-wrapped lines.
pub fn layout_lines(doc: &RenderedDocument) -> Vec<LayoutLine> {
    let metrics = get_metrics(doc.font);
    let body_color = (55, 55, 55);
    let muted_color = (105, 105, 105);
    let mut lines = Vec::new();

    for block in &doc.blocks {
        match block {
            DocBlock::Name { text } => {
                for wrapped in metrics.wrap_words(text, max_width_em(22.0)) {
                    lines.push(LayoutLine::text_line(wrapped, 22.0, true, doc.primary_rgb, 0.0));
                }
            }
            DocBlock::Title { text } => {
                for wrapped in metrics.wrap_words(text, max_width_em(12.0)) {
                    lines.push(LayoutLine::text_line(wrapped, 12.0, false, doc.accent_rgb, 1.5));
                }
            }
            DocBlock::ContactLine { text } => {
                for wrapped in metrics.wrap_words(text, max_width_em(9.5)) {
                    lines.push(LayoutLine::text_line(wrapped, 9.5, false, muted_color, 1.5));
                }
            }
            DocBlock::SectionHeader { text } => {
                for wrapped in metrics.wrap_words(text, max_width_em(12.0)) {
                    lines.push(LayoutLine::text_line(wrapped, 12.0, true, doc.primary_rgb, 3.0));
                }
            }
            DocBlock::EntryHeader { left, right } => {
                let size = 10.5;
                let right = right.trim();
                let reserved = if right.is_empty() {
                    0.0
                } else {
                    metrics.measure_str(right) + COLUMN_GAP_EM
                };
                let left_width = (max_width_em(size) - reserved).max(5.0);
                let mut wrapped = metrics.wrap_words(left, left_width);
                if wrapped.is_empty() {
                    wrapped.push(String::new());
                }
                for (i, text) in wrapped.into_iter().enumerate() {
                    let mut line =
                        LayoutLine::text_line(text, size, true, (35, 35, 35), if i == 0 { 1.8 } else { 0.0 });
                    if i == 0 && !right.is_empty() {
                        line.right_text = Some(right.to_string());
                    }
                    lines.push(line);
                }
            }
            DocBlock::Detail { text } => {
                for wrapped in metrics.wrap_words(text, max_width_em(10.0)) {
                    lines.push(LayoutLine::text_line(wrapped, 10.0, false, muted_color, 0.6));
                }
            }
            DocBlock::Paragraph { text } => {
                for wrapped in metrics.wrap_words(text, max_width_em(10.0)) {
                    lines.push(LayoutLine::text_line(wrapped, 10.0, false, body_color, 0.8));
                }
            }
            DocBlock::SkillLine { text } => {
                for wrapped in metrics.wrap_words(text, max_width_em(10.0)) {
                    lines.push(LayoutLine::text_line(wrapped, 10.0, false, body_color, 0.8));
                }
            }
            DocBlock::Rule => {
                lines.push(LayoutLine {
                    text: String::new(),
                    right_text: None,
                    font_size: 0.0,
                    bold: false,
                    color: doc.accent_rgb,
                    gap_before_mm: 1.5,
                    rule: true,
                });
            }
            DocBlock::Spacer { lines: count } => {
                lines.push(LayoutLine {
                    text: String::new(),
                    right_text: None,
                    font_size: 0.0,
                    bold: false,
                    color: body_color,
                    gap_before_mm: f32::from(*count) * 2.5,
                    rule: false,
                });
            }
        }
    }
    lines
}

/// Splits lines into pages at the fixed height budget. Gaps never carry
/// across a page break (a page starts at the top margin). Always yields at
/// least one page.
pub fn paginate(lines: &[LayoutLine]) -> Vec<Vec<LayoutLine>> {
    let mut pages: Vec<Vec<LayoutLine>> = Vec::new();
    let mut current: Vec<LayoutLine> = Vec::new();
    let mut used = 0.0_f32;

    for line in lines {
        let gap = if current.is_empty() {
            0.0
        } else {
            line.gap_before_mm
        };
        let height = line.height_mm();
        if !current.is_empty() && used + gap + height > USABLE_HEIGHT_MM {
            pages.push(std::mem::take(&mut current));
            used = height;
            current.push(line.clone());
        } else {
            used += gap + height;
            current.push(line.clone());
        }
    }
    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}

/// Page count for a rendered document; pure and deterministic.
pub fn page_count(doc: &RenderedDocument) -> usize {
    paginate(&layout_lines(doc)).len()
}

fn regular_font(font: DocFont) -> BuiltinFont {
    match font {
        DocFont::Helvetica => BuiltinFont::Helvetica,
        DocFont::Times => BuiltinFont::TimesRoman,
    }
}

fn bold_font(font: DocFont) -> BuiltinFont {
    match font {
        DocFont::Helvetica => BuiltinFont::HelveticaBold,
        DocFont::Times => BuiltinFont::TimesBold,
    }
}

fn pdf_color(rgb: (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(rgb.0) / 255.0,
        f32::from(rgb.1) / 255.0,
        f32::from(rgb.2) / 255.0,
        None,
    ))
}

/// Writes the document to PDF bytes.
pub fn export_pdf(doc: &RenderedDocument) -> Result<Vec<u8>, ExportError> {
    let pages = paginate(&layout_lines(doc));

    let (pdf, first_page, first_layer) = PdfDocument::new(
        "Resume",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "content",
    );
    let regular = pdf
        .add_builtin_font(regular_font(doc.font))
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let bold = pdf
        .add_builtin_font(bold_font(doc.font))
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    for (i, page_lines) in pages.iter().enumerate() {
        let layer = if i == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = pdf.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            pdf.get_page(page).get_layer(layer)
        };
        draw_page(&layer, page_lines, doc, &regular, &bold);
    }

    pdf.save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

fn draw_page(
    layer: &PdfLayerReference,
    lines: &[LayoutLine],
    doc: &RenderedDocument,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    let metrics = get_metrics(doc.font);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            y -= line.gap_before_mm;
        }
        y -= line.height_mm();

        if line.rule {
            layer.set_outline_color(pdf_color(line.color));
            layer.set_outline_thickness(0.75);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(MARGIN_MM), Mm(y)), false),
                    (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_MM), Mm(y)), false),
                ],
                is_closed: false,
            });
            continue;
        }
        if line.text.is_empty() && line.right_text.is_none() {
            continue;
        }

        let font = if line.bold { bold } else { regular };
        layer.set_fill_color(pdf_color(line.color));
        if !line.text.is_empty() {
            layer.use_text(line.text.clone(), line.font_size, Mm(MARGIN_MM), Mm(y), font);
        }
        if let Some(right) = &line.right_text {
            let width_mm = metrics.measure_str(right) * line.font_size * PT_TO_MM;
            let x = (PAGE_WIDTH_MM - MARGIN_MM - width_mm).max(MARGIN_MM);
            layer.use_text(right.clone(), line.font_size, Mm(x), Mm(y), regular);
        }
    }
}

/// Builds the download filename from the user's names.
/// `Ada` + `Lovelace` gives `Ada_Lovelace_Resume.pdf`; with neither name
/// present the file is just `Resume.pdf`. Letters and digits from any script
/// are kept; everything else (separators, punctuation, path characters) is
/// stripped.
pub fn export_filename(info: &BasicInfo) -> String {
    let sanitize = |value: &Option<String>| -> String {
        value
            .as_deref()
            .unwrap_or("")
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect()
    };
    let mut parts: Vec<String> = vec![sanitize(&info.first_name), sanitize(&info.last_name)];
    parts.retain(|p| !p.is_empty());
    parts.push("Resume".to_string());
    format!("{}.pdf", parts.join("_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ResumeDraft;
    use crate::models::template::TemplateId;
    use crate::render::template::render;

    fn doc_with_paragraphs(count: usize) -> RenderedDocument {
        let mut doc = render(&ResumeDraft::default(), TemplateId::Modern);
        for i in 0..count {
            doc.blocks.push(DocBlock::Paragraph {
                text: format!("Paragraph number {i} with a bit of body text."),
            });
        }
        doc
    }

    #[test]
    fn test_empty_draft_is_a_single_page() {
        let doc = render(&ResumeDraft::default(), TemplateId::Modern);
        assert_eq!(page_count(&doc), 1);
    }

    #[test]
    fn test_page_count_is_deterministic() {
        let doc = doc_with_paragraphs(120);
        assert_eq!(page_count(&doc), page_count(&doc));
    }

    #[test]
    fn test_long_document_spills_to_multiple_pages() {
        let doc = doc_with_paragraphs(200);
        assert!(page_count(&doc) > 1);
    }

    #[test]
    fn test_no_page_exceeds_height_budget() {
        let doc = doc_with_paragraphs(200);
        for page in paginate(&layout_lines(&doc)) {
            let mut used = 0.0_f32;
            for (i, line) in page.iter().enumerate() {
                if i > 0 {
                    used += line.gap_before_mm;
                }
                used += line.height_mm();
            }
            assert!(used <= USABLE_HEIGHT_MM + 1e-3, "page too tall: {used}mm");
        }
    }

    #[test]
    fn test_pagination_preserves_all_lines_in_order() {
        let doc = doc_with_paragraphs(200);
        let lines = layout_lines(&doc);
        let flattened: Vec<LayoutLine> = paginate(&lines).into_iter().flatten().collect();
        assert_eq!(flattened, lines);
    }

    #[test]
    fn test_export_produces_pdf_bytes() {
        let doc = render(&ResumeDraft::default(), TemplateId::Modern);
        let bytes = export_pdf(&doc).expect("export");
        assert!(bytes.starts_with(b"%PDF"), "output must be a PDF");
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_export_all_templates() {
        for template in [
            TemplateId::Modern,
            TemplateId::Classic,
            TemplateId::Minimal,
            TemplateId::Executive,
        ] {
            let doc = render(&ResumeDraft::default(), template);
            assert!(export_pdf(&doc).is_ok(), "template {template:?} must export");
        }
    }

    #[test]
    fn test_entry_header_right_column_survives_layout() {
        let mut doc = render(&ResumeDraft::default(), TemplateId::Modern);
        doc.blocks.push(DocBlock::EntryHeader {
            left: "Engineer".to_string(),
            right: "Jan 2020 – Present".to_string(),
        });
        let lines = layout_lines(&doc);
        assert!(lines
            .iter()
            .any(|l| l.right_text.as_deref() == Some("Jan 2020 – Present")));
    }

    #[test]
    fn test_filename_from_both_names() {
        let info = BasicInfo {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            ..Default::default()
        };
        assert_eq!(export_filename(&info), "Ada_Lovelace_Resume.pdf");
    }

    #[test]
    fn test_filename_sanitizes_punctuation() {
        let info = BasicInfo {
            first_name: Some("Ada-Marie".to_string()),
            last_name: Some("O'Neil".to_string()),
            ..Default::default()
        };
        assert_eq!(export_filename(&info), "AdaMarie_ONeil_Resume.pdf");
    }

    #[test]
    fn test_filename_keeps_non_ascii_letters() {
        let info = BasicInfo {
            first_name: Some("Żaneta".to_string()),
            last_name: Some("Nowak".to_string()),
            ..Default::default()
        };
        assert_eq!(export_filename(&info), "Żaneta_Nowak_Resume.pdf");
    }

    #[test]
    fn test_filename_with_one_name() {
        let info = BasicInfo {
            first_name: Some("Ada".to_string()),
            ..Default::default()
        };
        assert_eq!(export_filename(&info), "Ada_Resume.pdf");
    }

    #[test]
    fn test_filename_without_names() {
        assert_eq!(export_filename(&BasicInfo::default()), "Resume.pdf");
    }
}
