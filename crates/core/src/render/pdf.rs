//! PDF serialization of composed reports.
//!
//! Pages are drawn with the two built-in Helvetica faces, so the output
//! carries no embedded fonts. Coordinates are computed in millimetres from
//! [`PageGeometry`] and converted to points only when operators are emitted.

use bytes::Bytes;
use escala_shared::PageGeometry;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};
use tracing::{debug, warn};

use super::error::RenderError;
use super::text::{encode_win_ansi, text_width, truncate_to_width};
use crate::reports::{DetailPage, Page, PageContent, ReportDocument, ReportHeader, SummaryPage};

/// MIME type of rendered reports.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const PT_PER_MM: f32 = 72.0 / 25.4;

/// Rows shorter than this are hard to read; fitting below it is logged.
const LEGIBLE_ROW_MM: f32 = 3.5;
/// Font size never exceeds this, in points.
const MAX_CELL_FONT: f32 = 9.0;
const CELL_PADDING_MM: f32 = 1.0;
const HEADER_SHADE: f32 = 0.85;
const TITLE_SIZE: f32 = 13.0;
const SUBTITLE_SIZE: f32 = 9.0;
const FOOTER_SIZE: f32 = 8.0;
const CHURCH_HEADING_MM: f32 = 8.0;
const COUNTER_LINE_MM: f32 = 5.0;

/// Share of the printable width taken by each detail column.
const DETAIL_COLUMN_SHARES: [f32; 7] = [0.11, 0.07, 0.07, 0.18, 0.22, 0.22, 0.13];

fn pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// A serialized report ready for download or storage.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    /// Download file name.
    pub filename: String,
    /// MIME type.
    pub content_type: &'static str,
    /// Document bytes.
    pub bytes: Bytes,
}

/// Serializes [`ReportDocument`]s to PDF.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    geometry: PageGeometry,
}

impl PdfRenderer {
    /// Creates a renderer for the given page geometry.
    #[must_use]
    pub const fn new(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    /// Renders every page of `document`, in order, into one PDF.
    ///
    /// # Errors
    ///
    /// Returns an error if the PDF object model cannot be encoded or written.
    pub fn render(&self, document: &ReportDocument) -> Result<RenderedReport, RenderError> {
        let mut pdf = Document::with_version("1.5");
        let pages_id = pdf.new_object_id();

        let regular_id = pdf.add_object(base_font("Helvetica"));
        let bold_id = pdf.add_object(base_font("Helvetica-Bold"));
        let resources_id = pdf.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(document.pages.len());
        for page in &document.pages {
            let content = self.draw_page(&document.header, page);
            let stream = Stream::new(Dictionary::new(), content.encode()?);
            let content_id = pdf.add_object(stream);
            let page_id = pdf.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(pt(self.geometry.page_width_mm)),
                Object::Real(pt(self.geometry.page_height_mm)),
            ],
        };
        pdf.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = pdf.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        pdf.trailer.set("Root", catalog_id);
        pdf.compress();

        let mut buffer = Vec::new();
        pdf.save_to(&mut buffer)?;

        debug!(
            schedule_id = %document.schedule_id,
            pages = document.page_count(),
            bytes = buffer.len(),
            "Report rendered"
        );

        Ok(RenderedReport {
            filename: document.filename.clone(),
            content_type: PDF_CONTENT_TYPE,
            bytes: Bytes::from(buffer),
        })
    }

    fn draw_page(&self, header: &ReportHeader, page: &Page) -> Content {
        let g = &self.geometry;
        let mut canvas = Canvas::default();
        canvas.line_width(0.5);

        let top = g.page_height_mm - g.margin_mm;
        canvas.text(g.margin_mm, top - 5.0, TITLE_SIZE, true, &header.title);
        let subtitle = format!("{} | {} | {}", header.district, header.period, header.status);
        canvas.text(g.margin_mm, top - 11.0, SUBTITLE_SIZE, false, &subtitle);

        let table_top = top - g.title_block_mm;
        match &page.content {
            PageContent::Summary(summary) => self.draw_summary(&mut canvas, table_top, summary),
            PageContent::Detail(detail) => self.draw_detail(&mut canvas, table_top, detail),
        }

        let footer_width_mm = text_width(&page.footer.text, FOOTER_SIZE, false) / PT_PER_MM;
        let footer_x = (g.page_width_mm - footer_width_mm) / 2.0;
        canvas.text(footer_x, g.margin_mm + 2.0, FOOTER_SIZE, false, &page.footer.text);

        canvas.into_content()
    }

    fn draw_summary(&self, canvas: &mut Canvas, top: f32, page: &SummaryPage) {
        let g = &self.geometry;
        let total_rows: usize = page.matrices.iter().map(|m| m.rows.len() + 1).sum();
        let gaps = page.matrices.len().saturating_sub(1) as f32 * g.group_gap_mm;
        let row_height = self.fit_row_height(total_rows, gaps);

        let mut cursor = top;
        for matrix in &page.matrices {
            let mut widths = vec![g.date_column_mm, g.weekday_column_mm];
            widths.extend(std::iter::repeat_n(matrix.column_width_mm, matrix.churches.len()));

            let rows: Vec<Vec<&str>> = matrix
                .rows
                .iter()
                .map(|row| {
                    let mut cells = vec![row.day_month.as_str(), row.weekday.as_str()];
                    cells.extend(row.cells.iter().map(String::as_str));
                    cells
                })
                .collect();

            let used = draw_table(
                canvas,
                g.margin_mm,
                cursor,
                &widths,
                &matrix.header,
                &rows,
                row_height,
            );
            cursor -= used + g.group_gap_mm;
        }
    }

    fn draw_detail(&self, canvas: &mut Canvas, top: f32, page: &DetailPage) {
        let g = &self.geometry;
        canvas.text(g.margin_mm, top - 5.0, 11.0, true, &page.church);

        let counters_mm = page.counter_lines.len() as f32 * COUNTER_LINE_MM + 2.0;
        let row_height = self.fit_row_height(page.rows.len() + 1, CHURCH_HEADING_MM + counters_mm);

        let printable = g.page_width_mm - 2.0 * g.margin_mm;
        let widths: Vec<f32> = DETAIL_COLUMN_SHARES.iter().map(|s| s * printable).collect();
        let rows: Vec<Vec<&str>> = page
            .rows
            .iter()
            .map(|row| {
                vec![
                    row.day_month_year.as_str(),
                    row.weekday.as_str(),
                    row.time.as_str(),
                    row.service.as_str(),
                    row.preacher.as_str(),
                    row.theme.as_str(),
                    row.status.as_str(),
                ]
            })
            .collect();

        let table_top = top - CHURCH_HEADING_MM;
        let used = draw_table(
            canvas,
            g.margin_mm,
            table_top,
            &widths,
            &page.header,
            &rows,
            row_height,
        );

        let mut baseline = table_top - used - COUNTER_LINE_MM;
        for (caption, value) in &page.counter_lines {
            let line = format!("{caption}: {value}");
            canvas.text(g.margin_mm, baseline, SUBTITLE_SIZE, false, &line);
            baseline -= COUNTER_LINE_MM;
        }
    }

    /// Row height that fits `rows` rows plus `reserved_mm` into the table area.
    ///
    /// Never above the configured height. Below that there is no floor: every
    /// row of a page has to land above the footer band, so a crowded page gets
    /// shorter rows and a smaller font rather than losing rows.
    fn fit_row_height(&self, rows: usize, reserved_mm: f32) -> f32 {
        let natural = self.geometry.row_height_mm;
        if rows == 0 {
            return natural;
        }
        let available = (self.geometry.table_area_height_mm() - reserved_mm).max(0.0);
        let fitted = (available / rows as f32).min(natural);
        if fitted < LEGIBLE_ROW_MM.min(natural) {
            warn!(
                rows,
                row_height_mm = fitted,
                "Page is crowded; table rows shrunk below legible height"
            );
        }
        fitted
    }
}

/// Draws a ruled table with a shaded header row. Returns the height used, in mm.
fn draw_table(
    canvas: &mut Canvas,
    left: f32,
    top: f32,
    widths: &[f32],
    header: &[String],
    rows: &[Vec<&str>],
    row_height: f32,
) -> f32 {
    let size = (pt(row_height) * 0.55).min(MAX_CELL_FONT);
    let total_width: f32 = widths.iter().sum();

    let header_bottom = top - row_height;
    canvas.fill_rect(left, header_bottom, total_width, row_height, HEADER_SHADE);
    let header_cells: Vec<&str> = header.iter().map(String::as_str).collect();
    draw_row(canvas, left, header_bottom, widths, &header_cells, row_height, size, true);

    let mut bottom = header_bottom;
    for row in rows {
        bottom -= row_height;
        draw_row(canvas, left, bottom, widths, row, row_height, size, false);
    }

    top - bottom
}

#[allow(clippy::too_many_arguments)]
fn draw_row(
    canvas: &mut Canvas,
    left: f32,
    bottom: f32,
    widths: &[f32],
    cells: &[&str],
    row_height: f32,
    size: f32,
    bold: bool,
) {
    let baseline = bottom + (row_height - size / PT_PER_MM * 0.7) / 2.0;
    let mut x = left;
    for (width, cell) in widths.iter().zip(cells) {
        canvas.stroke_rect(x, bottom, *width, row_height);
        let room = pt(width - 2.0 * CELL_PADDING_MM);
        let text = truncate_to_width(cell, room, size, bold);
        if !text.is_empty() {
            canvas.text(x + CELL_PADDING_MM, baseline, size, bold, &text);
        }
        x += width;
    }
}

fn base_font(name: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => name,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn real(mm: f32) -> Object {
    Object::Real(pt(mm))
}

/// Accumulates content stream operators. Arguments are in millimetres.
#[derive(Default)]
struct Canvas {
    operations: Vec<Operation>,
}

impl Canvas {
    fn line_width(&mut self, points: f32) {
        self.operations
            .push(Operation::new("w", vec![Object::Real(points)]));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, gray: f32) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("g", vec![Object::Real(gray)]),
            Operation::new("re", vec![real(x), real(y), real(width), real(height)]),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.operations.extend([
            Operation::new("re", vec![real(x), real(y), real(width), real(height)]),
            Operation::new("S", vec![]),
        ]);
    }

    fn text(&mut self, x: f32, y: f32, size: f32, bold: bool, text: &str) {
        let font = if bold { "F2" } else { "F1" };
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(font.as_bytes().to_vec()), Object::Real(size)]),
            Operation::new("Td", vec![real(x), real(y)]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn into_content(self) -> Content {
        Content {
            operations: self.operations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportService;
    use crate::schedule::{Assignment, Schedule, ScheduleData, ScheduleStatus};
    use chrono::{NaiveDate, NaiveTime};
    use escala_shared::types::ScheduleId;
    use escala_shared::{Locale, ReportConfig};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn document(churches: usize, locale: Locale) -> ReportDocument {
        let schedule = Schedule {
            id: ScheduleId::new(),
            district_id: None,
            month: 3,
            year: 2025,
            status: ScheduleStatus::Draft,
        };
        let assignments = (0..churches)
            .flat_map(|c| {
                [1, 8, 15].into_iter().map(move |d| {
                    Assignment::new(day(d), format!("Igreja Adventista Número {c}"))
                        .with_preacher("Pr. José da Conceição")
                })
            })
            .collect();
        let config = ReportConfig {
            locale,
            ..ReportConfig::default()
        };
        ReportService::compose(&ScheduleData::new(schedule, assignments), &config).unwrap()
    }

    #[test]
    fn test_render_produces_one_pdf_page_per_report_page() {
        let document = document(12, Locale::PtBr);
        let rendered = PdfRenderer::new(PageGeometry::default()).render(&document).unwrap();

        assert!(rendered.bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(rendered.content_type, PDF_CONTENT_TYPE);
        assert_eq!(rendered.filename, "escala-março-2025.pdf");

        let parsed = Document::load_mem(&rendered.bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), document.page_count());
    }

    #[test]
    fn test_render_single_matrix() {
        let document = document(2, Locale::En);
        let rendered = PdfRenderer::new(PageGeometry::default()).render(&document).unwrap();
        let parsed = Document::load_mem(&rendered.bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 3);
    }

    #[test]
    fn test_row_height_shrinks_to_fit() {
        let geometry = PageGeometry::default();
        let renderer = PdfRenderer::new(geometry.clone());
        let natural = geometry.row_height_mm;

        assert!((renderer.fit_row_height(5, 0.0) - natural).abs() < f32::EPSILON);

        let shrunk = renderer.fit_row_height(40, 0.0);
        assert!(shrunk < natural);

        let crowded = renderer.fit_row_height(500, 0.0);
        assert!(crowded * 500.0 <= geometry.table_area_height_mm() + 0.01);
    }

    /// Lowest y, in millimetres, of every rectangle and text position.
    fn lowest_drawn_mm(content: &Content) -> f32 {
        content
            .operations
            .iter()
            .filter(|op| op.operator == "re" || op.operator == "Td")
            .filter_map(|op| op.operands.get(1)?.as_float().ok())
            .fold(f32::INFINITY, f32::min)
            / PT_PER_MM
    }

    fn assert_within_margins(renderer: &PdfRenderer, document: &ReportDocument) {
        let margin = PageGeometry::default().margin_mm;
        for page in &document.pages {
            let content = renderer.draw_page(&document.header, page);
            let lowest = lowest_drawn_mm(&content);
            assert!(
                lowest >= margin - 0.01,
                "page {} drawn down to {lowest} mm",
                page.footer.index
            );
        }
    }

    #[test]
    fn test_paired_full_month_matrices_stay_on_page() {
        let schedule = Schedule {
            id: ScheduleId::new(),
            district_id: None,
            month: 3,
            year: 2025,
            status: ScheduleStatus::Approved,
        };
        let assignments = (0..12)
            .flat_map(|c| {
                (1..=31).map(move |d| {
                    Assignment::new(day(d), format!("Igreja {c:02}")).with_preacher("Maria")
                })
            })
            .collect();
        let document = ReportService::compose(
            &ScheduleData::new(schedule, assignments),
            &ReportConfig::default(),
        )
        .unwrap();

        assert_eq!(document.summary_pages, 1);
        assert_eq!(document.matrices().count(), 2);
        assert_within_margins(&PdfRenderer::new(PageGeometry::default()), &document);
    }

    #[test]
    fn test_long_church_detail_stays_on_page() {
        let schedule = Schedule {
            id: ScheduleId::new(),
            district_id: None,
            month: 3,
            year: 2025,
            status: ScheduleStatus::Approved,
        };
        let morning = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let evening = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        let assignments = (1..=31)
            .flat_map(|d| {
                [morning, evening]
                    .into_iter()
                    .map(move |t| Assignment::new(day(d), "Central").with_time(t))
            })
            .collect();
        let document = ReportService::compose(
            &ScheduleData::new(schedule, assignments),
            &ReportConfig::default(),
        )
        .unwrap();

        assert_eq!(document.detail_pages().next().unwrap().rows.len(), 62);
        assert_within_margins(&PdfRenderer::new(PageGeometry::default()), &document);
    }
}
