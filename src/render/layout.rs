//! Pre-measured pagination and block drawing.
//!
//! The renderer owns a page cursor and exposes one drawing operation per
//! block kind. Every operation measures the vertical space it needs before
//! touching the page and inserts a page break first when the space is not
//! there, so no block is ever split across a page boundary. Composite cards
//! check space per sub-block: the header strip, each detail line, the
//! parameter table, and the rationale box each fit-or-break on their own.
//!
//! Geometry is fixed A4 in points with a banner band at the top of every
//! page and a footer band at the bottom.

use super::content_stream::Paint;
use super::fonts::{TextLayout, HELVETICA, HELVETICA_BOLD, HELVETICA_OBLIQUE};
use super::writer::{PdfWriter, WriterConfig};
use crate::config::RenderConfig;
use crate::error::Result;
use crate::records::{Category, CommentaryBlock, TradeIdea, WatchlistEntry};
use indexmap::IndexMap;

/// Page width in points (A4).
pub const PAGE_WIDTH: f32 = 595.0;
/// Page height in points (A4).
pub const PAGE_HEIGHT: f32 = 842.0;

const MARGIN: f32 = 32.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const BANNER_HEIGHT: f32 = 72.0;
/// Cursor floor: content never descends into the footer band.
const BOTTOM_MARGIN: f32 = 48.0;
const CONTENT_TOP: f32 = BANNER_HEIGHT + 18.0;

const SECTION_HEADER_H: f32 = 24.0;
const METRIC_ROW_H: f32 = 20.0;
const CARD_HEADER_H: f32 = 22.0;
const MIN_TABLE_ROW_H: f32 = 18.0;
const TILE_H: f32 = 30.0;
const TILE_GAP: f32 = 4.0;
const BOX_PAD: f32 = 10.0;

/// Banner and minor-section header color.
pub const HEADER_NAVY: (f32, f32, f32) = (0.102, 0.149, 0.251);
const WHITE: (f32, f32, f32) = (1.0, 1.0, 1.0);
const TEXT_DARK: (f32, f32, f32) = (0.173, 0.173, 0.173);
const TEXT_GRAY: (f32, f32, f32) = (0.45, 0.45, 0.45);
const RULE_GRAY: (f32, f32, f32) = (0.8, 0.8, 0.8);
const TABLE_HEADER_FILL: (f32, f32, f32) = (0.961, 0.961, 0.961);
const TILE_FILL: (f32, f32, f32) = (0.973, 0.973, 0.973);
const ALERT_FILL: (f32, f32, f32) = (1.0, 0.922, 0.933);
const RATIONALE_FILL: (f32, f32, f32) = (0.933, 0.945, 0.961);
const WATCH_FILL: (f32, f32, f32) = (0.996, 0.961, 0.898);
const ALERT_BORDER: (f32, f32, f32) = (0.906, 0.298, 0.235);
const ALERT_TITLE: (f32, f32, f32) = (0.722, 0.11, 0.11);

fn line_h(size: f32) -> f32 {
    size * 1.35
}

/// Mutable render state: current page, cursor, and active left margin.
#[derive(Debug, Clone)]
pub struct LayoutContext {
    /// Index of the page being drawn.
    pub page_index: usize,
    /// Distance from the top of the page to the next free position.
    pub cursor_y: f32,
    /// Active left margin for block content.
    pub left_margin: f32,
}

/// Stateful page renderer for report records.
pub struct ReportRenderer {
    config: RenderConfig,
    layout: TextLayout,
    writer: PdfWriter,
    ctx: LayoutContext,
    /// Whether anything has been drawn below the banner on the current page.
    page_dirty: bool,
}

impl ReportRenderer {
    /// Create a renderer with its first page open.
    pub fn new(config: RenderConfig) -> Self {
        let writer_config = WriterConfig::default()
            .with_title(config.banner_title.clone())
            .with_compress(config.compress);
        let mut renderer = Self {
            config,
            layout: TextLayout::new(),
            writer: PdfWriter::with_config(writer_config),
            ctx: LayoutContext {
                page_index: 0,
                cursor_y: CONTENT_TOP,
                left_margin: MARGIN,
            },
            page_dirty: false,
        };
        renderer.new_page();
        renderer
    }

    /// Number of pages opened so far.
    pub fn page_count(&self) -> usize {
        self.writer.page_count()
    }

    fn new_page(&mut self) {
        let index = self.writer.add_page(PAGE_WIDTH, PAGE_HEIGHT);
        self.ctx.page_index = index;
        self.ctx.cursor_y = CONTENT_TOP;
        self.ctx.left_margin = MARGIN;
        self.page_dirty = false;
        self.draw_banner();
    }

    fn draw_banner(&mut self) {
        let title = self.config.banner_title.clone();
        let subtitle = self.config.banner_subtitle.clone();
        let stamp = self.config.banner_stamp.clone();
        let stamp_width = self.layout.width(&stamp, HELVETICA, 9.0);

        let page = self.writer.page_content(self.ctx.page_index);
        page.fill_color(HEADER_NAVY.0, HEADER_NAVY.1, HEADER_NAVY.2).rect(
            0.0,
            PAGE_HEIGHT - BANNER_HEIGHT,
            PAGE_WIDTH,
            BANNER_HEIGHT,
            Paint::Fill,
        );
        page.fill_color(WHITE.0, WHITE.1, WHITE.2).text(
            &title,
            MARGIN,
            PAGE_HEIGHT - 32.0,
            HELVETICA_BOLD,
            16.0,
        );
        page.fill_color(0.78, 0.82, 0.88).text(
            &subtitle,
            MARGIN,
            PAGE_HEIGHT - 48.0,
            HELVETICA,
            9.0,
        );
        if !stamp.is_empty() {
            page.fill_color(0.78, 0.82, 0.88).text(
                &stamp,
                PAGE_WIDTH - MARGIN - stamp_width,
                PAGE_HEIGHT - 32.0,
                HELVETICA,
                9.0,
            );
        }
    }

    /// Break before drawing if `height` does not fit above the footer band.
    fn ensure_space(&mut self, height: f32) {
        if self.ctx.cursor_y + height > PAGE_HEIGHT - BOTTOM_MARGIN {
            self.new_page();
        }
    }

    /// Unconditional break, skipped when the current page is still empty.
    fn force_page_break(&mut self) {
        if self.page_dirty {
            self.new_page();
        }
    }

    /// Draw a colored section header bar.
    ///
    /// Major sections pass `forced = true` and always start on a fresh page.
    pub fn section_header(&mut self, title: &str, color: (f32, f32, f32), forced: bool) {
        if forced {
            self.force_page_break();
        }
        self.ensure_space(SECTION_HEADER_H + 10.0);
        let y = PAGE_HEIGHT - self.ctx.cursor_y - SECTION_HEADER_H;
        let page = self.writer.page_content(self.ctx.page_index);
        page.fill_color(color.0, color.1, color.2)
            .rect(MARGIN, y, CONTENT_WIDTH, SECTION_HEADER_H, Paint::Fill);
        page.fill_color(WHITE.0, WHITE.1, WHITE.2).text(
            title,
            MARGIN + 8.0,
            y + 7.0,
            HELVETICA_BOLD,
            12.0,
        );
        self.ctx.cursor_y += SECTION_HEADER_H + 8.0;
        self.page_dirty = true;
    }

    /// Draw the alert notice box.
    pub fn alert_box(&mut self, title: &str, body: &str) {
        self.boxed_passage(title, body, 12.0, 10.0, ALERT_FILL, ALERT_BORDER, ALERT_TITLE);
    }

    /// Draw the disclaimer box.
    pub fn disclaimer_box(&mut self, title: &str, body: &str) {
        self.boxed_passage(
            title,
            body,
            10.0,
            8.0,
            TABLE_HEADER_FILL,
            RULE_GRAY,
            TEXT_GRAY,
        );
    }

    /// Bordered box with a title line and a wrapped body; the whole box is
    /// one non-splittable block.
    fn boxed_passage(
        &mut self,
        title: &str,
        body: &str,
        title_size: f32,
        body_size: f32,
        fill: (f32, f32, f32),
        border: (f32, f32, f32),
        title_color: (f32, f32, f32),
    ) {
        let inner_width = CONTENT_WIDTH - 2.0 * BOX_PAD;
        let lines = self.layout.wrap_text(body, HELVETICA, body_size, inner_width);
        let height =
            2.0 * BOX_PAD + line_h(title_size) + lines.len() as f32 * line_h(body_size);
        self.ensure_space(height + 6.0);

        let top = PAGE_HEIGHT - self.ctx.cursor_y;
        let page = self.writer.page_content(self.ctx.page_index);
        page.fill_color(fill.0, fill.1, fill.2)
            .stroke_color(border.0, border.1, border.2)
            .line_width(1.0)
            .rect(MARGIN, top - height, CONTENT_WIDTH, height, Paint::FillStroke);
        page.fill_color(title_color.0, title_color.1, title_color.2).text(
            title,
            MARGIN + BOX_PAD,
            top - BOX_PAD - title_size,
            HELVETICA_BOLD,
            title_size,
        );
        let mut text_y = top - BOX_PAD - line_h(title_size) - body_size;
        page.fill_color(TEXT_DARK.0, TEXT_DARK.1, TEXT_DARK.2);
        for (line, _) in &lines {
            page.text(line, MARGIN + BOX_PAD, text_y, HELVETICA, body_size);
            text_y -= line_h(body_size);
        }
        self.ctx.cursor_y += height + 8.0;
        self.page_dirty = true;
    }

    /// Draw index metrics two per row; an odd count leaves the last row with
    /// only its first column populated.
    pub fn metric_pairs(&mut self, metrics: &[(String, String)]) {
        let col_width = CONTENT_WIDTH / 2.0;
        for row in metrics.chunks(2) {
            self.ensure_space(METRIC_ROW_H);
            let baseline = PAGE_HEIGHT - self.ctx.cursor_y - 12.0;
            for (i, (label, value)) in row.iter().enumerate() {
                let x = MARGIN + i as f32 * col_width;
                let label_text = format!("{}:", label);
                let label_width = self.layout.width(&label_text, HELVETICA_BOLD, 10.0);
                let page = self.writer.page_content(self.ctx.page_index);
                page.fill_color(TEXT_DARK.0, TEXT_DARK.1, TEXT_DARK.2).text(
                    &label_text,
                    x,
                    baseline,
                    HELVETICA_BOLD,
                    10.0,
                );
                page.text(value, x + label_width + 6.0, baseline, HELVETICA, 10.0);
            }
            self.ctx.cursor_y += METRIC_ROW_H;
            self.page_dirty = true;
        }
        self.ctx.cursor_y += 4.0;
    }

    /// Draw commentary blocks: optional bold sub-heading, then the wrapped
    /// paragraph line by line.
    pub fn commentary(&mut self, blocks: &[CommentaryBlock]) {
        for block in blocks {
            if let Some(heading) = &block.heading {
                // Keep the heading attached to at least one paragraph line.
                self.ensure_space(line_h(11.0) + line_h(10.0));
                let baseline = PAGE_HEIGHT - self.ctx.cursor_y - 11.0;
                let heading = heading.clone();
                let page = self.writer.page_content(self.ctx.page_index);
                page.fill_color(HEADER_NAVY.0, HEADER_NAVY.1, HEADER_NAVY.2).text(
                    &heading,
                    MARGIN,
                    baseline,
                    HELVETICA_BOLD,
                    11.0,
                );
                self.ctx.cursor_y += line_h(11.0) + 2.0;
                self.page_dirty = true;
            }
            self.free_lines(std::slice::from_ref(&block.paragraph), HELVETICA, 10.0, TEXT_DARK);
            self.ctx.cursor_y += 4.0;
        }
    }

    /// Draw free-form text, wrapped, with a page-break check per line.
    fn free_lines(
        &mut self,
        texts: &[String],
        font: &'static str,
        size: f32,
        color: (f32, f32, f32),
    ) {
        let indent = self.ctx.left_margin;
        for text in texts {
            let lines = self.layout.wrap_text(text, font, size, CONTENT_WIDTH - (indent - MARGIN));
            for (line, _) in &lines {
                self.ensure_space(line_h(size));
                let baseline = PAGE_HEIGHT - self.ctx.cursor_y - size;
                let page = self.writer.page_content(self.ctx.page_index);
                page.fill_color(color.0, color.1, color.2)
                    .text(line, indent, baseline, font, size);
                self.ctx.cursor_y += line_h(size);
                self.page_dirty = true;
            }
        }
    }

    /// Draw a labeled grid: one gray header row of parameter labels over one
    /// unfilled row of values, columns divided evenly across the content
    /// width. Row heights grow with wrapped cell text, floored at a minimum.
    pub fn parameter_table(&mut self, parameters: &IndexMap<String, String>) {
        if parameters.is_empty() {
            return;
        }
        let cols = parameters.len();
        let col_width = CONTENT_WIDTH / cols as f32;
        let cell_width = col_width - 8.0;

        let header_cells: Vec<Vec<(String, f32)>> = parameters
            .keys()
            .map(|label| self.layout.wrap_text(label, HELVETICA_BOLD, 9.0, cell_width))
            .collect();
        let value_cells: Vec<Vec<(String, f32)>> = parameters
            .values()
            .map(|value| self.layout.wrap_text(value, HELVETICA, 9.0, cell_width))
            .collect();

        let row_height = |cells: &[Vec<(String, f32)>]| -> f32 {
            let max_lines = cells.iter().map(Vec::len).max().unwrap_or(1);
            (max_lines as f32 * line_h(9.0) + 8.0).max(MIN_TABLE_ROW_H)
        };
        let header_h = row_height(&header_cells);
        let value_h = row_height(&value_cells);
        let total = header_h + value_h;

        // The table is one block; it never splits between its two rows.
        self.ensure_space(total + 6.0);
        let top = PAGE_HEIGHT - self.ctx.cursor_y;

        let page = self.writer.page_content(self.ctx.page_index);
        page.fill_color(TABLE_HEADER_FILL.0, TABLE_HEADER_FILL.1, TABLE_HEADER_FILL.2)
            .rect(MARGIN, top - header_h, CONTENT_WIDTH, header_h, Paint::Fill);
        page.stroke_color(RULE_GRAY.0, RULE_GRAY.1, RULE_GRAY.2).line_width(0.5);
        for i in 0..cols {
            let x = MARGIN + i as f32 * col_width;
            page.rect(x, top - header_h, col_width, header_h, Paint::Stroke);
            page.rect(x, top - total, col_width, value_h, Paint::Stroke);
        }
        // Cells are centered within their column.
        page.fill_color(TEXT_DARK.0, TEXT_DARK.1, TEXT_DARK.2);
        for (i, cell) in header_cells.iter().enumerate() {
            let col_x = MARGIN + i as f32 * col_width;
            let mut y = top - 13.0;
            for (line, line_width) in cell {
                page.text(line, col_x + (col_width - line_width) / 2.0, y, HELVETICA_BOLD, 9.0);
                y -= line_h(9.0);
            }
        }
        for (i, cell) in value_cells.iter().enumerate() {
            let col_x = MARGIN + i as f32 * col_width;
            let mut y = top - header_h - 13.0;
            for (line, line_width) in cell {
                page.text(line, col_x + (col_width - line_width) / 2.0, y, HELVETICA, 9.0);
                y -= line_h(9.0);
            }
        }
        self.ctx.cursor_y += total + 8.0;
        self.page_dirty = true;
    }

    /// Draw parameters as fixed-height tiles, three per row. A value that
    /// would overflow its tile downsizes its font, then wraps as a last
    /// resort.
    pub fn tile_grid(&mut self, parameters: &IndexMap<String, String>) {
        if parameters.is_empty() {
            return;
        }
        let tile_width = (CONTENT_WIDTH - 2.0 * TILE_GAP) / 3.0;
        let entries: Vec<(&String, &String)> = parameters.iter().collect();
        for row in entries.chunks(3) {
            self.ensure_space(TILE_H + TILE_GAP);
            let top = PAGE_HEIGHT - self.ctx.cursor_y;
            for (col, (label, value)) in row.iter().enumerate() {
                let x = MARGIN + col as f32 * (tile_width + TILE_GAP);

                let mut value_size = 10.0_f32;
                while self.layout.width(value, HELVETICA_BOLD, value_size) > tile_width - 10.0
                    && value_size > 6.5
                {
                    value_size -= 0.5;
                }
                let value_lines =
                    self.layout
                        .wrap_text(value, HELVETICA_BOLD, value_size, tile_width - 10.0);

                let label_upper = label.to_uppercase();
                let page = self.writer.page_content(self.ctx.page_index);
                page.fill_color(TILE_FILL.0, TILE_FILL.1, TILE_FILL.2).rect(
                    x,
                    top - TILE_H,
                    tile_width,
                    TILE_H,
                    Paint::Fill,
                );
                page.fill_color(TEXT_GRAY.0, TEXT_GRAY.1, TEXT_GRAY.2).text(
                    &label_upper,
                    x + 5.0,
                    top - 11.0,
                    HELVETICA,
                    7.0,
                );
                page.fill_color(TEXT_DARK.0, TEXT_DARK.1, TEXT_DARK.2);
                let mut y = top - 11.0 - line_h(value_size);
                for (line, _) in value_lines.iter().take(2) {
                    page.text(line, x + 5.0, y, HELVETICA_BOLD, value_size);
                    y -= line_h(value_size);
                }
            }
            self.ctx.cursor_y += TILE_H + TILE_GAP;
            self.page_dirty = true;
        }
        self.ctx.cursor_y += 4.0;
    }

    /// Draw one trade-idea card: colored header strip with ticker and setup
    /// badge, detail lines, parameter table, optional rationale and
    /// confidence, and a trailing rule. Sub-blocks break independently.
    pub fn trade_card(&mut self, idea: &TradeIdea) {
        self.card_header(
            &card_title(&idea.ticker, &idea.company_name),
            &idea.setup_label,
            idea.category,
        );
        let previous_margin = self.ctx.left_margin;
        self.ctx.left_margin = MARGIN + 4.0;
        self.free_lines(&idea.detail_lines, HELVETICA, 10.0, TEXT_DARK);
        self.ctx.left_margin = previous_margin;

        self.parameter_table(&idea.parameters);

        if let Some(rationale) = &idea.rationale {
            self.rationale_box(rationale);
        }
        if let Some(confidence) = &idea.confidence_label {
            self.confidence_line(confidence);
        }
        self.trailing_rule();
    }

    /// Draw one watchlist entry: orange header strip, detail lines on a
    /// tinted background, and the tile grid for any parameters.
    pub fn watch_card(&mut self, entry: &WatchlistEntry) {
        self.card_header(&entry.title, "", Category::Watch);
        if !entry.detail_lines.is_empty() {
            let inner_width = CONTENT_WIDTH - 2.0 * BOX_PAD;
            let lines: Vec<(String, f32)> = entry
                .detail_lines
                .iter()
                .flat_map(|text| self.layout.wrap_text(text, HELVETICA, 9.0, inner_width))
                .collect();
            let height = 12.0 + lines.len() as f32 * line_h(9.0);
            self.ensure_space(height + 4.0);

            let top = PAGE_HEIGHT - self.ctx.cursor_y;
            let page = self.writer.page_content(self.ctx.page_index);
            page.fill_color(WATCH_FILL.0, WATCH_FILL.1, WATCH_FILL.2)
                .rect(MARGIN, top - height, CONTENT_WIDTH, height, Paint::Fill);
            page.fill_color(TEXT_DARK.0, TEXT_DARK.1, TEXT_DARK.2);
            let mut y = top - 15.0;
            for (line, _) in &lines {
                page.text(line, MARGIN + BOX_PAD, y, HELVETICA, 9.0);
                y -= line_h(9.0);
            }
            self.ctx.cursor_y += height + 6.0;
            self.page_dirty = true;
        }
        self.tile_grid(&entry.parameters);
        self.trailing_rule();
    }

    /// Header strip with title and optional right-aligned badge chip.
    /// Reserves its own height plus one body line so a strip never lands
    /// alone at the bottom of a page.
    fn card_header(&mut self, title: &str, badge: &str, category: Category) {
        self.ensure_space(CARD_HEADER_H + line_h(10.0) + 8.0);
        let color = category.header_color();
        let badge = badge.trim();
        let badge_width = if badge.is_empty() {
            0.0
        } else {
            self.layout.width(badge, HELVETICA_BOLD, 8.0) + 12.0
        };

        let y = PAGE_HEIGHT - self.ctx.cursor_y - CARD_HEADER_H;
        let page = self.writer.page_content(self.ctx.page_index);
        page.fill_color(color.0, color.1, color.2)
            .rect(MARGIN, y, CONTENT_WIDTH, CARD_HEADER_H, Paint::Fill);
        page.fill_color(WHITE.0, WHITE.1, WHITE.2).text(
            title,
            MARGIN + 8.0,
            y + 7.0,
            HELVETICA_BOLD,
            11.0,
        );
        if !badge.is_empty() {
            let badge_color = category.badge_color();
            let bx = MARGIN + CONTENT_WIDTH - badge_width - 6.0;
            page.fill_color(badge_color.0, badge_color.1, badge_color.2)
                .rect(bx, y + 4.0, badge_width, 14.0, Paint::Fill);
            page.fill_color(WHITE.0, WHITE.1, WHITE.2).text(
                badge,
                bx + 6.0,
                y + 8.0,
                HELVETICA_BOLD,
                8.0,
            );
        }
        self.ctx.cursor_y += CARD_HEADER_H + 6.0;
        self.page_dirty = true;
    }

    /// Rationale as a light-filled box; height follows the wrapped text and
    /// the whole box is one non-splittable block.
    fn rationale_box(&mut self, rationale: &str) {
        let text = format!("Rationale: {}", rationale);
        let inner_width = CONTENT_WIDTH - 2.0 * BOX_PAD;
        let lines = self.layout.wrap_text(&text, HELVETICA_OBLIQUE, 9.0, inner_width);
        let height = 2.0 * BOX_PAD + lines.len() as f32 * line_h(9.0);
        self.ensure_space(height + 4.0);

        let top = PAGE_HEIGHT - self.ctx.cursor_y;
        let page = self.writer.page_content(self.ctx.page_index);
        page.fill_color(RATIONALE_FILL.0, RATIONALE_FILL.1, RATIONALE_FILL.2)
            .rect(MARGIN, top - height, CONTENT_WIDTH, height, Paint::Fill);
        page.fill_color(TEXT_GRAY.0, TEXT_GRAY.1, TEXT_GRAY.2);
        let mut y = top - BOX_PAD - 9.0;
        for (line, _) in &lines {
            page.text(line, MARGIN + BOX_PAD, y, HELVETICA_OBLIQUE, 9.0);
            y -= line_h(9.0);
        }
        self.ctx.cursor_y += height + 6.0;
        self.page_dirty = true;
    }

    fn confidence_line(&mut self, confidence: &str) {
        self.ensure_space(line_h(9.0) + 2.0);
        let color = confidence_color(confidence);
        let baseline = PAGE_HEIGHT - self.ctx.cursor_y - 9.0;
        let page = self.writer.page_content(self.ctx.page_index);
        page.fill_color(color.0, color.1, color.2).text(
            confidence,
            MARGIN + 4.0,
            baseline,
            HELVETICA_BOLD,
            9.0,
        );
        self.ctx.cursor_y += line_h(9.0) + 2.0;
        self.page_dirty = true;
    }

    fn trailing_rule(&mut self) {
        self.ensure_space(10.0);
        let y = PAGE_HEIGHT - self.ctx.cursor_y - 4.0;
        let page = self.writer.page_content(self.ctx.page_index);
        page.stroke_color(RULE_GRAY.0, RULE_GRAY.1, RULE_GRAY.2)
            .line_width(0.5)
            .line(MARGIN, y, PAGE_WIDTH - MARGIN, y);
        self.ctx.cursor_y += 12.0;
    }

    /// Draw a bulleted list with hanging indent, breaking per line.
    pub fn bullet_list(&mut self, bullets: &[String]) {
        for bullet in bullets {
            let lines = self.layout.wrap_text(bullet, HELVETICA, 10.0, CONTENT_WIDTH - 14.0);
            for (i, (line, _)) in lines.iter().enumerate() {
                self.ensure_space(line_h(10.0));
                let baseline = PAGE_HEIGHT - self.ctx.cursor_y - 10.0;
                let page = self.writer.page_content(self.ctx.page_index);
                page.fill_color(TEXT_DARK.0, TEXT_DARK.1, TEXT_DARK.2);
                if i == 0 {
                    page.text("\u{2022}", MARGIN, baseline, HELVETICA, 10.0);
                }
                page.text(line, MARGIN + 14.0, baseline, HELVETICA, 10.0);
                self.ctx.cursor_y += line_h(10.0);
                self.page_dirty = true;
            }
            self.ctx.cursor_y += 2.0;
        }
    }

    /// Stamp footers on every page and serialize the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails to serialize.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let total = self.writer.page_count();
        let label = self.config.footer_label.clone();
        for i in 0..total {
            let text = format!("{} | Page {} of {}", label, i + 1, total);
            let width = self.layout.width(&text, HELVETICA_OBLIQUE, 8.0);
            let page = self.writer.page_content(i);
            page.stroke_color(RULE_GRAY.0, RULE_GRAY.1, RULE_GRAY.2)
                .line_width(0.5)
                .line(MARGIN, 32.0, PAGE_WIDTH - MARGIN, 32.0);
            page.fill_color(TEXT_GRAY.0, TEXT_GRAY.1, TEXT_GRAY.2).text(
                &text,
                (PAGE_WIDTH - width) / 2.0,
                20.0,
                HELVETICA_OBLIQUE,
                8.0,
            );
        }
        self.writer.finish()
    }
}

/// Green for high conviction, amber for medium, red for everything else.
fn confidence_color(confidence: &str) -> (f32, f32, f32) {
    let upper = confidence.to_uppercase();
    if upper.contains("HIGH") {
        (0.180, 0.800, 0.443)
    } else if upper.contains("MEDIUM") {
        (0.953, 0.612, 0.071)
    } else {
        (0.906, 0.298, 0.235)
    }
}

fn card_title(ticker: &str, company_name: &str) -> String {
    if company_name.is_empty() {
        ticker.to_string()
    } else {
        format!("{} - {}", ticker, company_name)
    }
}
