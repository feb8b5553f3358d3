//! Grid rasterizer: draw the schedule onto a pixel buffer and encode JPEG.
//!
//! Fixed pixel metrics per column/row, a highlighted title band, weekday
//! and day-number header rows, alternating data-row backgrounds, and
//! multi-line cell text. Text comes from the embedded glyph table in
//! [`crate::font`] and is drawn in capitals.

use chrono::{Datelike, Weekday};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use shiftgrid_engine::schedule::Schedule;

use crate::font::{glyph, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH, LINE_HEIGHT};
use crate::ExportError;

pub const LABEL_COL_WIDTH: u32 = 180;
pub const DAY_COL_WIDTH: u32 = 44;
pub const TITLE_BAND_HEIGHT: u32 = 36;
pub const HEADER_ROW_HEIGHT: u32 = 20;
pub const DATA_ROW_HEIGHT: u32 = 34;

const CELL_PADDING: u32 = 4;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT: Rgb<u8> = Rgb([33, 33, 33]);
const TITLE_BG: Rgb<u8> = Rgb([38, 50, 56]);
const TITLE_FG: Rgb<u8> = Rgb([255, 255, 255]);
const HEADER_BG: Rgb<u8> = Rgb([236, 239, 241]);
const WEEKEND_BG: Rgb<u8> = Rgb([255, 235, 238]);
const ROW_BG_ODD: Rgb<u8> = Rgb([245, 245, 245]);
const GRID_LINE: Rgb<u8> = Rgb([189, 189, 189]);

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Pixel dimensions the grid will occupy for a given snapshot.
pub fn image_size(schedule: &Schedule) -> (u32, u32) {
    let days = schedule.day_count() as u32;
    let width = LABEL_COL_WIDTH + days * DAY_COL_WIDTH + 1;
    let height = TITLE_BAND_HEIGHT
        + 2 * HEADER_ROW_HEIGHT
        + schedule.rows.len() as u32 * DATA_ROW_HEIGHT
        + 1;
    (width, height)
}

/// Render the snapshot and encode it as JPEG bytes.
pub fn render_jpeg(schedule: &Schedule, quality: u8) -> Result<Vec<u8>, ExportError> {
    let img = render_grid(schedule);
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .encode_image(&img)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    log::debug!(
        "rasterized {}x{} -> {} bytes (quality {})",
        img.width(),
        img.height(),
        out.len(),
        quality
    );
    Ok(out)
}

/// Draw the whole grid. Pure function of the snapshot.
pub fn render_grid(schedule: &Schedule) -> RgbImage {
    let days: Vec<_> = schedule.dates().collect();
    let (width, height) = image_size(schedule);
    let mut img = RgbImage::from_pixel(width, height, WHITE);

    // Title band across the full width.
    fill(&mut img, 0, 0, width, TITLE_BAND_HEIGHT, TITLE_BG);
    let title = format!(
        "{} ({} - {})",
        schedule.title,
        schedule.date_from.format("%d.%m.%Y"),
        schedule.date_to.format("%d.%m.%Y"),
    );
    draw_text(
        &mut img,
        CELL_PADDING as i32 * 2,
        ((TITLE_BAND_HEIGHT - GLYPH_HEIGHT * 2) / 2) as i32,
        2,
        TITLE_FG,
        &title,
    );

    // Header rows: weekday names, then day numbers.
    let header_top = TITLE_BAND_HEIGHT;
    fill(&mut img, 0, header_top, width, 2 * HEADER_ROW_HEIGHT, HEADER_BG);
    for (i, day) in days.iter().enumerate() {
        let x = LABEL_COL_WIDTH + i as u32 * DAY_COL_WIDTH;
        if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            fill(&mut img, x, header_top, DAY_COL_WIDTH, 2 * HEADER_ROW_HEIGHT, WEEKEND_BG);
        }
        let weekday = WEEKDAYS[day.weekday().num_days_from_monday() as usize];
        draw_text_centered(&mut img, x, DAY_COL_WIDTH, header_top + 6, 1, TEXT, weekday);
        draw_text_centered(
            &mut img,
            x,
            DAY_COL_WIDTH,
            header_top + HEADER_ROW_HEIGHT + 6,
            1,
            TEXT,
            &day.day().to_string(),
        );
    }

    // Data rows: label + wrapped cell text, alternating backgrounds.
    let data_top = TITLE_BAND_HEIGHT + 2 * HEADER_ROW_HEIGHT;
    let label_chars = ((LABEL_COL_WIDTH - 2 * CELL_PADDING) / GLYPH_ADVANCE) as usize;
    let cell_chars = ((DAY_COL_WIDTH - 2 * CELL_PADDING) / GLYPH_ADVANCE) as usize;

    for (r, row) in schedule.rows.iter().enumerate() {
        let y = data_top + r as u32 * DATA_ROW_HEIGHT;
        if r % 2 == 1 {
            fill(&mut img, 0, y, width, DATA_ROW_HEIGHT, ROW_BG_ODD);
        }

        let label_lines = wrap_lines(&row.label(), label_chars, 2);
        draw_lines(&mut img, CELL_PADDING as i32, y, &label_lines, false, 0);

        for (i, day) in days.iter().enumerate() {
            if let Some(cell) = schedule.cell_at(row.id, *day) {
                let x = LABEL_COL_WIDTH + i as u32 * DAY_COL_WIDTH;
                let lines = wrap_lines(&cell.value_raw, cell_chars.max(1), 2);
                draw_lines(&mut img, x as i32, y, &lines, true, DAY_COL_WIDTH);
            }
        }
    }

    draw_grid_lines(&mut img, &days, schedule.rows.len());
    img
}

/// Draw up to two wrapped lines, vertically centered in a data row.
fn draw_lines(
    img: &mut RgbImage,
    x: i32,
    row_top: u32,
    lines: &[String],
    centered: bool,
    col_width: u32,
) {
    let block = lines.len() as u32 * LINE_HEIGHT;
    let mut y = row_top as i32 + ((DATA_ROW_HEIGHT.saturating_sub(block)) / 2) as i32;
    for line in lines {
        if centered {
            draw_text_centered(img, x as u32, col_width, y as u32, 1, TEXT, line);
        } else {
            draw_text(img, x, y, 1, TEXT, line);
        }
        y += LINE_HEIGHT as i32;
    }
}

fn draw_grid_lines(img: &mut RgbImage, days: &[chrono::NaiveDate], row_count: usize) {
    let width = img.width();
    let height = img.height();
    let grid_top = TITLE_BAND_HEIGHT;

    // Verticals: label column edge plus one per day column.
    for i in 0..=days.len() as u32 {
        let x = LABEL_COL_WIDTH + i * DAY_COL_WIDTH;
        fill(img, x.min(width - 1), grid_top, 1, height - grid_top, GRID_LINE);
    }
    fill(img, 0, grid_top, 1, height - grid_top, GRID_LINE);

    // Horizontals: header boundaries plus one per data row.
    fill(img, 0, grid_top, width, 1, GRID_LINE);
    fill(img, 0, grid_top + HEADER_ROW_HEIGHT, width, 1, GRID_LINE);
    let data_top = grid_top + 2 * HEADER_ROW_HEIGHT;
    for r in 0..=row_count as u32 {
        let y = data_top + r * DATA_ROW_HEIGHT;
        fill(img, 0, y.min(height - 1), width, 1, GRID_LINE);
    }
}

/// Greedy word wrap with hard breaks for long words. At most `max_lines`
/// lines; overflow past the last line is dropped.
fn wrap_lines(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        loop {
            let need = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if need <= max_chars {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                break;
            }
            // Word does not fit. Flush the current line first.
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                if lines.len() == max_lines {
                    return lines;
                }
                continue;
            }
            // Hard-break a word longer than the line.
            let split: String = word.chars().take(max_chars).collect();
            let rest_start = split.len();
            lines.push(split);
            if lines.len() == max_lines {
                return lines;
            }
            word = &word[rest_start..];
            if word.is_empty() {
                break;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Blit one text run at (x, y) with integer scaling.
fn draw_text(img: &mut RgbImage, x: i32, y: i32, scale: u32, color: Rgb<u8>, text: &str) {
    let mut pen_x = x;
    for ch in text.chars() {
        if let Some(rows) = glyph(ch) {
            for (row_idx, row) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if row & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                        let px = pen_x + (col * scale) as i32;
                        let py = y + (row_idx as u32 * scale) as i32;
                        fill_signed(img, px, py, scale, scale, color);
                    }
                }
            }
        }
        pen_x += (GLYPH_ADVANCE * scale) as i32;
    }
}

fn draw_text_centered(
    img: &mut RgbImage,
    x: u32,
    width: u32,
    y: u32,
    scale: u32,
    color: Rgb<u8>,
    text: &str,
) {
    let text_w = text.chars().count() as u32 * GLYPH_ADVANCE * scale;
    let offset = width.saturating_sub(text_w) / 2;
    draw_text(img, (x + offset) as i32, y as i32, scale, color, text);
}

fn fill(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    fill_signed(img, x as i32, y as i32, w, h, color);
}

fn fill_signed(img: &mut RgbImage, x: i32, y: i32, w: u32, h: u32, color: Rgb<u8>) {
    if w == 0 || h == 0 || x >= img.width() as i32 || y >= img.height() as i32 {
        return;
    }
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(w, h), color);
}
