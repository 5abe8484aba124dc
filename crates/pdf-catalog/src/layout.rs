//! Font size and column search for the catalog page

use crate::options::{AVERAGE_ADVANCE_EM, CatalogOptions};
use crate::types::{CatalogLayout, Result};
use log::debug;
use printpdf::Mm;

/// Estimated rendered width of `text` in Helvetica at `font_size_pt`
pub fn estimate_text_width(text: &str, font_size_pt: f32) -> f32 {
    text.chars().count() as f32 * AVERAGE_ADVANCE_EM * font_size_pt
}

fn rows_per_column(options: &CatalogOptions, font_size_pt: f32) -> usize {
    let line_height = font_size_pt * options.line_spacing;
    ((options.usable_height_pt() / line_height).floor() as usize).max(1)
}

fn column_width(options: &CatalogOptions, columns: usize) -> f32 {
    let gaps = (columns - 1) as f32 * options.column_spacing_pt();
    (options.usable_width_pt() - gaps) / columns as f32
}

/// Pick the largest font size, and for it the fewest columns, that puts
/// every name on one page, measuring names in Helvetica.
pub fn fit_layout(names: &[String], options: &CatalogOptions) -> Result<CatalogLayout> {
    fit_layout_with(names, options, |name| estimate_text_width(name, 1.0))
}

/// Like [`fit_layout`], with `text_width_em` giving a name's width at 1pt.
///
/// Sizes are tried from `max_font_size_pt` down in `font_step_pt` steps.
/// When nothing fits, the smallest font is used with the most columns that
/// still hold the widest name, and the catalog spans several pages.
pub fn fit_layout_with<F>(
    names: &[String],
    options: &CatalogOptions,
    text_width_em: F,
) -> Result<CatalogLayout>
where
    F: Fn(&str) -> f32,
{
    options.validate()?;

    let count = names.len();
    let widest_em = names
        .iter()
        .map(|name| text_width_em(name))
        .fold(0.0, f32::max);

    let mut step = 0;
    loop {
        let font_size_pt = options.max_font_size_pt - step as f32 * options.font_step_pt;
        if font_size_pt < options.min_font_size_pt - f32::EPSILON {
            break;
        }

        let rows = rows_per_column(options, font_size_pt);
        let widest_pt = widest_em * font_size_pt;

        for columns in 1..=options.max_columns {
            if rows * columns >= count && widest_pt <= column_width(options, columns) {
                debug!(
                    "{} names fit at {}pt in {} columns of {} rows",
                    count, font_size_pt, columns, rows
                );
                return Ok(CatalogLayout {
                    font_size_pt,
                    columns,
                    rows_per_column: rows,
                    pages: 1,
                    fits_one_page: true,
                });
            }
        }
        step += 1;
    }

    let font_size_pt = options.min_font_size_pt;
    let widest_pt = widest_em * font_size_pt;
    let columns = (1..=options.max_columns)
        .rev()
        .find(|&columns| widest_pt <= column_width(options, columns))
        .unwrap_or(1);
    let rows = rows_per_column(options, font_size_pt);
    let pages = count.div_ceil(rows * columns).max(1);
    debug!(
        "{} names need {} pages at {}pt in {} columns",
        count, pages, font_size_pt, columns
    );

    Ok(CatalogLayout {
        font_size_pt,
        columns,
        rows_per_column: rows,
        pages,
        fits_one_page: false,
    })
}

/// Page index and baseline origin (points from the bottom-left corner) of
/// entry `index`. Entries fill each column top to bottom.
pub fn entry_position(
    index: usize,
    layout: &CatalogLayout,
    options: &CatalogOptions,
) -> (usize, f32, f32) {
    let per_page = layout.entries_per_page();
    let page = index / per_page;
    let slot = index % per_page;
    let column = slot / layout.rows_per_column;
    let row = slot % layout.rows_per_column;

    let left = Mm(options.margin_left_mm).into_pt().0;
    let top = Mm(options.page_height_mm - options.margin_top_mm).into_pt().0;
    let line_height = layout.font_size_pt * options.line_spacing;
    let column_pitch = column_width(options, layout.columns) + options.column_spacing_pt();

    let x = left + column as f32 * column_pitch;
    let y = top - row as f32 * line_height - layout.font_size_pt;
    (page, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(count: usize, len: usize) -> Vec<String> {
        (0..count).map(|i| format!("{:0width$}", i, width = len)).collect()
    }

    #[test]
    fn test_short_list_gets_largest_font() {
        let layout = fit_layout(&names(5, 8), &CatalogOptions::default()).unwrap();
        assert_eq!(layout.font_size_pt, 24.0);
        assert_eq!(layout.columns, 1);
        assert!(layout.fits_one_page);
    }

    #[test]
    fn test_long_list_adds_columns_before_shrinking() {
        let options = CatalogOptions::default();
        let single = rows_per_column(&options, 24.0);
        let layout = fit_layout(&names(single + 1, 4), &options).unwrap();

        assert_eq!(layout.font_size_pt, 24.0);
        assert_eq!(layout.columns, 2);
    }

    #[test]
    fn test_wide_names_shrink_font() {
        let options = CatalogOptions::default();
        let layout = fit_layout(&names(3, 60), &options).unwrap();

        assert!(layout.font_size_pt < 24.0);
        assert!(
            estimate_text_width(&"0".repeat(60), layout.font_size_pt)
                <= column_width(&options, layout.columns)
        );
    }

    #[test]
    fn test_overflow_paginates_at_minimum_font() {
        let options = CatalogOptions::default();
        let layout = fit_layout(&names(2000, 6), &options).unwrap();

        assert!(!layout.fits_one_page);
        assert_eq!(layout.font_size_pt, options.min_font_size_pt);
        assert_eq!(layout.columns, options.max_columns);
        assert!(layout.pages > 1);
        assert!(layout.pages * layout.entries_per_page() >= 2000);
    }

    #[test]
    fn test_overflow_with_wide_names_drops_columns() {
        let options = CatalogOptions::default();
        let layout = fit_layout(&names(2000, 60), &options).unwrap();

        assert!(!layout.fits_one_page);
        assert_eq!(layout.font_size_pt, options.min_font_size_pt);
        assert_eq!(layout.columns, 2);
        assert!(
            estimate_text_width(&"0".repeat(60), layout.font_size_pt)
                <= column_width(&options, layout.columns)
        );
        assert!(layout.pages * layout.entries_per_page() >= 2000);
    }

    #[test]
    fn test_custom_measure_drives_font_size() {
        let options = CatalogOptions::default();
        // Every name 30 em wide: 17pt is the largest step under the usable width
        let layout = fit_layout_with(&names(3, 4), &options, |_| 30.0).unwrap();

        assert_eq!(layout.font_size_pt, 17.0);
        assert_eq!(layout.columns, 1);
    }

    #[test]
    fn test_entries_fill_columns_top_down() {
        let options = CatalogOptions::default();
        let layout = CatalogLayout {
            font_size_pt: 12.0,
            columns: 2,
            rows_per_column: 3,
            pages: 2,
            fits_one_page: false,
        };

        let (_, x0, y0) = entry_position(0, &layout, &options);
        let (_, x1, y1) = entry_position(1, &layout, &options);
        let (_, x3, y3) = entry_position(3, &layout, &options);
        let (page, _, _) = entry_position(6, &layout, &options);

        assert_eq!(x0, x1);
        assert!(y1 < y0);
        assert!(x3 > x0);
        assert_eq!(y3, y0);
        assert_eq!(page, 1);
    }
}
