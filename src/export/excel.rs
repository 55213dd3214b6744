//! Excel audit report
//!
//! Sheet "Listings": one row per listing with the verdict and its evidence.
//! Sheet "Summary": batch counts.

use crate::batch::{BatchSummary, ClassifiedListing};
use crate::error::{FilterError, Result};
use rust_xlsxwriter::*;
use std::path::Path;

const HEADERS: &[(&str, f64)] = &[
    ("ID", 14.0),
    ("Address", 36.0),
    ("Price", 12.0),
    ("Estimate", 12.0),
    ("% of Estimate", 13.0),
    ("Owner Finance", 13.0),
    ("Cash Deal", 10.0),
    ("Keywords", 36.0),
    ("Disqualified By", 22.0),
    ("Summary", 60.0),
];

pub fn generate_excel(
    listings: &[&ClassifiedListing],
    summary: &BatchSummary,
    output_path: &Path,
) -> Result<()> {
    let buffer = generate_excel_buffer(listings, summary).map_err(FilterError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}

pub fn generate_excel_buffer(
    listings: &[&ClassifiedListing],
    summary: &BatchSummary,
) -> std::result::Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x305496))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let money_format = Format::new().set_num_format("$#,##0");
    let percent_format = Format::new().set_num_format("0.0");
    let wrap_format = Format::new().set_text_wrap().set_align(FormatAlign::Top);

    let sheet = workbook.add_worksheet();
    sheet
        .set_name("Listings")
        .map_err(|e| format!("sheet name error: {}", e))?;

    for (col, (title, width)) in HEADERS.iter().enumerate() {
        let col = col as u16;
        sheet
            .write_string_with_format(0, col, *title, &header_format)
            .map_err(|e| format!("header write error: {}", e))?;
        sheet
            .set_column_width(col, *width)
            .map_err(|e| format!("column width error: {}", e))?;
    }
    sheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("freeze panes error: {}", e))?;

    for (i, item) in listings.iter().enumerate() {
        let row = i as u32 + 1;
        let listing = &item.listing;
        let verdict = &item.verdict;
        let cell_err = |e: XlsxError| format!("row {} write error: {}", row, e);

        sheet.write_string(row, 0, &listing.id).map_err(cell_err)?;
        if let Some(address) = &listing.address {
            sheet.write_string(row, 1, address).map_err(cell_err)?;
        }
        if let Some(price) = listing.price {
            sheet
                .write_number_with_format(row, 2, price, &money_format)
                .map_err(cell_err)?;
        }
        if let Some(estimate) = listing.estimate {
            sheet
                .write_number_with_format(row, 3, estimate, &money_format)
                .map_err(cell_err)?;
        }
        if let Some(discount) = &verdict.discount {
            sheet
                .write_number_with_format(row, 4, discount.percent_of_estimate, &percent_format)
                .map_err(cell_err)?;
        }
        sheet
            .write_string(row, 5, yes_no(verdict.is_owner_finance))
            .map_err(cell_err)?;
        sheet
            .write_string(row, 6, yes_no(verdict.is_cash_deal))
            .map_err(cell_err)?;
        sheet
            .write_string(row, 7, verdict.matched_keywords.join(", "))
            .map_err(cell_err)?;
        if let Some(rule) = &verdict.disqualified_by {
            sheet.write_string(row, 8, rule).map_err(cell_err)?;
        }
        sheet
            .write_string_with_format(row, 9, verdict.summary(), &wrap_format)
            .map_err(cell_err)?;
    }

    if !listings.is_empty() {
        sheet
            .autofilter(0, 0, listings.len() as u32, (HEADERS.len() - 1) as u16)
            .map_err(|e| format!("autofilter error: {}", e))?;
    }

    write_summary_sheet(&mut workbook, summary, &header_format)?;

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel save error: {}", e))
}

fn write_summary_sheet(
    workbook: &mut Workbook,
    summary: &BatchSummary,
    header_format: &Format,
) -> std::result::Result<(), String> {
    let sheet = workbook.add_worksheet();
    sheet
        .set_name("Summary")
        .map_err(|e| format!("sheet name error: {}", e))?;
    sheet
        .set_column_width(0, 22.0)
        .map_err(|e| format!("column width error: {}", e))?;

    let rows = [
        ("Total", summary.total),
        ("Owner finance", summary.owner_finance),
        ("Cash deal", summary.cash_deal),
        ("Both", summary.both),
        ("Disqualified", summary.disqualified),
        ("Kept", summary.kept),
    ];

    sheet
        .write_string_with_format(0, 0, "Metric", header_format)
        .map_err(|e| format!("header write error: {}", e))?;
    sheet
        .write_string_with_format(0, 1, "Count", header_format)
        .map_err(|e| format!("header write error: {}", e))?;

    for (i, (label, count)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet
            .write_string(row, 0, *label)
            .map_err(|e| format!("summary write error: {}", e))?;
        sheet
            .write_number(row, 1, *count as f64)
            .map_err(|e| format!("summary write error: {}", e))?;
    }

    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
