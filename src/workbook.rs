use rust_xlsxwriter::{
    Color, ColNum, Format, FormatAlign, FormatBorder, FormatPattern, RowNum, Workbook,
};
use tracing::debug;

use crate::error::Result;
use crate::fmt::sheet_number;
use crate::table::{Cell, Table};

const HEADER_FILL: u32 = 0x4F81BD;
const EMPTY_COLUMN_WIDTH: usize = 10;
const WIDTH_PADDING: usize = 5;

/// Columns with these words in the header get the currency number format.
const MONEY_MARKERS: &[&str] = &["Monto", "Balance"];

pub fn is_money_column(header: &str) -> bool {
    MONEY_MARKERS.iter().any(|m| header.contains(m))
}

/// Width per column: longest text in the column (header included) plus padding.
pub fn column_widths(table: &Table) -> Vec<f64> {
    (0..table.columns().len())
        .map(|col| {
            let longest = std::iter::once(table.columns()[col].chars().count())
                .chain(table.rows().iter().map(|row| row[col].display().chars().count()))
                .filter(|len| *len > 0)
                .max()
                .unwrap_or(EMPTY_COLUMN_WIDTH);
            (longest + WIDTH_PADDING) as f64
        })
        .collect()
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_pattern(FormatPattern::Solid)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::Black)
}

/// Write `table` as a new styled worksheet named after the table.
pub fn write_table(workbook: &mut Workbook, table: &Table, currency_format: &str) -> Result<()> {
    let header = header_format();
    let money = Format::new().set_num_format(currency_format);

    let sheet = workbook.add_worksheet();
    sheet.set_name(table.name())?;

    for (col, name) in table.columns().iter().enumerate() {
        sheet.write_string_with_format(0, col as ColNum, name, &header)?;
    }

    let money_cols: Vec<bool> = table.columns().iter().map(|c| is_money_column(c)).collect();
    for (i, row) in table.rows().iter().enumerate() {
        let r = (i + 1) as RowNum;
        for (col, cell) in row.iter().enumerate() {
            let c = col as ColNum;
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(r, c, s)?;
                }
                Cell::Integer(n) => {
                    sheet.write_number(r, c, *n as f64)?;
                }
                Cell::Amount(d) if money_cols[col] => {
                    sheet.write_number_with_format(r, c, sheet_number(*d), &money)?;
                }
                Cell::Amount(d) => {
                    sheet.write_number(r, c, sheet_number(*d))?;
                }
                Cell::Empty => {}
            }
        }
    }

    for (col, width) in column_widths(table).into_iter().enumerate() {
        sheet.set_column_width(col as ColNum, width)?;
    }

    if let Some(last_col) = table.columns().len().checked_sub(1) {
        sheet.autofilter(0, 0, table.len() as RowNum, last_col as ColNum)?;
    }

    debug!(sheet = table.name(), rows = table.len(), "wrote worksheet");
    Ok(())
}
