use rust_xlsxwriter::{
    Chart, ChartMarker, ChartMarkerType, ChartType, ColNum, RowNum, Workbook,
};
use tracing::debug;

use crate::error::{ReportError, Result};
use crate::reconciler::SummaryColumn;
use crate::table::Table;

const BAR_TITLE: &str = "Ingresos vs Egresos por Mes";
const LINE_TITLE: &str = "Evolución del Balance";
const X_AXIS_TITLE: &str = "Meses";

// Anchors: H2 and H18.
const BAR_ANCHOR: (RowNum, ColNum) = (1, 7);
const LINE_ANCHOR: (RowNum, ColNum) = (17, 7);

/// Where the chart inputs live on the written summary sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLayout {
    pub sheet: String,
    pub month_name: ColNum,
    pub income: ColNum,
    pub expense: ColNum,
    pub balance: ColNum,
    pub last_row: RowNum,
}

impl SummaryLayout {
    /// Locate the chart columns in `table` by header name.
    pub fn resolve(table: &Table) -> Result<Self> {
        let find = |column: SummaryColumn| {
            table
                .column_index(column.header())
                .map(|i| i as ColNum)
                .ok_or_else(|| ReportError::MissingColumn(column.header().to_string()))
        };
        Ok(Self {
            sheet: table.name().to_string(),
            month_name: find(SummaryColumn::MonthName)?,
            income: find(SummaryColumn::Income)?,
            expense: find(SummaryColumn::Expense)?,
            balance: find(SummaryColumn::Balance)?,
            last_row: table.len() as RowNum,
        })
    }
}

/// Attach the income/expense column chart and the balance line chart to the
/// summary sheet of an assembled workbook.
pub fn bind_charts(workbook: &mut Workbook, layout: &SummaryLayout, currency_label: &str) -> Result<()> {
    let sheet = layout.sheet.as_str();
    let y_title = format!("Monto ({currency_label})");
    let categories: (&str, RowNum, ColNum, RowNum, ColNum) =
        (sheet, 1, layout.month_name, layout.last_row, layout.month_name);

    let mut bar = Chart::new(ChartType::Column);
    bar.title().set_name(BAR_TITLE);
    bar.x_axis().set_name(X_AXIS_TITLE);
    bar.y_axis().set_name(y_title.as_str());
    bar.set_style(10);
    for col in [layout.income, layout.expense] {
        bar.add_series()
            .set_name((sheet, 0, col))
            .set_categories(categories)
            .set_values((sheet, 1, col, layout.last_row, col));
    }

    let mut line = Chart::new(ChartType::Line);
    line.title().set_name(LINE_TITLE);
    line.x_axis().set_name(X_AXIS_TITLE);
    line.y_axis().set_name(y_title.as_str());
    line.set_style(13);
    line.add_series()
        .set_name((sheet, 0, layout.balance))
        .set_categories(categories)
        .set_values((sheet, 1, layout.balance, layout.last_row, layout.balance))
        .set_marker(ChartMarker::new().set_type(ChartMarkerType::Diamond).set_size(8));

    let worksheet = workbook
        .worksheet_from_name(sheet)
        .map_err(|_| ReportError::MissingSheet(sheet.to_string()))?;
    worksheet.insert_chart(BAR_ANCHOR.0, BAR_ANCHOR.1, &bar)?;
    worksheet.insert_chart(LINE_ANCHOR.0, LINE_ANCHOR.1, &line)?;

    debug!(sheet, rows = layout.last_row, "attached summary charts");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{MonthNames, TargetYear};
    use crate::reconciler::Reconciler;
    use crate::workbook::write_table;

    fn summary() -> Table {
        Reconciler::new(&MonthNames::SPANISH)
            .reconcile(TargetYear::new(2024).unwrap(), &[], &[])
            .unwrap()
            .to_table()
            .unwrap()
    }

    #[test]
    fn test_resolve_by_header_name() {
        let layout = SummaryLayout::resolve(&summary()).unwrap();
        assert_eq!(layout.sheet, "Resumen");
        assert_eq!(
            (layout.month_name, layout.income, layout.expense, layout.balance),
            (2, 3, 4, 5)
        );
        assert_eq!(layout.last_row, 12);
    }

    #[test]
    fn test_resolve_follows_reordered_columns() {
        let table = Table::new(
            "Resumen",
            ["Balance", "Mes_Nombre", "Monto_Egresos", "Monto_Ingresos"],
        );
        let layout = SummaryLayout::resolve(&table).unwrap();
        assert_eq!(
            (layout.month_name, layout.income, layout.expense, layout.balance),
            (1, 3, 2, 0)
        );
    }

    #[test]
    fn test_resolve_missing_column() {
        let table = Table::new("Resumen", ["Año", "Mes", "Mes_Nombre", "Monto_Ingresos"]);
        let err = SummaryLayout::resolve(&table).unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn(ref c) if c == "Monto_Egresos"));
    }

    #[test]
    fn test_bind_charts_on_summary_sheet() {
        let table = summary();
        let mut wb = Workbook::new();
        write_table(&mut wb, &table, "0.00").unwrap();
        bind_charts(&mut wb, &SummaryLayout::resolve(&table).unwrap(), "ARS").unwrap();
        assert!(wb.save_to_buffer().unwrap().starts_with(b"PK"));
    }

    #[test]
    fn test_bind_charts_requires_sheet() {
        let mut wb = Workbook::new();
        let layout = SummaryLayout::resolve(&summary()).unwrap();
        let err = bind_charts(&mut wb, &layout, "ARS").unwrap_err();
        assert!(matches!(err, ReportError::MissingSheet(_)));
    }
}
