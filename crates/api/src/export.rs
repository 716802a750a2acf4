//! Rendering of [`ReportTable`]s into downloadable files.
//!
//! Output is built entirely in memory.

use bitchore_core::error::CoreError;
use bitchore_core::report::{ReportCell, ReportTable};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::AppError;

/// Download format selected by `?format=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ReportFormat {
    /// Absent means xlsx. Matching is case-insensitive.
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::Xlsx),
            Some(f) if f.eq_ignore_ascii_case("xlsx") => Ok(Self::Xlsx),
            Some(f) if f.eq_ignore_ascii_case("csv") => Ok(Self::Csv),
            Some(other) => Err(CoreError::Validation(format!(
                "Invalid report format '{other}'. Must be one of: xlsx, csv"
            ))),
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Spreadsheet rendering failed: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("CSV rendering failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer flush failed: {0}")]
    Flush(String),
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

/// `<file_stem>.<ext>`, e.g. `chore_report.xlsx`.
pub fn file_name(table: &ReportTable, format: ReportFormat) -> String {
    format!("{}.{}", table.file_stem, format.extension())
}

pub fn render(table: &ReportTable, format: ReportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ReportFormat::Xlsx => render_xlsx(table),
        ReportFormat::Csv => render_csv(table),
    }
}

/// One worksheet: a bold header row, then one row per record. Column widths
/// come from the table definition.
pub fn render_xlsx(table: &ReportTable) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(table.sheet_name)?;

    for (col, column) in (0u16..).zip(table.columns) {
        worksheet.write_string_with_format(0, col, column.header, &header_format)?;
        worksheet.set_column_width(col, column.width)?;
    }

    for (row_num, row) in (1u32..).zip(&table.rows) {
        for (col, cell) in (0u16..).zip(row) {
            match cell {
                ReportCell::Text(text) => {
                    worksheet.write_string(row_num, col, text)?;
                }
                ReportCell::Number(n) => {
                    worksheet.write_number(row_num, col, *n as f64)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn render_csv(table: &ReportTable) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns.iter().map(|c| c.header))?;
    for row in &table.rows {
        writer.write_record(row.iter().map(ReportCell::to_text))?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))
}
