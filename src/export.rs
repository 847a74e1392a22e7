//! Export formatter: flatten the sorted set into headers and string rows.
//!
//! The file writer (CSV, spreadsheet, PDF) lives outside this crate behind
//! [`ExportSink`]. This module only decides what each cell reads.

use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::PipelineError;
use crate::record::TableRecord;
use crate::schema::{ColumnFormat, ExportColumn, TableSchema};
use crate::value::{Value, format_number};

/// Flat table handed to a download collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub title: String,
}

/// Download options passed alongside the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub file_name: String,
    #[serde(default = "default_include_headers")]
    pub include_headers: bool,
    #[serde(default)]
    pub pdf_title: Option<String>,
}

fn default_include_headers() -> bool {
    true
}

impl ExportOptions {
    /// File named after the table, headers included, PDF titled like the table.
    pub fn for_schema(schema: &TableSchema) -> Self {
        Self {
            file_name: schema.name.clone(),
            include_headers: true,
            pdf_title: Some(schema.title.clone()),
        }
    }
}

/// Table plus options: everything the download collaborator receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub table: ExportTable,
    pub options: ExportOptions,
}

/// Consumer of export requests, e.g. a CSV or PDF writer.
pub trait ExportSink {
    fn export(&mut self, request: &ExportRequest) -> Result<(), PipelineError>;
}

/// Writes each request as one pretty-printed JSON document.
pub struct JsonExportSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonExportSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ExportSink for JsonExportSink<W> {
    fn export(&mut self, request: &ExportRequest) -> Result<(), PipelineError> {
        let ExportRequest { table, options } = request;
        let headers: &[String] = if options.include_headers {
            &table.headers
        } else {
            &[]
        };
        let doc = json!({
            "file_name": options.file_name,
            "title": options.pdf_title.as_deref().unwrap_or(&table.title),
            "headers": headers,
            "rows": table.rows,
        });
        serde_json::to_writer_pretty(&mut self.writer, &doc)
            .map_err(PipelineError::from_json_write)?;
        writeln!(self.writer).map_err(PipelineError::Export)?;
        Ok(())
    }
}

/// One row per record, in input order, one cell per column.
///
/// Pass the full sorted set, not the current page.
pub fn to_export_table<T: TableRecord>(
    records: impl IntoIterator<Item = T>,
    columns: &[ExportColumn],
    title: &str,
) -> ExportTable {
    let headers = columns.iter().map(|c| c.label.clone()).collect();
    let rows = records
        .into_iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| format_cell(record.field(&c.id).as_deref(), &c.format))
                .collect()
        })
        .collect();
    ExportTable {
        headers,
        rows,
        title: title.to_string(),
    }
}

/// Render one cell. Values that do not fit the column format (a date
/// column holding "TBD") are written as plain text.
pub fn format_cell(value: Option<&Value>, format: &ColumnFormat) -> String {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return String::new();
    };
    let formatted = match format {
        ColumnFormat::Text | ColumnFormat::List => None,
        ColumnFormat::Date => value
            .as_datetime()
            .map(|dt| dt.format("%-m/%-d/%Y").to_string()),
        ColumnFormat::Currency { symbol } => value.as_number().map(|n| format_currency(n, symbol)),
        ColumnFormat::Number => value.as_number().map(format_grouped),
        ColumnFormat::Integer => value.as_number().map(|n| format_grouped(n.round())),
    };
    formatted.unwrap_or_else(|| value.to_text())
}

/// `$1,234.50`, with the sign ahead of the symbol.
pub fn format_currency(n: f64, symbol: &str) -> String {
    let sign = if n < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}{symbol}{}.{frac_part}", group_thousands(int_part))
}

/// Thousands separators on the integer part, fraction kept as printed.
pub fn format_grouped(n: f64) -> String {
    let text = format_number(n);
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    match digits.split_once('.') {
        Some((int_part, frac_part)) => format!("{sign}{}.{frac_part}", group_thousands(int_part)),
        None => format!("{sign}{}", group_thousands(digits)),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn columns() -> Vec<ExportColumn> {
        vec![
            ExportColumn::new("name", "Name", ColumnFormat::Text),
            ExportColumn::new("hireDate", "Hire Date", ColumnFormat::Date),
            ExportColumn::new(
                "salary",
                "Salary",
                ColumnFormat::Currency {
                    symbol: "$".to_string(),
                },
            ),
            ExportColumn::new("skills", "Skills", ColumnFormat::List),
            ExportColumn::new("headcount", "Headcount", ColumnFormat::Integer),
        ]
    }

    #[test]
    fn test_export_rows_follow_columns() {
        let records = vec![
            Record::new(1)
                .with("name", "Ana Ruiz")
                .with("hireDate", "2020-03-15")
                .with("salary", 85000)
                .with("skills", vec!["Payroll", "Benefits"])
                .with("headcount", 1250),
            Record::new(2).with("name", "Ben Okafor"),
        ];
        let table = to_export_table(records.iter(), &columns(), "Staff");
        assert_eq!(
            table.headers,
            vec!["Name", "Hire Date", "Salary", "Skills", "Headcount"]
        );
        assert_eq!(
            table.rows[0],
            vec!["Ana Ruiz", "3/15/2020", "$85,000.00", "Payroll, Benefits", "1,250"]
        );
        assert_eq!(table.rows[1], vec!["Ben Okafor", "", "", "", ""]);
        assert_eq!(table.title, "Staff");
    }

    #[test]
    fn test_unparseable_cells_pass_through() {
        let date = format_cell(Some(&Value::from("TBD")), &ColumnFormat::Date);
        assert_eq!(date, "TBD");
        let money = format_cell(
            Some(&Value::from("n/a")),
            &ColumnFormat::Currency {
                symbol: "$".to_string(),
            },
        );
        assert_eq!(money, "n/a");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1000.0), "1,000");
        assert_eq!(format_grouped(1234567.25), "1,234,567.25");
        assert_eq!(format_grouped(-4500.5), "-4,500.5");
        assert_eq!(format_grouped(4.8), "4.8");
    }

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(85000.0, "$"), "$85,000.00");
        assert_eq!(format_currency(-12.5, "€"), "-€12.50");
        assert_eq!(format_currency(1234.5, "$"), "$1,234.50");
    }

    #[test]
    fn test_json_sink_respects_include_headers() {
        let request = ExportRequest {
            table: ExportTable {
                headers: vec!["Name".to_string()],
                rows: vec![vec!["Ana".to_string()]],
                title: "Staff".to_string(),
            },
            options: ExportOptions {
                file_name: "staff".to_string(),
                include_headers: false,
                pdf_title: None,
            },
        };
        let mut sink = JsonExportSink::new(Vec::new());
        sink.export(&request).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert_eq!(doc["headers"], json!([]));
        assert_eq!(doc["rows"], json!([["Ana"]]));
        assert_eq!(doc["title"], "Staff");
    }

    #[test]
    fn test_json_sink_reports_write_failure_as_export() {
        struct FullDisk;

        impl Write for FullDisk {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let request = ExportRequest {
            table: to_export_table(Vec::<Record>::new(), &columns(), "Staff"),
            options: ExportOptions::for_schema(&TableSchema::staff()),
        };
        let err = JsonExportSink::new(FullDisk).export(&request).unwrap_err();
        assert!(matches!(err, PipelineError::Export(_)));
        assert_eq!(err.to_string(), "export failed: disk full");
    }

    #[test]
    fn test_options_for_schema() {
        let options = ExportOptions::for_schema(&TableSchema::staff());
        assert_eq!(options.file_name, "staff");
        assert_eq!(options.pdf_title.as_deref(), Some("Staff"));
        assert!(options.include_headers);
    }
}
