//! Spreadsheet parser
//!
//! Reads a binary spreadsheet (.xlsx/.xls), first sheet only, with the
//! header on a fixed row (row 6 of the worksheet, zero-based index 5).
//! Header cells are matched case- and accent-insensitively against the
//! known column set; unrecognized columns are ignored. One-shot parse.

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;

use crate::error::ImportError;
use crate::normalize::normalize_text;

/// One data row extracted from the worksheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    /// 1-based worksheet row, for traceability in error messages
    pub row_number: u32,
    /// Task text, falling back to a synthetic `Linha N` label
    pub title: String,
    pub task: Option<String>,
    pub office: Option<String>,
    pub os_number: Option<String>,
    pub tag: Option<String>,
    pub machine_name: Option<String>,
    pub responsible: Option<String>,
}

/// Canonical columns recognized in the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Office,
    OsNumber,
    Tag,
    MachineName,
    Task,
    Responsible,
}

fn column_for_header(header: &str) -> Option<Column> {
    let normalized = normalize_text(header)?;
    match normalized.as_str() {
        "oficina" => Some(Column::Office),
        "o.s" | "os" => Some(Column::OsNumber),
        "tag" => Some(Column::Tag),
        "nome maquina" => Some(Column::MachineName),
        "tarefa" | "descricao" => Some(Column::Task),
        "responsavel" => Some(Column::Responsible),
        _ => None,
    }
}

/// Render a cell as trimmed text. Numeric cells come out without a
/// trailing `.0` so an OS number stored as a number reads as `123`.
fn cell_to_string(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Spreadsheet parser with a configurable header row
#[derive(Debug, Clone)]
pub struct SheetParser {
    header_row: u32,
}

impl Default for SheetParser {
    fn default() -> Self {
        // The reference worksheets put their headers on row 6.
        Self { header_row: 5 }
    }
}

impl SheetParser {
    pub fn new(header_row: u32) -> Self {
        Self { header_row }
    }

    /// Decode the workbook bytes and parse the first sheet.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Vec<ParsedRow>, ImportError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(ImportError::EmptyWorkbook)??;
        Ok(self.parse_range(&range))
    }

    /// Extract data rows from a worksheet range. Rows above the header and
    /// fully blank rows are skipped.
    pub fn parse_range(&self, range: &Range<Data>) -> Vec<ParsedRow> {
        let (start, end) = match (range.start(), range.end()) {
            (Some(start), Some(end)) => (start, end),
            _ => return Vec::new(),
        };

        let mut columns: Vec<(u32, Column)> = Vec::new();
        for col in start.1..=end.1 {
            if let Some(header) = range.get_value((self.header_row, col)).and_then(cell_to_string)
            {
                if let Some(column) = column_for_header(&header) {
                    columns.push((col, column));
                }
            }
        }

        let mut rows = Vec::new();
        for abs_row in (self.header_row + 1)..=end.0 {
            let mut office = None;
            let mut os_number = None;
            let mut tag = None;
            let mut machine_name = None;
            let mut task = None;
            let mut responsible = None;

            for (col, column) in &columns {
                let value = range.get_value((abs_row, *col)).and_then(cell_to_string);
                match column {
                    Column::Office => office = value,
                    Column::OsNumber => os_number = value,
                    Column::Tag => tag = value,
                    Column::MachineName => machine_name = value,
                    Column::Task => task = value,
                    Column::Responsible => responsible = value,
                }
            }

            // Blank row: nothing recognizable in any mapped column
            if office.is_none()
                && os_number.is_none()
                && tag.is_none()
                && machine_name.is_none()
                && task.is_none()
                && responsible.is_none()
            {
                continue;
            }

            // Fallback label numbers by data-row position under the
            // header, counting skipped rows too.
            let title = task
                .clone()
                .unwrap_or_else(|| format!("Linha {}", abs_row - self.header_row));

            rows.push(ParsedRow {
                row_number: abs_row + 1,
                title,
                task,
                office,
                os_number,
                tag,
                machine_name,
                responsible,
            });
        }

        tracing::debug!(rows = rows.len(), header_row = self.header_row, "parsed worksheet");
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(cells: &[(u32, u32, Data)]) -> Range<Data> {
        let max_row = cells.iter().map(|(r, _, _)| *r).max().unwrap_or(0);
        let max_col = cells.iter().map(|(_, c, _)| *c).max().unwrap_or(0);
        let mut range = Range::new((0, 0), (max_row, max_col));
        for (row, col, value) in cells {
            range.set_value((*row, *col), value.clone());
        }
        range
    }

    fn s(value: &str) -> Data {
        Data::String(value.to_string())
    }

    #[test]
    fn test_parses_rows_below_header() {
        let range = sheet(&[
            (5, 0, s("OFICINA")),
            (5, 1, s("O.S")),
            (5, 2, s("TAREFA")),
            (6, 0, s("Mecânico")),
            (6, 1, s("123")),
            (6, 2, s("Trocar rolamento")),
            (7, 0, s("Elétrico")),
            (7, 1, s("456")),
            (7, 2, s("Revisar painel")),
        ]);

        let rows = SheetParser::default().parse_range(&range);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Trocar rolamento");
        assert_eq!(rows[0].os_number.as_deref(), Some("123"));
        assert_eq!(rows[0].office.as_deref(), Some("Mecânico"));
        assert_eq!(rows[0].row_number, 7);
        assert_eq!(rows[1].title, "Revisar painel");
    }

    #[test]
    fn test_accented_header_variants() {
        let range = sheet(&[
            (5, 0, s("DESCRIÇÃO")),
            (5, 1, s("RESPONSÁVEL")),
            (5, 2, s("NOME MÁQUINA")),
            (6, 0, s("Inspecionar válvula")),
            (6, 1, s("Silva")),
            (6, 2, s("Bomba P-101")),
        ]);

        let rows = SheetParser::default().parse_range(&range);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task.as_deref(), Some("Inspecionar válvula"));
        assert_eq!(rows[0].responsible.as_deref(), Some("Silva"));
        assert_eq!(rows[0].machine_name.as_deref(), Some("Bomba P-101"));
    }

    #[test]
    fn test_numeric_os_number_renders_without_decimal() {
        let range = sheet(&[
            (5, 0, s("OS")),
            (5, 1, s("TAREFA")),
            (6, 0, Data::Float(123.0)),
            (6, 1, s("Trocar rolamento")),
        ]);

        let rows = SheetParser::default().parse_range(&range);
        assert_eq!(rows[0].os_number.as_deref(), Some("123"));
    }

    #[test]
    fn test_title_falls_back_to_synthetic_label() {
        let range = sheet(&[
            (5, 0, s("OFICINA")),
            (5, 1, s("TAREFA")),
            (6, 0, s("Mecânico")),
            // no task cell on this row
        ]);

        let rows = SheetParser::default().parse_range(&range);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Linha 1");
        assert!(rows[0].task.is_none());
    }

    #[test]
    fn test_synthetic_label_counts_skipped_rows() {
        let range = sheet(&[
            (5, 0, s("OFICINA")),
            (5, 1, s("TAREFA")),
            (6, 0, s("Mecânico")),
            (6, 1, s("Primeira")),
            // row 7 fully blank
            (8, 0, s("Elétrico")),
        ]);

        let rows = SheetParser::default().parse_range(&range);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Primeira");
        // Third data row under the header, even though only the second kept.
        assert_eq!(rows[1].title, "Linha 3");
    }

    #[test]
    fn test_blank_rows_and_unknown_columns_skipped() {
        let range = sheet(&[
            (5, 0, s("TAREFA")),
            (5, 1, s("COLUNA MISTERIOSA")),
            (6, 0, s("Primeira")),
            (6, 1, s("ignorado")),
            // row 7 fully blank
            (8, 0, s("Segunda")),
        ]);

        let rows = SheetParser::default().parse_range(&range);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Primeira");
        assert_eq!(rows[1].title, "Segunda");
        assert_eq!(rows[1].row_number, 9);
    }

    #[test]
    fn test_rows_above_header_ignored() {
        let range = sheet(&[
            (0, 0, s("PLANO DE PARADA 2024")),
            (2, 0, s("qualquer coisa")),
            (5, 0, s("TAREFA")),
            (6, 0, s("Única tarefa")),
        ]);

        let rows = SheetParser::default().parse_range(&range);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Única tarefa");
    }

    #[test]
    fn test_empty_sheet_yields_no_rows() {
        let range = sheet(&[(5, 0, s("TAREFA"))]);
        let rows = SheetParser::default().parse_range(&range);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_unreadable_bytes_fail_with_parse_error() {
        let result = SheetParser::default().parse_bytes(b"definitely not a workbook");
        assert!(matches!(
            result,
            Err(ImportError::Parse(_)) | Err(ImportError::EmptyWorkbook)
        ));
    }
}
