pub mod layout;

use dashmap::DashMap;
use serde_json::Value;

use layout::SheetLayout;

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub layout: SheetLayout,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// In-memory stand-in for the spreadsheet the hosted script writes to.
#[derive(Default)]
pub struct Workbook {
    sheets: DashMap<String, Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record as a row, creating the sheet with headers on first use.
    /// Returns the number of data rows in the sheet afterwards.
    pub fn append(&self, sheet_name: &str, record: &Value) -> Result<usize, String> {
        if !record.is_object() {
            return Err("Record must be a JSON object".to_string());
        }

        let mut sheet = self.sheets.entry(sheet_name.to_string()).or_insert_with(|| {
            tracing::info!("Creating sheet '{sheet_name}'");
            let layout = SheetLayout::for_sheet(sheet_name, record);
            Sheet {
                headers: layout.headers(),
                layout,
                rows: Vec::new(),
            }
        });

        let row = sheet.layout.row(record);
        sheet.rows.push(row);
        Ok(sheet.rows.len())
    }

    pub fn sheet(&self, name: &str) -> Option<Sheet> {
        self.sheets.get(name).map(|s| s.value().clone())
    }

    pub fn sheet_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sheets.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn row_count(&self, name: &str) -> usize {
        self.sheets.get(name).map(|s| s.rows.len()).unwrap_or(0)
    }
}
