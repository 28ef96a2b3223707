use aimcalc_model::{
    BatchRow, KeyValue, ParameterValue, SceneParams, TableImport, output_key_values, solve,
    solve_batch,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const INPUTS_SHEET: &str = "Inputs";
pub const OUTPUTS_SHEET: &str = "Outputs";
pub const RESULTS_SHEET: &str = "Results";

/// One named table of rows, column name to cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<BatchRow>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<BatchRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn from_key_values(name: impl Into<String>, pairs: &[KeyValue]) -> Self {
        let rows = pairs
            .iter()
            .map(|pair| {
                BatchRow::from([
                    ("key".to_string(), ParameterValue::Text(pair.key.clone())),
                    ("value".to_string(), pair.value.clone()),
                ])
            })
            .collect();
        Self::new(name, rows)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

/// Table files come either as a workbook or as a bare array of rows.
#[derive(Deserialize)]
#[serde(untagged)]
enum TableFile {
    Rows(Vec<BatchRow>),
    Workbook(Workbook),
}

pub fn write_workbook(workbook: &Workbook, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(workbook).context("serialize workbook")?;
    std::fs::write(path, json).with_context(|| format!("write table file {}", path.display()))?;
    Ok(())
}

pub fn read_workbook(path: impl AsRef<Path>) -> Result<Workbook> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read table file {}", path.display()))?;
    let file: TableFile = serde_json::from_str(&text)
        .with_context(|| format!("parse table file {}", path.display()))?;
    Ok(match file {
        TableFile::Workbook(workbook) => workbook,
        TableFile::Rows(rows) => Workbook {
            sheets: vec![Sheet::new("Sheet1", rows)],
        },
    })
}

/// Rows of the first sheet that has any.
pub fn read_table(path: impl AsRef<Path>) -> Result<Vec<BatchRow>> {
    let path = path.as_ref();
    let workbook = read_workbook(path)?;
    if workbook.sheets.is_empty() {
        bail!("no sheet found in {}", path.display());
    }
    match workbook.sheets.into_iter().find(|sheet| !sheet.rows.is_empty()) {
        Some(sheet) => Ok(sheet.rows),
        None => bail!("no rows found in {}", path.display()),
    }
}

/// Writes the `Inputs` and `Outputs` tables of one configuration.
pub fn export_single(params: &SceneParams, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let solution = solve(params);
    let workbook = Workbook {
        sheets: vec![
            Sheet::from_key_values(INPUTS_SHEET, &params.to_key_values()),
            Sheet::from_key_values(OUTPUTS_SHEET, &output_key_values(params, &solution)),
        ],
    };
    write_workbook(&workbook, path)?;
    info!(path = %path.display(), "configuration exported");
    Ok(())
}

pub fn export_batch(rows: &[BatchRow], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let workbook = Workbook {
        sheets: vec![Sheet::new(RESULTS_SHEET, rows.to_vec())],
    };
    write_workbook(&workbook, path)?;
    info!(path = %path.display(), rows = rows.len(), "batch exported");
    Ok(())
}

/// Reads a table file and applies it to `params`. Unrecognized layouts are
/// an error.
pub fn import_table_file(params: &mut SceneParams, path: impl AsRef<Path>) -> Result<TableImport> {
    let path = path.as_ref();
    let rows = read_table(path)?;
    let outcome = params.import_table(rows);
    match &outcome {
        TableImport::Parameters { applied } => {
            info!(path = %path.display(), applied, "parameters imported");
        }
        TableImport::Batch(rows) => {
            info!(path = %path.display(), rows = rows.len(), "batch table imported");
        }
        TableImport::Unrecognized => bail!("unrecognized table layout in {}", path.display()),
    }
    Ok(outcome)
}

/// Solves every row of a batch file and writes the results. Missing cells
/// fall back to `params` with the first row previewed over it.
pub fn solve_batch_file(
    params: &SceneParams,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<usize> {
    let input = input.as_ref();
    let mut current = params.clone();
    let rows = match import_table_file(&mut current, input)? {
        TableImport::Batch(rows) => rows,
        _ => bail!("{} is not a batch table", input.display()),
    };
    let solved = solve_batch(&rows, &current);
    export_batch(&solved, output)?;
    Ok(solved.len())
}
