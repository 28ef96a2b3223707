use aimcalc_geometry::{
    MountGeometry, OutputAngles, PlanePoint, Point3, Vec3, compute_base, compute_output_angles,
    compute_ray, compute_target, crab_mm_per_m_to_deg, deg_to_arcmin, yt_formula,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::params::{ControlMode, SceneParams};
use crate::surface::{KeyValue, ParameterValue};

/// One imported table row, keyed by column header.
pub type BatchRow = BTreeMap<String, ParameterValue>;

pub const COL_D1R_X: &str = "D1R_x";
pub const COL_D1R_Y: &str = "D1R_y";
pub const COL_D1L_X: &str = "D1L_x";
pub const COL_D1L_Y: &str = "D1L_y";
pub const COL_CRAB: &str = "CrabAngle";
pub const COL_DRIVE: &str = "DriveAngle";
pub const COL_SYMMETRY: &str = "SymmetryAngle";
pub const COL_DISTANCE: &str = "FrV";
pub const COL_FLR_Z: &str = "Zr";
pub const COL_ZETA: &str = "Xr";

const BATCH_MARKERS: [&str; 4] = [COL_D1R_X, COL_D1R_Y, COL_D1L_X, COL_D1L_Y];
const KEY_MARKERS: [&str; 4] = ["key", "Key", "param", "Param"];

/// How an imported table should be interpreted, judged from its first row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableLayout {
    KeyValue,
    Batch,
    Unknown,
}

pub fn detect_layout(rows: &[BatchRow]) -> TableLayout {
    let Some(first) = rows.first() else {
        return TableLayout::Unknown;
    };
    if KEY_MARKERS.iter().any(|key| first.contains_key(*key)) {
        TableLayout::KeyValue
    } else if BATCH_MARKERS.iter().any(|key| first.contains_key(*key)) {
        TableLayout::Batch
    } else {
        TableLayout::Unknown
    }
}

/// Key column of a key/value row, whichever spelling the table uses.
pub fn row_key(row: &BatchRow) -> Option<String> {
    KEY_MARKERS
        .iter()
        .find_map(|name| row.get(*name).filter(|value| !value.is_blank()))
        .map(|value| value.as_text().trim().to_string())
}

/// Drops empty rows and label rows whose `D1R_x` cell reads `INPUT`.
pub fn filter_batch_rows(rows: Vec<BatchRow>) -> Vec<BatchRow> {
    let total = rows.len();
    let kept: Vec<BatchRow> = rows
        .into_iter()
        .filter(|row| !row.values().all(ParameterValue::is_blank))
        .filter(|row| {
            !row.get(COL_D1R_X)
                .is_some_and(|cell| cell.as_text().trim().eq_ignore_ascii_case("INPUT"))
        })
        .collect();
    if kept.len() < total {
        debug!(skipped = total - kept.len(), "skipped label or empty batch rows");
    }
    kept
}

fn cell<'a>(row: &'a BatchRow, column: &str) -> Option<&'a ParameterValue> {
    row.get(column).filter(|value| !value.is_blank())
}

fn number(row: &BatchRow, column: &str, fallback: f64) -> f64 {
    match cell(row, column) {
        Some(value) => match value.as_number() {
            Some(number) => number,
            None => {
                warn!(column, value = %value.as_text(), "unparsable cell, using current value");
                fallback
            }
        },
        None => fallback,
    }
}

/// A batch row with every field resolved against the live parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BatchInputs {
    pub d1_right: PlanePoint,
    pub d1_left: PlanePoint,
    pub crab_mm_per_m: f64,
    pub crab_deg: f64,
    /// Degrees, unlike the arc-minute parameter.
    pub alpha_deg: f64,
    pub beta_deg: f64,
    pub distance: f64,
    pub flr_z: f64,
    pub zeta_deg: f64,
}

impl BatchInputs {
    /// When neither drive nor symmetry angle is given, alpha is taken from
    /// the D1 baseline direction and beta follows as `alpha - crab`.
    pub fn from_row(row: &BatchRow, current: &SceneParams) -> Self {
        let d1_right = PlanePoint {
            x: number(row, COL_D1R_X, current.mount.d1_right.x),
            y: number(row, COL_D1R_Y, current.mount.d1_right.y),
        };
        let d1_left = PlanePoint {
            x: number(row, COL_D1L_X, current.mount.d1_left.x),
            y: number(row, COL_D1L_Y, current.mount.d1_left.y),
        };
        let crab_mm_per_m = number(row, COL_CRAB, current.crab_mm_per_m);
        let crab_deg = crab_mm_per_m_to_deg(crab_mm_per_m);

        let has_drive = cell(row, COL_DRIVE).is_some();
        let has_symmetry = cell(row, COL_SYMMETRY).is_some();
        let (alpha_deg, beta_deg) = if !has_drive && !has_symmetry {
            let alpha = (d1_right.x - d1_left.x)
                .atan2(d1_right.y - d1_left.y)
                .to_degrees();
            (alpha, alpha - crab_deg)
        } else {
            (
                number(row, COL_DRIVE, current.alpha_deg()),
                number(row, COL_SYMMETRY, current.beta_deg),
            )
        };

        Self {
            d1_right,
            d1_left,
            crab_mm_per_m,
            crab_deg,
            alpha_deg,
            beta_deg,
            distance: number(row, COL_DISTANCE, current.distance),
            flr_z: number(row, COL_FLR_Z, current.mount.flr.z),
            zeta_deg: number(row, COL_ZETA, current.zeta_deg),
        }
    }

    pub fn mount(&self, current: &SceneParams) -> MountGeometry {
        MountGeometry {
            flr: Vec3::new(current.mount.flr.x, current.mount.flr.y, self.flr_z),
            d1_left: self.d1_left,
            d1_right: self.d1_right,
        }
    }
}

/// Computed values for one batch row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BatchOutput {
    pub inputs: BatchInputs,
    pub base: Point3,
    pub target: Point3,
    pub yt_formula: f64,
    pub d_yt: f64,
    pub output: OutputAngles,
}

/// Solves a row in angle mode. FLRx and FLRy come from `current`.
pub fn solve_row(row: &BatchRow, current: &SceneParams) -> BatchOutput {
    let inputs = BatchInputs::from_row(row, current);
    let mount = inputs.mount(current);

    let base = compute_base(&mount, inputs.beta_deg).base;
    let ray = compute_ray(inputs.crab_deg, inputs.alpha_deg, inputs.zeta_deg);
    let target = compute_target(base, &ray, inputs.distance);
    let yt_formula = yt_formula(
        &mount,
        inputs.beta_deg,
        inputs.crab_deg,
        inputs.alpha_deg,
        inputs.zeta_deg,
        inputs.distance,
    );

    BatchOutput {
        inputs,
        base,
        target,
        yt_formula,
        d_yt: target.y - yt_formula,
        output: compute_output_angles(base, target, inputs.alpha_deg),
    }
}

impl BatchOutput {
    /// Normalized inputs followed by the computed columns.
    pub fn fields(&self) -> Vec<(&'static str, f64)> {
        let inputs = &self.inputs;
        vec![
            (COL_D1R_X, inputs.d1_right.x),
            (COL_D1R_Y, inputs.d1_right.y),
            (COL_D1L_X, inputs.d1_left.x),
            (COL_D1L_Y, inputs.d1_left.y),
            (COL_CRAB, inputs.crab_mm_per_m),
            ("CrabAngle_deg", inputs.crab_deg),
            (COL_DRIVE, inputs.alpha_deg),
            (COL_SYMMETRY, inputs.beta_deg),
            (COL_DISTANCE, inputs.distance),
            (COL_FLR_Z, inputs.flr_z),
            (COL_ZETA, inputs.zeta_deg),
            ("alpha_min", deg_to_arcmin(inputs.alpha_deg)),
            ("base_x", self.base.x),
            ("base_y", self.base.y),
            ("base_z", self.base.z),
            ("Xt", self.target.x),
            ("Yt", self.target.y),
            ("Zt", self.target.z),
            ("Yt_formula", self.yt_formula),
            ("dYt", self.d_yt),
            ("out_V", self.output.distance),
            ("out_etaDeg", self.output.eta_deg),
            ("out_thetaDeg", self.output.theta_deg),
            ("out_elevDeg", self.output.elev_deg),
            ("out_epsDeg", self.output.eps_deg),
        ]
    }

    /// The source row with `idx` and the computed columns merged over it.
    pub fn to_row(&self, idx: usize, source: &BatchRow) -> BatchRow {
        let mut row = source.clone();
        row.insert("idx".to_string(), ParameterValue::Number(idx as f64));
        for (name, value) in self.fields() {
            row.insert(name.to_string(), ParameterValue::Number(value));
        }
        row
    }
}

/// Solves every row independently; `idx` is 1-based.
pub fn solve_batch(rows: &[BatchRow], current: &SceneParams) -> Vec<BatchRow> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| solve_row(row, current).to_row(i + 1, row))
        .collect()
}

impl SceneParams {
    /// Switches to angle control and loads the first batch row so the scene
    /// previews it.
    pub fn with_batch_preview(&self, row: &BatchRow) -> SceneParams {
        let inputs = BatchInputs::from_row(row, self);
        let mut next = self.clone();
        next.control = ControlMode::Angles;
        next.mount.d1_right = inputs.d1_right;
        next.mount.d1_left = inputs.d1_left;
        next.crab_mm_per_m = inputs.crab_mm_per_m;
        next.alpha_arcmin = deg_to_arcmin(inputs.alpha_deg);
        next.beta_deg = inputs.beta_deg;
        next.distance = inputs.distance;
        next.mount.flr.z = inputs.flr_z;
        next.zeta_deg = inputs.zeta_deg;
        next
    }
}

/// What an imported table turned out to be.
#[derive(Clone, Debug, PartialEq)]
pub enum TableImport {
    Parameters { applied: usize },
    Batch(Vec<BatchRow>),
    Unrecognized,
}

/// Converts key/value rows into the parameter surface's pairs.
pub fn key_values_from_rows(rows: &[BatchRow]) -> Vec<KeyValue> {
    rows.iter()
        .filter_map(|row| {
            let key = row_key(row)?;
            let value = row
                .get("value")
                .or_else(|| row.get("Value"))
                .cloned()
                .unwrap_or(ParameterValue::Empty);
            Some(KeyValue { key, value })
        })
        .collect()
}

impl SceneParams {
    /// Applies an imported table: a key/value list updates the parameters, a
    /// batch table previews its first row and hands the rows back.
    pub fn import_table(&mut self, rows: Vec<BatchRow>) -> TableImport {
        match detect_layout(&rows) {
            TableLayout::KeyValue => {
                let applied = self.apply_key_values(&key_values_from_rows(&rows));
                TableImport::Parameters { applied }
            }
            TableLayout::Batch => {
                let rows = filter_batch_rows(rows);
                if let Some(first) = rows.first() {
                    *self = self.with_batch_preview(first);
                }
                TableImport::Batch(rows)
            }
            TableLayout::Unknown => {
                warn!("table layout not recognized");
                TableImport::Unrecognized
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, ParameterValue)]) -> BatchRow {
        cells
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    fn num(value: f64) -> ParameterValue {
        ParameterValue::Number(value)
    }

    fn text(value: &str) -> ParameterValue {
        ParameterValue::Text(value.to_string())
    }

    #[test]
    fn layout_detection() {
        assert_eq!(
            detect_layout(&[row(&[("Key", text("V")), ("value", num(1.0))])]),
            TableLayout::KeyValue
        );
        assert_eq!(
            detect_layout(&[row(&[("D1L_y", num(1.0))])]),
            TableLayout::Batch
        );
        assert_eq!(detect_layout(&[row(&[("foo", num(1.0))])]), TableLayout::Unknown);
        assert_eq!(detect_layout(&[]), TableLayout::Unknown);
    }

    #[test]
    fn label_and_blank_rows_are_dropped() {
        let rows = vec![
            row(&[(COL_D1R_X, text("input"))]),
            row(&[(COL_D1R_X, text("")), (COL_CRAB, ParameterValue::Empty)]),
            row(&[(COL_D1R_X, num(-4300.0))]),
        ];
        let kept = filter_batch_rows(rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0][COL_D1R_X], num(-4300.0));
    }

    #[test]
    fn missing_angles_are_derived_from_baseline() {
        let current = SceneParams::default();
        let data = row(&[
            (COL_D1R_X, num(-4300.0)),
            (COL_D1R_Y, num(-1255.0)),
            (COL_D1L_X, num(-4300.0)),
            (COL_D1L_Y, num(1245.0)),
            (COL_CRAB, num(0.0)),
            (COL_DISTANCE, num(1000.0)),
        ]);
        let inputs = BatchInputs::from_row(&data, &current);
        // atan2(0, -2500) points along -Y in this convention
        assert!((inputs.alpha_deg - 180.0).abs() < 1.0e-12);
        assert!((inputs.beta_deg - 180.0).abs() < 1.0e-12);
    }

    #[test]
    fn given_angles_win_and_gaps_fall_back() {
        let current = SceneParams {
            alpha_arcmin: 120.0,
            ..SceneParams::default()
        };
        let data = row(&[(COL_SYMMETRY, num(3.0)), (COL_DRIVE, text(""))]);
        let inputs = BatchInputs::from_row(&data, &current);
        assert_eq!(inputs.beta_deg, 3.0);
        assert_eq!(inputs.alpha_deg, 2.0);
        assert_eq!(inputs.distance, current.distance);
        assert_eq!(inputs.flr_z, current.mount.flr.z);
    }

    #[test]
    fn solved_row_keeps_source_columns() {
        let current = SceneParams::default();
        let data = row(&[
            ("note", text("first")),
            (COL_SYMMETRY, num(0.0)),
            (COL_DRIVE, num(0.0)),
            (COL_ZETA, num(90.0)),
        ]);
        let out = solve_batch(std::slice::from_ref(&data), &current);
        assert_eq!(out.len(), 1);
        let solved = &out[0];
        assert_eq!(solved["idx"], num(1.0));
        assert_eq!(solved["note"], text("first"));
        let yt = solved["Yt"].as_number().unwrap_or(f64::NAN);
        assert!((yt - -5.0).abs() < 1.0e-9);
        let d_yt = solved["dYt"].as_number().unwrap_or(f64::NAN);
        assert!(d_yt.abs() < 1.0e-6);
    }

    #[test]
    fn preview_switches_to_angles() {
        let current = SceneParams::default();
        let data = row(&[
            (COL_DRIVE, num(1.5)),
            (COL_SYMMETRY, num(2.0)),
            (COL_FLR_Z, num(250.0)),
            (COL_ZETA, ParameterValue::Empty),
        ]);
        let preview = current.with_batch_preview(&data);
        assert_eq!(preview.control, ControlMode::Angles);
        assert_eq!(preview.alpha_arcmin, 90.0);
        assert_eq!(preview.beta_deg, 2.0);
        assert_eq!(preview.mount.flr.z, 250.0);
        assert_eq!(preview.zeta_deg, current.zeta_deg);
    }

    #[test]
    fn key_value_table_updates_parameters() {
        let mut params = SceneParams::default();
        let rows = vec![
            row(&[("param", text("V")), ("Value", text("2500"))]),
            row(&[("param", text("ctrl")), ("Value", text("angles"))]),
            row(&[("param", text("")), ("Value", num(1.0))]),
        ];
        let outcome = params.import_table(rows);
        assert_eq!(outcome, TableImport::Parameters { applied: 2 });
        assert_eq!(params.distance, 2500.0);
        assert_eq!(params.control, ControlMode::Angles);
    }

    #[test]
    fn batch_table_previews_first_data_row() {
        let mut params = SceneParams::default();
        let rows = vec![
            row(&[(COL_D1R_X, text("INPUT")), (COL_DISTANCE, text("mm"))]),
            row(&[(COL_D1R_X, num(-4300.0)), (COL_DISTANCE, num(1500.0))]),
            row(&[(COL_D1R_X, num(-4200.0)), (COL_DISTANCE, num(1600.0))]),
        ];
        let TableImport::Batch(kept) = params.import_table(rows) else {
            panic!("expected a batch table");
        };
        assert_eq!(kept.len(), 2);
        assert_eq!(params.distance, 1500.0);
        assert_eq!(params.control, ControlMode::Angles);
    }
}
