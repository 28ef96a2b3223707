pub mod batch;
pub mod edit;
pub mod params;
pub mod solve;
pub mod surface;

pub use aimcalc_base::{Error, Result};
pub use batch::{
    BatchInputs, BatchOutput, BatchRow, TableImport, TableLayout, detect_layout,
    filter_batch_rows, key_values_from_rows, row_key, solve_batch, solve_row,
};
pub use edit::{PITCH_LIMIT_DEG, RotationDelta, SceneEdit};
pub use params::{BoxParams, ControlMode, Position, RectParams, SceneParams};
pub use solve::{Solution, solve};
pub use surface::{KeyValue, ParamKey, ParameterValue, output_key_values};
