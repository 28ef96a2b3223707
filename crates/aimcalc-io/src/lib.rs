pub mod params;
pub mod table;

pub use params::{load_params, save_params};
pub use table::{
    INPUTS_SHEET, OUTPUTS_SHEET, RESULTS_SHEET, Sheet, Workbook, export_batch, export_single,
    import_table_file, read_table, read_workbook, solve_batch_file, write_workbook,
};
