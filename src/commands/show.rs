//! # show-field / show-windows 命令实现
//!
//! ## 依赖关系
//! - 使用 `cli/show.rs` 定义的参数
//! - 使用 `io/field.rs` 读取流场
//! - 使用 `plot/` 模块绘图

use super::delimiter_byte;
use crate::cli::show::{ShowFieldArgs, ShowWindowsArgs};
use openpiv_tools::error::Result;
use openpiv_tools::io::field;
use openpiv_tools::plot::{self, SamplingMethod, VectorFieldOptions, WindowsOptions};
use openpiv_tools::utils::output;

/// 执行 show-field 命令
pub fn show_field(args: ShowFieldArgs) -> Result<()> {
    output::print_header("Vector Field");

    let flow = field::load_with_delimiter(&args.field, delimiter_byte(args.delimiter)?)?;
    output::print_info(&format!(
        "{} vectors, {} invalid",
        flow.len(),
        flow.invalid_count()
    ));

    let options = VectorFieldOptions {
        background: args.image,
        window_size: args.window_size,
        scaling_factor: args.scaling_factor,
        scale: args.scale,
        width: args.width,
        height: args.height,
    };
    plot::render_vector_field(&flow, &args.output, &options)?;

    output::print_written(
        &args.field.display().to_string(),
        &args.output.display().to_string(),
    );
    Ok(())
}

/// 执行 show-windows 命令
pub fn show_windows(args: ShowWindowsArgs) -> Result<()> {
    output::print_header("Interrogation Windows");

    let method: SamplingMethod = args.method.parse()?;
    let flow = field::load_with_delimiter(&args.field, delimiter_byte(args.delimiter)?)?;

    let columns = flow.grid_columns();
    let rows = flow.grid_rows();
    output::print_info(&format!(
        "Grid: {} columns x {} rows, method: {}",
        columns.len(),
        rows.len(),
        method
    ));

    let options = WindowsOptions {
        window_size: args.window_size,
        skip: args.skip,
        method,
        seed: args.seed,
        ..Default::default()
    };
    plot::render_windows_sampling(&columns, &rows, &args.output, &options)?;

    output::print_written(
        &args.field.display().to_string(),
        &args.output.display().to_string(),
    );
    Ok(())
}
