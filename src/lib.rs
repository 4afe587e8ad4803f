mod cli;
mod dataset;
mod render;
mod repack;
mod result;

use crate::{
    cli::CompressBar,
    dataset::{BatchContext, converted_view_count, raw_record_files},
    render::{RenderMode, RenderProgram},
    result::PreprocessResult,
};
use std::fs;

pub mod prelude {
    pub use crate::{
        cli::Cli,
        dataset::BatchContext,
        preprocess,
        render::{OptixRenderer, RenderProgram},
        repack::{container_path, convert, read_raw_record, write_container},
        result::{PreprocessError, PreprocessResult},
    };
}

/// Runs the batch over the requested shape range: render each shape with the
/// external program, then compress every raw record it produced.
pub fn preprocess(renderer: &dyn RenderProgram, context: &BatchContext) -> PreprocessResult<()> {
    let end = context.range_end.min(context.shape_count()?);

    for index in context.range_start..end {
        process_shape(renderer, context, index, end)?;
    }

    Ok(())
}

fn process_shape(
    renderer: &dyn RenderProgram,
    context: &BatchContext,
    index: usize,
    end: usize,
) -> PreprocessResult<()> {
    let shape_root = context.shape_root(index);
    println!("{index}/{end}: {}", shape_root.display());

    let output_dir = context.output_dir(index);
    if output_dir.is_dir() {
        eprintln!(
            "Warning: output directory {} already exists",
            output_dir.display()
        );

        if converted_view_count(&output_dir, context.cam_num)? == context.cam_num as usize {
            return Ok(());
        }
    } else {
        fs::create_dir_all(&output_dir)?;
    }

    // A failed render is reported, not fatal, so the remaining shapes still
    // get processed.
    match renderer.run(
        &context.scene_file(index),
        &context.render_target(index),
        &context.camera_file(),
        RenderMode::TwoBounceVisualHull,
        context.force_output,
    ) {
        Ok(status) if !status.success() => eprintln!(
            "Warning: render program exited with {status} for {}",
            shape_root.display()
        ),
        Err(error) => eprintln!(
            "Warning: render program failed for {}: {error}",
            shape_root.display()
        ),
        Ok(_) => {}
    }

    let raw_files = raw_record_files(&output_dir, context.cam_num)?;

    let progress_bar = CompressBar::new(raw_files.len() as u64);
    for raw_path in &raw_files {
        progress_bar.advance(&raw_path.display().to_string());

        if let Err(error) = repack::convert(raw_path) {
            eprintln!("Warning: failed to compress {}: {error}", raw_path.display());
        }
    }
    progress_bar.finish();

    Ok(())
}
