use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vhpp", author, version, about)]
pub struct Cli {
    /// Dataset split to process.
    #[arg(long, default_value = "train")]
    pub mode: String,
    /// Path to the rendering program.
    #[arg(long, default_value = "./OptixRenderer/src/bin/optixRenderer")]
    pub render_program: PathBuf,
    /// Path to the shape file root.
    #[arg(long, default_value = "./Shapes/")]
    pub file_root: PathBuf,
    /// Path to the output root. The camera count is appended to it.
    #[arg(long, default_value = "Images")]
    pub output_root: String,
    /// Overwrite previous renderer results.
    #[arg(long, default_value_t = false)]
    pub force_output: bool,
    /// The starting shape index.
    #[arg(long, default_value_t = 0)]
    pub rs: usize,
    /// The end shape index (exclusive, clamped to the shape count).
    #[arg(long, default_value_t = 10)]
    pub re: usize,
    /// The number of cameras per shape.
    #[arg(long, required = true)]
    pub cam_num: u32,
}

pub(crate) struct CompressBar {
    bar: ProgressBar,
}

impl CompressBar {
    pub(crate) fn new(view_count: u64) -> Self {
        let bar = ProgressBar::new(view_count).with_style(
            ProgressStyle::with_template("Compressing {pos}/{len}: {msg} {wide_bar} [{elapsed}]")
                .unwrap(),
        );

        Self { bar }
    }

    pub(crate) fn advance(&self, name: &str) {
        self.bar.set_message(name.to_string());
        self.bar.inc(1);
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
        println!("Compressing took: {:?}", self.bar.elapsed());
    }
}
