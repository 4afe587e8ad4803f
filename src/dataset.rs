use crate::{cli::Cli, render::OptixRenderer, result::PreprocessResult};
use itertools::Itertools;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Configuration for one batch run, constructed once from the CLI and passed
/// explicitly to every phase.
pub struct BatchContext {
    pub(crate) mode: String,
    pub(crate) file_root: PathBuf,
    // Already suffixed with the camera count, so runs with different camera
    // setups do not collide.
    pub(crate) output_root: PathBuf,
    pub(crate) cam_num: u32,
    pub(crate) force_output: bool,
    pub(crate) range_start: usize,
    pub(crate) range_end: usize,
}

impl BatchContext {
    pub fn from_cli(args: Cli) -> (OptixRenderer, Self) {
        let Cli {
            mode,
            render_program,
            file_root,
            output_root,
            force_output,
            rs,
            re,
            cam_num,
        } = args;

        (
            OptixRenderer::new(render_program),
            Self {
                mode,
                file_root,
                output_root: PathBuf::from(format!("{output_root}{cam_num}")),
                cam_num,
                force_output,
                range_start: rs,
                range_end: re,
            },
        )
    }

    pub(crate) fn shape_root(&self, index: usize) -> PathBuf {
        self.file_root.join(&self.mode).join(format!("Shape__{index}"))
    }

    pub(crate) fn output_dir(&self, index: usize) -> PathBuf {
        self.output_root.join(&self.mode).join(format!("Shape__{index}"))
    }

    pub(crate) fn scene_file(&self, index: usize) -> PathBuf {
        self.shape_root(index).join(format!("imVH_{}.xml", self.cam_num))
    }

    // The renderer resolves the camera file relative to the scene directory.
    pub(crate) fn camera_file(&self) -> String {
        format!("cam{}.txt", self.cam_num)
    }

    // The renderer also resolves its output target relative to the scene
    // directory, which sits three levels below the working directory.
    pub(crate) fn render_target(&self, index: usize) -> PathBuf {
        Path::new("../../../")
            .join(self.output_dir(index))
            .join(format!("imVH_{}.rgbe", self.cam_num))
    }

    pub(crate) fn shape_count(&self) -> PreprocessResult<usize> {
        let count = fs::read_dir(self.file_root.join(&self.mode))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("Shape"))
            .count();

        Ok(count)
    }
}

/// Raw record files the renderer produced for this shape, one per view.
pub(crate) fn raw_record_files(output_dir: &Path, cam_num: u32) -> PreprocessResult<Vec<PathBuf>> {
    matching_views(output_dir, cam_num, "dat")
}

/// Counts the already converted views. The completion check is count based,
/// the container contents are not validated.
pub(crate) fn converted_view_count(output_dir: &Path, cam_num: u32) -> PreprocessResult<usize> {
    Ok(matching_views(output_dir, cam_num, "npz")?.len())
}

fn matching_views(
    output_dir: &Path,
    cam_num: u32,
    extension: &str,
) -> PreprocessResult<Vec<PathBuf>> {
    let prefix = format!("imVH_{cam_num}twoBounce_");

    let files = fs::read_dir(output_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == extension)
                && path
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy().starts_with(&prefix))
        })
        .sorted()
        .collect_vec();

    Ok(files)
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::Parser;

    fn context() -> BatchContext {
        let args = Cli::parse_from([
            "vhpp",
            "--file-root",
            "Shapes",
            "--output-root",
            "Images",
            "--cam-num",
            "8",
        ]);
        let (_, context) = BatchContext::from_cli(args);
        context
    }

    #[test]
    fn paths_follow_the_dataset_layout() {
        let context = context();

        assert_eq!(context.shape_root(3), Path::new("Shapes/train/Shape__3"));
        assert_eq!(context.output_dir(3), Path::new("Images8/train/Shape__3"));
        assert_eq!(
            context.scene_file(3),
            Path::new("Shapes/train/Shape__3/imVH_8.xml")
        );
        assert_eq!(context.camera_file(), "cam8.txt");
        assert_eq!(
            context.render_target(3),
            Path::new("../../../Images8/train/Shape__3/imVH_8.rgbe")
        );
    }

    #[test]
    fn view_listing_matches_on_camera_count_and_extension() {
        let dir = tempfile::tempdir().unwrap();

        for name in [
            "imVH_8twoBounce_0.dat",
            "imVH_8twoBounce_1.dat",
            "imVH_8twoBounce_2.npz",
            "imVH_8twoBounce_3.npz.tmp",
            "imVH_4twoBounce_0.dat",
            "unrelated.dat",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let raw = raw_record_files(dir.path(), 8).unwrap();
        assert_eq!(
            raw.iter().map(|path| path.file_name().unwrap()).collect_vec(),
            ["imVH_8twoBounce_0.dat", "imVH_8twoBounce_1.dat"]
        );
        assert_eq!(converted_view_count(dir.path(), 8).unwrap(), 1);
        assert_eq!(converted_view_count(dir.path(), 4).unwrap(), 0);
    }
}
