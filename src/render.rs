use crate::result::PreprocessResult;
use std::{
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

/// Render mode selector passed to the renderer via `-m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    TwoBounceVisualHull,
}

impl RenderMode {
    pub(crate) fn selector(self) -> &'static str {
        match self {
            RenderMode::TwoBounceVisualHull => "7",
        }
    }
}

/// The external renderer boundary. The production implementation shells out;
/// tests substitute their own.
pub trait RenderProgram {
    fn run(
        &self,
        scene_file: &Path,
        output_file: &Path,
        camera_file: &str,
        mode: RenderMode,
        force_output: bool,
    ) -> PreprocessResult<ExitStatus>;
}

pub struct OptixRenderer {
    executable: PathBuf,
}

impl OptixRenderer {
    pub fn new(executable: PathBuf) -> Self {
        Self { executable }
    }
}

impl RenderProgram for OptixRenderer {
    fn run(
        &self,
        scene_file: &Path,
        output_file: &Path,
        camera_file: &str,
        mode: RenderMode,
        force_output: bool,
    ) -> PreprocessResult<ExitStatus> {
        let mut command = Command::new(&self.executable);
        command
            .arg("-f")
            .arg(scene_file)
            .arg("-o")
            .arg(output_file)
            .arg("-c")
            .arg(camera_file)
            .arg("-m")
            .arg(mode.selector());

        if force_output {
            command.arg("--forceOutput");
        }

        Ok(command.status()?)
    }
}
