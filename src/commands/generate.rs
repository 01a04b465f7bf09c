use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

use crate::build_list::{render_preview, Section};
use crate::commands::config::Project;
use crate::error::{Result, ToolsError};
use crate::folders::MainFolder;

pub const GENERATE_PROJECT_FILES: &str = "GenerateProjectFiles.bat";
pub const COMPILE_DEPENDENCIES: &str = "CompileDependencies.bat";

const SHADER_EXTENSIONS: &[&str] = &["hlsl", "hlsli"];

/// Regenerates IDE project files after the build list changed.
pub trait Regenerate {
    fn regenerate(&self) -> Result<()>;
}

/// Runs a setup batch script with the `nopause` argument.
pub struct SetupScript {
    script: PathBuf,
    working_dir: PathBuf,
}

impl SetupScript {
    pub fn new(project: &Project, name: &str) -> Self {
        Self {
            script: project.setup_script(name),
            working_dir: project.setup_dir(),
        }
    }

    /// Runs the script and returns whether it exited successfully.
    pub fn run(&self) -> Result<bool> {
        if !self.script.exists() {
            return Err(ToolsError::Custom(format!(
                "{} not found",
                self.script.display()
            )));
        }
        tracing::info!("running {}", self.script.display());
        let status = Command::new(&self.script)
            .arg("nopause")
            .current_dir(&self.working_dir)
            .status()?;
        if !status.success() {
            tracing::warn!("{} exited with {status}", self.script.display());
        }
        Ok(status.success())
    }
}

impl Regenerate for SetupScript {
    fn regenerate(&self) -> Result<()> {
        self.run().map(|_| ())
    }
}

pub fn regenerate(project: &Project) -> Result<()> {
    SetupScript::new(project, GENERATE_PROJECT_FILES).regenerate()
}

/// Whether a scanned file belongs to `folder`'s collection. Shader stages
/// share a directory and are told apart by their stem suffix.
fn belongs_to(folder: MainFolder, relative: &str) -> bool {
    let file_name = relative.rsplit('/').next().unwrap_or(relative);
    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext.to_lowercase()),
        None => (file_name, String::new()),
    };
    let is_shader = SHADER_EXTENSIONS.contains(&ext.as_str());

    match folder {
        MainFolder::ShaderIncludes => is_shader,
        MainFolder::VertexShaders | MainFolder::GeometryShaders | MainFolder::PixelShaders => {
            is_shader
                && !relative.starts_with("Includes/")
                && folder.suffix().is_some_and(|s| stem.ends_with(s))
        }
        _ => !is_shader,
    }
}

/// Scans every main folder under `source_dir` and groups the files found by
/// build-list collection.
pub fn scan_sections(source_dir: &Path) -> Vec<Section> {
    let mut collections: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();

    for folder in MainFolder::ALL {
        let dir = source_dir.join(folder.path());
        let entries = collections.entry(folder.collection()).or_default();
        if !dir.is_dir() {
            tracing::debug!("{} does not exist, skipping", dir.display());
            continue;
        }

        for entry in WalkDir::new(&dir).into_iter().flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&dir) else {
                continue;
            };
            let relative = relative.to_string_lossy().replace('\\', "/");
            if belongs_to(folder, &relative) {
                entries.push(format!("{}{relative}", folder.path()));
            }
        }
    }

    collections
        .into_iter()
        .map(|(collection, mut entries)| {
            entries.sort();
            entries.dedup();
            Section {
                heading: collection.trim_end_matches("_FILES").to_string(),
                collection: collection.to_string(),
                entries,
            }
        })
        .collect()
}

/// Renders the build list that matches the files currently on disk.
pub fn preview_build_list(project: &Project) -> String {
    let sections = scan_sections(&project.source_dir());
    render_preview(&project.config.project_name, &sections)
}
