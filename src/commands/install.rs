use futures_util::StreamExt;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;

use crate::commands::config::Project;
use crate::commands::detect::{self, bundled_cmake_path, parse_version};
use crate::commands::generate::{COMPILE_DEPENDENCIES, GENERATE_PROJECT_FILES};
use crate::commands::registry;
use crate::console::Console;
use crate::error::{Result, ToolsError};

pub const INSTALL_BUILD_TOOLS: &str = "InstallBuildTools.bat";

/// Progress events emitted while the setup runs.
#[derive(Clone, Debug, PartialEq)]
pub enum SetupEvent {
    StepStarted {
        step: String,
        description: String,
        step_index: usize,
        total_steps: usize,
    },
    StepProgress {
        step: String,
        progress: f64,
        detail: String,
    },
    StepCompleted {
        step: String,
        detail: String,
    },
    StepWarning {
        step: String,
        message: String,
    },
    Error {
        step: String,
        message: String,
    },
    Finished,
}

/// Receives setup progress.
pub trait Reporter {
    fn send(&self, event: SetupEvent);
}

/// Prints setup progress to stdout.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn send(&self, event: SetupEvent) {
        match event {
            SetupEvent::StepStarted {
                description,
                step_index,
                total_steps,
                ..
            } => println!("\n[{step_index}/{total_steps}] {description}"),
            SetupEvent::StepProgress { detail, .. } => println!("  {detail}"),
            SetupEvent::StepCompleted { detail, .. } => println!("  {detail}"),
            SetupEvent::StepWarning { step, message } => {
                tracing::warn!(step = %step, "{message}");
                println!("  ! {message}");
            }
            SetupEvent::Error { step, message } => {
                tracing::error!(step = %step, "{message}");
                println!("  <!> {message}");
            }
            SetupEvent::Finished => println!("\nSetup completed!"),
        }
    }
}

/// Which optional steps to run.
#[derive(Clone, Debug)]
pub struct SetupOptions {
    pub skip_deeplink: bool,
    pub skip_submodules: bool,
}

fn calculate_total_steps(options: &SetupOptions) -> usize {
    let mut steps = 4; // toolchain + runtime + cmake + project files
    if !options.skip_deeplink {
        steps += 1;
    }
    if !options.skip_submodules {
        steps += 1;
    }
    steps
}

struct Steps<'r, R: Reporter> {
    reporter: &'r R,
    index: usize,
    total: usize,
}

impl<R: Reporter> Steps<'_, R> {
    fn start(&mut self, step: &str, description: &str) {
        self.index += 1;
        self.reporter.send(SetupEvent::StepStarted {
            step: step.into(),
            description: description.into(),
            step_index: self.index,
            total_steps: self.total,
        });
    }

    fn completed(&self, step: &str, detail: impl Into<String>) {
        self.reporter.send(SetupEvent::StepCompleted {
            step: step.into(),
            detail: detail.into(),
        });
    }

    fn warning(&self, step: &str, message: impl Into<String>) {
        self.reporter.send(SetupEvent::StepWarning {
            step: step.into(),
            message: message.into(),
        });
    }
}

/// Checks and installs the engine's prerequisites, then generates the
/// project files.
pub async fn run_setup<I: BufRead, O: Write, R: Reporter>(
    project: &Project,
    console: &mut Console<I, O>,
    reporter: &R,
    options: &SetupOptions,
) -> Result<()> {
    let windows = cfg!(target_os = "windows");
    let mut steps = Steps {
        reporter,
        index: 0,
        total: calculate_total_steps(options),
    };

    // Step 1: URL protocol handler (if needed)
    if !options.skip_deeplink {
        steps.start("deeplink", "Adding deep link to registry");
        match registry::install_deeplink(project).await {
            Ok(()) => steps.completed(
                "deeplink",
                format!("{}:// links open the editor", project.config.protocol),
            ),
            Err(e) => steps.warning("deeplink", format!("Could not register deep link: {e}")),
        }
    }

    // Step 2: Compiler toolchain
    steps.start("msvc", "Checking MSVC build tools");
    if !windows {
        steps.warning("msvc", "MSVC is only checked on Windows");
    } else if detect::detect_msvc(project).await {
        steps.completed("msvc", "Compatible MSVC installation located.");
    } else if console
        .confirm("MSVC not found. Would you like to install the VS Build Tools?")?
    {
        match run_script(project, INSTALL_BUILD_TOOLS).await {
            Ok(true) => steps.completed("msvc", "VS Build Tools installed"),
            Ok(false) => steps.warning("msvc", "VS Build Tools installer reported a failure"),
            Err(e) => steps.warning("msvc", format!("Could not run the VS Build Tools installer: {e}")),
        }
    } else {
        steps.warning("msvc", "MSVC is not installed.");
    }

    // Step 3: Language runtime
    steps.start("python", "Checking Python");
    match detect::detect_python_version(project).await {
        (Some(version), true) => steps.completed("python", format!("{version} located")),
        (Some(version), false) => steps.warning(
            "python",
            format!(
                "{version} is too old, {} or newer is required",
                project.config.min_python_version
            ),
        ),
        (None, _) => steps.warning(
            "python",
            format!(
                "Python {} or newer is not installed, get it from https://www.python.org/downloads/",
                project.config.min_python_version
            ),
        ),
    }

    // Step 4: Build-system generator
    steps.start("cmake", "Checking CMake");
    let cmake_exe = bundled_cmake_path(project);
    let cmake_available = if cmake_exe.exists() {
        steps.completed(
            "cmake",
            format!("Correct CMake located at {}", cmake_exe.display()),
        );
        true
    } else if !windows {
        steps.warning(
            "cmake",
            format!(
                "CMake not found at {}. The bundled CMake is only downloaded on Windows",
                cmake_exe.display()
            ),
        );
        false
    } else if console.confirm(&format!(
        "CMake not found. Would you like to download CMake {}?",
        project.config.cmake_version
    ))? {
        match install_cmake(project, reporter).await {
            Ok(()) => {
                steps.completed(
                    "cmake",
                    format!(
                        "CMake {} has been downloaded to {}",
                        project.config.cmake_version,
                        cmake_dir(project).display()
                    ),
                );
                true
            }
            Err(e) => {
                reporter.send(SetupEvent::Error {
                    step: "cmake".into(),
                    message: e.to_string(),
                });
                false
            }
        }
    } else {
        steps.warning("cmake", "CMake is not installed.");
        false
    };

    // Step 5: Submodules
    if !options.skip_submodules {
        steps.start("submodules", "Updating submodules");
        match update_submodules(&project.root).await {
            Ok(()) => steps.completed("submodules", "Submodules up to date"),
            Err(e) => steps.warning("submodules", format!("Could not update submodules: {e}")),
        }
    }

    // Step 6: Project files
    steps.start("project", "Generating project files");
    if !cmake_available {
        let message = "CMake is required to setup the project. Cannot build project files.";
        reporter.send(SetupEvent::Error {
            step: "project".into(),
            message: message.into(),
        });
        return Err(ToolsError::Custom(message.into()));
    }
    if !windows {
        steps.warning("project", "Project generation scripts only run on Windows");
    } else {
        for script in [GENERATE_PROJECT_FILES, COMPILE_DEPENDENCIES] {
            match run_script(project, script).await {
                Ok(true) => steps.completed("project", format!("{script} finished")),
                Ok(false) => steps.warning("project", format!("{script} reported a failure")),
                Err(e) => steps.warning("project", format!("Could not run {script}: {e}")),
            }
        }
    }

    reporter.send(SetupEvent::Finished);
    Ok(())
}

/// Runs a setup batch script with `nopause`, returning whether it succeeded.
async fn run_script(project: &Project, name: &str) -> Result<bool> {
    let script = project.setup_script(name);
    if !script.exists() {
        return Err(ToolsError::Custom(format!("{} not found", script.display())));
    }
    tracing::info!("running {}", script.display());
    let status = tokio::process::Command::new(&script)
        .arg("nopause")
        .current_dir(project.setup_dir())
        .status()
        .await?;
    Ok(status.success())
}

async fn update_submodules(root: &Path) -> Result<()> {
    let mut cmd = tokio::process::Command::new("git");
    cmd.args(["submodule", "update", "--init", "--recursive"])
        .current_dir(root);
    #[cfg(target_os = "windows")]
    cmd.creation_flags(0x08000000); // CREATE_NO_WINDOW
    let output = cmd.output().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ToolsError::Custom(stderr.trim().to_string()));
    }
    Ok(())
}

fn cmake_dir(project: &Project) -> PathBuf {
    project.setup_dir().join("CMake")
}

/// Release archive of the pinned CMake version.
pub fn cmake_download_url(version: &str) -> String {
    format!(
        "https://github.com/Kitware/CMake/releases/download/v{version}/cmake-{version}-windows-x86_64.zip"
    )
}

/// Downloads the pinned CMake release and extracts it into the setup
/// directory.
async fn install_cmake<R: Reporter>(project: &Project, reporter: &R) -> Result<()> {
    let version = project.config.cmake_version.clone();
    if parse_version(&version).is_none() {
        return Err(ToolsError::Custom(format!("invalid CMake version \"{version}\"")));
    }
    let url = cmake_download_url(&version);
    let target_dir = cmake_dir(project);
    tokio::fs::create_dir_all(&target_dir).await?;
    let zip_path = target_dir.join(format!("cmake-{version}-windows.zip"));

    reporter.send(SetupEvent::StepProgress {
        step: "cmake".into(),
        progress: 0.1,
        detail: format!("Downloading {url} to {}", zip_path.display()),
    });

    let response = reqwest::get(&url).await?;
    if !response.status().is_success() {
        return Err(ToolsError::Custom(format!(
            "Failed to download CMake: HTTP {} from {url}",
            response.status()
        )));
    }

    let total_size = response.content_length().unwrap_or(0);
    let mut stream = response.bytes_stream();
    let mut file = tokio::fs::File::create(&zip_path).await?;
    let mut downloaded: u64 = 0;
    let mut last_reported = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if total_size > 0 {
            let percent = downloaded * 100 / total_size;
            if percent >= last_reported + 10 {
                last_reported = percent;
                reporter.send(SetupEvent::StepProgress {
                    step: "cmake".into(),
                    progress: 0.1 + (downloaded as f64 / total_size as f64) * 0.7,
                    detail: format!(
                        "Downloading... {:.1} MB / {:.1} MB",
                        downloaded as f64 / 1_000_000.0,
                        total_size as f64 / 1_000_000.0,
                    ),
                });
            }
        }
    }
    file.flush().await?;
    drop(file);

    reporter.send(SetupEvent::StepProgress {
        step: "cmake".into(),
        progress: 0.85,
        detail: format!("Extracting {}", zip_path.display()),
    });

    extract_cmake_archive(&zip_path, &target_dir, &bundled_cmake_path(project)).await
}

/// Extracts the CMake release archive into `target_dir` and removes the
/// archive. Fails when `expected_exe` is not present afterwards.
async fn extract_cmake_archive(zip_path: &Path, target_dir: &Path, expected_exe: &Path) -> Result<()> {
    let archive_path = zip_path.to_path_buf();
    let extract_dir = target_dir.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let file = std::fs::File::open(&archive_path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        archive.extract(&extract_dir)?;
        Ok(())
    })
    .await
    .map_err(|e| ToolsError::Custom(e.to_string()))??;

    let _ = tokio::fs::remove_file(zip_path).await;

    if !expected_exe.exists() {
        return Err(ToolsError::Custom(format!(
            "CMake archive did not contain {}",
            expected_exe.display()
        )));
    }
    Ok(())
}
