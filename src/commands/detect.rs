use serde::Serialize;
use std::path::PathBuf;

#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;

use tokio::process::Command;

use crate::commands::config::Project;

pub const VERIFY_BUILD_TOOLS: &str = "VerifyBuildTools.bat";

/// Interpreters tried, in order, for the scripting runtime.
const PYTHON_CANDIDATES: &[&str] = &["python", "python3", "py"];

/// Results from scanning the machine for the engine's build prerequisites.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub os: String,
    /// `None` where the compiler toolchain check does not apply.
    pub msvc_installed: Option<bool>,
    pub cmake_installed: bool,
    pub cmake_path: Option<String>,
    pub cmake_version: Option<String>,
    pub python_installed: bool,
    pub python_version: Option<String>,
    pub python_compatible: bool,
    pub git_installed: bool,
    pub git_version: Option<String>,
}

/// Scans the system for the compiler toolchain, CMake, Python and git.
pub async fn detect_environment(project: &Project) -> DetectionResult {
    let os = std::env::consts::OS.to_string();

    let msvc_installed = if os == "windows" {
        Some(detect_msvc(project).await)
    } else {
        None
    };
    let (cmake_installed, cmake_path, cmake_version) = detect_cmake(project).await;
    let (python_version, python_compatible) = detect_python_version(project).await;
    let python_installed = python_version.is_some();
    let (git_installed, git_version) = detect_cli_tool("git", "--version").await;

    DetectionResult {
        os,
        msvc_installed,
        cmake_installed,
        cmake_path: cmake_path.map(|p| p.to_string_lossy().to_string()),
        cmake_version,
        python_installed,
        python_version,
        python_compatible,
        git_installed,
        git_version,
    }
}

/// CMake executable the setup downloads into the setup directory.
pub fn bundled_cmake_path(project: &Project) -> PathBuf {
    let version = &project.config.cmake_version;
    project
        .setup_dir()
        .join("CMake")
        .join(format!("cmake-{version}-windows-x86_64"))
        .join("bin")
        .join("cmake.exe")
}

/// Runs the verify script shipped with the project; success means a usable
/// MSVC toolchain is installed.
pub async fn detect_msvc(project: &Project) -> bool {
    let script = project.setup_script(VERIFY_BUILD_TOOLS);
    if !script.exists() {
        tracing::warn!("{} not found", script.display());
        return false;
    }
    let mut cmd = Command::new(&script);
    cmd.arg("nopause").current_dir(project.setup_dir());
    #[cfg(target_os = "windows")]
    cmd.creation_flags(0x08000000); // CREATE_NO_WINDOW
    match cmd.output().await {
        Ok(output) => output.status.success(),
        Err(e) => {
            tracing::debug!("{} failed to start: {e}", script.display());
            false
        }
    }
}

/// Prefers the bundled CMake, falling back to one on PATH.
async fn detect_cmake(project: &Project) -> (bool, Option<PathBuf>, Option<String>) {
    let bundled = bundled_cmake_path(project);
    if bundled.exists() {
        let (_, version) = detect_cli_tool(&bundled.to_string_lossy(), "--version").await;
        return (true, Some(bundled), version);
    }
    let (installed, version) = detect_cli_tool("cmake", "--version").await;
    (installed, installed.then(|| PathBuf::from("cmake")), version)
}

/// Installed interpreter version, and whether it meets the configured minimum.
pub async fn detect_python_version(project: &Project) -> (Option<String>, bool) {
    for candidate in PYTHON_CANDIDATES {
        let (installed, version) = detect_cli_tool(candidate, "--version").await;
        if installed {
            let compatible = is_compatible(version.as_deref(), &project.config.min_python_version);
            return (version, compatible);
        }
    }
    (None, false)
}

fn is_compatible(found: Option<&str>, minimum: &str) -> bool {
    found
        .and_then(parse_version)
        .is_some_and(|found| parse_version(minimum).is_some_and(|min| found >= min))
}

/// Runs `<tool> <arg>` and returns the first line it prints.
async fn detect_cli_tool(name: &str, arg: &str) -> (bool, Option<String>) {
    let mut cmd = Command::new(name);
    cmd.arg(arg);
    #[cfg(target_os = "windows")]
    cmd.creation_flags(0x08000000); // CREATE_NO_WINDOW

    match cmd.output().await {
        Ok(output) if output.status.success() => {
            // Older interpreters print their version on stderr
            let text = if output.stdout.is_empty() {
                String::from_utf8_lossy(&output.stderr).to_string()
            } else {
                String::from_utf8_lossy(&output.stdout).to_string()
            };
            let version = text.lines().next().map(|l| l.trim().to_string());
            (true, version.filter(|v| !v.is_empty()))
        }
        _ => (false, None),
    }
}

/// Extracts the first `major.minor[.patch]` from tool output such as
/// `Python 3.11.4` or `cmake version 3.31.4`.
pub fn parse_version(text: &str) -> Option<(u64, u64, u64)> {
    let token = text
        .split_whitespace()
        .map(|t| t.trim_start_matches('v'))
        .find(|t| t.chars().next().is_some_and(|c| c.is_ascii_digit()))?;
    let parts: Vec<u64> = token
        .splitn(3, '.')
        .map(|p| p.chars().take_while(char::is_ascii_digit).collect::<String>())
        .filter_map(|p| p.parse().ok())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some((
        parts.first().copied().unwrap_or(0),
        parts.get(1).copied().unwrap_or(0),
        parts.get(2).copied().unwrap_or(0),
    ))
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "missing"
    }
}

/// Human-readable summary of a detection run.
pub fn render(result: &DetectionResult) -> String {
    let mut lines = vec![format!("OS:       {}", result.os)];
    match result.msvc_installed {
        Some(installed) => lines.push(format!("MSVC:     {}", mark(installed))),
        None => lines.push("MSVC:     not checked on this platform".into()),
    }
    lines.push(format!(
        "CMake:    {}{}",
        mark(result.cmake_installed),
        result
            .cmake_version
            .as_deref()
            .map(|v| format!(" ({v})"))
            .unwrap_or_default()
    ));
    let python = match (&result.python_version, result.python_compatible) {
        (Some(v), true) => format!("ok ({v})"),
        (Some(v), false) => format!("too old ({v})"),
        (None, _) => mark(result.python_installed).to_string(),
    };
    lines.push(format!("Python:   {python}"));
    lines.push(format!(
        "git:      {}{}",
        mark(result.git_installed),
        result
            .git_version
            .as_deref()
            .map(|v| format!(" ({v})"))
            .unwrap_or_default()
    ));
    lines.join("\n")
}
