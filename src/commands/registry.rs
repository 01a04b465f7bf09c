#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;

use crate::commands::config::Project;
use crate::error::{Result, ToolsError};

/// One string value written under the protocol's key tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryValue {
    pub key: String,
    /// `None` is the key's default value.
    pub name: Option<String>,
    pub data: String,
}

pub fn protocol_key(protocol: &str) -> String {
    format!(r"HKCU\Software\Classes\{protocol}")
}

/// Values that register `<protocol>://` links to open `launcher`.
pub fn protocol_entries(protocol: &str, launcher: &str) -> Vec<RegistryValue> {
    let base = protocol_key(protocol);
    vec![
        RegistryValue {
            key: base.clone(),
            name: None,
            data: format!("URL:{protocol}"),
        },
        RegistryValue {
            key: base.clone(),
            name: Some("URL Protocol".into()),
            data: String::new(),
        },
        RegistryValue {
            key: format!(r"{base}\DefaultIcon"),
            name: None,
            data: format!("\"{launcher}\",1"),
        },
        RegistryValue {
            key: format!(r"{base}\shell\open\command"),
            name: None,
            data: format!("\"{launcher}\" \"%1\""),
        },
    ]
}

/// Arguments to `reg.exe` that write `value`, overwriting without asking.
pub fn reg_add_args(value: &RegistryValue) -> Vec<String> {
    let mut args = vec!["add".to_string(), value.key.clone()];
    match &value.name {
        Some(name) => {
            args.push("/v".into());
            args.push(name.clone());
        }
        None => args.push("/ve".into()),
    }
    args.extend([
        "/t".into(),
        "REG_SZ".into(),
        "/d".into(),
        value.data.clone(),
        "/f".into(),
    ]);
    args
}

async fn run_reg(args: &[String]) -> Result<()> {
    let mut cmd = tokio::process::Command::new("reg");
    cmd.args(args);
    #[cfg(target_os = "windows")]
    cmd.creation_flags(0x08000000); // CREATE_NO_WINDOW
    let output = cmd.output().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ToolsError::Custom(format!(
            "reg {} failed: {}",
            args.first().map(String::as_str).unwrap_or_default(),
            stderr.trim()
        )));
    }
    Ok(())
}

/// Registers the engine's URL protocol so deep links open the editor.
pub async fn install_deeplink(project: &Project) -> Result<()> {
    if !cfg!(target_os = "windows") {
        return Err(ToolsError::Unsupported("URL protocol registration".into()));
    }

    let launcher = std::path::absolute(project.launcher())?;
    let launcher = launcher.to_string_lossy();
    if !project.launcher().exists() {
        tracing::warn!("{launcher} does not exist yet, registering anyway");
    }

    for value in protocol_entries(&project.config.protocol, &launcher) {
        tracing::debug!("writing {} {:?}", value.key, value.name);
        run_reg(&reg_add_args(&value)).await?;
    }
    tracing::info!("registered {}:// protocol", project.config.protocol);
    Ok(())
}

/// Removes the protocol's key tree.
pub async fn uninstall_deeplink(project: &Project) -> Result<()> {
    if !cfg!(target_os = "windows") {
        return Err(ToolsError::Unsupported("URL protocol registration".into()));
    }
    let key = protocol_key(&project.config.protocol);
    run_reg(&["delete".to_string(), key, "/f".to_string()]).await
}
