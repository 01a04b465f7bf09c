pub mod boilerplate;
pub mod build_list;
pub mod cli;
pub mod commands;
pub mod console;
pub mod error;
pub mod folders;
pub mod templates;
pub mod util;
pub mod validation;

use anyhow::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::cli::{BuildListAction, Cli, Commands, ConfigAction, DeeplinkAction, TemplatesAction};
use crate::commands::config::{self, Project, DEFAULT_CONFIG_FILE};
use crate::commands::install::{ConsoleReporter, SetupOptions};
use crate::commands::{detect, generate, install, registry, scaffold};
use crate::console::Console;
use crate::templates::TemplateStore;

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Logs go to stderr so they never interleave with prompts on stdout.
fn init_logging(verbose: u8) {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level(verbose))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let project = Project::open(&cli.root, cli.config.as_deref())
        .context("failed to load the tools config")?;
    tracing::debug!("project root {}", project.root.display());

    match cli.command {
        Commands::Setup {
            skip_deeplink,
            skip_submodules,
        } => {
            let options = SetupOptions {
                skip_deeplink,
                skip_submodules,
            };
            let mut console = Console::stdio();
            install::run_setup(&project, &mut console, &ConsoleReporter, &options).await?;
        }
        Commands::Detect { json } => {
            let result = detect::detect_environment(&project).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", detect::render(&result));
            }
        }
        Commands::Deeplink { action } => match action {
            DeeplinkAction::Install => {
                registry::install_deeplink(&project).await?;
                println!("Registered {}:// links", project.config.protocol);
            }
            DeeplinkAction::Uninstall => {
                registry::uninstall_deeplink(&project).await?;
                println!("Removed {}:// links", project.config.protocol);
            }
        },
        Commands::Regenerate => generate::regenerate(&project)?,
        Commands::BuildList { action } => match action {
            BuildListAction::Preview => print!("{}", generate::preview_build_list(&project)),
        },
        Commands::Scaffold { folder } => scaffold::run(&project, folder.as_deref())?,
        Commands::Templates { action } => {
            let store_path = project.template_store();
            match action {
                TemplatesAction::Create => {
                    let mut console = Console::stdio();
                    commands::templates::create_interactive(&mut console, &store_path)?;
                }
                TemplatesAction::List => {
                    let store = TemplateStore::load_or_builtin(&store_path)?;
                    for line in commands::templates::list(&store) {
                        println!("{line}");
                    }
                }
                TemplatesAction::Remove { name } => {
                    commands::templates::remove(&store_path, &name)?;
                    println!("Removed template \"{name}\"");
                }
                TemplatesAction::Init => {
                    commands::templates::init(&store_path)?;
                    println!("Wrote {}", store_path.display());
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Init => {
                let path = cli
                    .config
                    .clone()
                    .unwrap_or_else(|| project.root.join(DEFAULT_CONFIG_FILE));
                config::init_config(&path)?;
                println!("Wrote {}", path.display());
            }
            ConfigAction::Show => {
                println!("{}", serde_json::to_string_pretty(&project.config)?);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(0), "warn");
        assert_eq!(default_level(1), "info");
        assert_eq!(default_level(5), "debug");
    }
}
