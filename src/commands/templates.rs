use std::io::{BufRead, Write};
use std::path::Path;

use crate::commands::scaffold::RESERVED_COMMANDS;
use crate::console::{Console, INPUT_PROMPT};
use crate::error::{Result, ToolsError};
use crate::templates::{
    extract_extension_and_contents, preview, replace_with_placeholder, FileType, Template,
    TemplateStore, FILE_NAME_PLACEHOLDER,
};
use crate::validation::validate_template_name;

/// Reads lines until an empty one. `None` when input ends first.
fn read_until_empty<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> Result<Option<Vec<String>>> {
    let mut lines = Vec::new();
    loop {
        match console.read_line(INPUT_PROMPT)? {
            None => return Ok(None),
            Some(line) if line.trim().is_empty() => return Ok(Some(lines)),
            Some(line) => lines.push(line.trim().to_string()),
        }
    }
}

/// Walks the user through extracting a template from existing files and
/// stores it. Returns whether the store was written.
pub fn create_interactive<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store_path: &Path,
) -> Result<bool> {
    let mut store = TemplateStore::load_or_builtin(store_path)?;

    console.blank()?;
    console.say(format!("Adding template to file: {}", store_path.display()))?;
    console.blank()?;
    console.say("Enter name for template. Recommended to use single word, e.g: \"node\"")?;
    let name = loop {
        let Some(name) = console.read_line(INPUT_PROMPT)? else {
            return Ok(false);
        };
        let name = name.trim().to_string();
        if name.is_empty() {
            console.error("must give a name")?;
        } else if !validate_template_name(&name, RESERVED_COMMANDS) {
            console.error(format!("\"{name}\" cannot be used as a command name"))?;
        } else {
            break name;
        }
    };

    console.blank()?;
    console.say("Provide a short description, e.g: \"Class-template for inheriting from Node\"")?;
    let Some(description) = console.read_line(INPUT_PROMPT)? else {
        return Ok(false);
    };

    console.blank()?;
    console.say("Enter full path of file to extract template from, e.g: \"c:/repos/Havtorn/File.h\"")?;
    console.say("\\ is automatically replaced by /")?;
    console.say("Multiple files can be added. Return to continue")?;
    let mut file_types: Vec<FileType> = Vec::new();
    loop {
        let Some(target) = console.read_line(INPUT_PROMPT)? else {
            return Ok(false);
        };
        if target.trim().is_empty() {
            break;
        }
        match extract_extension_and_contents(&target) {
            Ok((extension, content)) if !content.is_empty() => {
                file_types.retain(|ft| ft.extension != extension);
                file_types.push(FileType { extension, content });
            }
            Ok(_) => console.error(format!("\"{}\" is empty", target.trim()))?,
            Err(e) => console.error(e)?,
        }
    }
    if file_types.is_empty() {
        console.error("no files given, nothing to add")?;
        return Ok(false);
    }

    console.blank()?;
    console.say("Enter words that will be replaced with file name when template is used")?;
    console.say("Multiple can be added. Return to continue")?;
    let Some(words) = read_until_empty(console)? else {
        return Ok(false);
    };
    for file_type in &mut file_types {
        file_type.content = replace_with_placeholder(&words, &file_type.content);
    }

    let template = Template {
        description: description.trim().to_string(),
        file_types,
    };
    console.blank()?;
    console.say_raw(preview(&name, &template))?;

    console.say("\nProceed to add template to file? y = proceed, anything else = exit")?;
    let proceed = console.read_line(INPUT_PROMPT)?.unwrap_or_default();
    if !proceed.trim().to_lowercase().starts_with('y') {
        return Ok(false);
    }

    if store.upsert(&name, template).is_some() {
        tracing::info!("replaced existing template {name}");
    }
    store.save(store_path)?;
    console.say(format!(
        "Template \"{name}\" saved, use it with -{name} <folder/file> ({FILE_NAME_PLACEHOLDER} becomes the file name)"
    ))?;
    Ok(true)
}

/// One line per template: command, description and file types.
pub fn list(store: &TemplateStore) -> Vec<String> {
    store
        .iter()
        .map(|(name, template)| {
            let extensions: Vec<&str> = template.extensions().collect();
            format!(
                "-{name:<16}{} [{}]",
                template.description,
                extensions.join(", ")
            )
        })
        .collect()
}

pub fn remove(store_path: &Path, name: &str) -> Result<()> {
    let mut store = TemplateStore::load(store_path)?;
    if store.remove(name).is_none() {
        return Err(ToolsError::Custom(format!("no template named \"{name}\"")));
    }
    store.save(store_path)?;
    tracing::info!("removed template {name}");
    Ok(())
}

/// Writes the built-in templates unless a store already exists.
pub fn init(store_path: &Path) -> Result<()> {
    if store_path.exists() {
        return Err(ToolsError::Custom(format!(
            "{} already exists",
            store_path.display()
        )));
    }
    TemplateStore::builtin().save(store_path)
}
