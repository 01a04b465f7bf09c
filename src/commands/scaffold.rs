use regex::Regex;
use std::io::{BufRead, Write};
use std::sync::LazyLock;

use crate::boilerplate::{companion_extension, Boilerplate};
use crate::build_list::BuildList;
use crate::commands::config::Project;
use crate::commands::generate::{Regenerate, SetupScript, GENERATE_PROJECT_FILES};
use crate::console::{Console, INPUT_PROMPT};
use crate::error::{Result, ToolsError};
use crate::folders::MainFolder;
use crate::templates::TemplateStore;
use crate::util::forward_slashes;
use crate::validation::{split_file_name, validate_directory_name, validate_file_name};

pub const CMD_ADD_FILE: &str = "-f";
pub const CMD_ADD_SINGLE: &str = "-sf";
pub const CMD_UNDO: &str = "-u";
pub const CMD_SWITCH_FOLDER: &str = "-m";
pub const CMD_EXIT: &str = "-e";
pub const CMD_GENERATE: &str = "-g";

/// Command names a template may not take.
pub const RESERVED_COMMANDS: &[&str] = &["f", "sf", "u", "m", "e", "g"];

static INDICES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// Where a pending file's content comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileSource {
    Boilerplate,
    Template(String),
}

/// A file queued for creation. `path` is relative to the source directory
/// and already carries the main folder prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingFile {
    pub folder: MainFolder,
    pub source: FileSource,
    pub path: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScaffoldCommand {
    Generate,
    Exit,
    SwitchFolder,
    AddFile { path: String, companion: bool },
    AddFromTemplate { template: String, path: String },
    /// 1-based indices as shown to the user.
    Undo(Vec<usize>),
    Invalid(String),
}

/// Parses one line of scaffold input.
pub fn parse_command(input: &str, templates: &TemplateStore) -> ScaffoldCommand {
    let input = input.trim();
    match input {
        "" | CMD_GENERATE => return ScaffoldCommand::Generate,
        CMD_EXIT => return ScaffoldCommand::Exit,
        CMD_SWITCH_FOLDER => return ScaffoldCommand::SwitchFolder,
        _ => {}
    }

    let Some((command, args)) = input.split_once(char::is_whitespace) else {
        return ScaffoldCommand::Invalid(
            "Error processing input, expected: -<command> <folder/file>".into(),
        );
    };
    let args = args.trim();

    match command {
        CMD_ADD_FILE => ScaffoldCommand::AddFile {
            path: args.to_string(),
            companion: true,
        },
        CMD_ADD_SINGLE => ScaffoldCommand::AddFile {
            path: args.to_string(),
            companion: false,
        },
        CMD_UNDO => ScaffoldCommand::Undo(
            INDICES
                .find_iter(args)
                .filter_map(|m| m.as_str().parse().ok())
                .collect(),
        ),
        _ => match command.strip_prefix('-') {
            Some(name) if templates.get(name).is_some() => ScaffoldCommand::AddFromTemplate {
                template: name.to_string(),
                path: args.to_string(),
            },
            _ => ScaffoldCommand::Invalid(format!("unknown command \"{command}\"")),
        },
    }
}

/// Outcome of flushing the pending list to disk.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub created: Vec<String>,
    pub already_existing: Vec<String>,
    pub listed: Vec<String>,
    pub not_listed: Vec<(String, String)>,
    pub regenerate_error: Option<String>,
}

/// Splits `a/b/File.ext` into its validated folder parts and file name.
fn split_folders(path: &str) -> Result<(Vec<&str>, &str)> {
    let mut parts: Vec<&str> = path.split('/').collect();
    let file = parts.pop().unwrap_or_default();
    if let Some(bad) = parts.iter().find(|p| !validate_directory_name(p)) {
        return Err(ToolsError::InvalidName(bad.to_string()));
    }
    Ok((parts, file))
}

fn join_path(folders: &[&str], file: &str) -> String {
    if folders.is_empty() {
        file.to_string()
    } else {
        format!("{}/{file}", folders.join("/"))
    }
}

/// State of one scaffolding session.
pub struct Scaffolder<'a, G: Regenerate> {
    project: &'a Project,
    templates: TemplateStore,
    boilerplate: Boilerplate,
    regenerator: G,
    folder: MainFolder,
    pending: Vec<PendingFile>,
}

impl<'a, G: Regenerate> Scaffolder<'a, G> {
    pub fn new(project: &'a Project, templates: TemplateStore, regenerator: G) -> Self {
        Self {
            project,
            templates,
            boilerplate: project.boilerplate(),
            regenerator,
            folder: MainFolder::Core,
            pending: Vec::new(),
        }
    }

    pub fn folder(&self) -> MainFolder {
        self.folder
    }

    pub fn set_folder(&mut self, folder: MainFolder) {
        self.folder = folder;
    }

    pub fn pending(&self) -> &[PendingFile] {
        &self.pending
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    fn is_pending(&self, path: &str) -> bool {
        self.pending.iter().any(|p| p.path == path)
    }

    fn queue(&mut self, source: FileSource, path: String) {
        tracing::debug!("queued {path}");
        self.pending.push(PendingFile {
            folder: self.folder,
            source,
            path,
        });
    }

    /// Queues `input` (which must carry an extension) under the current main
    /// folder, plus its header/source companion when `with_companion` is set.
    pub fn add_file(&mut self, input: &str, with_companion: bool) -> Result<()> {
        let input = forward_slashes(input.trim());
        if input.is_empty() {
            return Err(ToolsError::Custom("no file given".into()));
        }

        let (folders, file) = split_folders(&input)?;
        let (_, extension) = split_file_name(file)?;

        let relative = self.folder.apply_suffix(&join_path(&folders, file));
        let path = format!("{}{relative}", self.folder.path());
        if self.is_pending(&path) {
            return Err(ToolsError::Custom(format!("trying to add duplicate {input}")));
        }
        self.queue(FileSource::Boilerplate, path.clone());

        if with_companion {
            if let Some(companion_ext) = companion_extension(extension) {
                let base = path.rsplit_once('.').map_or(path.as_str(), |(base, _)| base);
                let companion = format!("{base}.{companion_ext}");
                if !self.is_pending(&companion) {
                    self.queue(FileSource::Boilerplate, companion);
                }
            }
        }
        Ok(())
    }

    /// Queues one file per file type of `template`. Any extension typed by
    /// the user is dropped. Returns the paths skipped as duplicates.
    pub fn add_from_template(&mut self, input: &str, template: &str) -> Result<Vec<String>> {
        let extensions: Vec<String> = self
            .templates
            .get(template)
            .ok_or_else(|| ToolsError::Custom(format!("unknown template \"{template}\"")))?
            .extensions()
            .map(str::to_string)
            .collect();

        let input = forward_slashes(input.trim());
        if input.is_empty() {
            return Err(ToolsError::Custom("no file given".into()));
        }

        let (folders, file) = split_folders(&input)?;
        let stem = file.split('.').next().unwrap_or_default();
        if !validate_file_name(stem) {
            return Err(ToolsError::InvalidName(stem.to_string()));
        }

        let relative = self.folder.apply_suffix(&join_path(&folders, stem));
        let base = format!("{}{relative}", self.folder.path());

        let mut duplicates = Vec::new();
        for extension in extensions {
            let path = format!("{base}.{extension}");
            if self.is_pending(&path) {
                duplicates.push(path);
                continue;
            }
            self.queue(FileSource::Template(template.to_string()), path);
        }
        Ok(duplicates)
    }

    /// Removes entries by their 1-based display index. Out-of-range indices
    /// are ignored.
    pub fn undo(&mut self, indices: &[usize]) -> Vec<PendingFile> {
        let mut targets: Vec<usize> = indices
            .iter()
            .filter(|&&i| i >= 1 && i <= self.pending.len())
            .map(|i| i - 1)
            .collect();
        targets.sort_unstable();
        targets.dedup();

        let mut removed: Vec<PendingFile> = targets
            .into_iter()
            .rev()
            .map(|i| self.pending.remove(i))
            .collect();
        removed.reverse();
        removed
    }

    fn content_for(&self, file: &PendingFile) -> String {
        let file_name = file.path.rsplit('/').next().unwrap_or(&file.path);
        let (stem, extension) = file_name.split_once('.').unwrap_or((file_name, ""));
        match &file.source {
            FileSource::Boilerplate => self.boilerplate.render(stem, extension),
            FileSource::Template(name) => match self.templates.get(name) {
                Some(template) => self.boilerplate.render_template(template, stem, extension),
                None => self.boilerplate.license_header(extension),
            },
        }
    }

    /// Creates the pending files, lists them in the build list, regenerates
    /// the project files and clears the pending list.
    ///
    /// The build list is loaded before anything is written, so a missing
    /// build list leaves the disk untouched.
    pub fn generate(&mut self) -> Result<GenerateReport> {
        let build_list_path = self.project.build_list();
        let mut build_list = BuildList::load(&build_list_path).map_err(|e| {
            ToolsError::Custom(format!(
                "Cannot read build list {}: {e}",
                build_list_path.display()
            ))
        })?;
        let source_dir = self.project.source_dir();
        let mut report = GenerateReport::default();

        for file in &self.pending {
            let target = source_dir.join(&file.path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let created = std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target);
            match created {
                Ok(mut handle) => {
                    handle.write_all(self.content_for(file).as_bytes())?;
                    tracing::info!("created {}", target.display());
                    report.created.push(file.path.clone());
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    report.already_existing.push(file.path.clone());
                }
                Err(e) => return Err(e.into()),
            }
        }

        for file in &self.pending {
            let collection = file.folder.collection();
            if build_list.contains_entry(collection, &file.path) {
                continue;
            }
            match build_list.insert_entry(collection, &file.path) {
                Ok(()) => report.listed.push(file.path.clone()),
                Err(e) => report.not_listed.push((file.path.clone(), e.to_string())),
            }
        }
        build_list.save(&build_list_path)?;

        if let Err(e) = self.regenerator.regenerate() {
            tracing::warn!("regeneration failed: {e}");
            report.regenerate_error = Some(e.to_string());
        }

        self.pending.clear();
        Ok(report)
    }
}

/// How an interactive session ended.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Generated,
    Exited,
}

fn print_folders<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<()> {
    console.blank()?;
    console.say("Pick a main folder:")?;
    for folder in MainFolder::ALL {
        let aliases = folder.aliases();
        if aliases.is_empty() {
            console.say(format!("  {folder}"))?;
        } else {
            console.say(format!("  {folder:<20}alt: {}", aliases.join(", ")))?;
        }
    }
    console.blank()
}

/// Prompts until a valid main folder is picked. `None` on end of input.
pub fn select_main_folder<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> Result<Option<MainFolder>> {
    print_folders(console)?;
    loop {
        let Some(choice) = console.read_line(INPUT_PROMPT)? else {
            return Ok(None);
        };
        match MainFolder::parse(&choice) {
            Some(folder) => return Ok(Some(folder)),
            None => console.error(format!("invalid option \"{choice}\""))?,
        }
    }
}

fn print_options<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    templates: &TemplateStore,
) -> Result<()> {
    console.blank()?;
    console.say(" Run command to add folder(s) & file, example: \"-<command> F1/f2/File\"")?;
    console.say(" Commands:")?;
    console.say(format!(
        "  {CMD_ADD_FILE} add a file and its header/source counterpart, e.g: \"{CMD_ADD_FILE} F1/f2/File.h\""
    ))?;
    console.say(format!("  {CMD_ADD_SINGLE} same as {CMD_ADD_FILE} without the counterpart"))?;
    console.say(format!("  {CMD_UNDO} to undo, example: {CMD_UNDO} 1 3"))?;
    console.say(format!("  {CMD_SWITCH_FOLDER} to change main folder"))?;
    console.say(format!("  {CMD_EXIT} close without generating"))?;
    if !templates.is_empty() {
        console.say(" Commands with templates:")?;
        for (name, template) in templates.iter() {
            console.say(format!("  -{name} {}", template.description))?;
        }
    }
    console.say(" Run `hvtools templates create` to add new template(s)")?;
    console.blank()?;
    console.say(format!("  Return/ empty input or {CMD_GENERATE} to continue with generation"))
}

fn print_status<R: BufRead, W: Write, G: Regenerate>(
    console: &mut Console<R, W>,
    scaffolder: &Scaffolder<'_, G>,
) -> Result<()> {
    console.blank()?;
    let folder = scaffolder.folder();
    console.say(format!("Main folder: {folder} - {}", folder.path()))?;
    console.say("Files:")?;
    for (i, file) in scaffolder.pending().iter().enumerate() {
        console.say(format!("+ [{}] {}", i + 1, file.path))?;
    }
    Ok(())
}

fn print_report<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    report: &GenerateReport,
) -> Result<()> {
    for path in &report.created {
        console.say(format!("> File \"{path}\" created"))?;
    }
    for path in &report.already_existing {
        console.error(format!("\"{path}\" already exists"))?;
    }
    for (path, reason) in &report.not_listed {
        console.error(format!("\"{path}\" not added to build list: {reason}"))?;
    }
    match &report.regenerate_error {
        Some(e) => console.error(format!("project regeneration failed: {e}"))?,
        None => console.say("\nProject regenerated")?,
    }
    Ok(())
}

/// Runs the command loop until the user generates or exits.
pub fn run_session<R: BufRead, W: Write, G: Regenerate>(
    console: &mut Console<R, W>,
    scaffolder: &mut Scaffolder<'_, G>,
) -> Result<SessionEnd> {
    loop {
        print_options(console, scaffolder.templates())?;
        print_status(console, scaffolder)?;

        let Some(input) = console.read_line(INPUT_PROMPT)? else {
            return Ok(SessionEnd::Exited);
        };

        match parse_command(&input, scaffolder.templates()) {
            ScaffoldCommand::Generate => {
                if scaffolder.pending().is_empty() {
                    console.say("Nothing to generate")?;
                    return Ok(SessionEnd::Exited);
                }
                match scaffolder.generate() {
                    Ok(report) => {
                        print_report(console, &report)?;
                        console.blank()?;
                        return Ok(SessionEnd::Generated);
                    }
                    Err(e) => console.error(e)?,
                }
            }
            ScaffoldCommand::Exit => return Ok(SessionEnd::Exited),
            ScaffoldCommand::SwitchFolder => match select_main_folder(console)? {
                Some(folder) => scaffolder.set_folder(folder),
                None => return Ok(SessionEnd::Exited),
            },
            ScaffoldCommand::AddFile { path, companion } => {
                if let Err(e) = scaffolder.add_file(&path, companion) {
                    console.error(e)?;
                }
            }
            ScaffoldCommand::AddFromTemplate { template, path } => {
                match scaffolder.add_from_template(&path, &template) {
                    Ok(duplicates) => {
                        for duplicate in duplicates {
                            console.error(format!("trying to add duplicate {duplicate}"))?;
                        }
                    }
                    Err(e) => console.error(e)?,
                }
            }
            ScaffoldCommand::Undo(indices) => {
                scaffolder.undo(&indices);
            }
            ScaffoldCommand::Invalid(message) => console.error(message)?,
        }
    }
}

/// Entry point of `hvtools scaffold`.
pub fn run(project: &Project, folder: Option<&str>) -> Result<()> {
    let mut console = Console::stdio();
    let templates = TemplateStore::load_or_builtin(&project.template_store())?;
    let regenerator = SetupScript::new(project, GENERATE_PROJECT_FILES);
    let mut scaffolder = Scaffolder::new(project, templates, regenerator);

    console.say("-- File Creation Utility --")?;
    let preset = match folder {
        Some(name) => Some(
            MainFolder::parse(name)
                .ok_or_else(|| ToolsError::Custom(format!("unknown main folder \"{name}\"")))?,
        ),
        None => None,
    };
    let folder = match preset {
        Some(folder) => folder,
        None => match select_main_folder(&mut console)? {
            Some(folder) => folder,
            None => return Ok(()),
        },
    };
    scaffolder.set_folder(folder);

    console.blank()?;
    console.say("Add any number of files and then generate")?;
    let end = run_session(&mut console, &mut scaffolder)?;
    tracing::debug!("scaffold session ended: {end:?}");
    console.say("Closing ...")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::config::ToolsConfig;
    use crate::templates::{FileType, Template};
    use std::cell::Cell;
    use std::io::Cursor;
    use std::path::Path;

    const BUILD_LIST: &str = "set(CORE_FILES\n\tCore/Core.h\n)\n\nset(GAME_FILES\n)\n\nset(VERTEX_SHADERS\n)\n";

    #[derive(Default)]
    struct CountingRegenerator {
        calls: Cell<usize>,
    }

    impl Regenerate for &CountingRegenerator {
        fn regenerate(&self) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    struct FailingRegenerator;

    impl Regenerate for FailingRegenerator {
        fn regenerate(&self) -> Result<()> {
            Err(ToolsError::Custom("script missing".into()))
        }
    }

    fn project(root: &Path) -> Project {
        let source = root.join("Source");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(source.join("CMakeLists.txt"), BUILD_LIST).unwrap();
        Project::with_config(root, ToolsConfig::default())
    }

    fn store() -> TemplateStore {
        let mut store = TemplateStore::builtin();
        store.upsert(
            "system",
            Template {
                description: "ECS system".into(),
                file_types: vec![FileType {
                    extension: "h".into(),
                    content: "struct {{fileName}};\n".into(),
                }],
            },
        );
        store
    }

    fn paths<G: Regenerate>(s: &Scaffolder<'_, G>) -> Vec<String> {
        s.pending().iter().map(|p| p.path.clone()).collect()
    }

    #[test]
    fn test_parse_commands() {
        let t = store();
        assert_eq!(parse_command("", &t), ScaffoldCommand::Generate);
        assert_eq!(parse_command(" -g ", &t), ScaffoldCommand::Generate);
        assert_eq!(parse_command("-e", &t), ScaffoldCommand::Exit);
        assert_eq!(parse_command("-m", &t), ScaffoldCommand::SwitchFolder);
        assert_eq!(
            parse_command("-f Ghosty/GhostyNode.h", &t),
            ScaffoldCommand::AddFile {
                path: "Ghosty/GhostyNode.h".into(),
                companion: true
            }
        );
        assert_eq!(
            parse_command("-sf  A.h", &t),
            ScaffoldCommand::AddFile {
                path: "A.h".into(),
                companion: false
            }
        );
        assert_eq!(parse_command("-u 1, 3", &t), ScaffoldCommand::Undo(vec![1, 3]));
        assert_eq!(parse_command("-u x", &t), ScaffoldCommand::Undo(vec![]));
        assert_eq!(
            parse_command("-node HexRune/TimerNode", &t),
            ScaffoldCommand::AddFromTemplate {
                template: "node".into(),
                path: "HexRune/TimerNode".into()
            }
        );
        assert!(matches!(parse_command("-f", &t), ScaffoldCommand::Invalid(_)));
        assert!(matches!(parse_command("-nope X", &t), ScaffoldCommand::Invalid(_)));
        assert!(matches!(parse_command("hello world", &t), ScaffoldCommand::Invalid(_)));
    }

    #[test]
    fn test_add_file_with_companion() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let mut s = Scaffolder::new(&project, store(), FailingRegenerator);
        s.set_folder(MainFolder::Game);

        s.add_file(r"Ghosty\GhostyNode.cpp", true).unwrap();
        assert_eq!(paths(&s), vec!["Game/Ghosty/GhostyNode.cpp", "Game/Ghosty/GhostyNode.h"]);

        // The header is already queued as a companion.
        let err = s.add_file("Ghosty/GhostyNode.h", true).unwrap_err();
        assert!(err.to_string().contains("duplicate"));

        s.add_file("Readme.txt", true).unwrap();
        assert_eq!(s.pending().len(), 3);
    }

    #[test]
    fn test_add_single_file_and_validation() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let mut s = Scaffolder::new(&project, store(), FailingRegenerator);

        s.add_file("Math/Vector.h", false).unwrap();
        assert_eq!(paths(&s), vec!["Core/Math/Vector.h"]);

        assert!(matches!(s.add_file("Bad Dir/A.h", true), Err(ToolsError::InvalidName(_))));
        assert!(matches!(s.add_file(".git/A.h", true), Err(ToolsError::InvalidName(_))));
        assert!(matches!(s.add_file("A", true), Err(ToolsError::UnsupportedExtension(_))));
        assert!(matches!(s.add_file("A.exe", true), Err(ToolsError::UnsupportedExtension(_))));
        assert!(s.add_file("   ", true).is_err());
        assert_eq!(s.pending().len(), 1);
    }

    #[test]
    fn test_shader_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let mut s = Scaffolder::new(&project, store(), FailingRegenerator);
        s.set_folder(MainFolder::VertexShaders);

        s.add_file("Sky.hlsl", true).unwrap();
        s.add_file("Post/Fullscreen_VS.hlsl", true).unwrap();
        assert_eq!(
            paths(&s),
            vec![
                "Engine/Graphics/Shaders/Sky_VS.hlsl",
                "Engine/Graphics/Shaders/Post/Fullscreen_VS.hlsl"
            ]
        );
    }

    #[test]
    fn test_add_from_template() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let mut s = Scaffolder::new(&project, store(), FailingRegenerator);
        s.set_folder(MainFolder::Game);

        let dups = s.add_from_template("HexRune/TimerNode.cpp", "node").unwrap();
        assert!(dups.is_empty());
        assert_eq!(paths(&s), vec!["Game/HexRune/TimerNode.h", "Game/HexRune/TimerNode.cpp"]);
        assert!(s
            .pending()
            .iter()
            .all(|p| p.source == FileSource::Template("node".into())));

        let dups = s.add_from_template("HexRune/TimerNode", "system").unwrap();
        assert_eq!(dups, vec!["Game/HexRune/TimerNode.h"]);
        assert_eq!(s.pending().len(), 2);

        assert!(s.add_from_template("X", "missing").is_err());
        assert!(s.add_from_template("con", "node").is_err());
    }

    #[test]
    fn test_undo_by_display_index() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let mut s = Scaffolder::new(&project, store(), FailingRegenerator);
        for name in ["A.h", "B.h", "C.h", "D.h"] {
            s.add_file(name, false).unwrap();
        }

        let removed = s.undo(&[4, 2, 2, 9, 0]);
        assert_eq!(removed.len(), 2);
        assert_eq!(paths(&s), vec!["Core/A.h", "Core/C.h"]);
        assert!(s.undo(&[]).is_empty());
    }

    #[test]
    fn test_generate_creates_files_and_lists_them() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let regen = CountingRegenerator::default();
        let mut s = Scaffolder::new(&project, store(), &regen);
        s.set_folder(MainFolder::Game);
        s.add_file("Ghosty/GhostySystem.h", true).unwrap();
        s.add_from_template("HexRune/TimerNode", "node").unwrap();

        let report = s.generate().unwrap();
        assert_eq!(report.created.len(), 4);
        assert_eq!(report.listed.len(), 4);
        assert!(report.regenerate_error.is_none());
        assert_eq!(regen.calls.get(), 1);
        assert!(s.pending().is_empty());

        let source = dir.path().join("Source");
        let header = std::fs::read_to_string(source.join("Game/Ghosty/GhostySystem.h")).unwrap();
        assert!(header.starts_with("// Copyright 2025 Team Havtorn. All Rights Reserved.\n\n#pragma once\n"));
        let cpp = std::fs::read_to_string(source.join("Game/Ghosty/GhostySystem.cpp")).unwrap();
        assert!(cpp.contains("#include \"GhostySystem.h\"\n\nnamespace Havtorn\n{"));
        let node = std::fs::read_to_string(source.join("Game/HexRune/TimerNode.cpp")).unwrap();
        assert!(node.contains("TimerNode::TimerNode(const U64 id"));

        let list = BuildList::load(&source.join("CMakeLists.txt")).unwrap();
        let entries = list.entries("GAME_FILES");
        assert_eq!(entries.len(), 4);
        assert!(entries.contains(&"Game/HexRune/TimerNode.h"));
        assert_eq!(list.entries("CORE_FILES"), vec!["Core/Core.h"]);
    }

    #[test]
    fn test_generate_keeps_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let existing = dir.path().join("Source/Core/Core.h");
        std::fs::create_dir_all(existing.parent().unwrap()).unwrap();
        std::fs::write(&existing, "keep me").unwrap();

        let mut s = Scaffolder::new(&project, store(), FailingRegenerator);
        s.add_file("Core.h", false).unwrap();
        s.set_folder(MainFolder::Editor);
        s.add_file("Panel.h", false).unwrap();

        let report = s.generate().unwrap();
        assert_eq!(report.already_existing, vec!["Core/Core.h"]);
        assert_eq!(report.created, vec!["Editor/Panel.h"]);
        // Already listed, and no EDITOR_FILES anchor in the list.
        assert!(report.listed.is_empty());
        assert_eq!(report.not_listed.len(), 1);
        assert_eq!(report.regenerate_error.as_deref(), Some("script missing"));
        assert_eq!(std::fs::read_to_string(&existing).unwrap(), "keep me");
    }

    #[test]
    fn test_generate_without_build_list_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::with_config(dir.path(), ToolsConfig::default());
        let mut s = Scaffolder::new(&project, store(), FailingRegenerator);
        s.add_file("Lonely.h", false).unwrap();

        assert!(s.generate().is_err());
        assert!(!dir.path().join("Source/Core/Lonely.h").exists());
        assert_eq!(s.pending().len(), 1);
    }

    #[test]
    fn test_interactive_session() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let regen = CountingRegenerator::default();
        let mut s = Scaffolder::new(&project, store(), &regen);

        let input = "-f Bad Name.h\n-f Math/Quat.h\n-u 2\n-m\nnowhere\ngame\n-sf Scene.cpp\n\n";
        let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let end = run_session(&mut console, &mut s).unwrap();
        assert_eq!(end, SessionEnd::Generated);
        assert_eq!(regen.calls.get(), 1);

        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("<!> \"Bad Name.h\" contains invalid characters"));
        assert!(out.contains("+ [2] Core/Math/Quat.cpp"));
        assert!(out.contains("<!> invalid option \"nowhere\""));
        assert!(out.contains("Main folder: Game - Game/"));
        assert!(out.contains("> File \"Game/Scene.cpp\" created"));
        let created = out.find("> File \"Game/Scene.cpp\" created").unwrap();
        assert!(out[created..].contains("\nProject regenerated"));

        let source = dir.path().join("Source");
        assert!(source.join("Core/Math/Quat.h").exists());
        assert!(!source.join("Core/Math/Quat.cpp").exists());
        assert!(source.join("Game/Scene.cpp").exists());
    }

    #[test]
    fn test_session_exit_and_eof() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let mut s = Scaffolder::new(&project, store(), FailingRegenerator);

        let mut console = Console::new(Cursor::new(b"-f A.h\n-e\n".to_vec()), Vec::new());
        assert_eq!(run_session(&mut console, &mut s).unwrap(), SessionEnd::Exited);
        assert!(!dir.path().join("Source/Core/A.h").exists());

        let mut console = Console::new(Cursor::new(Vec::new()), Vec::new());
        assert_eq!(run_session(&mut console, &mut s).unwrap(), SessionEnd::Exited);
    }
}
