use std::path::Path;

use crate::error::{Result, ToolsError};

/// In-memory copy of the hand-maintained build list (`CMakeLists.txt`).
///
/// Files are grouped in `set(<COLLECTION>` ... `)` blocks; new entries go on
/// the line right after the opening anchor.
#[derive(Clone, Debug)]
pub struct BuildList {
    name: String,
    lines: Vec<String>,
    line_ending: &'static str,
    trailing_newline: bool,
}

impl BuildList {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut list = Self::from_text(&text);
        list.name = path.display().to_string();
        Ok(list)
    }

    pub fn from_text(text: &str) -> Self {
        let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };
        let trailing_newline = text.ends_with('\n');
        let lines = text.lines().map(str::to_string).collect();
        Self {
            name: "build list".into(),
            lines,
            line_ending,
            trailing_newline,
        }
    }

    pub fn anchor(collection: &str) -> String {
        format!("set({collection}")
    }

    fn anchor_index(&self, collection: &str) -> Result<usize> {
        let anchor = Self::anchor(collection);
        self.lines
            .iter()
            .position(|line| line.trim_end() == anchor)
            .ok_or_else(|| ToolsError::AnchorNotFound {
                anchor,
                file: self.name.clone(),
            })
    }

    /// Inserts `\t<entry>` directly after the collection's anchor line.
    pub fn insert_entry(&mut self, collection: &str, entry: &str) -> Result<()> {
        let idx = self.anchor_index(collection)?;
        self.lines.insert(idx + 1, format!("\t{entry}"));
        Ok(())
    }

    /// Whether `entry` is already listed inside the collection's block.
    pub fn contains_entry(&self, collection: &str, entry: &str) -> bool {
        let Ok(idx) = self.anchor_index(collection) else {
            return false;
        };
        self.lines[idx + 1..]
            .iter()
            .map(|line| line.trim())
            .take_while(|line| !line.starts_with(')'))
            .any(|line| line == entry)
    }

    pub fn entries(&self, collection: &str) -> Vec<&str> {
        let Ok(idx) = self.anchor_index(collection) else {
            return Vec::new();
        };
        self.lines[idx + 1..]
            .iter()
            .map(|line| line.trim())
            .take_while(|line| !line.starts_with(')'))
            .filter(|line| !line.is_empty())
            .collect()
    }

    pub fn to_text(&self) -> String {
        let mut text = self.lines.join(self.line_ending);
        if self.trailing_newline {
            text.push_str(self.line_ending);
        }
        text
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_text())?;
        Ok(())
    }
}

/// One `set(...)` block of a generated build list.
#[derive(Clone, Debug)]
pub struct Section {
    pub heading: String,
    pub collection: String,
    pub entries: Vec<String>,
}

/// Fixed project header of a generated build list.
pub fn project_settings(project: &str) -> String {
    format!(
        r#"cmake_minimum_required (VERSION 3.31)

project ({project}
  DESCRIPTION "{project}"
  LANGUAGES CXX
  VERSION 1.0.0)

# option(BUILD_TEST_TEMPLATE "Ignore warnings related to TODOs" OFF)

# option(ENABLE_CODE_ANALYSIS "Use Static Code Analysis on build" OFF)

set_property(GLOBAL PROPERTY USE_FOLDERS ON)

set(CMAKE_CXX_STANDARD 20)
set(CMAKE_CXX_STANDARD_REQUIRED ON)
set(CMAKE_CXX_EXTENSIONS OFF)

set(CMAKE_ARCHIVE_OUTPUT_DIRECTORY "${{CMAKE_BINARY_DIR}}/lib")
set(CMAKE_LIBRARY_OUTPUT_DIRECTORY "${{CMAKE_BINARY_DIR}}/lib")
set(CMAKE_RUNTIME_OUTPUT_DIRECTORY "${{CMAKE_BINARY_DIR}}/bin")

set(COMMON_COMPILE_DEFINITIONS HV_PLATFORM_WINDOWS HV_DEBUG HV_ENABLE_ASSERTS _UNICODE UNICODE)
set(COMMON_COMPILE_OPTIONS /W4 /WX /MP /ZI /JMC /fp:fast /FC)
set(COMMON_LINK_OPTIONS /WX /SUBSYSTEM:WINDOWS)

"#
    )
}

pub fn section_divider(name: &str) -> String {
    format!("# ==================== {name} ====================\n")
}

/// Renders a full build list from scanned sections.
pub fn render_preview(project: &str, sections: &[Section]) -> String {
    let mut out = project_settings(project);
    for section in sections {
        out.push_str(&section_divider(&section.heading));
        out.push_str(&BuildList::anchor(&section.collection));
        out.push('\n');
        for entry in &section.entries {
            out.push('\t');
            out.push_str(entry);
            out.push('\n');
        }
        out.push_str(")\n\n");
    }
    out
}
