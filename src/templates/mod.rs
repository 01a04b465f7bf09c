pub mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Result, ToolsError};
use crate::util::forward_slashes;

/// Replaced with the file stem when a template is applied.
pub const FILE_NAME_PLACEHOLDER: &str = "{{fileName}}";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileType {
    pub extension: String,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub description: String,
    pub file_types: Vec<FileType>,
}

impl Template {
    pub fn content_for(&self, extension: &str) -> Option<&str> {
        self.file_types
            .iter()
            .find(|ft| ft.extension.eq_ignore_ascii_case(extension))
            .map(|ft| ft.content.as_str())
    }

    /// Template content for `extension` with the placeholder replaced by
    /// `file_stem`.
    pub fn render(&self, extension: &str, file_stem: &str) -> Option<String> {
        self.content_for(extension)
            .map(|content| content.replace(FILE_NAME_PLACEHOLDER, file_stem))
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.file_types.iter().map(|ft| ft.extension.as_str())
    }
}

/// JSON store mapping template names to their description and file types.
///
/// ```json
/// {
///     "node": {
///         "description": "...",
///         "fileTypes": [ { "extension": "h", "content": "..." } ]
///     }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateStore {
    templates: BTreeMap<String, Template>,
}

impl TemplateStore {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Loads the store, falling back to the built-in templates when the file
    /// does not exist.
    pub fn load_or_builtin(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(
                "template store {} not found, using built-in templates",
                path.display()
            );
            Ok(Self::builtin())
        }
    }

    /// Writes the store with 4-space indentation.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        buf.push(b'\n');
        std::fs::write(path, buf)?;
        Ok(())
    }

    pub fn builtin() -> Self {
        let mut store = Self::default();
        store.upsert(
            "node",
            Template {
                description: "Class-template for inheriting from SNode".into(),
                file_types: vec![
                    FileType {
                        extension: "h".into(),
                        content: builtin::node_header().into(),
                    },
                    FileType {
                        extension: "cpp".into(),
                        content: builtin::node_source().into(),
                    },
                ],
            },
        );
        store.upsert(
            "class",
            Template {
                description: "Empty class with header and source".into(),
                file_types: vec![
                    FileType {
                        extension: "h".into(),
                        content: builtin::class_header().into(),
                    },
                    FileType {
                        extension: "cpp".into(),
                        content: builtin::class_source().into(),
                    },
                ],
            },
        );
        store
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Inserts or replaces `name`; returns the previous template if any.
    pub fn upsert(&mut self, name: &str, template: Template) -> Option<Template> {
        self.templates.insert(name.to_string(), template)
    }

    pub fn remove(&mut self, name: &str) -> Option<Template> {
        self.templates.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Template)> {
        self.templates.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Reads a file to build a template from. The file name must carry exactly
/// one extension, which becomes the template's file type.
pub fn extract_extension_and_contents(path: &str) -> Result<(String, String)> {
    let path = forward_slashes(path.trim());
    let file_name = path.rsplit('/').next().unwrap_or_default();

    let mut parts = file_name.split('.');
    let extension = match (parts.next(), parts.next(), parts.next()) {
        (Some(stem), Some(ext), None) if !stem.is_empty() && !ext.is_empty() => ext.to_string(),
        _ => return Err(ToolsError::Custom(format!("Incompatible file \"{path}\""))),
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ToolsError::Custom(format!("File \"{path}\" does not exist")),
        _ => ToolsError::Io(e),
    })?;
    Ok((extension, contents))
}

/// Replaces every occurrence of each word with the file-name placeholder.
pub fn replace_with_placeholder(words: &[String], contents: &str) -> String {
    words
        .iter()
        .filter(|word| !word.is_empty())
        .fold(contents.to_string(), |acc, word| {
            acc.replace(word.as_str(), FILE_NAME_PLACEHOLDER)
        })
}

/// Preview text shown before a new template is stored.
pub fn preview(name: &str, template: &Template) -> String {
    let mut out = String::from("----- Preview -----\n");
    out.push_str(&format!("{name} - {}\n", template.description));
    for file_type in &template.file_types {
        out.push_str(&format!("--- .{} ---\n", file_type.extension));
        out.push_str(&file_type.content);
        if !file_type.content.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Template {
        Template {
            description: "test".into(),
            file_types: vec![
                FileType {
                    extension: "h".into(),
                    content: "struct {{fileName}} {};\n".into(),
                },
                FileType {
                    extension: "cpp".into(),
                    content: "#include \"{{fileName}}.h\"\n".into(),
                },
            ],
        }
    }

    #[test]
    fn test_render_substitutes_stem() {
        let t = sample();
        assert_eq!(t.render("h", "TimerNode").unwrap(), "struct TimerNode {};\n");
        assert_eq!(t.render("CPP", "TimerNode").unwrap(), "#include \"TimerNode.h\"\n");
        assert!(t.render("hlsl", "TimerNode").is_none());
    }

    #[test]
    fn test_builtin_templates() {
        let store = TemplateStore::builtin();
        let names: Vec<_> = store.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["class", "node"]);
        let node = store.get("node").unwrap();
        assert_eq!(node.extensions().collect::<Vec<_>>(), vec!["h", "cpp"]);
        assert!(node.render("h", "GhostyNode").unwrap().contains("struct GhostyNode : public SNode"));
    }

    #[test]
    fn test_json_layout_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("FileTemplates.json");

        let mut store = TemplateStore::default();
        store.upsert("thing", sample());
        store.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"thing\": {\n        \"description\": \"test\",\n        \"fileTypes\": ["));
        assert_eq!(TemplateStore::load(&path).unwrap(), store);
    }

    #[test]
    fn test_load_existing_foreign_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("FileTemplates.json");
        std::fs::write(
            &path,
            r#"{"system": {"description": "ECS system", "fileTypes": [{"extension": "h", "content": "x"}]}}"#,
        )
        .unwrap();
        let store = TemplateStore::load_or_builtin(&path).unwrap();
        assert_eq!(store.get("system").unwrap().description, "ECS system");
        assert!(store.get("node").is_none());

        let missing = TemplateStore::load_or_builtin(&dir.path().join("nope.json")).unwrap();
        assert!(missing.get("node").is_some());
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut store = TemplateStore::default();
        assert!(store.upsert("a", sample()).is_none());
        assert!(store.upsert("a", sample()).is_some());
        assert!(store.remove("a").is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn test_extract_extension_and_contents() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("GhostyNode.h");
        std::fs::write(&file, "struct GhostyNode;").unwrap();

        let (ext, contents) = extract_extension_and_contents(&file.to_string_lossy()).unwrap();
        assert_eq!(ext, "h");
        assert_eq!(contents, "struct GhostyNode;");

        assert!(extract_extension_and_contents("NoExtension").is_err());
        assert!(extract_extension_and_contents("two.dots.h").is_err());
        let missing = dir.path().join("Missing.h");
        let err = extract_extension_and_contents(&missing.to_string_lossy()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_replace_with_placeholder() {
        let words = vec!["GhostyNode".to_string(), String::new()];
        assert_eq!(
            replace_with_placeholder(&words, "GhostyNode::GhostyNode()"),
            "{{fileName}}::{{fileName}}()"
        );
    }

    #[test]
    fn test_preview() {
        let text = preview("thing", &sample());
        assert!(text.starts_with("----- Preview -----\nthing - test\n--- .h ---\nstruct"));
    }
}
