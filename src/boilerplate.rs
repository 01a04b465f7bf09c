use crate::templates::Template;

/// Text written at the top of every generated file.
#[derive(Clone, Debug)]
pub struct Boilerplate {
    /// License line without comment markers.
    pub license: String,
    /// Namespace wrapped around C++ files.
    pub namespace: String,
}

const HEADER_EXTENSIONS: &[&str] = &["h", "hpp"];
const SOURCE_EXTENSIONS: &[&str] = &["c", "cpp"];

fn is_one_of(extension: &str, set: &[&str]) -> bool {
    set.contains(&extension.to_lowercase().as_str())
}

/// Header/source counterpart scaffolded alongside a file.
pub fn companion_extension(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        "cpp" | "c" => Some("h"),
        "h" | "hpp" => Some("cpp"),
        _ => None,
    }
}

/// Line-comment marker for the file type.
pub fn comment_prefix(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "py" | "txt" => "#",
        _ => "//",
    }
}

impl Boilerplate {
    pub fn license_header(&self, extension: &str) -> String {
        format!("{} {}\n\n", comment_prefix(extension), self.license)
    }

    /// Content of a plain scaffolded file: license, `#pragma once` for
    /// headers, the matching header include for sources and an empty
    /// namespace block for C++ files.
    pub fn render(&self, stem: &str, extension: &str) -> String {
        let mut out = self.license_header(extension);
        if is_one_of(extension, HEADER_EXTENSIONS) {
            out.push_str("#pragma once\n");
        }
        if is_one_of(extension, SOURCE_EXTENSIONS) {
            out.push_str(&format!("#include \"{stem}.h\"\n"));
        }
        if is_one_of(extension, HEADER_EXTENSIONS) || is_one_of(extension, SOURCE_EXTENSIONS) {
            out.push_str(&format!("\nnamespace {}\n{{\n\n}}\n", self.namespace));
        }
        out
    }

    /// Content of a template-backed file. Falls back to the license alone
    /// when the template has no content for the extension.
    pub fn render_template(&self, template: &Template, stem: &str, extension: &str) -> String {
        let mut out = self.license_header(extension);
        if let Some(body) = template.render(extension, stem) {
            out.push_str(&body);
        }
        out
    }
}
