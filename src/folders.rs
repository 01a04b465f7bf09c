use std::fmt;

const SHADER_FOLDER: &str = "Engine/Graphics/Shaders/";

/// Top-level source areas a scaffolded file can be placed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MainFolder {
    Core,
    Platform,
    Gui,
    ImGui,
    ImGuizmo,
    ImGuiNode,
    Engine,
    ShaderIncludes,
    VertexShaders,
    GeometryShaders,
    PixelShaders,
    Game,
    Editor,
    Launcher,
}

impl MainFolder {
    /// Display order of the folder picker.
    pub const ALL: [MainFolder; 14] = [
        MainFolder::Core,
        MainFolder::Platform,
        MainFolder::Gui,
        MainFolder::ImGui,
        MainFolder::ImGuizmo,
        MainFolder::ImGuiNode,
        MainFolder::Engine,
        MainFolder::ShaderIncludes,
        MainFolder::VertexShaders,
        MainFolder::GeometryShaders,
        MainFolder::PixelShaders,
        MainFolder::Game,
        MainFolder::Editor,
        MainFolder::Launcher,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MainFolder::Core => "Core",
            MainFolder::Platform => "Platform",
            MainFolder::Gui => "GUI",
            MainFolder::ImGui => "ImGui",
            MainFolder::ImGuizmo => "ImGuizmo",
            MainFolder::ImGuiNode => "ImGuiNode",
            MainFolder::Engine => "Engine",
            MainFolder::ShaderIncludes => "ShaderIncludes",
            MainFolder::VertexShaders => "VertexShaders",
            MainFolder::GeometryShaders => "GeometryShaders",
            MainFolder::PixelShaders => "PixelShaders",
            MainFolder::Game => "Game",
            MainFolder::Editor => "Editor",
            MainFolder::Launcher => "Launcher",
        }
    }

    /// Short names accepted by the folder picker.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            MainFolder::Core => &["c"],
            MainFolder::Platform => &["p", "pl", "pt"],
            MainFolder::Gui => &[],
            MainFolder::ImGui => &["im"],
            MainFolder::ImGuizmo => &["izmo"],
            MainFolder::ImGuiNode => &["node"],
            MainFolder::Engine => &["engi", "ngn"],
            MainFolder::ShaderIncludes => &["si"],
            MainFolder::VertexShaders => &["vx", "vs"],
            MainFolder::GeometryShaders => &["gs"],
            MainFolder::PixelShaders => &["px", "ps"],
            MainFolder::Game => &["g"],
            MainFolder::Editor => &["e"],
            MainFolder::Launcher => &["l"],
        }
    }

    /// Path prefix relative to the source directory, always ending in `/`.
    pub fn path(self) -> &'static str {
        match self {
            MainFolder::Core => "Core/",
            MainFolder::Platform => "Platform/",
            MainFolder::Gui => "GUI/",
            MainFolder::ImGui => "../External/imgui/",
            MainFolder::ImGuizmo => "../External/ImGuizmo/",
            MainFolder::ImGuiNode => "../External/imgui-node-editor/",
            MainFolder::Engine => "Engine/",
            MainFolder::ShaderIncludes => "Engine/Graphics/Shaders/Includes/",
            MainFolder::VertexShaders | MainFolder::GeometryShaders | MainFolder::PixelShaders => {
                SHADER_FOLDER
            }
            MainFolder::Game => "Game/",
            MainFolder::Editor => "Editor/",
            MainFolder::Launcher => "Launcher/",
        }
    }

    /// Build-list collection the folder's files are listed under.
    pub fn collection(self) -> &'static str {
        match self {
            MainFolder::Core => "CORE_FILES",
            MainFolder::Platform => "PLATFORM_FILES",
            MainFolder::Gui => "GUI_FILES",
            MainFolder::ImGui | MainFolder::ImGuizmo | MainFolder::ImGuiNode => "IMGUI_FILES",
            MainFolder::Engine => "ENGINE_FILES",
            MainFolder::ShaderIncludes => "SHADER_INCLUDES",
            MainFolder::VertexShaders => "VERTEX_SHADERS",
            MainFolder::GeometryShaders => "GEOMETRY_SHADERS",
            MainFolder::PixelShaders => "PIXEL_SHADERS",
            MainFolder::Game => "GAME_FILES",
            MainFolder::Editor => "EDITOR_FILES",
            MainFolder::Launcher => "LAUNCHER_FILES",
        }
    }

    /// Suffix every file stem in this folder carries (shader stage tags).
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            MainFolder::VertexShaders => Some("_VS"),
            MainFolder::GeometryShaders => Some("_GS"),
            MainFolder::PixelShaders => Some("_PS"),
            _ => None,
        }
    }

    /// Case-insensitive lookup by name or alias.
    pub fn parse(input: &str) -> Option<MainFolder> {
        let input = input.trim().to_lowercase();
        Self::ALL.into_iter().find(|folder| {
            folder.name().to_lowercase() == input || folder.aliases().contains(&input.as_str())
        })
    }

    /// Appends the folder suffix to the stem of `path` unless it is already
    /// there. The suffix goes before the extension when one is present.
    pub fn apply_suffix(self, path: &str) -> String {
        let Some(suffix) = self.suffix() else {
            return path.to_string();
        };

        let (dir, file) = match path.rfind('/') {
            Some(idx) => path.split_at(idx + 1),
            None => ("", path),
        };
        let (stem, ext) = match file.find('.') {
            Some(idx) => file.split_at(idx),
            None => (file, ""),
        };

        if stem.ends_with(suffix) {
            path.to_string()
        } else {
            format!("{dir}{stem}{suffix}{ext}")
        }
    }
}

impl fmt::Display for MainFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_name() {
        assert_eq!(MainFolder::Core.to_string(), "Core");
        assert_eq!(format!("[{:<6}]", MainFolder::Core), "[Core  ]");
    }

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!(MainFolder::parse("core"), Some(MainFolder::Core));
        assert_eq!(MainFolder::parse("GUI"), Some(MainFolder::Gui));
        assert_eq!(MainFolder::parse("PT"), Some(MainFolder::Platform));
        assert_eq!(MainFolder::parse("node"), Some(MainFolder::ImGuiNode));
        assert_eq!(MainFolder::parse(" vs "), Some(MainFolder::VertexShaders));
        assert_eq!(MainFolder::parse("shaders"), None);
        assert_eq!(MainFolder::parse(""), None);
    }

    #[test]
    fn test_aliases_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for folder in MainFolder::ALL {
            assert!(seen.insert(folder.name().to_lowercase()));
            for alias in folder.aliases() {
                assert!(seen.insert(alias.to_string()), "duplicate alias {alias}");
            }
        }
    }

    #[test]
    fn test_apply_suffix() {
        let vs = MainFolder::VertexShaders;
        assert_eq!(vs.apply_suffix("Sky.hlsl"), "Sky_VS.hlsl");
        assert_eq!(vs.apply_suffix("Post/Sky_VS.hlsl"), "Post/Sky_VS.hlsl");
        assert_eq!(MainFolder::PixelShaders.apply_suffix("Post/Bloom"), "Post/Bloom_PS");
        assert_eq!(MainFolder::Core.apply_suffix("Math/Vec.h"), "Math/Vec.h");
    }

    #[test]
    fn test_imgui_folders_share_collection() {
        assert_eq!(MainFolder::ImGuizmo.collection(), "IMGUI_FILES");
        assert_eq!(MainFolder::ImGuiNode.collection(), MainFolder::ImGui.collection());
        assert!(MainFolder::ALL.iter().all(|f| f.path().ends_with('/')));
    }
}
