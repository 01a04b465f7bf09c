//! Templates shipped with the toolkit, used when the project has no
//! template store yet and written out by `hvtools templates init`.

/// Header of a scripting-graph node.
pub fn node_header() -> &'static str {
    r#"#pragma once
#include <HexRune/HexRune.h>

namespace Havtorn
{
	namespace HexRune
	{
		struct {{fileName}} : public SNode
		{
			GAME_API {{fileName}}(const U64 id, const U32 typeID, SScript* owningScript);
			virtual GAME_API I8 OnExecute() override;
		};
	}
}
"#
}

/// Source of a scripting-graph node with one flow input and output.
pub fn node_source() -> &'static str {
    r#"#include "{{fileName}}.h"

namespace Havtorn
{
	namespace HexRune
	{
		{{fileName}}::{{fileName}}(const U64 id, const U32 typeID, SScript* owningScript)
			: SNode(id, typeID, owningScript, ENodeType::Standard)
		{
			AddInput(UGUIDManager::Generate(), EPinType::Flow, "In");
			AddOutput(UGUIDManager::Generate(), EPinType::Flow, "Out");
		}

		I8 {{fileName}}::OnExecute()
		{
			return -1;
		}
	}
}
"#
}

pub fn class_header() -> &'static str {
    r#"#pragma once

namespace Havtorn
{
	class {{fileName}}
	{
	public:
		{{fileName}}() = default;
		~{{fileName}}() = default;
	};
}
"#
}

pub fn class_source() -> &'static str {
    r#"#include "{{fileName}}.h"

namespace Havtorn
{
}
"#
}
