// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Output generation: provider-format conversion, template rendering,
//! and documentation.

pub mod codegen;
pub mod convert;
pub mod docs;

pub use codegen::{generate_demo_module, generate_tools_module};
pub use convert::{convert_tools, sanitize_tool_name, to_anthropic_tool, to_openai_tool, ProviderKind};
pub use docs::generate_docs;
