// Shader sources - WGSL text for the programs a GPU backend can compile
//
// Only the passthrough pair ships with the crate. Hosts register the source
// of any other program they want available; a program without a source
// fails to compile and the selector falls back to passthrough.

use std::borrow::Cow;
use std::collections::HashMap;

/// Entry point of every vertex program
pub const VERTEX_ENTRY: &str = "vs_main";

/// Entry point of every fragment program
pub const FRAGMENT_ENTRY: &str = "fs_main";

const TEXTURE_V: &str = include_str!("wgsl/texture_v.wgsl");
const TEXTURE_F: &str = include_str!("wgsl/texture_f.wgsl");

/// Registry of WGSL program sources keyed by program name
#[derive(Debug, Clone)]
pub struct ShaderSources {
    sources: HashMap<String, Cow<'static, str>>,
}

impl ShaderSources {
    /// A registry holding only the built-in passthrough programs
    pub fn builtin() -> Self {
        let mut sources = HashMap::new();
        sources.insert("texture_v".to_string(), Cow::Borrowed(TEXTURE_V));
        sources.insert("texture_f".to_string(), Cow::Borrowed(TEXTURE_F));
        Self { sources }
    }

    /// Add or replace the source of a program
    pub fn register(&mut self, name: impl Into<String>, source: impl Into<Cow<'static, str>>) {
        self.sources.insert(name.into(), source.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(|s| s.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self::builtin()
    }
}
