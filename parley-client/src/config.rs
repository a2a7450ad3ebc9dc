/// Limits applied by a `ThreadStore`
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ThreadConfig {
    /// Deepest allowed reply nesting, roots being at depth 0
    pub max_depth: usize,

    /// Number of root comments a session may post in one thread
    pub max_root_comments: usize,

    /// If true, root comments already present when loading count against the
    /// session's quota
    pub count_loaded_roots: bool,
}

impl ThreadConfig {
    /// Limits used when backed by the comment service
    pub fn remote() -> ThreadConfig {
        ThreadConfig {
            max_depth: 2,
            max_root_comments: 3,
            count_loaded_roots: false,
        }
    }

    /// Limits used when running fully offline
    pub fn local() -> ThreadConfig {
        ThreadConfig {
            max_root_comments: 5,
            ..ThreadConfig::remote()
        }
    }
}

impl Default for ThreadConfig {
    fn default() -> ThreadConfig {
        ThreadConfig::remote()
    }
}
