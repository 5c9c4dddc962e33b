//! Current-project discovery.
//!
//! The engine has no notion of a project. The provider exists for callers
//! that anchor relative output patterns under a host project's setups tree,
//! with implementations for a fixed name and for the environment.

/// Names the project a run belongs to, if any.
pub trait ProjectSource {
    fn project_name(&self) -> Option<String>;
}

/// A fixed project name.
#[derive(Debug, Clone)]
pub struct StaticProject(pub String);

impl ProjectSource for StaticProject {
    fn project_name(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Environment variable consulted by [`EnvProject`].
pub const PROJECT_ENV_VAR: &str = "SLATER_PROJECT";

/// Reads the project name from `SLATER_PROJECT`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvProject;

impl ProjectSource for EnvProject {
    fn project_name(&self) -> Option<String> {
        std::env::var(PROJECT_ENV_VAR)
            .ok()
            .filter(|name| !name.is_empty())
    }
}
