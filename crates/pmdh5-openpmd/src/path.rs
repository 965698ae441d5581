//! Where iteration data lives inside the file.

/// Iteration path template written to `iterationFormat`.
pub const ITERATION_FORMAT: &str = "/data/%T/";
/// Default `meshesPath` (written as `fieldsPath`).
pub const MESHES_PATH: &str = "fields/";
/// Default `particlesPath`.
pub const PARTICLES_PATH: &str = "particles/";

/// Resolved path prefixes for one iteration.
///
/// Produced once by the root writer and handed to every record writer,
/// so no writer re-reads path attributes from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    iteration: u64,
    base_path: String,
    meshes_path: String,
    particles_path: String,
}

impl PathContext {
    /// Paths for `iteration` under the default `fields/` and `particles/`
    /// subtrees.
    pub fn new(iteration: u64) -> Self {
        Self {
            iteration,
            base_path: ITERATION_FORMAT.replace("%T", &iteration.to_string()),
            meshes_path: MESHES_PATH.into(),
            particles_path: PARTICLES_PATH.into(),
        }
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// `/data/<iteration>/`
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn meshes_path(&self) -> &str {
        &self.meshes_path
    }

    pub fn particles_path(&self) -> &str {
        &self.particles_path
    }

    /// Absolute path of mesh record `name`.
    pub fn mesh(&self, name: &str) -> String {
        format!("{}{}{name}", self.base_path, self.meshes_path)
    }

    /// Absolute path of particle species `name`.
    pub fn species(&self, name: &str) -> String {
        format!("{}{}{name}", self.base_path, self.particles_path)
    }
}
