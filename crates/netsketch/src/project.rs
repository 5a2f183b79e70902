//! One CLI invocation's view of a project file.
//!
//! Commands load the document into an [`InteractionController`], apply a
//! change, and call [`Project::save`] only if everything succeeded. A load
//! that fails leaves the file exactly as it was.

use std::path::{Path, PathBuf};

use netsketch_core::{CoreError, InteractionController, TopologyStore, codec};
use tracing::debug;

use crate::config::Config;
use crate::error::CliError;

pub struct Project {
    path: PathBuf,
    controller: InteractionController,
}

impl Project {
    /// Load `path`, using the configured spawn point for new devices.
    pub fn open(path: PathBuf, cfg: &Config) -> Result<Self, CliError> {
        if !path.exists() {
            return Err(CliError::NoProject {
                path: path.display().to_string(),
            });
        }

        let topology = codec::load_from_path(&path).map_err(|e| located(&path, e))?;
        let mut controller =
            InteractionController::new(TopologyStore::with_spawn(cfg.canvas.spawn_point()));
        controller.load(topology).map_err(|e| located(&path, e))?;

        debug!(path = %path.display(), "project opened");
        Ok(Self { path, controller })
    }

    /// Write an empty project to `path`.
    pub fn create(path: &Path, force: bool) -> Result<(), CliError> {
        if path.exists() && !force {
            return Err(CliError::ProjectExists {
                path: path.display().to_string(),
            });
        }
        codec::save_to_path(path, TopologyStore::new().topology())?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    pub fn save(&self) -> Result<(), CliError> {
        codec::save_to_path(&self.path, self.controller.topology())?;
        Ok(())
    }
}

/// Attach the file path to document errors.
fn located(path: &Path, err: CoreError) -> CliError {
    match err {
        CoreError::MalformedDocument { message } => CliError::MalformedDocument {
            path: path.display().to_string(),
            message,
        },
        other => other.into(),
    }
}
