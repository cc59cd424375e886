use std::path::PathBuf;

use crate::configs::AsmConfig;
use crate::error::{CliError, Result};
use crate::utils::open_reader;

/// Store the trailing positionals as read files and probe each one.
///
/// An empty list is left for the validator to reject. The first file that
/// cannot be opened aborts the whole run with [`CliError::InputFileNotFound`];
/// `cfg.read_file_paths` is only filled once every file has opened.
pub fn resolve_read_files(positionals: Vec<PathBuf>, cfg: &mut AsmConfig) -> Result<()> {
    for path in &positionals {
        match open_reader(path) {
            Ok(reader) => drop(reader),
            Err(source) => {
                return Err(CliError::InputFileNotFound {
                    path: path.clone(),
                    source,
                });
            }
        }
        tracing::debug!(path = %path.display(), "read file found");
    }
    cfg.read_file_paths = positionals;
    Ok(())
}
