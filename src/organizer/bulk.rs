//! Bulk pass over the files already sitting in the watched folder.

use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::filter::is_image_file;
use super::relocate::{RelocationRequest, Relocator, RequestOrigin};
use crate::errors::OrganizerError;

/// Feed every image directly inside `folder` through the relocator.
///
/// Returns the number of files attempted, whatever their individual outcome.
/// Each file is recorded in the activity log by its worker; the summary line is
/// left to the caller.
pub fn organize_existing(relocator: &Relocator, folder: &Path) -> Result<usize, OrganizerError> {
    if folder.as_os_str().is_empty() || !folder.is_dir() {
        return Err(OrganizerError::NoFolderSelected);
    }

    let files: Vec<_> = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_image_file(p))
        .collect();

    debug!(folder = %folder.display(), candidates = files.len(), "bulk organize");

    files.par_iter().for_each(|path| {
        let request = RelocationRequest::new(path, folder, RequestOrigin::Bulk);
        relocator.relocate_and_record(&request);
    });

    info!(folder = %folder.display(), count = files.len(), "bulk organize finished");
    Ok(files.len())
}
