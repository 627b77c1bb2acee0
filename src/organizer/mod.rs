//! Relocation core: everything needed to take one image file from the watched
//! root into its date folder, plus the bulk pass over existing files.

pub mod bulk;
pub mod destination;
pub mod filter;
mod hints;
pub mod readiness;
pub mod relocate;

pub use bulk::organize_existing;
pub use destination::{date_folder_name, resolve_destination};
pub use filter::{IMAGE_EXTENSIONS, is_image_file};
pub use readiness::{Readiness, ReadinessProber};
pub use relocate::{
    RelocationOutcome, RelocationRequest, Relocator, RequestOrigin, SkipReason,
    file_creation_date,
};
