//! Version keys and as-of resolution.
//!
//! Every version-selecting operation in this crate is a predecessor search:
//! "the latest implementation not newer than X".

mod default;
mod key;
mod resolve;
mod table;

pub use default::{default_version, set_default_version};
pub use key::VersionKey;
pub use resolve::{first_available, resolve};
pub use table::VersionTable;
