pub mod artifact;
pub mod assembler;
pub mod index;
pub mod service;

pub use crate::domain::model::{ExportLine, ReferenceIndex, Submission};
pub use crate::domain::ports::{ArtifactWriter, MessageSender, ReferenceReader, Storage};
pub use crate::utils::error::Result;
