use crate::domain::model::{ArtifactValue, OutgoingMessage, Table};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of the reference dataset.
pub trait ReferenceReader: Send + Sync {
    /// Fails with `TableNotFound` when the workbook has no table called `name`.
    fn read_table(&self, name: &str) -> Result<Table>;

    /// Short label for where the tables come from, e.g. `excel`.
    fn describe(&self) -> String;
}

/// Cell sink for the output spreadsheet. Rows and columns are 1-based.
pub trait ArtifactWriter {
    /// True when the target already carries the heading row, as a template does.
    fn has_headings(&self) -> bool {
        false
    }

    fn write_cell(&mut self, row: u32, col: u16, value: ArtifactValue) -> Result<()>;
    fn serialize(&mut self) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Returns the provider's message id, when it reports one.
    async fn send(&self, message: &OutgoingMessage) -> Result<Option<String>>;
}

pub trait Storage: Send + Sync {
    /// Stores `data` under `path` and returns where it landed.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}
