pub mod auth;
pub mod client;
pub mod resolver;

use crate::domain::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use resolver::GoogleSheetsResolver;

pub const FEEDBACK_TABLE: &str = "Feedback";
pub const PRODUCTS_TABLE: &str = "Products";
pub const ADMIN_USERS_TABLE: &str = "AdminUsers";

/// A single worksheet inside the spreadsheet, addressed by title.
#[async_trait]
pub trait Worksheet: Send + Sync {
    fn title(&self) -> &str;

    /// Values of a 1-based column, top to bottom, up to the last non-empty cell.
    async fn col_values(&self, column: usize) -> Result<Vec<String>>;

    /// Every row including the header row. Trailing empty cells may be omitted.
    async fn get_all_values(&self) -> Result<Vec<Vec<Value>>>;

    async fn append_row(&self, row: Vec<Value>) -> Result<()>;
}

/// Opens worksheets by name. Every call yields a fresh handle; nothing is
/// shared between calls.
#[async_trait]
pub trait TableResolver: Send + Sync {
    async fn resolve_table(&self, name: &str) -> Result<Box<dyn Worksheet>>;

    /// Whether the resolver can attempt connections at all.
    fn readiness(&self) -> Result<()>;
}
