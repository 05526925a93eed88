mod parser;
mod pipeline;
mod types;

pub use parser::{
    daily_record_from_value, purchase_count_from_actions, purchase_value_from_actions,
    records_from_json, records_from_lines,
};
pub use pipeline::ingest_directory;
pub use types::{IngestError, IngestIssue, IngestStats, ParsedRows, Result};
