pub mod analytics;
pub mod cli;
pub mod config;
pub mod entry;
pub mod export;
pub mod search;
pub mod storage;

pub use analytics::{analyze_history, analyze_range, AnalyticsError, AnalyticsReport, DateRange};
pub use config::{AppConfig, ConfigLoader, ConfigPaths};
pub use entry::{Entry, NewEntry};
pub use search::{filter_entries, EntryFilter};
pub use storage::{EntryStore, StorageHandle};
