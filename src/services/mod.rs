pub mod memory_store;
pub mod merge;
pub mod pipeline;
pub mod scheduler;
pub mod session;
pub mod signals;
pub mod sqlite_store;
pub mod store;

pub use memory_store::MemoryStore;
pub use merge::merge;
pub use pipeline::process;
pub use scheduler::RefreshScheduler;
pub use session::{Session, SessionSettings, Snapshot};
pub use signals::{all_classifiers, Classifier, Locale, Presentation};
pub use sqlite_store::SqliteStore;
pub use store::{needs_hourly_update, RecordStore};
