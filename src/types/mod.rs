pub mod indicator;
pub mod record;
pub mod trend;

pub use indicator::*;
pub use record::*;
pub use trend::*;
