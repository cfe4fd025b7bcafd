mod loader;

pub use loader::{Config, ReachabilityMode, ReportConfig};
