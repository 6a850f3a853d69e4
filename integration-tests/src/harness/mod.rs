pub mod fixtures;
pub mod resolvers;
pub mod tracing;

pub use fixtures::{LogLine, Workspace};
pub use resolvers::{StubClients, StubCountries};
pub use tracing::{CapturedEvent, events, init_test_tracing};
