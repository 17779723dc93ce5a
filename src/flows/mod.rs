/// Orchestration used by the extension popup and the web table
pub mod lookup;
pub mod web_sync;

pub use lookup::{ActiveTabSource, ExtensionLookupFlow, LookupOutcome, LookupState};
pub use web_sync::{WebSyncFlow, WebSyncSession};
