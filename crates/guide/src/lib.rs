// Library crate: the guide session logic, shared by the console runner, the
// HTTP service and the integration tests.

pub mod chat;
pub mod command;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod i18n;
pub mod identify;
pub mod navigation;
pub mod state;
pub mod summary;
pub mod views;

pub use error::GuideError;
pub use harness::GuideHarness;
