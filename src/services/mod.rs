pub mod dispatcher;

pub use dispatcher::{AnalysisDispatcher, StreamErrorPolicy};

#[cfg(test)]
mod dispatcher_tests;
