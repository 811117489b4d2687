//! Cache reconciliation, lookup and analysis dispatch.

pub mod dispatcher;
pub mod reconciler;
pub mod resolver;

pub use dispatcher::AnalysisDispatcher;
pub use reconciler::Reconciler;
pub use resolver::Resolver;
