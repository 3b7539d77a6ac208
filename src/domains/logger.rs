use std::sync::Arc;

/// Logging port for the domain. Implementations live in
/// `adapters::outbound::logging`; none of them may fail the caller.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;
