mod dispatch;
mod lifecycle;

pub use dispatch::Dispatcher;
pub use lifecycle::with_connection;
