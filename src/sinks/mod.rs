//! Sink implementations: the file target, the console stream, and the
//! alert collaborator boundary

pub mod alert;
pub mod console;
pub mod file;

pub use alert::AlertSink;
pub use console::ConsoleSink;
pub use file::FileTarget;
