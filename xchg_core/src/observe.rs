//! # Emission Diagnostics
//!
//! Progress reporting while a document is rendered. Emission itself stays a
//! pure tree transformation; the observer is handed in by whoever renders.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use xchg_core::observe::EmitObserver;
//!
//! #[derive(Default)]
//! struct Collect(RefCell<Vec<String>>);
//!
//! impl EmitObserver for Collect {
//!     fn container_emitted(&self, id: &str, table_count: usize) {
//!         self.0.borrow_mut().push(format!("{id}: {table_count}"));
//!     }
//! }
//!
//! let observer = Collect::default();
//! observer.container_emitted("{C}", 2);
//! assert_eq!(observer.0.borrow()[0], "{C}: 2");
//! ```

/// Receives one notification per container rendered.
pub trait EmitObserver {
    fn container_emitted(&self, id: &str, table_count: usize);
}

/// Logs each container through `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl EmitObserver for TracingObserver {
    fn container_emitted(&self, id: &str, table_count: usize) {
        tracing::info!(container = id, tables = table_count, "container emitted");
    }
}

/// Discards all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl EmitObserver for NullObserver {
    fn container_emitted(&self, _id: &str, _table_count: usize) {}
}
