pub mod reconciler;

pub use reconciler::DocumentReconciler;
