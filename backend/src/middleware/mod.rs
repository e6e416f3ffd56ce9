//! Actix middleware shared by every route: request correlation via
//! [`Trace`].

pub mod trace;

pub use trace::Trace;
