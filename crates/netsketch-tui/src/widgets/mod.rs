//! Reusable widgets.

pub mod form;

pub use form::{FormDialog, FormOutcome, FormPurpose};
