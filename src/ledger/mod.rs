pub(crate) mod editor;
pub(crate) mod export;
pub(crate) mod view;

pub(crate) use editor::{EditForm, EditState, FormField};
pub(crate) use export::ExportOutcome;
pub(crate) use view::{DateRange, TransactionView};



#[cfg(test)]
#[path = "export_tests.rs"]
mod export_tests;
