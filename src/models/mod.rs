mod category;
mod transaction;

pub(crate) use category::Category;
pub(crate) use transaction::{
    parse_date, ModelError, NewTransaction, Transaction, TxnType, ISO_DATE,
};
