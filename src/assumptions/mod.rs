//! Rating assumptions applied to every policy in a run

mod tax;
pub mod loader;

pub use tax::TaxTable;
pub use loader::{load_tax_rates, load_tax_rates_from_reader, DEFAULT_TAX_RATES_PATH};
