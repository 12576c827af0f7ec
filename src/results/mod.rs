//! Tuning results
//!
//! Every tuning run writes a trial log per family and problem size. The
//! [`ResultsWriter`] condenses the logs of one size into a results table
//! (rows with a correct solution plus rows at the minimum energy, tagged
//! by family), and the [`ResultsReader`] resolves the best chain strength
//! and schedule from that table.
//!
//! ```text
//! <root>/performance/<n>/{chain,pause,quench,pause_and_quench}.csv
//!        │  ResultsWriter::write_results(n)
//!        ▼
//! <root>/results/<n>/performance_results.parquet
//!        │  ResultsReader::get_best_parameters(n)
//!        ▼
//! BestParameters { chain_strength, schedule }
//! ```

mod paths;
mod reader;
mod store;
mod table;
mod trial_log;
mod writer;

pub use paths::ResultsPaths;
pub use reader::{BestParameters, ResultsReader};
pub use store::ResultsStore;
pub use table::{Parameter, ParameterType, ResultRow, ResultsTable};
pub use trial_log::{read_trial_log, trial_log_batch, trial_log_schema, write_trial_log};
pub use writer::{retain_best_rows, ResultsWriter};
