//! Signal Conditioning
//!
//! Loads multi-axis vibration recordings and prepares a single axis for
//! feature extraction: axis selection, DC removal, amplitude normalization
//! and zero-phase Butterworth filtering.

mod error;
mod filter;
mod preprocess;
mod table;

pub use error::SignalError;
pub use filter::{apply_filter, Biquad, FilterKind, SosFilter, FILTER_ORDER};
pub use preprocess::{condition_axis, extract_axis, normalize, remove_dc};
pub use table::SignalTable;
