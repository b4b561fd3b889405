// Feedback pipeline: parse the critique payload, derive presentation values,
// and fold both into the view model the result screen renders.
// Nothing in here performs I/O; the only side effect is diagnostic logging.

pub mod aggregator;
pub mod parser;
pub mod presentation;
