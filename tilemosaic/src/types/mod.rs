mod coverage;
pub use coverage::*;

mod frame;
pub use frame::*;

mod query_parameters;
pub use query_parameters::*;
