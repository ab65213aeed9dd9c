//! Routing module
//!
//! Maps request paths to the handler endpoints of the file exchange.

mod table;

pub use table::{Endpoint, RouteTable};
