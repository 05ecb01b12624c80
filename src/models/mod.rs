/*!
Data structures of normalized Labeled-Unicast routes and session state.
*/
mod bgp;
mod route;
mod session;

pub use bgp::*;
pub use route::*;
pub use session::*;
