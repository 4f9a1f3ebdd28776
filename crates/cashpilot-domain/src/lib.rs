//! cashpilot-domain
//!
//! Pure domain models (Transaction, Forecast, Alert, UserContext, etc.).
//! No I/O, no storage. Only data types and core enums.

pub mod alert;
pub mod forecast;
pub mod money;
pub mod transaction;
pub mod user;

pub use alert::*;
pub use forecast::*;
pub use money::*;
pub use transaction::*;
pub use user::*;
