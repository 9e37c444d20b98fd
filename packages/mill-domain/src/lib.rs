pub mod permissions;
pub mod status;

pub use permissions::{Permissions, Role, Session};
pub use status::{SalesOrderStatus, ServiceOrderStatus};
