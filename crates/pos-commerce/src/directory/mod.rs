//! People and businesses the store deals with.

mod customer;
mod staff;
mod supplier;

pub use customer::{Customer, CustomerCreate, CustomerUpdate};
pub use staff::{Staff, StaffCreate, StaffRole, StaffStatus, StaffUpdate};
pub use supplier::{Supplier, SupplierCreate, SupplierStatus, SupplierUpdate};
