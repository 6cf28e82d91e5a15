//! Employee master data: records, field validation, and the directory store.
//!
//! The store is an in-process read/write model behind the
//! [`EmployeeDirectory`] and [`SkillCatalog`] traits. Soft-deleted employees
//! stay stored but are invisible through every lookup.

pub mod records;
pub mod store;
pub mod validation;

pub use records::{
    Address, AddressDraft, BankAccount, BankAccountDraft, Designation, Employee, EmployeeProfile,
    Skill,
};
pub use store::{EmployeeDirectory, InMemoryDirectory, SkillCatalog};
pub use validation::{validate_dob, validate_mobile, validate_name, validate_profile};
