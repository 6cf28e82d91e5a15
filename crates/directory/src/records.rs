use chrono::NaiveDate;
use serde::Serialize;

use ems_core::{AccountId, AddressId, Email, EmployeeId, SkillId};

/// Employee master record. `password_hash` never leaves the directory in a
/// serialized form, so the record itself is deliberately not `Serialize`;
/// the API layer projects views out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub email: Email,
    pub mobile: Option<String>,
    pub designation: Option<Designation>,
    pub skills: Vec<SkillId>,
    pub account: Option<BankAccount>,
    pub address: Option<Address>,
    pub password_hash: String,
    pub deleted: bool,
}

impl Employee {
    /// Fresh record as created by registration, before the profile is
    /// completed.
    pub fn registered(id: EmployeeId, email: Email, password_hash: String, name: String) -> Self {
        Self {
            id,
            name,
            dob: None,
            email,
            mobile: None,
            designation: None,
            skills: Vec::new(),
            account: None,
            address: None,
            password_hash,
            deleted: false,
        }
    }

    pub fn has_skill(&self, skill: SkillId) -> bool {
        self.skills.contains(&skill)
    }
}

/// Profile fields an employee fills in after registering.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeProfile {
    pub name: String,
    pub dob: NaiveDate,
    pub mobile: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankAccount {
    pub id: AccountId,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
}

/// Fields for creating or replacing a bank account; the directory assigns
/// the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccountDraft {
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressDraft {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Catalog skill shared across employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
}

/// Job designation such as "Developer". Not an access-control role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Designation {
    pub name: String,
}
