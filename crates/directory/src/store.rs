use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ems_core::{AccountId, AddressId, DomainError, Email, EmployeeId, SkillId};

use crate::records::{
    Address, AddressDraft, BankAccount, BankAccountDraft, Designation, Employee, EmployeeProfile,
    Skill,
};

/// Employee master data plus the nested components hanging off each record.
/// Soft-deleted employees are invisible through every method here.
pub trait EmployeeDirectory: Send + Sync {
    fn register(
        &self,
        email: Email,
        password_hash: String,
        name: String,
    ) -> Result<Employee, DomainError>;
    fn get(&self, id: EmployeeId) -> Option<Employee>;
    fn find_by_email(&self, email: &Email) -> Option<Employee>;
    fn list(&self) -> Vec<Employee>;
    fn update_profile(
        &self,
        id: EmployeeId,
        profile: EmployeeProfile,
    ) -> Result<Employee, DomainError>;
    fn soft_delete(&self, id: EmployeeId) -> Result<(), DomainError>;

    fn attach_account(
        &self,
        id: EmployeeId,
        draft: BankAccountDraft,
    ) -> Result<BankAccount, DomainError>;
    fn update_account(
        &self,
        id: EmployeeId,
        draft: BankAccountDraft,
    ) -> Result<BankAccount, DomainError>;
    fn remove_account(&self, id: EmployeeId) -> Result<(), DomainError>;

    fn attach_address(&self, id: EmployeeId, draft: AddressDraft) -> Result<Address, DomainError>;
    fn remove_address(&self, id: EmployeeId) -> Result<(), DomainError>;

    fn set_designation(
        &self,
        id: EmployeeId,
        designation: Designation,
    ) -> Result<Designation, DomainError>;
    fn clear_designation(&self, id: EmployeeId) -> Result<(), DomainError>;

    fn assign_skill(&self, id: EmployeeId, skill: SkillId) -> Result<Skill, DomainError>;
    fn unassign_skill(&self, id: EmployeeId, skill: SkillId) -> Result<(), DomainError>;
    fn skills_of(&self, id: EmployeeId) -> Result<Vec<Skill>, DomainError>;
}

/// Shared skill catalog, assignable to any employee.
pub trait SkillCatalog: Send + Sync {
    fn add_skill(&self, name: &str) -> Result<Skill, DomainError>;
    fn skill(&self, id: SkillId) -> Option<Skill>;
    fn list_skills(&self) -> Vec<Skill>;
}

/// In-memory directory for tests/dev. Ids are sequential per process.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    employees: RwLock<HashMap<EmployeeId, Employee>>,
    catalog: RwLock<HashMap<SkillId, Skill>>,
    next_employee: AtomicU32,
    next_skill: AtomicU32,
    next_account: AtomicU32,
    next_address: AtomicU32,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn employees_read(&self) -> RwLockReadGuard<'_, HashMap<EmployeeId, Employee>> {
        self.employees.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn employees_write(&self) -> RwLockWriteGuard<'_, HashMap<EmployeeId, Employee>> {
        self.employees.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn catalog_read(&self) -> RwLockReadGuard<'_, HashMap<SkillId, Skill>> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn catalog_write(&self) -> RwLockWriteGuard<'_, HashMap<SkillId, Skill>> {
        self.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `mutate` against an active (non-deleted) employee.
    fn with_active<T>(
        &self,
        id: EmployeeId,
        mutate: impl FnOnce(&mut Employee) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let mut map = self.employees_write();
        let employee = map
            .get_mut(&id)
            .filter(|e| !e.deleted)
            .ok_or_else(|| DomainError::not_found(format!("employee {id}")))?;
        mutate(employee)
    }
}

impl EmployeeDirectory for InMemoryDirectory {
    fn register(
        &self,
        email: Email,
        password_hash: String,
        name: String,
    ) -> Result<Employee, DomainError> {
        let mut map = self.employees_write();
        if map.values().any(|e| !e.deleted && e.email == email) {
            return Err(DomainError::conflict(format!(
                "email {email} is already registered"
            )));
        }
        let id = EmployeeId::from_raw(1 + self.next_employee.fetch_add(1, Ordering::Relaxed));
        let employee = Employee::registered(id, email, password_hash, name);
        map.insert(id, employee.clone());
        tracing::debug!(%id, "employee registered");
        Ok(employee)
    }

    fn get(&self, id: EmployeeId) -> Option<Employee> {
        self.employees_read().get(&id).filter(|e| !e.deleted).cloned()
    }

    fn find_by_email(&self, email: &Email) -> Option<Employee> {
        self.employees_read()
            .values()
            .find(|e| !e.deleted && e.email == *email)
            .cloned()
    }

    fn list(&self) -> Vec<Employee> {
        let mut all: Vec<Employee> = self
            .employees_read()
            .values()
            .filter(|e| !e.deleted)
            .cloned()
            .collect();
        all.sort_by_key(|e| e.id);
        all
    }

    fn update_profile(
        &self,
        id: EmployeeId,
        profile: EmployeeProfile,
    ) -> Result<Employee, DomainError> {
        self.with_active(id, |employee| {
            employee.name = profile.name;
            employee.dob = Some(profile.dob);
            employee.mobile = Some(profile.mobile);
            Ok(employee.clone())
        })
    }

    fn soft_delete(&self, id: EmployeeId) -> Result<(), DomainError> {
        self.with_active(id, |employee| {
            employee.deleted = true;
            Ok(())
        })?;
        tracing::debug!(%id, "employee soft-deleted");
        Ok(())
    }

    fn attach_account(
        &self,
        id: EmployeeId,
        draft: BankAccountDraft,
    ) -> Result<BankAccount, DomainError> {
        let account_id = AccountId::from_raw(1 + self.next_account.fetch_add(1, Ordering::Relaxed));
        self.with_active(id, |employee| {
            if employee.account.is_some() {
                return Err(DomainError::conflict(format!(
                    "employee {id} already has a bank account"
                )));
            }
            let account = BankAccount {
                id: account_id,
                bank_name: draft.bank_name,
                account_number: draft.account_number,
                ifsc_code: draft.ifsc_code,
            };
            employee.account = Some(account.clone());
            Ok(account)
        })
    }

    fn update_account(
        &self,
        id: EmployeeId,
        draft: BankAccountDraft,
    ) -> Result<BankAccount, DomainError> {
        self.with_active(id, |employee| {
            let account = employee.account.as_mut().ok_or_else(|| {
                DomainError::not_found(format!("employee {id} has no bank account"))
            })?;
            account.bank_name = draft.bank_name;
            account.account_number = draft.account_number;
            account.ifsc_code = draft.ifsc_code;
            Ok(account.clone())
        })
    }

    fn remove_account(&self, id: EmployeeId) -> Result<(), DomainError> {
        self.with_active(id, |employee| {
            employee.account.take().map(|_| ()).ok_or_else(|| {
                DomainError::not_found(format!("employee {id} has no bank account"))
            })
        })
    }

    fn attach_address(&self, id: EmployeeId, draft: AddressDraft) -> Result<Address, DomainError> {
        let address_id = AddressId::from_raw(1 + self.next_address.fetch_add(1, Ordering::Relaxed));
        self.with_active(id, |employee| {
            if employee.address.is_some() {
                return Err(DomainError::conflict(format!(
                    "employee {id} already has an address"
                )));
            }
            let address = Address {
                id: address_id,
                street: draft.street,
                city: draft.city,
                state: draft.state,
                zip: draft.zip,
            };
            employee.address = Some(address.clone());
            Ok(address)
        })
    }

    fn remove_address(&self, id: EmployeeId) -> Result<(), DomainError> {
        self.with_active(id, |employee| {
            employee
                .address
                .take()
                .map(|_| ())
                .ok_or_else(|| DomainError::not_found(format!("employee {id} has no address")))
        })
    }

    fn set_designation(
        &self,
        id: EmployeeId,
        designation: Designation,
    ) -> Result<Designation, DomainError> {
        self.with_active(id, |employee| {
            employee.designation = Some(designation.clone());
            Ok(designation)
        })
    }

    fn clear_designation(&self, id: EmployeeId) -> Result<(), DomainError> {
        self.with_active(id, |employee| {
            employee
                .designation
                .take()
                .map(|_| ())
                .ok_or_else(|| DomainError::not_found(format!("employee {id} has no designation")))
        })
    }

    fn assign_skill(&self, id: EmployeeId, skill: SkillId) -> Result<Skill, DomainError> {
        let entry = self
            .skill(skill)
            .ok_or_else(|| DomainError::not_found(format!("skill {skill}")))?;
        self.with_active(id, |employee| {
            if employee.has_skill(skill) {
                return Err(DomainError::conflict(format!(
                    "employee {id} already has skill {skill}"
                )));
            }
            employee.skills.push(skill);
            Ok(entry)
        })
    }

    fn unassign_skill(&self, id: EmployeeId, skill: SkillId) -> Result<(), DomainError> {
        self.with_active(id, |employee| {
            let before = employee.skills.len();
            employee.skills.retain(|s| *s != skill);
            if employee.skills.len() == before {
                return Err(DomainError::not_found(format!(
                    "employee {id} does not have skill {skill}"
                )));
            }
            Ok(())
        })
    }

    fn skills_of(&self, id: EmployeeId) -> Result<Vec<Skill>, DomainError> {
        let assigned = self.with_active(id, |employee| Ok(employee.skills.clone()))?;
        let catalog = self.catalog_read();
        Ok(assigned
            .iter()
            .filter_map(|skill_id| catalog.get(skill_id).cloned())
            .collect())
    }
}

impl SkillCatalog for InMemoryDirectory {
    fn add_skill(&self, name: &str) -> Result<Skill, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("skill name must not be blank"));
        }
        let mut catalog = self.catalog_write();
        if catalog.values().any(|s| s.name.eq_ignore_ascii_case(name)) {
            return Err(DomainError::conflict(format!(
                "skill {name:?} already exists"
            )));
        }
        let id = SkillId::from_raw(1 + self.next_skill.fetch_add(1, Ordering::Relaxed));
        let skill = Skill {
            id,
            name: name.to_owned(),
        };
        catalog.insert(id, skill.clone());
        Ok(skill)
    }

    fn skill(&self, id: SkillId) -> Option<Skill> {
        self.catalog_read().get(&id).cloned()
    }

    fn list_skills(&self) -> Vec<Skill> {
        let mut all: Vec<Skill> = self.catalog_read().values().cloned().collect();
        all.sort_by_key(|s| s.id);
        all
    }
}
