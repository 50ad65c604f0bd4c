use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::party::{
    NewStandInput, PersonView, RegisterInput, Role, StandView, UpdateProfileInput,
};
use crate::domain::ports::PartyRepository;

pub struct PartyService<R> {
    repo: R,
}

fn validate_profile(first_name: &str, last_name: &str, email: &str) -> Result<(), DomainError> {
    if first_name.trim().is_empty() || last_name.trim().is_empty() {
        return Err(DomainError::Validation(
            "First and last name are required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(DomainError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

impl<R: PartyRepository> PartyService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn register(&self, role: Role, input: RegisterInput) -> Result<PersonView, DomainError> {
        validate_profile(&input.first_name, &input.last_name, &input.email)?;
        self.repo.register(role, input)
    }

    pub fn get(&self, role: Role, id: Uuid) -> Result<Option<PersonView>, DomainError> {
        self.repo.find(role, id)
    }

    pub fn list(&self, role: Role) -> Result<Vec<PersonView>, DomainError> {
        self.repo.list(role)
    }

    pub fn update_profile(
        &self,
        role: Role,
        id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<PersonView, DomainError> {
        validate_profile(&input.first_name, &input.last_name, &input.email)?;
        self.repo.update_profile(role, id, input)
    }

    pub fn delete(&self, role: Role, id: Uuid) -> Result<(), DomainError> {
        self.repo.delete(role, id)
    }

    pub fn create_stand(
        &self,
        owner_id: Uuid,
        input: NewStandInput,
    ) -> Result<StandView, DomainError> {
        if input.price < BigDecimal::from(0) || input.size <= BigDecimal::from(0) {
            return Err(DomainError::Validation(
                "Stand price must be non-negative and size positive".to_string(),
            ));
        }
        self.repo.create_stand(owner_id, input)
    }

    pub fn list_stands(&self, owner_id: Uuid) -> Result<Vec<StandView>, DomainError> {
        self.repo.list_stands(owner_id)
    }
}
