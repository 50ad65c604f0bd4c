use diesel::dsl::exists;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::party::{
    NewStandInput, PersonView, RegisterInput, Role, StandView, UpdateProfileInput,
};
use crate::domain::ports::PartyRepository;
use crate::schema::{persons, stands};

use super::models::{NewPersonRow, NewStandRow, PersonRow, StandRow};
use super::require_person;

pub struct DieselPartyRepository {
    pool: DbPool,
}

impl DieselPartyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_view(row: PersonRow) -> Result<PersonView, DomainError> {
    let role: Role = row.role.parse()?;
    Ok(PersonView {
        id: row.id,
        role,
        first_name: row.first_name,
        last_name: row.last_name,
        date_of_birth: row.date_of_birth,
        phone_number: row.phone_number,
        address: row.address,
        email: row.email,
        created_at: row.created_at,
    })
}

fn stand_view(row: StandRow) -> StandView {
    StandView {
        id: row.id,
        owner_id: row.owner_id,
        seller_id: row.seller_id,
        price: row.price,
        size: row.size,
    }
}

fn email_taken(conn: &mut PgConnection, email: &str) -> Result<bool, DomainError> {
    let taken: bool = diesel::select(exists(
        persons::table.filter(persons::email.eq(email)),
    ))
    .get_result(conn)?;
    Ok(taken)
}

impl PartyRepository for DieselPartyRepository {
    fn register(&self, role: Role, input: RegisterInput) -> Result<PersonView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // Emails are unique across roles, not per role.
            if email_taken(conn, &input.email)? {
                return Err(DomainError::Conflict("Email already exists".to_string()));
            }

            let row = diesel::insert_into(persons::table)
                .values(&NewPersonRow {
                    id: Uuid::new_v4(),
                    role: role.as_str().to_string(),
                    first_name: input.first_name,
                    last_name: input.last_name,
                    date_of_birth: input.date_of_birth,
                    phone_number: input.phone_number,
                    address: input.address,
                    email: input.email,
                })
                .get_result::<PersonRow>(conn)?;

            to_view(row)
        })
    }

    fn find(&self, role: Role, id: Uuid) -> Result<Option<PersonView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = persons::table
            .filter(persons::id.eq(id))
            .filter(persons::role.eq(role.as_str()))
            .select(PersonRow::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(to_view).transpose()
    }

    fn list(&self, role: Role) -> Result<Vec<PersonView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = persons::table
            .filter(persons::role.eq(role.as_str()))
            .order(persons::created_at.asc())
            .select(PersonRow::as_select())
            .load(&mut conn)?;

        rows.into_iter().map(to_view).collect()
    }

    fn update_profile(
        &self,
        role: Role,
        id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<PersonView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let existing = persons::table
                .filter(persons::id.eq(id))
                .filter(persons::role.eq(role.as_str()))
                .select(PersonRow::as_select())
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound(role.entity_name()))?;

            if existing.email != input.email && email_taken(conn, &input.email)? {
                return Err(DomainError::Conflict("Email already exists".to_string()));
            }

            let row = diesel::update(persons::table.filter(persons::id.eq(id)))
                .set((
                    persons::first_name.eq(input.first_name),
                    persons::last_name.eq(input.last_name),
                    persons::date_of_birth.eq(input.date_of_birth),
                    persons::phone_number.eq(input.phone_number),
                    persons::address.eq(input.address),
                    persons::email.eq(input.email),
                    persons::updated_at.eq(diesel::dsl::now),
                ))
                .get_result::<PersonRow>(conn)?;

            to_view(row)
        })
    }

    fn delete(&self, role: Role, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(
            persons::table
                .filter(persons::id.eq(id))
                .filter(persons::role.eq(role.as_str())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(DomainError::NotFound(role.entity_name()));
        }
        Ok(())
    }

    fn create_stand(&self, owner_id: Uuid, input: NewStandInput) -> Result<StandView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            require_person(conn, owner_id, Role::Owner)?;
            if let Some(seller_id) = input.seller_id {
                require_person(conn, seller_id, Role::Seller)?;
            }

            let row = diesel::insert_into(stands::table)
                .values(&NewStandRow {
                    id: Uuid::new_v4(),
                    owner_id,
                    seller_id: input.seller_id,
                    price: input.price,
                    size: input.size,
                })
                .get_result::<StandRow>(conn)?;

            Ok(stand_view(row))
        })
    }

    fn list_stands(&self, owner_id: Uuid) -> Result<Vec<StandView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            require_person(conn, owner_id, Role::Owner)?;

            let rows = stands::table
                .filter(stands::owner_id.eq(owner_id))
                .select(StandRow::as_select())
                .load(conn)?;

            Ok(rows.into_iter().map(stand_view).collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{register_person, setup_db, stand_input};
    use super::*;
    use crate::domain::ports::PartyRepository;

    #[tokio::test]
    async fn register_and_find_roundtrip() {
        let (_container, pool) = setup_db().await;
        let repo = DieselPartyRepository::new(pool);

        let created = repo
            .register(Role::Customer, register_person("alice@example.com"))
            .expect("register failed");

        let found = repo
            .find(Role::Customer, created.id)
            .expect("find failed")
            .expect("customer should exist");

        assert_eq!(found.email, "alice@example.com");
        assert_eq!(found.role, Role::Customer);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict_across_roles() {
        let (_container, pool) = setup_db().await;
        let repo = DieselPartyRepository::new(pool);

        repo.register(Role::Customer, register_person("bob@example.com"))
            .expect("first register failed");

        let err = repo
            .register(Role::Seller, register_person("bob@example.com"))
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn losing_a_registration_race_is_conflict_not_internal() {
        let (_container, pool) = setup_db().await;
        let repo = DieselPartyRepository::new(pool.clone());

        repo.register(Role::Customer, register_person("eve@example.com"))
            .expect("first register failed");

        // A concurrent registration can pass the email pre-check and lose at
        // the UNIQUE constraint instead; that database error must still come
        // out as a conflict.
        let mut conn = pool.get().expect("pool failed");
        let err: DomainError = diesel::insert_into(persons::table)
            .values(&NewPersonRow {
                id: Uuid::new_v4(),
                role: Role::Seller.as_str().to_string(),
                first_name: "Test".to_string(),
                last_name: "Person".to_string(),
                date_of_birth: None,
                phone_number: None,
                address: None,
                email: "eve@example.com".to_string(),
            })
            .execute(&mut conn)
            .unwrap_err()
            .into();

        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn role_mismatch_is_not_found() {
        let (_container, pool) = setup_db().await;
        let repo = DieselPartyRepository::new(pool);

        let seller = repo
            .register(Role::Seller, register_person("carol@example.com"))
            .expect("register failed");

        let found = repo
            .find(Role::Customer, seller.id)
            .expect("find should not error");
        assert!(found.is_none());

        let err = repo.delete(Role::Customer, seller.id).unwrap_err();
        assert!(matches!(err, DomainError::NotFound("Customer")));
    }

    #[tokio::test]
    async fn stand_requires_existing_owner() {
        let (_container, pool) = setup_db().await;
        let repo = DieselPartyRepository::new(pool);

        let err = repo
            .create_stand(uuid::Uuid::new_v4(), stand_input())
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound("Owner")));

        let owner = repo
            .register(Role::Owner, register_person("dora@example.com"))
            .expect("register failed");
        let stand = repo
            .create_stand(owner.id, stand_input())
            .expect("create stand failed");

        let stands = repo.list_stands(owner.id).expect("list failed");
        assert_eq!(stands.len(), 1);
        assert_eq!(stands[0].id, stand.id);
    }
}
