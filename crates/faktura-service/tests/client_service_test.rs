//! Integration tests for the client service using in-memory SurrealDB.

use faktura_auth::AuthConfig;
use faktura_core::error::FakturaError;
use faktura_core::models::client::{CreateClient, UpdateClient};
use faktura_core::models::company::CreateCompany;
use faktura_core::models::user::RegisterUser;
use faktura_core::repository::Pagination;
use faktura_db::repository::{
    SurrealClientRepository, SurrealCompanyRepository, SurrealUserRepository,
};
use faktura_service::{ClientService, CompanyService, UserService};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;

struct Harness {
    service: ClientService<SurrealClientRepository<Db>, SurrealCompanyRepository<Db>>,
    company_id: Uuid,
}

async fn setup() -> Harness {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    faktura_db::run_migrations(&db).await.unwrap();

    let users = UserService::new(SurrealUserRepository::new(db.clone()), AuthConfig::default());
    let creator = users
        .register(RegisterUser {
            first_name: "Signe".into(),
            last_name: "Svensson".into(),
            email: "signe@example.com".into(),
            password: "password1".into(),
        })
        .await
        .unwrap();

    let companies = CompanyService::new(
        SurrealCompanyRepository::new(db.clone()),
        SurrealUserRepository::new(db.clone()),
    );
    let company = companies
        .create(
            creator.id,
            CreateCompany {
                org_num: "123456-7890".into(),
                name: "Acme".into(),
                email: None,
                phone_number: None,
                address: None,
                city: None,
                country: None,
            },
        )
        .await
        .unwrap();

    Harness {
        service: ClientService::new(
            SurrealClientRepository::new(db.clone()),
            SurrealCompanyRepository::new(db),
        ),
        company_id: company.id,
    }
}

fn greta(company_id: Uuid) -> CreateClient {
    CreateClient {
        company_id,
        first_name: "Greta".into(),
        last_name: "Gustafsson".into(),
        email: "greta@example.com".into(),
        address: Some("Storgatan 1".into()),
        city: Some("Göteborg".into()),
        country: Some("Sweden".into()),
        phone_number: Some("+46 31 123 456".into()),
    }
}

#[tokio::test]
async fn create_binds_client_to_existing_company() {
    let h = setup().await;

    let dto = h.service.create(greta(h.company_id)).await.unwrap();
    assert_eq!(dto.company_id, h.company_id);
    assert_eq!(dto.first_name, "Greta");
    assert_eq!(dto.phone_number.as_deref(), Some("+46 31 123 456"));
}

#[tokio::test]
async fn create_requires_existing_company() {
    let h = setup().await;

    let err = h.service.create(greta(Uuid::new_v4())).await.unwrap_err();
    assert!(matches!(err, FakturaError::NotFound { .. }));
}

#[tokio::test]
async fn create_validates_fields_before_resolution() {
    let h = setup().await;

    // The company id is bogus, but the malformed email must fail first.
    let mut input = greta(Uuid::new_v4());
    input.email = "nope".into();
    let err = h.service.create(input).await.unwrap_err();
    assert_eq!(err.code(), Some("EMAIL_INVALID"));

    let mut input = greta(h.company_id);
    input.phone_number = Some("abc".into());
    let err = h.service.create(input).await.unwrap_err();
    assert_eq!(err.code(), Some("PHONE_INVALID"));

    let mut input = greta(h.company_id);
    input.country = Some("x".repeat(71));
    let err = h.service.create(input).await.unwrap_err();
    assert_eq!(err.code(), Some("ADDRESS_TOO_LONG"));
}

#[tokio::test]
async fn partial_update_leaves_absent_fields_untouched() {
    let h = setup().await;

    let dto = h.service.create(greta(h.company_id)).await.unwrap();
    let updated = h
        .service
        .update(
            dto.id,
            UpdateClient {
                email: Some("greta.g@example.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.email, "greta.g@example.com");
    assert_eq!(updated.first_name, "Greta");
    assert_eq!(updated.last_name, "Gustafsson");
    assert_eq!(updated.address.as_deref(), Some("Storgatan 1"));
    assert_eq!(updated.city.as_deref(), Some("Göteborg"));
    assert_eq!(updated.country.as_deref(), Some("Sweden"));
    assert_eq!(updated.phone_number.as_deref(), Some("+46 31 123 456"));
}

#[tokio::test]
async fn update_validates_each_present_field() {
    let h = setup().await;

    let dto = h.service.create(greta(h.company_id)).await.unwrap();
    let err = h
        .service
        .update(
            dto.id,
            UpdateClient {
                first_name: Some("G".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("NAME_TOO_SHORT"));

    // The stored client is unchanged.
    let stored = h.service.get(dto.id).await.unwrap();
    assert_eq!(stored.first_name, "Greta");
}

#[tokio::test]
async fn delete_and_get_fail_on_missing_client() {
    let h = setup().await;

    let err = h.service.get(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, FakturaError::NotFound { .. }));

    let err = h.service.delete(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, FakturaError::NotFound { .. }));
}

#[tokio::test]
async fn list_by_company_maps_projections() {
    let h = setup().await;

    h.service.create(greta(h.company_id)).await.unwrap();
    let mut second = greta(h.company_id);
    second.email = "sven@example.com".into();
    second.first_name = "Sven".into();
    h.service.create(second).await.unwrap();

    let page = h
        .service
        .list_by_company(h.company_id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 2);
    assert!(page.items.iter().all(|c| c.company_id == h.company_id));
}
