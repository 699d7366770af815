//! Integration tests for the membership service using in-memory
//! SurrealDB.

use faktura_auth::AuthConfig;
use faktura_core::error::FakturaError;
use faktura_core::models::company::CreateCompany;
use faktura_core::models::user::RegisterUser;
use faktura_db::repository::{
    SurrealCompanyMemberRepository, SurrealCompanyRepository, SurrealUserRepository,
};
use faktura_service::{CompanyService, MembershipService, UserService};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;
type Members = MembershipService<
    SurrealCompanyMemberRepository<Db>,
    SurrealCompanyRepository<Db>,
    SurrealUserRepository<Db>,
>;

struct Harness {
    service: Members,
    users: UserService<SurrealUserRepository<Db>>,
    creator_id: Uuid,
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
        service: MembershipService::new(
            SurrealCompanyMemberRepository::new(db.clone()),
            SurrealCompanyRepository::new(db.clone()),
            SurrealUserRepository::new(db),
        ),
        users,
        creator_id: creator.id,
        company_id: company.id,
    }
}

async fn register_second_user(h: &Harness) -> Uuid {
    h.users
        .register(RegisterUser {
            first_name: "Ulf".into(),
            last_name: "Ulfsson".into(),
            email: "ulf@example.com".into(),
            password: "password1".into(),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn add_user_by_email_creates_association() {
    let h = setup().await;
    let ulf = register_second_user(&h).await;

    let member = h
        .service
        .add_user_by_email(h.company_id, "ulf@example.com")
        .await
        .unwrap();
    assert_eq!(member.user_id, ulf);
    assert_eq!(member.company_id, h.company_id);

    // Creator membership plus the new one.
    let members = h.service.list_users_of_company(h.company_id).await.unwrap();
    assert_eq!(members.len(), 2);
}

#[tokio::test]
async fn re_adding_a_member_is_rejected() {
    let h = setup().await;
    register_second_user(&h).await;

    h.service
        .add_user_by_email(h.company_id, "ulf@example.com")
        .await
        .unwrap();
    let err = h
        .service
        .add_user_by_email(h.company_id, "ulf@example.com")
        .await
        .unwrap_err();

    match err {
        FakturaError::BusinessRule { code, .. } => assert_eq!(code, "USER_ALREADY_ASSOCIATED"),
        other => panic!("expected BusinessRule, got {other:?}"),
    }
}

#[tokio::test]
async fn add_user_resolves_company_and_user_independently() {
    let h = setup().await;

    let err = h
        .service
        .add_user_by_email(Uuid::new_v4(), "signe@example.com")
        .await
        .unwrap_err();
    match err {
        FakturaError::NotFound { entity, .. } => assert_eq!(entity, "Company"),
        other => panic!("expected NotFound, got {other:?}"),
    }

    let err = h
        .service
        .add_user_by_email(h.company_id, "ghost@example.com")
        .await
        .unwrap_err();
    match err {
        FakturaError::NotFound { entity, .. } => assert_eq!(entity, "User"),
        other => panic!("expected NotFound, got {other:?}"),
    }

    let err = h
        .service
        .add_user_by_email(h.company_id, "not-an-email")
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("EMAIL_INVALID"));
}

#[tokio::test]
async fn remove_user_deletes_only_the_association() {
    let h = setup().await;
    let ulf = register_second_user(&h).await;
    h.service
        .add_user_by_email(h.company_id, "ulf@example.com")
        .await
        .unwrap();

    h.service.remove_user(h.company_id, ulf).await.unwrap();

    let members = h.service.list_users_of_company(h.company_id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, h.creator_id);

    // The user record itself survives.
    assert!(h.users.get(ulf).await.is_ok());
}

#[tokio::test]
async fn removing_an_absent_association_is_not_found() {
    let h = setup().await;
    let ulf = register_second_user(&h).await;

    let err = h.service.remove_user(h.company_id, ulf).await.unwrap_err();
    match err {
        FakturaError::NotFound { entity, id } => {
            assert_eq!(entity, "CompanyMember");
            assert!(id.contains(&ulf.to_string()));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn list_companies_of_user() {
    let h = setup().await;

    let companies = h.service.list_companies_of_user(h.creator_id).await.unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].company_id, h.company_id);

    let none = h.service.list_companies_of_user(Uuid::new_v4()).await.unwrap();
    assert!(none.is_empty());
}
