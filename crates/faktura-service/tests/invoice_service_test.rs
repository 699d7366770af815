//! Integration tests for the invoice service using in-memory SurrealDB.

use std::str::FromStr;

use chrono::{Duration, Utc};
use faktura_auth::AuthConfig;
use faktura_core::error::FakturaError;
use faktura_core::models::client::CreateClient;
use faktura_core::models::company::CreateCompany;
use faktura_core::models::invoice::{
    CreateInvoice, InvoiceItemInput, InvoiceStatus, UpdateInvoice,
};
use faktura_core::models::user::RegisterUser;
use faktura_core::repository::{InvoiceRepository, Pagination};
use faktura_db::repository::{
    SurrealClientRepository, SurrealCompanyRepository, SurrealInvoiceRepository,
    SurrealUserRepository,
};
use faktura_service::{ClientService, CompanyService, InvoiceService, UserService};
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;
type Invoices = InvoiceService<
    SurrealInvoiceRepository<Db>,
    SurrealCompanyRepository<Db>,
    SurrealClientRepository<Db>,
>;

struct Harness {
    service: Invoices,
    invoice_repo: SurrealInvoiceRepository<Db>,
    company_id: Uuid,
    client_id: Uuid,
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

    let clients = ClientService::new(
        SurrealClientRepository::new(db.clone()),
        SurrealCompanyRepository::new(db.clone()),
    );
    let client = clients
        .create(CreateClient {
            company_id: company.id,
            first_name: "Greta".into(),
            last_name: "Gustafsson".into(),
            email: "greta@example.com".into(),
            address: None,
            city: None,
            country: None,
            phone_number: None,
        })
        .await
        .unwrap();

    Harness {
        service: InvoiceService::new(
            SurrealInvoiceRepository::new(db.clone()),
            SurrealCompanyRepository::new(db.clone()),
            SurrealClientRepository::new(db.clone()),
        ),
        invoice_repo: SurrealInvoiceRepository::new(db),
        company_id: company.id,
        client_id: client.id,
    }
}

fn item(quantity: i64, unit_price: &str) -> InvoiceItemInput {
    InvoiceItemInput {
        quantity,
        unit_price: Decimal::from_str(unit_price).unwrap(),
    }
}

fn draft(h: &Harness, number: &str, items: Vec<InvoiceItemInput>) -> CreateInvoice {
    CreateInvoice {
        company_id: h.company_id,
        client_id: h.client_id,
        number: number.into(),
        due_date: Utc::now() + Duration::days(30),
        items,
    }
}

#[tokio::test]
async fn create_computes_exact_amount_and_starts_created() {
    let h = setup().await;

    let dto = h
        .service
        .create(draft(&h, "INV-2025-0001", vec![item(2, "500.00"), item(1, "10.00")]))
        .await
        .unwrap();

    assert_eq!(dto.status, InvoiceStatus::Created);
    assert_eq!(dto.amount, Decimal::from_str("1010.00").unwrap());
    assert_eq!(dto.items.len(), 2);
    assert_eq!(dto.items[0].line_total, Decimal::from_str("1000.00").unwrap());
}

#[tokio::test]
async fn create_rejects_empty_item_set_without_persisting() {
    let h = setup().await;

    let err = h
        .service
        .create(draft(&h, "INV-2025-0002", vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("INVOICE_ITEMS_REQUIRED"));

    assert!(!h.invoice_repo.exists_by_number("INV-2025-0002").await.unwrap());
}

#[tokio::test]
async fn create_rejects_duplicate_number() {
    let h = setup().await;

    h.service
        .create(draft(&h, "INV-2025-0003", vec![item(1, "10.00")]))
        .await
        .unwrap();
    let err = h
        .service
        .create(draft(&h, "INV-2025-0003", vec![item(1, "10.00")]))
        .await
        .unwrap_err();

    match err {
        FakturaError::BusinessRule { code, .. } => assert_eq!(code, "INVOICE_NUMBER_EXISTS"),
        other => panic!("expected BusinessRule, got {other:?}"),
    }
}

#[tokio::test]
async fn create_resolves_company_and_client() {
    let h = setup().await;

    let mut input = draft(&h, "INV-2025-0004", vec![item(1, "10.00")]);
    input.company_id = Uuid::new_v4();
    let err = h.service.create(input).await.unwrap_err();
    match err {
        FakturaError::NotFound { entity, .. } => assert_eq!(entity, "Company"),
        other => panic!("expected NotFound, got {other:?}"),
    }

    let mut input = draft(&h, "INV-2025-0004", vec![item(1, "10.00")]);
    input.client_id = Uuid::new_v4();
    let err = h.service.create(input).await.unwrap_err();
    match err {
        FakturaError::NotFound { entity, .. } => assert_eq!(entity, "Client"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn update_replaces_items_and_recomputes_amount() {
    let h = setup().await;

    let dto = h
        .service
        .create(draft(&h, "INV-2025-0005", vec![item(2, "500.00")]))
        .await
        .unwrap();

    let updated = h
        .service
        .update(
            dto.id,
            UpdateInvoice {
                items: Some(vec![item(3, "7.50"), item(1, "2.50")]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.amount, Decimal::from_str("25.00").unwrap());
    assert_eq!(updated.items.len(), 2);
    // The old item set is gone entirely.
    assert!(updated.items.iter().all(|i| i.unit_price != Decimal::from_str("500.00").unwrap()));
}

#[tokio::test]
async fn update_with_empty_items_fails_and_leaves_invoice_unchanged() {
    let h = setup().await;

    let dto = h
        .service
        .create(draft(&h, "INV-2025-0006", vec![item(2, "500.00")]))
        .await
        .unwrap();

    let err = h
        .service
        .update(
            dto.id,
            UpdateInvoice {
                items: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("INVOICE_ITEMS_REQUIRED"));

    let stored = h.service.get_by_id(dto.id).await.unwrap().unwrap();
    assert_eq!(stored.amount, Decimal::from_str("1000.00").unwrap());
    assert_eq!(stored.items.len(), 1);
}

#[tokio::test]
async fn update_can_set_due_date_and_status_together() {
    let h = setup().await;

    let dto = h
        .service
        .create(draft(&h, "INV-2025-0007", vec![item(1, "10.00")]))
        .await
        .unwrap();

    let new_due = Utc::now() + Duration::days(60);
    let updated = h
        .service
        .update(
            dto.id,
            UpdateInvoice {
                due_date: Some(new_due),
                status: Some(InvoiceStatus::Sent),
                items: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, InvoiceStatus::Sent);
    assert_eq!(updated.due_date, new_due);
    // Items untouched by a patch that does not carry any.
    assert_eq!(updated.items.len(), 1);
}

#[tokio::test]
async fn status_transitions_follow_the_lifecycle() {
    let h = setup().await;

    let dto = h
        .service
        .create(draft(&h, "INV-2025-0008", vec![item(1, "10.00")]))
        .await
        .unwrap();

    let sent = h.service.update_status(dto.id, InvoiceStatus::Sent).await.unwrap();
    assert_eq!(sent.status, InvoiceStatus::Sent);

    let paid = h.service.update_status(dto.id, InvoiceStatus::Paid).await.unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);

    // Terminal: no way back.
    let err = h
        .service
        .update_status(dto.id, InvoiceStatus::Created)
        .await
        .unwrap_err();
    match err {
        FakturaError::BusinessRule { code, .. } => {
            assert_eq!(code, "ILLEGAL_STATUS_TRANSITION");
        }
        other => panic!("expected BusinessRule, got {other:?}"),
    }

    let stored = h.service.get_by_id(dto.id).await.unwrap().unwrap();
    assert_eq!(stored.status, InvoiceStatus::Paid);
}

#[tokio::test]
async fn cancelled_is_reachable_from_created_and_sent() {
    let h = setup().await;

    let a = h
        .service
        .create(draft(&h, "INV-2025-0009", vec![item(1, "10.00")]))
        .await
        .unwrap();
    let cancelled = h
        .service
        .update_status(a.id, InvoiceStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, InvoiceStatus::Cancelled);

    let b = h
        .service
        .create(draft(&h, "INV-2025-0010", vec![item(1, "10.00")]))
        .await
        .unwrap();
    h.service.update_status(b.id, InvoiceStatus::Sent).await.unwrap();
    let cancelled = h
        .service
        .update_status(b.id, InvoiceStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, InvoiceStatus::Cancelled);
}

#[tokio::test]
async fn delete_missing_invoice_is_not_found() {
    let h = setup().await;

    let err = h.service.delete(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, FakturaError::NotFound { .. }));
}

#[tokio::test]
async fn delete_removes_invoice_and_items_as_a_unit() {
    let h = setup().await;

    let dto = h
        .service
        .create(draft(&h, "INV-2025-0011", vec![item(1, "10.00")]))
        .await
        .unwrap();
    h.service.delete(dto.id).await.unwrap();

    assert!(h.service.get_by_id(dto.id).await.unwrap().is_none());
    assert!(!h.invoice_repo.exists_by_number("INV-2025-0011").await.unwrap());
}

#[tokio::test]
async fn lists_project_by_company_and_client() {
    let h = setup().await;

    h.service
        .create(draft(&h, "INV-2025-0012", vec![item(1, "10.00")]))
        .await
        .unwrap();
    h.service
        .create(draft(&h, "INV-2025-0013", vec![item(2, "5.00")]))
        .await
        .unwrap();

    let by_company = h
        .service
        .list_by_company(h.company_id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(by_company.total, 2);

    let by_client = h
        .service
        .list_by_client(h.client_id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(by_client.total, 2);
    assert!(by_client.items.iter().all(|i| i.client_id == h.client_id));
}
