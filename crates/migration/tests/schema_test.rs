//! The HR schema migrations, applied to an in-memory SQLite database.

mod support;

use migration::{Migrator, Registry, Runner, RunnerConfig};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use support::{columns, connect, count, id, names, on_delete, snapshot, tables};

const BASELINE: &str = "m20240101_000002_create_employees_table";

fn migrator(db: &DatabaseConnection) -> Runner {
    Runner::new(
        db.clone(),
        RunnerConfig::default(),
        Migrator::registry().unwrap(),
    )
}

async fn exec(db: &DatabaseConnection, sql: &str) -> Result<(), sea_orm::DbErr> {
    db.execute_unprepared(sql).await.map(|_| ())
}

async fn nullable_int(db: &DatabaseConnection, sql: &str, column: &str) -> Option<i32> {
    db.query_one(Statement::from_string(DbBackend::Sqlite, sql.to_string()))
        .await
        .unwrap()
        .expect("row exists")
        .try_get::<Option<i32>>("", column)
        .unwrap()
}

#[tokio::test]
async fn registry_orders_the_units_by_identity() {
    let registry: Registry = Migrator::registry().unwrap();
    assert_eq!(
        names(&registry.identities()),
        vec![
            "m20240101_000001_create_users_table",
            "m20240101_000002_create_employees_table",
            "m20240315_000001_create_departments_table",
            "m20240315_000002_add_user_id_to_employees",
            "m20240316_000001_create_onboarding_templates_table",
            "m20240317_000001_add_status_to_employees",
        ]
    );
}

#[tokio::test]
async fn full_migration_builds_the_hr_schema() {
    let db = connect().await;
    let runner = migrator(&db);

    let report = runner.apply_pending().await.unwrap();
    assert_eq!(report.completed.len(), 6);

    assert_eq!(
        tables(&db).await,
        vec!["departments", "employees", "onboarding_templates", "users"]
    );
    assert_eq!(
        columns(&db, "departments").await,
        vec!["id", "name", "manager_id", "created_at", "updated_at"]
    );
    assert_eq!(
        columns(&db, "onboarding_templates").await,
        vec!["id", "template_code", "name", "description", "created_at", "updated_at"]
    );
    assert!(columns(&db, "employees").await.ends_with(&["user_id".to_string(), "status".to_string()]));

    assert_eq!(on_delete(&db, "departments", "manager_id").await.as_deref(), Some("SET NULL"));
    assert_eq!(on_delete(&db, "employees", "user_id").await.as_deref(), Some("SET NULL"));
}

#[tokio::test]
async fn deleting_a_user_only_clears_the_links() {
    let db = connect().await;
    migrator(&db).apply_pending().await.unwrap();

    exec(&db, "INSERT INTO users (id, email, name) VALUES (1, 'lead@example.com', 'Lead')")
        .await
        .unwrap();
    exec(&db, "INSERT INTO departments (id, name, manager_id) VALUES (1, 'Operations', 1)")
        .await
        .unwrap();
    exec(
        &db,
        "INSERT INTO employees (id, first_name, last_name, email, user_id) \
         VALUES (1, 'Ada', 'Lovelace', 'ada@example.com', 1)",
    )
    .await
    .unwrap();

    exec(&db, "DELETE FROM users WHERE id = 1").await.unwrap();

    assert_eq!(
        nullable_int(&db, "SELECT manager_id FROM departments WHERE id = 1", "manager_id").await,
        None
    );
    assert_eq!(
        nullable_int(&db, "SELECT user_id FROM employees WHERE id = 1", "user_id").await,
        None
    );
    assert_eq!(count(&db, "SELECT COUNT(*) FROM departments").await, 1);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM employees").await, 1);
}

#[tokio::test]
async fn employee_status_defaults_and_is_constrained() {
    let db = connect().await;
    migrator(&db).apply_pending().await.unwrap();

    exec(
        &db,
        "INSERT INTO employees (first_name, last_name, email) VALUES ('New', 'Hire', 'new@example.com')",
    )
    .await
    .unwrap();
    assert_eq!(
        count(&db, "SELECT COUNT(*) FROM employees WHERE status = 'Onboarding'").await,
        1
    );

    for status in domain::EmployeeStatus::allowed_values() {
        let sql = format!(
            "INSERT INTO employees (first_name, last_name, email, status) \
             VALUES ('A', 'B', '{}@example.com', '{}')",
            status.replace(' ', "_").to_lowercase(),
            status
        );
        exec(&db, &sql).await.unwrap();
    }

    let rejected = exec(
        &db,
        "INSERT INTO employees (first_name, last_name, email, status) \
         VALUES ('Bad', 'Status', 'bad@example.com', 'Retired')",
    )
    .await;
    assert!(rejected.is_err());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM employees").await, 7);
}

#[tokio::test]
async fn natural_keys_are_unique() {
    let db = connect().await;
    migrator(&db).apply_pending().await.unwrap();

    exec(&db, "INSERT INTO departments (name) VALUES ('Shipping')")
        .await
        .unwrap();
    assert!(exec(&db, "INSERT INTO departments (name) VALUES ('Shipping')")
        .await
        .is_err());

    exec(
        &db,
        "INSERT INTO onboarding_templates (template_code, name) VALUES ('STD', 'Standard')",
    )
    .await
    .unwrap();
    assert!(exec(
        &db,
        "INSERT INTO onboarding_templates (template_code, name, description) \
         VALUES ('STD', 'Other', 'same code')",
    )
    .await
    .is_err());
}

#[tokio::test]
async fn reverting_the_hr_units_restores_the_baseline() {
    let db = connect().await;
    let runner = migrator(&db);

    runner.apply_to(Some(&id(BASELINE))).await.unwrap();
    let baseline = snapshot(&db).await;
    assert_eq!(tables(&db).await, vec!["employees", "users"]);

    runner.apply_pending().await.unwrap();
    assert_ne!(snapshot(&db).await, baseline);

    let report = runner.revert(4).await.unwrap();
    assert_eq!(
        names(&report.completed),
        vec![
            "m20240317_000001_add_status_to_employees",
            "m20240316_000001_create_onboarding_templates_table",
            "m20240315_000002_add_user_id_to_employees",
            "m20240315_000001_create_departments_table",
        ]
    );
    assert_eq!(snapshot(&db).await, baseline);
}

#[tokio::test]
async fn each_unit_round_trips() {
    let db = connect().await;
    let runner = migrator(&db);

    for unit in runner.registry().identities() {
        let before = snapshot(&db).await;

        runner.apply_to(Some(&unit)).await.unwrap();
        assert_ne!(snapshot(&db).await, before, "{unit} changed nothing");

        runner.revert(1).await.unwrap();
        assert_eq!(snapshot(&db).await, before, "{unit} did not round-trip");

        runner.apply_to(Some(&unit)).await.unwrap();
    }
}

#[tokio::test]
async fn reverting_everything_empties_the_database() {
    let db = connect().await;
    let runner = migrator(&db);

    runner.apply_pending().await.unwrap();
    let report = runner.revert_all().await.unwrap();

    assert_eq!(report.completed.len(), 6);
    assert!(tables(&db).await.is_empty());
    assert!(runner.applied().await.unwrap().is_empty());
}
