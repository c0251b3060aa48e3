//! Database helpers for employee and subject records.
//!
//! Every operation is a single autocommit statement; there are no
//! transactions and no retries. Driver errors propagate to the caller with
//! context attached.

use anyhow::{Context, Result};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::Instrument;

/// Employee row as stored in the `employee` table.
#[derive(Clone, Debug)]
pub struct Employee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub affiliation: String,
    pub username: Option<String>,
    pub admin: bool,
}

/// Input for [`insert_employee`]. The `admin` flag is deliberately absent so
/// sign-up can never grant elevated access.
#[derive(Clone, Debug)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub affiliation: String,
    pub username: Option<String>,
}

/// Scheduling subject; `name` is the primary key.
#[derive(Clone, Debug, PartialEq)]
pub struct Subject {
    pub name: String,
}

/// Insert an employee record.
///
/// A conflicting email is a silent no-op: callers cannot tell "created" from
/// "already existed".
///
/// # Errors
///
/// Returns an error when the statement fails for any reason other than a
/// uniqueness conflict.
pub async fn insert_employee(pool: &PgPool, employee: &NewEmployee) -> Result<()> {
    let query = r"
        INSERT INTO employee
            (first_name, last_name, e_mail, password_hash, affiliation, username)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT DO NOTHING
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.password_hash)
        .bind(&employee.affiliation)
        .bind(&employee.username)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to insert employee")?;
    Ok(())
}

/// Look up a single employee by email.
///
/// Returns `Ok(None)` when no row matches; callers answer that as Not Found.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn employee_by_email(pool: &PgPool, email: &str) -> Result<Option<Employee>> {
    let query = r"
        SELECT first_name, last_name, e_mail, password_hash, affiliation, username, admin
        FROM employee
        WHERE e_mail = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to look up employee")?;
    Ok(row.map(|row| employee_from_row(&row)))
}

/// List every employee, unordered. An empty table is a valid empty list.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn all_employees(pool: &PgPool) -> Result<Vec<Employee>> {
    let query = r"
        SELECT first_name, last_name, e_mail, password_hash, affiliation, username, admin
        FROM employee
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list employees")?;
    Ok(rows.iter().map(employee_from_row).collect())
}

/// Insert a scheduling subject; duplicates are a silent no-op.
///
/// # Errors
///
/// Returns an error when the statement fails for any reason other than a
/// uniqueness conflict.
pub async fn insert_subject(pool: &PgPool, name: &str) -> Result<()> {
    let query = "INSERT INTO subjects (name) VALUES ($1) ON CONFLICT DO NOTHING";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(name)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to insert subject")?;
    Ok(())
}

/// Look up a single subject by name.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn subject_by_name(pool: &PgPool, name: &str) -> Result<Option<Subject>> {
    let query = "SELECT name FROM subjects WHERE name = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(name)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to look up subject")?;
    Ok(row.map(|row| Subject {
        name: row.get("name"),
    }))
}

/// List every subject, unordered.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn all_subjects(pool: &PgPool) -> Result<Vec<Subject>> {
    let query = "SELECT name FROM subjects";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list subjects")?;
    Ok(rows
        .iter()
        .map(|row| Subject {
            name: row.get("name"),
        })
        .collect())
}

fn employee_from_row(row: &PgRow) -> Employee {
    Employee {
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("e_mail"),
        password_hash: row.get("password_hash"),
        affiliation: row.get("affiliation"),
        username: row.get("username"),
        admin: row.get("admin"),
    }
}

#[cfg(test)]
mod tests {
    use super::{NewEmployee, Subject};

    #[test]
    fn new_employee_holds_values() {
        let employee = NewEmployee {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$2b$14$hash".to_string(),
            affiliation: "Engineering".to_string(),
            username: None,
        };
        assert_eq!(employee.email, "ada@example.com");
        assert!(employee.username.is_none());
    }

    #[test]
    fn subject_equality_is_by_name() {
        let a = Subject {
            name: "maths".to_string(),
        };
        let b = Subject {
            name: "maths".to_string(),
        };
        assert_eq!(a, b);
    }
}
