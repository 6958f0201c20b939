//! Development seeder: wipes both tables and loads one manager, three
//! employees, and ~30 days of weekday attendance. Run with
//! `cargo run --bin seed` against a throwaway database.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use sqlx::MySqlPool;

use attendly::auth::password::hash_password;
use attendly::engine::status::{AttendancePolicy, worked_hours};
use attendly::model::role::Role;
use attendly::utils::dates;

struct SeedUser {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
    employee_id: &'static str,
    department: &'static str,
}

const USERS: &[SeedUser] = &[
    SeedUser {
        name: "John Manager",
        email: "manager@company.com",
        password: "manager123",
        role: Role::Manager,
        employee_id: "MGR001",
        department: "Management",
    },
    SeedUser {
        name: "Alice Johnson",
        email: "alice@company.com",
        password: "employee123",
        role: Role::Employee,
        employee_id: "EMP001",
        department: "Engineering",
    },
    SeedUser {
        name: "Bob Smith",
        email: "bob@company.com",
        password: "employee123",
        role: Role::Employee,
        employee_id: "EMP002",
        department: "Engineering",
    },
    SeedUser {
        name: "Carol Williams",
        email: "carol@company.com",
        password: "employee123",
        role: Role::Employee,
        employee_id: "EMP003",
        department: "Sales",
    },
];

async fn insert_user(pool: &MySqlPool, user: &SeedUser) -> Result<u64> {
    let hashed = hash_password(user.password)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;

    let result = sqlx::query(
        "INSERT INTO users (name, email, password, role_id, employee_id, department) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user.name)
    .bind(user.email)
    .bind(&hashed)
    .bind(user.role.as_id())
    .bind(user.employee_id)
    .bind(user.department)
    .execute(pool)
    .await
    .with_context(|| format!("inserting {}", user.email))?;

    Ok(result.last_insert_id())
}

async fn seed_day(
    pool: &MySqlPool,
    policy: &AttendancePolicy,
    user_id: u64,
    date: NaiveDate,
    shape: u64,
) -> Result<()> {
    // Deterministic mix: 1/10 absent, 2/10 late, 1/10 half-day, rest on time.
    let (check_in, check_out) = match shape % 10 {
        0 => return Ok(()), // absent: no row at all
        1 | 2 => (
            date.and_hms_opt(9, 30, 0),
            date.and_hms_opt(17, 30, 0),
        ),
        3 => (date.and_hms_opt(9, 0, 0), date.and_hms_opt(12, 0, 0)),
        _ => (date.and_hms_opt(8, 55, 0), date.and_hms_opt(17, 30, 0)),
    };
    let (check_in, check_out) = match (check_in, check_out) {
        (Some(i), Some(o)) => (i, o),
        _ => return Ok(()),
    };

    let status = policy.status_for_check_in(check_in.time());
    let total_hours = worked_hours(check_in, check_out);
    let status = policy.status_for_check_out(status, total_hours);

    sqlx::query(
        "INSERT INTO attendance (user_id, date, check_in_time, check_out_time, status, total_hours) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(date)
    .bind(check_in)
    .bind(check_out)
    .bind(status)
    .bind(total_hours)
    .execute(pool)
    .await
    .with_context(|| format!("inserting attendance for user {user_id} on {date}"))?;

    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = MySqlPool::connect(&database_url)
        .await
        .context("connecting to database")?;

    println!("Clearing existing data...");
    sqlx::query("DELETE FROM attendance").execute(&pool).await?;
    sqlx::query("DELETE FROM users").execute(&pool).await?;

    println!("Creating users...");
    let mut employee_ids = Vec::new();
    for user in USERS {
        let id = insert_user(&pool, user).await?;
        println!("  {} ({})", user.email, user.employee_id);
        if user.role == Role::Employee {
            employee_ids.push(id);
        }
    }

    println!("Creating attendance records...");
    let policy = AttendancePolicy::default();
    let today = dates::today_local();
    let mut inserted = 0u32;

    for days_back in 0..30i64 {
        let date = today - Duration::days(days_back);
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }
        for (idx, &user_id) in employee_ids.iter().enumerate() {
            let shape = days_back as u64 + idx as u64 * 7;
            seed_day(&pool, &policy, user_id, date, shape).await?;
            inserted += 1;
        }
    }

    println!("Done: {} users, ~{inserted} attendance rows.", USERS.len());
    println!("Login: manager@company.com / manager123, alice@company.com / employee123");
    Ok(())
}
