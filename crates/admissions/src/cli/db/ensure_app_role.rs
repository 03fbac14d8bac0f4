use clap::Args;
use sqlx::{PgConnection, query, query_scalar};
use studio_admissions::database;
use tracing::info;

const ROLE_FLAGS: &str = "NOSUPERUSER NOCREATEDB NOCREATEROLE NOREPLICATION NOBYPASSRLS";

#[derive(Debug, Args)]
pub(crate) struct EnsureAppRoleArgs {
    /// Administrative PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Runtime role the admission engine connects as
    #[arg(long, default_value = "studio_admissions_app")]
    role_name: String,

    /// Password to set on the runtime role
    #[arg(long, env = "APP_DB_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(args: EnsureAppRoleArgs) -> Result<(), String> {
    if args.role_name.trim().is_empty() {
        return Err("role_name cannot be empty".to_string());
    }

    if args.password.trim().is_empty() {
        return Err("password cannot be empty".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|error| format!("failed to start transaction: {error}"))?;

    let role_ident = quote(&mut tx, "SELECT quote_ident($1)", &args.role_name).await?;
    let password_lit = quote(&mut tx, "SELECT quote_literal($1)", &args.password).await?;

    let role_exists: bool =
        query_scalar("SELECT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = $1)")
            .bind(&args.role_name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|error| format!("failed to check role existence: {error}"))?;

    let database_ident: String = query_scalar("SELECT quote_ident(current_database())")
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to resolve database name: {error}"))?;

    for sql in role_statements(&role_ident, &password_lit, role_exists, &database_ident) {
        query(&sql)
            .execute(&mut *tx)
            .await
            .map_err(|error| format!("failed to apply role statement: {error}"))?;
    }

    tx.commit()
        .await
        .map_err(|error| format!("failed to commit changes: {error}"))?;

    info!(role = %args.role_name, created = !role_exists, "ensured app role");
    println!("ensured app role: {}", args.role_name);

    Ok(())
}

/// Quote a value server-side; role names and passwords cannot be bound in DDL.
async fn quote(conn: &mut PgConnection, sql: &str, value: &str) -> Result<String, String> {
    query_scalar(sql)
        .bind(value)
        .fetch_one(conn)
        .await
        .map_err(|error| format!("failed to quote value: {error}"))
}

/// Statements that create or update the role and grant it access to the
/// roster tables, now and for tables added by later migrations.
fn role_statements(
    role_ident: &str,
    password_lit: &str,
    role_exists: bool,
    database_ident: &str,
) -> Vec<String> {
    let verb = if role_exists { "ALTER" } else { "CREATE" };

    vec![
        format!("{verb} ROLE {role_ident} LOGIN PASSWORD {password_lit} {ROLE_FLAGS}"),
        format!("GRANT CONNECT ON DATABASE {database_ident} TO {role_ident}"),
        format!("GRANT USAGE ON SCHEMA public TO {role_ident}"),
        format!(
            "GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {role_ident}"
        ),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA public \
             GRANT SELECT, INSERT, UPDATE, DELETE ON TABLES TO {role_ident}"
        ),
    ]
}
