use log::info;
use sqlx::PgPool;

const CREATE_REQUESTS: &str = r#"
    create table if not exists requests (
        id      bigserial primary key,
        method  text not null,
        url     text not null,
        headers text not null
    )
"#;

// One response per request; the row cannot exist without its request.
const CREATE_RESPONSES: &str = r#"
    create table if not exists responses (
        request_id bigint primary key references requests (id),
        status     integer not null check (status between 100 and 999),
        headers    text not null,
        length     bigint not null
    )
"#;

/// Creates the `requests` and `responses` tables when they do not exist yet.
pub async fn ensure(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(CREATE_REQUESTS)
        .execute(&mut *tx)
        .await?;

    sqlx::query(CREATE_RESPONSES)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!("Relay schema is in place");
    Ok(())
}
