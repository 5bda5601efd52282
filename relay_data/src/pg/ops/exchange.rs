use log::debug;
use sqlx::PgPool;

use crate::pg::models::{
    ExchangeId,
    NewRequestRow,
    NewResponseRow,
    StoredRequest,
    StoredResponse,
};

/// Records one request/response pair in a single transaction.
///
/// Returning early on any error drops `tx`, which rolls back whatever was
/// already written. Nothing is visible to other connections until commit.
pub async fn insert(
    request: &NewRequestRow,
    response: &NewResponseRow,
    pool: &PgPool,
) -> Result<ExchangeId, sqlx::Error> {

    let mut tx = pool.begin().await?;

    let request_id: i64 = sqlx::query_scalar(r#"
        insert into requests (method, url, headers)
        values ($1, $2, $3)
        returning id
        "#)
        .bind(request.method.as_str())
        .bind(request.url.as_str())
        .bind(request.headers.as_str())
        .fetch_one(&mut *tx)
        .await?;

    sqlx::query(r#"
        insert into responses (request_id, status, headers, length)
        values ($1, $2, $3, $4)
        "#)
        .bind(request_id)
        .bind(response.status)
        .bind(response.headers.as_str())
        .bind(response.length)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    debug!("Committed request #{} with its response", request_id);

    Ok(ExchangeId { request_id })
}

pub async fn find_by_request_id(
    request_id: i64,
    pool: &PgPool,
) -> Result<Option<(StoredRequest, StoredResponse)>, sqlx::Error> {

    let row: Option<(i64, String, String, String, i32, String, i64)> = sqlx::query_as(r#"
        select
            req.id,
            req.method,
            req.url,
            req.headers,
            resp.status,
            resp.headers,
            resp.length
        from
            requests req
            inner join responses resp
                on resp.request_id = req.id
        where
            req.id = $1
        "#)
        .bind(request_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|x| {
        let request = StoredRequest {
            id: x.0,
            method: x.1,
            url: x.2,
            headers: x.3,
        };
        let response = StoredResponse {
            request_id: x.0,
            status: x.4,
            headers: x.5,
            length: x.6,
        };
        (request, response)
    }))
}

pub async fn count_by_url(url: &str, pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("select count(*) from requests where url = $1")
        .bind(url)
        .fetch_one(pool)
        .await
}
