//! Postgres destination store.
//!
//! Two tables, two policies: `med_stat` is truncate-and-append inside a
//! single transaction (a failure rolls both back, never leaving the table
//! half-truncated); `med_stat_summary` is insert-if-date-absent in its own
//! transaction, and the skip decision is logged.

use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use medstat_model::schema::{DETAIL_TABLE, SUMMARY_TABLE, detail_columns};
use medstat_model::{DetailRecord, SummaryRecord};

use crate::error::{Result, StoreError};

/// Rows per INSERT statement; 22 binds per row stays well under the
/// Postgres parameter limit.
const INSERT_CHUNK: usize = 1000;

pub struct DestinationStore {
    pool: PgPool,
}

impl DestinationStore {
    /// Connect with a single connection; the pipeline is the only writer
    /// and runs serially.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(StoreError::Connect)?;
        Ok(Self { pool })
    }

    /// Truncate the detail table and append all records, committed together
    /// or not at all.
    pub async fn replace_detail(&self, records: &[DetailRecord]) -> Result<u64> {
        let mut tx = self.pool.begin().await.map_err(|source| StoreError::Detail {
            stage: "begin",
            source,
        })?;
        info!(table = DETAIL_TABLE, "truncating detail table");
        sqlx::query(&format!("TRUNCATE TABLE {DETAIL_TABLE}"))
            .execute(&mut *tx)
            .await
            .map_err(|source| StoreError::Detail {
                stage: "truncate",
                source,
            })?;
        let mut inserted = 0u64;
        for chunk in records.chunks(INSERT_CHUNK) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(insert_prefix());
            builder.push_values(chunk, |mut row, record| {
                row.push_bind(record.mk.clone())
                    .push_bind(record.hn.clone())
                    .push_bind(record.case_no)
                    .push_bind(record.med_number)
                    .push_bind(record.med_description.clone())
                    .push_bind(record.order_id.clone())
                    .push_bind(record.med_priority.clone())
                    .push_bind(record.med_type.clone())
                    .push_bind(record.department.clone())
                    .push_bind(record.clinic_ward.clone())
                    .push_bind(record.user_staff.clone())
                    .push_bind(record.new_date)
                    .push_bind(record.new_time)
                    .push_bind(record.active.clone())
                    .push_bind(record.final_time.clone())
                    .push_bind(record.new_to_active_minutes)
                    .push_bind(record.active_to_final_minutes)
                    .push_bind(record.new_to_final_minutes)
                    .push_bind(record.received_time.clone())
                    .push_bind(record.summary_interval)
                    .push_bind(record.transport_method.clone())
                    .push_bind(record.is_excluded);
            });
            let result = builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|source| StoreError::Detail {
                    stage: "insert",
                    source,
                })?;
            inserted += result.rows_affected();
        }
        tx.commit().await.map_err(|source| StoreError::Detail {
            stage: "commit",
            source,
        })?;
        info!(table = DETAIL_TABLE, rows = inserted, "detail load committed");
        Ok(inserted)
    }

    /// Insert the summary row unless one already exists for its report
    /// date. Returns whether a row was inserted.
    pub async fn insert_summary_if_absent(&self, summary: &SummaryRecord) -> Result<bool> {
        let existing: Option<NaiveDate> = sqlx::query_scalar(&format!(
            "SELECT report_date FROM {SUMMARY_TABLE} WHERE report_date = $1"
        ))
        .bind(summary.report_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|source| StoreError::Summary {
            stage: "check",
            source,
        })?;
        if existing.is_some() {
            info!(
                table = SUMMARY_TABLE,
                report_date = %summary.report_date,
                "summary row already present, skipping insert"
            );
            return Ok(false);
        }
        sqlx::query(&format!(
            "INSERT INTO {SUMMARY_TABLE} (report_date, target_count, overall_count) \
             VALUES ($1, $2, $3)"
        ))
        .bind(summary.report_date)
        .bind(summary.target_count)
        .bind(summary.overall_count)
        .execute(&self.pool)
        .await
        .map_err(|source| StoreError::Summary {
            stage: "insert",
            source,
        })?;
        info!(
            table = SUMMARY_TABLE,
            report_date = %summary.report_date,
            target = summary.target_count,
            overall = summary.overall_count,
            "summary row inserted"
        );
        Ok(true)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn insert_prefix() -> String {
    let columns: Vec<&str> = detail_columns().iter().map(|column| column.name).collect();
    format!("INSERT INTO {DETAIL_TABLE} ({}) ", columns.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_prefix_lists_the_destination_columns_in_order() {
        let prefix = insert_prefix();
        assert!(prefix.starts_with("INSERT INTO med_stat (mk, hn, case_no, med_number"));
        assert!(prefix.contains("summary_interval, transport_method, is_excluded"));
        // One name per destination column.
        let inner = prefix
            .trim_start_matches("INSERT INTO med_stat (")
            .trim_end_matches(") ");
        assert_eq!(inner.split(", ").count(), detail_columns().len());
    }
}
