//! Aggregation queries
//!
//! Dashboard counts and graph data. Grouping happens in SQL; this module
//! only reshapes rows into response structures. Every per-domain map is
//! pre-seeded with all six canonical keys so absent domains report 0.

use placetrack_common::domain;
use placetrack_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashSet};

fn seeded_domain_map() -> BTreeMap<String, i64> {
    domain::CANONICAL_KEYS
        .iter()
        .map(|k| (k.to_string(), 0))
        .collect()
}

fn merge_rows(map: &mut BTreeMap<String, i64>, rows: Vec<(String, i64)>) {
    for (label, count) in rows {
        map.insert(domain::canonical_key(&label), count);
    }
}

/// CASE expression classifying a student row's batch number prefix into a
/// canonical domain key. Built from the normalizer's tables; no request
/// input reaches the SQL text.
fn batch_prefix_case() -> String {
    let mut arms = String::new();
    for key in domain::CANONICAL_KEYS {
        if let Some(prefix) = domain::batch_prefix(key) {
            arms.push_str(&format!("WHEN batch_no LIKE '{}%' THEN '{}' ", prefix, key));
        }
    }
    format!("CASE {}END", arms)
}

async fn prefix_counts(pool: &SqlitePool, where_clause: &str) -> Result<BTreeMap<String, i64>> {
    let case = batch_prefix_case();
    let sql = format!(
        "SELECT {case} AS domain, COUNT(*) AS count FROM students WHERE {where_clause} GROUP BY {case}",
    );

    let rows: Vec<(Option<String>, i64)> = sqlx::query_as(&sql).fetch_all(pool).await?;
    let mut map = seeded_domain_map();
    for (key, count) in rows {
        // Batch numbers with no recognized prefix fall outside every domain
        if let Some(key) = key {
            map.insert(key, count);
        }
    }
    Ok(map)
}

/// Batches per domain, for `/batches/totalBatches`.
pub async fn batches_per_domain(pool: &SqlitePool) -> Result<BTreeMap<String, i64>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT domain, COUNT(*) AS count FROM batches WHERE domain IS NOT NULL GROUP BY domain",
    )
    .fetch_all(pool)
    .await?;

    let mut map = seeded_domain_map();
    merge_rows(&mut map, rows);
    Ok(map)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_batches_per_domain: BTreeMap<String, i64>,
    pub upcoming_batches_per_domain: BTreeMap<String, i64>,
    pub placed_students_per_domain: BTreeMap<String, i64>,
    pub yet_to_place_students_per_domain: BTreeMap<String, i64>,
}

/// Four-query variant behind `/students/stats`.
pub async fn student_stats(pool: &SqlitePool) -> Result<DashboardStats> {
    let mut total_batches = seeded_domain_map();
    merge_rows(
        &mut total_batches,
        sqlx::query_as(
            "SELECT domain, COUNT(*) AS count FROM batches WHERE domain IS NOT NULL GROUP BY domain",
        )
        .fetch_all(pool)
        .await?,
    );

    let mut upcoming_batches = seeded_domain_map();
    merge_rows(
        &mut upcoming_batches,
        sqlx::query_as(
            "SELECT domain, COUNT(*) AS count FROM batches WHERE domain IS NOT NULL AND start_date > date('now') GROUP BY domain",
        )
        .fetch_all(pool)
        .await?,
    );

    let mut placed = seeded_domain_map();
    merge_rows(
        &mut placed,
        sqlx::query_as(
            r#"
            SELECT b.domain, COUNT(*) AS count
            FROM students s
            JOIN batches b ON s.batch_id = b.id
            WHERE s.placement = 'Placed' AND b.domain IS NOT NULL
            GROUP BY b.domain
            "#,
        )
        .fetch_all(pool)
        .await?,
    );

    let mut yet_to_place = seeded_domain_map();
    merge_rows(
        &mut yet_to_place,
        sqlx::query_as(
            r#"
            SELECT b.domain, COUNT(*) AS count
            FROM students s
            JOIN batches b ON s.batch_id = b.id
            WHERE s.placement IN ('Yet to Place', 'Not Placed') AND b.domain IS NOT NULL
            GROUP BY b.domain
            "#,
        )
        .fetch_all(pool)
        .await?,
    );

    Ok(DashboardStats {
        total_batches_per_domain: total_batches,
        upcoming_batches_per_domain: upcoming_batches,
        placed_students_per_domain: placed,
        yet_to_place_students_per_domain: yet_to_place,
    })
}

/// Single-query CASE variant behind `/students/dashboard/stats`.
pub async fn combined_dashboard_stats(pool: &SqlitePool) -> Result<DashboardStats> {
    let rows: Vec<(String, i64, i64, i64, i64)> = sqlx::query_as(
        r#"
        SELECT
            b.domain,
            COUNT(DISTINCT b.id) AS total_batches,
            SUM(CASE WHEN b.start_date > date('now') THEN 1 ELSE 0 END) AS upcoming_batches,
            SUM(CASE WHEN s.placement = 'Placed' THEN 1 ELSE 0 END) AS placed_students,
            SUM(CASE WHEN s.placement IN ('Yet to Place', 'Not Placed') THEN 1 ELSE 0 END) AS yet_to_place_students
        FROM batches b
        LEFT JOIN students s ON b.id = s.batch_id
        WHERE b.domain IS NOT NULL
        GROUP BY b.domain
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut stats = DashboardStats {
        total_batches_per_domain: seeded_domain_map(),
        upcoming_batches_per_domain: seeded_domain_map(),
        placed_students_per_domain: seeded_domain_map(),
        yet_to_place_students_per_domain: seeded_domain_map(),
    };

    for (label, total, upcoming, placed, yet_to_place) in rows {
        let key = domain::canonical_key(&label);
        stats.total_batches_per_domain.insert(key.clone(), total);
        stats.upcoming_batches_per_domain.insert(key.clone(), upcoming);
        stats.placed_students_per_domain.insert(key.clone(), placed);
        stats.yet_to_place_students_per_domain.insert(key, yet_to_place);
    }

    Ok(stats)
}

/// One month of placement-graph output.
#[derive(Debug, Serialize)]
pub struct MonthPoint {
    pub name: String,
    pub value: i64,
}

/// Month point with the average placed package alongside the count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPackagePoint {
    pub name: String,
    pub value: i64,
    pub avg_package: Option<f64>,
}

async fn monthly_placements(pool: &SqlitePool, year: i32) -> Result<Vec<(i64, i64, Option<f64>)>> {
    // substr keeps this working for both YYYY-MM and YYYY-MM-DD values
    Ok(sqlx::query_as(
        r#"
        SELECT
            CAST(substr(placed_month, 6, 2) AS INTEGER) AS month,
            COUNT(*) AS student_count,
            AVG(salary) AS avg_package
        FROM students
        WHERE placement = 'Placed'
          AND placed_month IS NOT NULL
          AND substr(placed_month, 1, 4) = ?
        GROUP BY month
        ORDER BY month
        "#,
    )
    .bind(format!("{:04}", year))
    .fetch_all(pool)
    .await?)
}

/// Monthly placement counts plus average package for one calendar year;
/// all twelve months present in Jan-Dec order, missing months at 0/null.
pub async fn placement_graph_with_packages(
    pool: &SqlitePool,
    year: i32,
) -> Result<Vec<MonthPackagePoint>> {
    let rows = monthly_placements(pool, year).await?;

    let mut filled: Vec<MonthPackagePoint> = domain::MONTH_NAMES
        .iter()
        .map(|name| MonthPackagePoint {
            name: name.to_string(),
            value: 0,
            avg_package: None,
        })
        .collect();

    for (month, count, avg_package) in rows {
        if (1..=12).contains(&month) {
            let slot = &mut filled[(month - 1) as usize];
            slot.value = count;
            slot.avg_package = avg_package;
        }
    }
    Ok(filled)
}

/// Count-only variant used by `/students/graph-data`.
pub async fn placement_graph(pool: &SqlitePool, year: i32) -> Result<Vec<MonthPoint>> {
    let with_packages = placement_graph_with_packages(pool, year).await?;
    Ok(with_packages
        .into_iter()
        .map(|p| MonthPoint {
            name: p.name,
            value: p.value,
        })
        .collect())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerCounts {
    pub ongoing_batches_per_domain: BTreeMap<String, i64>,
    pub live_students_per_domain: BTreeMap<String, i64>,
    pub trainer_count_per_domain: BTreeMap<String, i64>,
}

/// Owner dashboard counts: ongoing batches, live students (classified by
/// batch number prefix), distinct trainers.
pub async fn owner_counts(pool: &SqlitePool) -> Result<OwnerCounts> {
    let mut ongoing_batches = seeded_domain_map();
    merge_rows(
        &mut ongoing_batches,
        sqlx::query_as(
            "SELECT domain, COUNT(*) AS count FROM batches WHERE status = 'Ongoing' AND domain IS NOT NULL GROUP BY domain",
        )
        .fetch_all(pool)
        .await?,
    );

    let live_students = prefix_counts(pool, "status = 'Ongoing'").await?;

    let mut trainer_counts = seeded_domain_map();
    merge_rows(
        &mut trainer_counts,
        sqlx::query_as(
            "SELECT domain, COUNT(DISTINCT trainer_name) AS count FROM batches WHERE domain IS NOT NULL GROUP BY domain",
        )
        .fetch_all(pool)
        .await?,
    );

    Ok(OwnerCounts {
        ongoing_batches_per_domain: ongoing_batches,
        live_students_per_domain: live_students,
        trainer_count_per_domain: trainer_counts,
    })
}

/// One bar of the owner placed/yet-to-place graphs.
#[derive(Debug, Serialize)]
pub struct DomainPoint {
    pub name: String,
    pub students: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerGraphs {
    pub placed_data: Vec<DomainPoint>,
    pub yet_to_place_data: Vec<DomainPoint>,
}

fn to_chart_points(map: BTreeMap<String, i64>) -> Vec<DomainPoint> {
    domain::CANONICAL_KEYS
        .iter()
        .map(|key| DomainPoint {
            name: domain::chart_label(key).to_string(),
            students: map.get(*key).copied().unwrap_or(0),
        })
        .collect()
}

pub async fn owner_graphs(pool: &SqlitePool) -> Result<OwnerGraphs> {
    let placed = prefix_counts(pool, "placement = 'Placed'").await?;
    let yet_to_place = prefix_counts(pool, "placement IN ('Yet to Place', 'Not Placed')").await?;

    Ok(OwnerGraphs {
        placed_data: to_chart_points(placed),
        yet_to_place_data: to_chart_points(yet_to_place),
    })
}

/// EPIC status counts per batch number; every batch carries all four
/// statuses, empty stored statuses count as Capable, and statuses outside
/// the four are dropped.
pub async fn epic_stats(pool: &SqlitePool) -> Result<BTreeMap<String, BTreeMap<String, i64>>> {
    let rows: Vec<(String, String, i64)> = sqlx::query_as(
        r#"
        SELECT
            batch_no,
            COALESCE(NULLIF(epic_status, ''), 'Capable') AS epic_status,
            COUNT(*) AS count
        FROM students
        WHERE batch_no IS NOT NULL AND batch_no != ''
        GROUP BY batch_no, COALESCE(NULLIF(epic_status, ''), 'Capable')
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut stats: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();
    for (batch_no, status, count) in rows {
        let entry = stats.entry(batch_no).or_insert_with(|| {
            domain::EPIC_STATUSES
                .iter()
                .map(|s| (s.to_string(), 0))
                .collect()
        });
        if domain::EPIC_STATUSES.contains(&status.as_str()) {
            entry.insert(status, count);
        }
    }
    Ok(stats)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmeDashboard {
    pub total_batches: i64,
    pub total_students: i64,
    pub ongoing_count: i64,
    pub completed_count: i64,
    pub placed: i64,
    pub yet_to_place: i64,
    pub not_placed: i64,
    pub epic_count_map: BTreeMap<String, i64>,
}

/// Per-domain SME dashboard. The caller validates the domain key; the
/// counting happens in the application layer over the domain's rows.
pub async fn sme_dashboard(pool: &SqlitePool, domain_key: &str) -> Result<SmeDashboard> {
    let rows: Vec<(Option<String>, Option<String>, String, String)> = sqlx::query_as(
        "SELECT batch_no, status, placement, epic_status FROM students WHERE LOWER(domain) = ?",
    )
    .bind(domain_key.to_lowercase())
    .fetch_all(pool)
    .await?;

    let mut batch_numbers: HashSet<&str> = HashSet::new();
    let mut ongoing = 0;
    let mut completed = 0;
    let mut placed = 0;
    let mut yet_to_place = 0;
    let mut not_placed = 0;
    let mut epic_count_map: BTreeMap<String, i64> = BTreeMap::new();

    for (batch_no, status, placement, epic_status) in &rows {
        if let Some(batch_no) = batch_no.as_deref() {
            if !batch_no.is_empty() {
                batch_numbers.insert(batch_no);
            }
        }

        match status.as_deref().map(str::to_lowercase).as_deref() {
            Some("ongoing") => ongoing += 1,
            Some("completed") => completed += 1,
            _ => {}
        }

        match placement.as_str() {
            "Placed" => placed += 1,
            "Yet to Place" => yet_to_place += 1,
            "Not Placed" => not_placed += 1,
            _ => {}
        }

        let epic = if epic_status.trim().is_empty() {
            "Capable"
        } else {
            epic_status.as_str()
        };
        *epic_count_map.entry(epic.to_string()).or_insert(0) += 1;
    }

    Ok(SmeDashboard {
        total_batches: batch_numbers.len() as i64,
        total_students: rows.len() as i64,
        ongoing_count: ongoing,
        completed_count: completed,
        placed,
        yet_to_place,
        not_placed,
        epic_count_map,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainUsage {
    pub batch_count: i64,
    pub student_count: i64,
}

/// Batch and student counts per stored domain label (SME navigation).
pub async fn sme_domains(pool: &SqlitePool) -> Result<BTreeMap<String, DomainUsage>> {
    let rows: Vec<(String, i64, i64)> = sqlx::query_as(
        r#"
        SELECT domain, COUNT(DISTINCT batch_no) AS batch_count, COUNT(*) AS student_count
        FROM students
        WHERE domain IS NOT NULL AND domain != ''
        GROUP BY domain
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(label, batch_count, student_count)| {
            (
                label,
                DomainUsage {
                    batch_count,
                    student_count,
                },
            )
        })
        .collect())
}
