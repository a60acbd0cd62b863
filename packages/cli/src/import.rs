use std::path::Path;

use anyhow::{Context, bail};
use encoding_rs::GBK;
use sea_orm::ActiveValue::Set;
use sea_orm::EntityTrait;

use server::entity::candidate;

/// One parsed import row. The column layout is fixed; extra columns are
/// ignored.
#[derive(Debug, PartialEq)]
pub struct CandidateRow {
    pub username: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub bachelor_school: Option<String>,
    pub major: Option<String>,
    pub degree: Option<String>,
    pub test_score_of_general_ability: Option<f64>,
    pub paper_score: Option<f64>,
}

/// Decode a GBK byte stream and parse it as semicolon-separated CSV,
/// one candidate per row, no header.
pub fn parse_candidate_rows(bytes: &[u8]) -> anyhow::Result<Vec<CandidateRow>> {
    let (text, _, had_errors) = GBK.decode(bytes);
    if had_errors {
        bail!("file is not valid GBK-encoded text");
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let line = i + 1;
        let record = result.with_context(|| format!("failed to parse row {line}"))?;
        if record.len() < 8 {
            bail!(
                "row {line} has {} columns, expected at least 8",
                record.len()
            );
        }

        let Some(username) = field(&record, 0) else {
            bail!("row {line} has an empty name column");
        };

        rows.push(CandidateRow {
            username,
            city: field(&record, 1),
            phone: field(&record, 2),
            bachelor_school: field(&record, 3),
            major: field(&record, 4),
            degree: field(&record, 5),
            test_score_of_general_ability: score(&record, 6)
                .with_context(|| format!("row {line} has an invalid general ability score"))?,
            paper_score: score(&record, 7)
                .with_context(|| format!("row {line} has an invalid paper score"))?,
        });
    }

    Ok(rows)
}

fn field(record: &csv::StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn score(record: &csv::StringRecord, index: usize) -> anyhow::Result<Option<f64>> {
    match record.get(index).map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => {
            let value = raw
                .parse::<f64>()
                .with_context(|| format!("'{raw}' is not a number"))?;
            Ok(Some(value))
        }
    }
}

pub async fn run(path: &Path, database_url: &str) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let rows = parse_candidate_rows(&bytes)?;

    let db = server::database::init_db(database_url)
        .await
        .context("failed to connect to the database")?;

    let mut imported = 0usize;
    for row in rows {
        let now = chrono::Utc::now();
        let model = candidate::ActiveModel {
            username: Set(row.username.clone()),
            city: Set(row.city),
            phone: Set(row.phone),
            bachelor_school: Set(row.bachelor_school),
            major: Set(row.major),
            degree: Set(row.degree),
            test_score_of_general_ability: Set(row.test_score_of_general_ability),
            paper_score: Set(row.paper_score),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        candidate::Entity::insert(model)
            .exec_without_returning(&db)
            .await
            .with_context(|| format!("failed to insert candidate '{}'", row.username))?;
        imported += 1;
    }

    println!("Imported {imported} candidates from {}", path.display());
    Ok(())
}
