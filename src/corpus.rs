use std::collections::BTreeMap;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::api::FetchError;

/// One readability-leveled rendition of a group's text.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRow {
    /// Identifier of the originating group.
    pub slug: String,
    pub text: String,
    /// Discrete grade label, persisted as `y`.
    pub grade: i64,
    /// Continuous Lexile readability label, persisted as `y_lexile`.
    pub lexile: f64,
}

/// A group whose fetch came back non-200. The position in the slug sequence
/// is what gets printed; the slug itself keys the retry pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub index: usize,
    pub slug: String,
}

/// Fetch every slug in order, concatenating article rows as they arrive.
/// A non-200 response records a failure and moves on; any other error aborts
/// the whole batch. Failures keep encounter order.
pub fn fetch_all_articles<F>(
    slugs: &[String],
    mut fetch: F,
) -> Result<(Vec<ArticleRow>, Vec<FetchFailure>)>
where
    F: FnMut(&str) -> Result<Vec<ArticleRow>, FetchError>,
{
    let pb = ProgressBar::new(slugs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut rows = Vec::new();
    let mut failures = Vec::new();

    for (index, slug) in slugs.iter().enumerate() {
        match fetch(slug) {
            Ok(articles) => rows.extend(articles),
            Err(FetchError::NotOk { url, status }) => {
                warn!("{} returned {}", url, status);
                failures.push(FetchFailure {
                    index,
                    slug: slug.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok((rows, failures))
}

/// Frequency of each grade label.
pub fn value_counts(rows: &[ArticleRow]) -> BTreeMap<i64, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.grade).or_insert(0) += 1;
    }
    counts
}

/// Keep only rows whose grade occurs at least `min_count` times. Returns the
/// kept rows plus the label distribution of what was removed, for reporting.
pub fn filter_small_categories(
    rows: Vec<ArticleRow>,
    min_count: usize,
) -> (Vec<ArticleRow>, BTreeMap<i64, usize>) {
    let counts = value_counts(&rows);
    let (kept, removed): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .partition(|r| counts[&r.grade] >= min_count);
    (kept, value_counts(&removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn row(slug: &str, grade: i64) -> ArticleRow {
        ArticleRow {
            slug: slug.to_string(),
            text: format!("text for {}", slug),
            grade,
            lexile: 100.0 * grade as f64,
        }
    }

    fn not_ok(slug: &str) -> FetchError {
        FetchError::NotOk {
            url: format!("https://example.com/{}", slug),
            status: StatusCode::FORBIDDEN,
        }
    }

    #[test]
    fn batch_records_failed_positions() {
        let slugs: Vec<String> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let (rows, failures) = fetch_all_articles(&slugs, |slug| match slug {
            "b" | "d" => Err(not_ok(slug)),
            _ => Ok(vec![row(slug, 5)]),
        })
        .unwrap();

        let fetched: Vec<&str> = rows.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(fetched, vec!["a", "c", "e"]);
        let indices: Vec<usize> = failures.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![1, 3]);
        let failed: Vec<&str> = failures.iter().map(|f| f.slug.as_str()).collect();
        assert_eq!(failed, vec!["b", "d"]);
    }

    #[test]
    fn retry_appends_after_first_pass() {
        let slugs: Vec<String> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let (mut rows, failures) = fetch_all_articles(&slugs, |slug| match slug {
            "b" | "d" => Err(not_ok(slug)),
            _ => Ok(vec![row(slug, 5)]),
        })
        .unwrap();

        let retry_slugs: Vec<String> = failures.into_iter().map(|f| f.slug).collect();
        let (retry_rows, retry_failures) =
            fetch_all_articles(&retry_slugs, |slug| Ok(vec![row(slug, 5)])).unwrap();
        assert!(retry_failures.is_empty());
        rows.extend(retry_rows);

        let fetched: Vec<&str> = rows.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(fetched, vec!["a", "c", "e", "b", "d"]);
    }

    #[test]
    fn transport_error_aborts_batch() {
        let slugs = vec!["a".to_string()];
        let result = fetch_all_articles(&slugs, |slug| {
            Err(FetchError::Decode {
                url: slug.to_string(),
                source: serde_json::from_str::<()>("not json").unwrap_err(),
            })
        });
        assert!(result.is_err());
    }

    #[test]
    fn filter_drops_rare_labels() {
        let mut rows = Vec::new();
        rows.extend((0..50).map(|_| row("a", 1)));
        rows.extend((0..10).map(|_| row("b", 2)));
        rows.extend((0..35).map(|_| row("c", 3)));

        let (kept, dropped) = filter_small_categories(rows, 30);

        let counts = value_counts(&kept);
        assert_eq!(counts.get(&1), Some(&50));
        assert_eq!(counts.get(&2), None);
        assert_eq!(counts.get(&3), Some(&35));
        assert_eq!(dropped.get(&2), Some(&10));
        assert_eq!(dropped.len(), 1);
    }

    #[test]
    fn filter_keeps_everything_above_threshold() {
        let rows: Vec<ArticleRow> = (0..40).map(|_| row("a", 4)).collect();
        let (kept, dropped) = filter_small_categories(rows, 30);
        assert_eq!(kept.len(), 40);
        assert!(dropped.is_empty());
    }
}
