use std::collections::BTreeMap;

use anyhow::Result;

use crate::api::{ApiClient, GroupRecord};
use crate::clean::clean_text;
use crate::config::PrepConfig;
use crate::corpus::{fetch_all_articles, filter_small_categories, ArticleRow};
use crate::split::stratified_split;
use crate::stats;

pub struct PreparedCorpus {
    pub text: Vec<ArticleRow>,
    pub train: Vec<ArticleRow>,
    pub test: Vec<ArticleRow>,
}

/// The whole preparation pass: enumerate groups, fetch texts with one retry
/// over the failed slugs, map labels, filter rare grades, clean, split, and
/// print the diagnostics block.
pub fn prepare_corpus(client: &ApiClient, config: &PrepConfig) -> Result<PreparedCorpus> {
    println!("Fetching content groups...");
    let groups = client.fetch_groups(config.group_limit)?;

    println!("Language distribution:");
    print_language_counts(&groups);

    let groups: Vec<GroupRecord> = groups
        .into_iter()
        .filter(|g| g.language.as_deref() == Some(config.language.as_str()))
        .filter(|g| !config.excluded_slugs.contains(&g.slug))
        .collect();

    println!(
        "After keeping '{}' groups and dropping excluded slugs:",
        config.language
    );
    print_language_counts(&groups);
    println!("#Groups = {}", groups.len());

    let slugs: Vec<String> = groups.into_iter().map(|g| g.slug).collect();

    println!("Fetching texts...");
    let (mut rows, failures) = fetch_all_articles(&slugs, |slug| client.fetch_articles(slug))?;

    if !failures.is_empty() {
        let indices: Vec<usize> = failures.iter().map(|f| f.index).collect();
        println!("Failed group indices: {:?}", indices);

        println!("Retrying failed groups...");
        let retry_slugs: Vec<String> = failures.into_iter().map(|f| f.slug).collect();
        let (retry_rows, retry_failures) =
            fetch_all_articles(&retry_slugs, |slug| client.fetch_articles(slug))?;

        if !retry_failures.is_empty() {
            let dropped: Vec<&str> = retry_failures.iter().map(|f| f.slug.as_str()).collect();
            println!("Still failing after retry, dropped from corpus: {:?}", dropped);
        }

        rows.extend(retry_rows);
    }
    println!("#Texts = {}", rows.len());

    println!("Removing too small grade categories...");
    let (mut rows, removed) = filter_small_categories(rows, config.min_category_count);
    println!("Removed data:");
    for (grade, count) in &removed {
        println!("  grade {}: {}", grade, count);
    }
    println!("#Texts = {}", rows.len());

    println!("Removing HTML tags, Markdown image tags, and dash runs...");
    for row in &mut rows {
        row.text = clean_text(&row.text);
    }

    println!("Train-test split...");
    let text = rows.clone();
    let (train, test) = stratified_split(rows, config.test_fraction, config.seed);

    stats::print_report(&text, &train, &test);

    Ok(PreparedCorpus { text, train, test })
}

fn print_language_counts(groups: &[GroupRecord]) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for g in groups {
        *counts.entry(g.language.as_deref().unwrap_or("<none>")).or_insert(0) += 1;
    }
    for (language, count) in counts {
        println!("  {}: {}", language, count);
    }
}
