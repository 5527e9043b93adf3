use itertools::Itertools;

use crate::corpus::{value_counts, ArticleRow};

pub struct Summary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

/// Count, min, max, mean, and sample standard deviation. Empty input yields
/// NaN for everything but the count.
pub fn summarize(values: &[f64]) -> Summary {
    let count = values.len();
    if count == 0 {
        return Summary {
            count,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            std: f64::NAN,
        };
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count < 2 {
        f64::NAN
    } else {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64).sqrt()
    };
    Summary {
        count,
        min,
        max,
        mean,
        std,
    }
}

/// Two-sample Kolmogorov-Smirnov test. Returns the statistic and the
/// asymptotic p-value. Used as a sanity check that stratifying on the grade
/// label did not skew the correlated Lexile distribution.
pub fn ks_2samp(a: &[f64], b: &[f64]) -> (f64, f64) {
    let (n, m) = (a.len(), b.len());
    if n == 0 || m == 0 {
        return (f64::NAN, f64::NAN);
    }

    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let mut i = 0;
    let mut j = 0;
    let mut d: f64 = 0.0;
    while i < n && j < m {
        let x = a[i].min(b[j]);
        while i < n && a[i] <= x {
            i += 1;
        }
        while j < m && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n as f64 - j as f64 / m as f64).abs());
    }

    let en = ((n * m) as f64 / (n + m) as f64).sqrt();
    let p = kolmogorov_sf((en + 0.12 + 0.11 / en) * d);
    (d, p)
}

/// Survival function of the Kolmogorov distribution,
/// Q(lambda) = 2 * sum_{j>=1} (-1)^(j-1) exp(-2 j^2 lambda^2).
fn kolmogorov_sf(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    let a2 = -2.0 * lambda * lambda;
    let mut fac = 2.0;
    let mut sum = 0.0;
    let mut prev_term = 0.0;
    for j in 1..=100 {
        let term = fac * (a2 * (j * j) as f64).exp();
        sum += term;
        if term.abs() <= 0.001 * prev_term || term.abs() <= 1.0e-8 * sum.abs() {
            return sum.clamp(0.0, 1.0);
        }
        fac = -fac;
        prev_term = term.abs();
    }
    // series failed to converge, which only happens when the samples are
    // effectively indistinguishable
    1.0
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Print the full diagnostics block: per-grade counts and percentages across
/// the three tables, Lexile summaries, and the train/test KS p-value.
pub fn print_report(text: &[ArticleRow], train: &[ArticleRow], test: &[ArticleRow]) {
    let text_counts = value_counts(text);
    let train_counts = value_counts(train);
    let test_counts = value_counts(test);

    println!("Grade label distribution");
    println!(
        "{:>6} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "grade", "#text", "%text", "#train", "%train", "#test", "%test"
    );
    for grade in text_counts.keys() {
        let t = text_counts[grade];
        let tr = train_counts.get(grade).copied().unwrap_or(0);
        let te = test_counts.get(grade).copied().unwrap_or(0);
        println!(
            "{:>6} {:>8} {:>8.2} {:>8} {:>8.2} {:>8} {:>8.2}",
            grade,
            t,
            percent(t, text.len()),
            tr,
            percent(tr, train.len()),
            te,
            percent(te, test.len()),
        );
    }
    println!();

    println!("Lexile label summary");
    println!(
        "{:>6} {:>7} {:>9} {:>9} {:>10} {:>10}",
        "table", "#", "min", "max", "mean", "std"
    );
    let tables = [("text", text), ("train", train), ("test", test)];
    for (name, rows) in tables {
        let lexiles = rows.iter().map(|r| r.lexile).collect_vec();
        let s = summarize(&lexiles);
        println!(
            "{:>6} {:>7} {:>9.1} {:>9.1} {:>10.2} {:>10.2}",
            name, s.count, s.min, s.max, s.mean, s.std
        );
    }
    println!();

    let train_lexiles = train.iter().map(|r| r.lexile).collect_vec();
    let test_lexiles = test.iter().map(|r| r.lexile).collect_vec();
    let (_, p) = ks_2samp(&train_lexiles, &test_lexiles);
    println!("train-test Kolmogorov-Smirnov p-value: {}", p);
}
