//! Descriptive Aggregations
//! Column extraction, counting, grouping, binning, and correlation over the
//! cleaned survey table. Everything here is purely descriptive; ordering
//! rules (stable sort, first-seen tie-break) are part of the contract.

use polars::prelude::*;
use std::collections::HashMap;

/// Non-null finite values of a column, cast to f64. String columns cast
/// non-strictly, so unparseable entries simply drop out.
pub fn numeric_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<f64>> {
    let casted = df.column(name)?.cast(&DataType::Float64)?;
    let values = casted.f64()?;
    Ok(values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect())
}

/// Row-aligned optional values of a column, cast to f64.
fn aligned_numeric_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let casted = df.column(name)?.cast(&DataType::Float64)?;
    Ok(casted.f64()?.into_iter().collect())
}

/// Row-aligned optional string values of a column.
fn aligned_string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    Ok(df
        .column(name)?
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Count occurrences of each non-null value of a column, sorted by count
/// descending. The sort is stable over first-seen label order, which is the
/// tie-break rule every top-N truncation in the reports relies on.
pub fn value_counts(df: &DataFrame, name: &str) -> PolarsResult<Vec<(String, u32)>> {
    let mut counts: Vec<(String, u32)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for value in df.column(name)?.as_materialized_series().str()?.into_iter() {
        let Some(value) = value else { continue };
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.to_string(), counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(counts)
}

/// Values of `value_col` grouped by the label in `group_col`, groups in
/// first-seen order. Rows with a null label or value are skipped.
pub fn values_by_group(
    df: &DataFrame,
    group_col: &str,
    value_col: &str,
) -> PolarsResult<Vec<(String, Vec<f64>)>> {
    let labels = aligned_string_values(df, group_col)?;
    let values = aligned_numeric_values(df, value_col)?;

    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (label, value) in labels.into_iter().zip(values) {
        let (Some(label), Some(value)) = (label, value) else {
            continue;
        };
        let i = *index.entry(label.clone()).or_insert_with(|| {
            groups.push((label, Vec::new()));
            groups.len() - 1
        });
        groups[i].1.push(value);
    }

    Ok(groups)
}

/// Cross-tabulated counts: `matrix[x][hue]` is the number of rows whose
/// `x_col` value equals `x_order[x]` and whose `hue_col` value equals
/// `hue_order[hue]`. Labels outside the given orders are ignored.
pub fn count_matrix(
    df: &DataFrame,
    x_col: &str,
    x_order: &[String],
    hue_col: &str,
    hue_order: &[String],
) -> PolarsResult<Vec<Vec<u32>>> {
    let x_index: HashMap<&str, usize> = x_order
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();
    let hue_index: HashMap<&str, usize> = hue_order
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();

    let xs = aligned_string_values(df, x_col)?;
    let hues = aligned_string_values(df, hue_col)?;

    let mut matrix = vec![vec![0u32; hue_order.len()]; x_order.len()];
    for (x, hue) in xs.into_iter().zip(hues) {
        let (Some(x), Some(hue)) = (x, hue) else {
            continue;
        };
        if let (Some(&xi), Some(&hi)) = (x_index.get(x.as_str()), hue_index.get(hue.as_str())) {
            matrix[xi][hi] += 1;
        }
    }
    Ok(matrix)
}

/// Mean of each `value_col` within each group: `matrix[group][col]`. Groups
/// with no values for a column yield NaN there.
pub fn mean_matrix(
    df: &DataFrame,
    group_col: &str,
    group_order: &[String],
    value_cols: &[&str],
) -> PolarsResult<Vec<Vec<f64>>> {
    let group_index: HashMap<&str, usize> = group_order
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();
    let labels = aligned_string_values(df, group_col)?;

    let mut sums = vec![vec![0.0f64; value_cols.len()]; group_order.len()];
    let mut counts = vec![vec![0u32; value_cols.len()]; group_order.len()];

    for (ci, value_col) in value_cols.iter().enumerate() {
        let values = aligned_numeric_values(df, value_col)?;
        for (label, value) in labels.iter().zip(values) {
            let (Some(label), Some(value)) = (label, value) else {
                continue;
            };
            if let Some(&gi) = group_index.get(label.as_str()) {
                sums[gi][ci] += value;
                counts[gi][ci] += 1;
            }
        }
    }

    Ok(sums
        .into_iter()
        .zip(counts)
        .map(|(row_sums, row_counts)| {
            row_sums
                .into_iter()
                .zip(row_counts)
                .map(|(s, c)| if c > 0 { s / c as f64 } else { f64::NAN })
                .collect()
        })
        .collect())
}

/// Mean of each named column, paired with the column name, in input order.
/// Columns with no usable values yield NaN.
pub fn column_means(df: &DataFrame, names: &[&str]) -> PolarsResult<Vec<(String, f64)>> {
    names
        .iter()
        .map(|name| {
            let values = numeric_values(df, name)?;
            Ok((name.to_string(), mean(&values)))
        })
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Equal-width histogram bins over the data range. Returns the per-bin
/// counts plus the range minimum and bin width, so a renderer can place the
/// bars. The maximum value lands in the last bin.
pub fn bin_counts(values: &[f64], bins: usize) -> (Vec<u32>, f64, f64) {
    assert!(bins > 0);
    if values.is_empty() {
        return (vec![0; bins], 0.0, 1.0);
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min {
        (max - min) / bins as f64
    } else {
        1.0
    };

    let mut counts = vec![0u32; bins];
    for &v in values {
        let i = (((v - min) / width) as usize).min(bins - 1);
        counts[i] += 1;
    }
    (counts, min, width)
}

/// Pearson correlation matrix over the named columns, pairwise-complete:
/// each pair is computed over the rows where both values are present.
pub fn pearson_matrix(df: &DataFrame, names: &[&str]) -> PolarsResult<Vec<Vec<f64>>> {
    let columns: Vec<Vec<Option<f64>>> = names
        .iter()
        .map(|name| aligned_numeric_values(df, name))
        .collect::<PolarsResult<_>>()?;

    let k = names.len();
    let mut matrix = vec![vec![f64::NAN; k]; k];
    for i in 0..k {
        matrix[i][i] = 1.0;
        for j in (i + 1)..k {
            let pairs: Vec<(f64, f64)> = columns[i]
                .iter()
                .zip(&columns[j])
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .collect();
            let r = pearson(&pairs);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    Ok(matrix)
}

fn pearson(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for &(x, y) in pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        f64::NAN
    } else {
        cov / denom
    }
}
