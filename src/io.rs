/**
 * NeighborReco
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde_derive::Serialize;

use crate::error::{Error, Result};
use crate::labels::{LabelResolver, Labels};
use crate::rank::ScoredItem;
use crate::recommend;
use crate::types::InteractionMatrix;

/// Number of a user's own strongest items shown in a report.
pub const ITEMS_IN_HISTORY: usize = 10;

fn tsv_reader_builder(has_headers: bool) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(has_headers)
        .delimiter(b'\t')
        .flexible(true)
        .trim(csv::Trim::All);

    builder
}

/// Reads a tab separated interaction matrix. We expect NO headers, and one user per line with
/// one count per item.
pub fn read_matrix<P: AsRef<Path>>(path: P) -> Result<InteractionMatrix> {
    let file = File::open(path)?;
    read_matrix_from(file)
}

pub fn read_matrix_from<R: Read>(input: R) -> Result<InteractionMatrix> {

    let mut reader = tsv_reader_builder(false).from_reader(input);
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = record?;

        let mut row = Vec::with_capacity(record.len());

        for (column, field) in record.iter().enumerate() {
            let count: f64 = field.parse().map_err(|_| Error::Parse {
                line: line + 1,
                column: column + 1,
                value: field.to_owned(),
            })?;
            row.push(count);
        }

        rows.push(row);
    }

    InteractionMatrix::new(rows)
}

/// Reads user or item names. The file starts with a header line, followed by one entry per line,
/// whose name is the first tab separated field.
pub fn read_labels<P: AsRef<Path>>(path: P) -> Result<Labels> {
    let file = File::open(path)?;
    read_labels_from(file)
}

pub fn read_labels_from<R: Read>(input: R) -> Result<Labels> {

    let mut reader = tsv_reader_builder(true).from_reader(input);
    let mut names = Vec::new();

    for record in reader.records() {
        let record = record?;
        let name = record.get(0).unwrap_or("");
        names.push(name.to_owned());
    }

    Ok(Labels::new(names))
}

/// Makes sure that every row and column of the matrix has a name.
pub fn check_labels<L, M>(matrix: &InteractionMatrix, item_labels: &L, user_labels: &M) -> Result<()>
    where L: LabelResolver, M: LabelResolver {

    if item_labels.len() != matrix.num_items() {
        return Err(Error::LabelCountMismatch {
            what: "item",
            expected: matrix.num_items(),
            found: item_labels.len(),
        });
    }

    if user_labels.len() != matrix.num_users() {
        return Err(Error::LabelCountMismatch {
            what: "user",
            expected: matrix.num_users(),
            found: user_labels.len(),
        });
    }

    Ok(())
}

/// Human readable report for a single user: the items the user interacted with most, followed by
/// the recommended items.
pub fn write_report<W, L, M>(
    out: &mut W,
    matrix: &InteractionMatrix,
    user: usize,
    recommendations: &[ScoredItem],
    item_labels: &L,
    user_labels: &M,
) -> Result<()>
    where W: Write, L: LabelResolver, M: LabelResolver {

    writeln!(out, "Next user recommendations: {}", user_labels.resolve_or_index(user))?;

    let history = recommend::most_interacted_items(matrix, user, ITEMS_IN_HISTORY)?;
    for (rank, item) in history.iter().enumerate() {
        writeln!(out, "{}. rank: {}", rank + 1, item_labels.resolve_or_index(*item))?;
    }

    writeln!(out, "- - - - - - - ")?;

    for (rank, scored_item) in recommendations.iter().enumerate() {
        writeln!(out, "{}. rank: {} ({:.4})",
            rank + 1, item_labels.resolve_or_index(scored_item.item), scored_item.score)?;
    }

    writeln!(out)?;

    Ok(())
}

/// Struct used for JSON serialization of computed recommendations. Field names will be used in JSON.
#[derive(Serialize)]
struct Recommendations {
    for_user: String,
    recommended_items: Vec<RecommendedItem>,
}

#[derive(Serialize)]
struct RecommendedItem {
    item: String,
    score: f64,
}

/// Outputs the recommendations of a single user as one line of JSON, using the supplied labels.
pub fn write_recommendations_json<W, L, M>(
    out: &mut W,
    user: usize,
    recommendations: &[ScoredItem],
    item_labels: &L,
    user_labels: &M,
) -> Result<()>
    where W: Write, L: LabelResolver, M: LabelResolver {

    let recommended_items = recommendations.iter()
        .map(|scored_item| {
            RecommendedItem {
                item: item_labels.resolve_or_index(scored_item.item),
                score: scored_item.score,
            }
        })
        .collect();

    let as_json = Recommendations {
        for_user: user_labels.resolve_or_index(user),
        recommended_items,
    };

    serde_json::to_writer(&mut *out, &as_json)?;
    writeln!(out)?;

    Ok(())
}
