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

/// Maps user or item indices back to human readable names. The recommender itself only ever works
/// with indices, resolving names is left to whoever presents the results.
pub trait LabelResolver {
    fn resolve(&self, index: usize) -> Option<&str>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Falls back to the index itself for unknown entries.
    fn resolve_or_index(&self, index: usize) -> String {
        match self.resolve(index) {
            Some(label) => label.to_owned(),
            None => index.to_string(),
        }
    }
}

/// Labels in matrix order, i.e., the label of row or column `i` is stored at position `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labels {
    names: Vec<String>,
}

impl Labels {

    pub fn new(names: Vec<String>) -> Self {
        Labels { names }
    }

    /// Uses the indices `0..n` as labels, for data without any names.
    pub fn numbered(n: usize) -> Self {
        Labels { names: (0..n).map(|index| index.to_string()).collect() }
    }
}

impl LabelResolver for Labels {

    fn resolve(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|name| name.as_str())
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

impl From<Vec<String>> for Labels {
    fn from(names: Vec<String>) -> Self {
        Labels::new(names)
    }
}
