//! Flattened leaf-path table: one row per root-to-leaf chain, padded to the
//! maximum observed depth.

use itertools::Itertools;

use crate::arena::Forest;

/// Tab-separable table of leaf paths.
///
/// Header: `code_level_1, title_level_1, ..` up to the maximum depth. Each
/// row carries the `(code, title)` pairs of one path in root-to-leaf order,
/// right-padded with empty strings to the full column count. Row order
/// mirrors [`Forest::leaf_paths`] extraction order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PathTable {
    pub fn from_forest(forest: &Forest) -> Self {
        let max_depth = forest.depth();
        let num_columns = max_depth * 2;

        let header = (1..=max_depth)
            .flat_map(|i| [format!("code_level_{}", i), format!("title_level_{}", i)])
            .collect();

        let rows = forest
            .leaf_paths()
            .iter()
            .map(|path| {
                let mut row = Vec::with_capacity(num_columns);
                for &idx in path {
                    if let Some(node) = forest.get_node(idx) {
                        row.push(node.data.code.clone());
                        row.push(node.data.title.clone());
                    }
                }
                row.resize(num_columns, String::new());
                row
            })
            .collect();

        Self { header, rows }
    }

    /// Render as tab-separated text, header first, one line per row.
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.header.iter().join("\t"));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.iter().join("\t"));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::NodeData;

    fn data(code: &str, title: &str) -> NodeData {
        NodeData {
            code: code.to_string(),
            title: title.to_string(),
        }
    }

    fn sample_forest() -> Forest {
        let mut forest = Forest::new();
        let a = forest.insert_node(data("A", "Human necessities"), None);
        let a01 = forest.insert_node(data("A01", "Agriculture"), Some(a));
        forest.insert_node(data("A01B", "Soil working"), Some(a01));
        forest.insert_node(data("B", "Operations"), None);
        forest
    }

    #[test]
    fn test_header_has_two_columns_per_level() {
        let table = PathTable::from_forest(&sample_forest());
        assert_eq!(
            table.header,
            vec![
                "code_level_1",
                "title_level_1",
                "code_level_2",
                "title_level_2",
                "code_level_3",
                "title_level_3",
            ]
        );
    }

    #[test]
    fn test_one_row_per_leaf_path_in_extraction_order() {
        let forest = sample_forest();
        let table = PathTable::from_forest(&forest);
        assert_eq!(table.rows.len(), forest.leaf_paths().len());
        assert_eq!(table.rows[0][0], "A");
        assert_eq!(table.rows[0][4], "A01B");
        assert_eq!(table.rows[1][0], "B");
    }

    #[test]
    fn test_short_paths_are_right_padded() {
        let table = PathTable::from_forest(&sample_forest());
        let b_row = &table.rows[1];
        assert_eq!(b_row.len(), 6);
        assert_eq!(b_row[0], "B");
        assert_eq!(b_row[1], "Operations");
        assert!(b_row[2..].iter().all(|cell| cell.is_empty()));
    }

    #[test]
    fn test_empty_forest_yields_empty_table() {
        let table = PathTable::from_forest(&Forest::new());
        assert!(table.header.is_empty());
        assert!(table.rows.is_empty());
        assert_eq!(table.to_tsv(), "\n");
    }

    #[test]
    fn test_tsv_rendering() {
        let mut forest = Forest::new();
        let x = forest.insert_node(data("X", "one"), None);
        forest.insert_node(data("X01", "two"), Some(x));
        let tsv = PathTable::from_forest(&forest).to_tsv();
        assert_eq!(
            tsv,
            "code_level_1\ttitle_level_1\tcode_level_2\ttitle_level_2\nX\tone\tX01\ttwo\n"
        );
    }

    // Reconstructing per-leaf chains from the non-empty column pairs must
    // reproduce the extracted paths exactly.
    #[test]
    fn test_rows_round_trip_to_paths() {
        let forest = sample_forest();
        let table = PathTable::from_forest(&forest);

        let reconstructed: Vec<Vec<(String, String)>> = table
            .rows
            .iter()
            .map(|row| {
                row.chunks(2)
                    .take_while(|pair| !pair[0].is_empty())
                    .map(|pair| (pair[0].clone(), pair[1].clone()))
                    .collect()
            })
            .collect();

        let expected: Vec<Vec<(String, String)>> = forest
            .leaf_paths()
            .iter()
            .map(|path| {
                path.iter()
                    .map(|&idx| {
                        let node = forest.get_node(idx).unwrap();
                        (node.data.code.clone(), node.data.title.clone())
                    })
                    .collect()
            })
            .collect();

        assert_eq!(reconstructed, expected);
    }
}
