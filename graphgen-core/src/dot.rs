//! DOT serialisation of labeled graphs and the output file naming scheme.
//!
//! Every graph is written as
//!
//! ```text
//! digraph graph_01 {
//!   // graph-vertices
//!   v1  [label="V1"];
//!   v2  [label="V2"];
//!   // graph-edges
//!   v1 -> v2  [label="E1"];
//!   // end-of-graph
//! }
//! ```
//!
//! Undirected graphs open with `graph` and join endpoints with `--`. Vertex
//! codes `v1, v2, ...` follow the sorted vertex label order.

use std::{collections::BTreeMap, io::Write};

use crate::{
    graph::LabeledGraph,
    labels::{LabelAlphabet, VertexLabel, digit_width},
};

/// Sub-directory of the output directory holding pattern files.
pub const PATTERN_DIR: &str = "frequent-patterns";

/// File name for pattern `number` out of `total`, e.g. `pattern_07.dot`.
///
/// # Examples
/// ```
/// use graphgen_core::pattern_file_name;
///
/// assert_eq!(pattern_file_name(3, 4), "pattern_3.dot");
/// assert_eq!(pattern_file_name(7, 12), "pattern_07.dot");
/// ```
#[must_use]
pub fn pattern_file_name(number: usize, total: usize) -> String {
    numbered_file_name("pattern", number, total)
}

/// File name for dataset graph `number` out of `total`, e.g. `graph_001.dot`.
#[must_use]
pub fn graph_file_name(number: usize, total: usize) -> String {
    numbered_file_name("graph", number, total)
}

fn numbered_file_name(prefix: &str, number: usize, total: usize) -> String {
    format!("{prefix}_{number:0width$}.dot", width = digit_width(total))
}

/// Writes graphs in the DOT format using a shared label alphabet.
#[derive(Clone, Copy, Debug)]
pub struct DotWriter<'a> {
    alphabet: &'a LabelAlphabet,
    directed: bool,
}

impl<'a> DotWriter<'a> {
    /// Creates a writer. `directed` selects `digraph`/`->` over `graph`/`--`.
    #[must_use]
    pub const fn new(alphabet: &'a LabelAlphabet, directed: bool) -> Self {
        Self { alphabet, directed }
    }

    /// Serialises `graph` under the DOT identifier `name`.
    ///
    /// # Errors
    /// Propagates any error from `writer`.
    pub fn write_graph<W: Write>(
        &self,
        writer: &mut W,
        name: &str,
        graph: &LabeledGraph,
    ) -> std::io::Result<()> {
        let (keyword, connector) = if self.directed {
            ("digraph", "->")
        } else {
            ("graph", "--")
        };
        writeln!(writer, "{keyword} {name} {{")?;

        writeln!(writer, "  // graph-vertices")?;
        let mut codes: BTreeMap<VertexLabel, usize> = BTreeMap::new();
        for (position, vertex) in graph.vertices().enumerate() {
            let code = position + 1;
            codes.insert(vertex, code);
            writeln!(
                writer,
                "  v{code}  [label=\"{}\"];",
                self.alphabet.vertex_name(vertex)
            )?;
        }

        writeln!(writer, "  // graph-edges")?;
        for edge in graph.edges() {
            let (Some(source), Some(target)) = (codes.get(&edge.source), codes.get(&edge.target))
            else {
                continue;
            };
            writeln!(
                writer,
                "  v{source} {connector} v{target}  [label=\"{}\"];",
                self.alphabet.edge_name(edge.label)
            )?;
        }
        writeln!(writer, "  // end-of-graph")?;
        writeln!(writer, "}}")
    }

    /// Renders `graph` to a string.
    #[must_use]
    pub fn render(&self, name: &str, graph: &LabeledGraph) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail.
        if self.write_graph(&mut buffer, name, graph).is_err() {
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::{graph::Edge, labels::EdgeLabel};

    fn sample_graph() -> LabeledGraph {
        let mut graph = LabeledGraph::new(false);
        let (v1, v3, v5) = (VertexLabel::new(0), VertexLabel::new(2), VertexLabel::new(4));
        assert!(graph.add_edge(Edge::new(v5, EdgeLabel::new(1), v1)));
        assert!(graph.add_edge(Edge::new(v1, EdgeLabel::new(0), v3)));
        graph
    }

    #[test]
    fn directed_graph_matches_layout() {
        let alphabet = LabelAlphabet::new(8, 2);
        let text = DotWriter::new(&alphabet, true).render("graph_01", &sample_graph());
        let expected = "digraph graph_01 {\n\
                        \x20 // graph-vertices\n\
                        \x20 v1  [label=\"V1\"];\n\
                        \x20 v2  [label=\"V3\"];\n\
                        \x20 v3  [label=\"V5\"];\n\
                        \x20 // graph-edges\n\
                        \x20 v1 -> v2  [label=\"E1\"];\n\
                        \x20 v3 -> v1  [label=\"E2\"];\n\
                        \x20 // end-of-graph\n\
                        }\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn undirected_graph_uses_plain_connector() {
        let alphabet = LabelAlphabet::new(12, 1);
        let text = DotWriter::new(&alphabet, false).render("pattern_1", &sample_graph());
        assert!(text.starts_with("graph pattern_1 {\n"));
        assert!(text.contains("  v1  [label=\"V01\"];\n"));
        assert!(text.contains("  v1 -- v2  [label=\" \"];\n"));
        assert!(!text.contains("->"));
        assert!(text.ends_with("  // end-of-graph\n}\n"));
    }

    #[test]
    fn empty_graph_still_has_sections() {
        let alphabet = LabelAlphabet::new(8, 2);
        let text = DotWriter::new(&alphabet, true).render("g", &LabeledGraph::new(false));
        assert_eq!(
            text,
            "digraph g {\n  // graph-vertices\n  // graph-edges\n  // end-of-graph\n}\n"
        );
    }

    #[rstest]
    #[case(1, 4, "graph_1.dot")]
    #[case(1, 40, "graph_01.dot")]
    #[case(40, 40, "graph_40.dot")]
    #[case(7, 100_000, "graph_000007.dot")]
    fn graph_names_pad_to_dataset_width(
        #[case] number: usize,
        #[case] total: usize,
        #[case] expected: &str,
    ) {
        assert_eq!(graph_file_name(number, total), expected);
    }
}
