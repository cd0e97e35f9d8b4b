//! DOT rendering of trees for debugging.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use graphviz_rust::dot_structures;
use graphviz_rust::dot_structures::{Attribute, Edge, GraphAttributes, Id};
use graphviz_rust::printer::{DotPrinter, PrinterContext};
use uuid::Uuid;

/// A directed graph with one vertex per tree node.
pub struct TreeGraph {
    /// The underlying DOT graph.
    pub graph: dot_structures::Graph,
}

impl TreeGraph {
    /// Creates an empty graph captioned with `label`.
    pub fn new(label: String) -> TreeGraph {
        let mut g = TreeGraph {
            graph: dot_structures::Graph::DiGraph {
                id: Id::Anonymous(String::from("tree")),
                strict: false,
                stmts: vec![],
            },
        };
        g.graph.add_stmt(dot_structures::Stmt::GAttribute(GraphAttributes::Graph(vec![
            Attribute(Id::Plain(String::from("ordering")), Id::Plain(String::from("out"))),
            Attribute(Id::Plain(String::from("label")), Id::Escaped(format!("\"{}\"", label))),
        ])));
        g
    }

    /// Adds a vertex with a fresh id and returns that id.
    pub fn new_node(&mut self, label: String) -> dot_structures::NodeId {
        let id = dot_structures::NodeId(Id::Plain(format!("\"{}\"", Uuid::new_v4())), None);
        self.graph.add_stmt(dot_structures::Stmt::Node(dot_structures::Node::new(
            id.clone(),
            vec![Attribute(Id::Plain(String::from("label")), Id::Escaped(format!("{:?}", label)))],
        )));
        id
    }

    /// Adds an edge from a parent to one of its children, tagged with the child's side.
    pub fn draw_edge(
        &mut self,
        from: &dot_structures::NodeId,
        to: &dot_structures::NodeId,
        side: &str,
    ) {
        self.graph.add_stmt(dot_structures::Stmt::Edge(Edge {
            ty: dot_structures::EdgeTy::Pair(
                dot_structures::Vertex::N(from.clone()),
                dot_structures::Vertex::N(to.clone()),
            ),
            attributes: vec![Attribute(
                Id::Plain(String::from("label")),
                Id::Plain(side.to_string()),
            )],
        }));
    }

    /// Prints the graph in DOT syntax.
    pub fn to_dot(&self) -> String {
        let mut ctx = PrinterContext::default();
        self.graph.print(&mut ctx)
    }

    /// Writes the DOT text to `path`, replacing any existing file.
    pub fn save_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("unable to open {}", path.display()))?;
        file.write_all(self.to_dot().as_bytes())
            .with_context(|| format!("unable to write {}", path.display()))?;
        Ok(())
    }
}
