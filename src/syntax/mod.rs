//! Syntax tree access.
//!
//! The classifier only needs a narrow view of a syntax node: its kind, a
//! per-tree identity, its parent and named-field children. That view is the
//! [`SyntaxNode`] trait, implemented here for tree-sitter nodes.

use crate::error::{Result, XrefsError};
use crate::location::Position;
use std::path::Path;
use tree_sitter::{Node, Parser, Point, Tree};

/// Node kind tag for identifiers.
pub const IDENTIFIER: &str = "identifier";

/// Minimal navigation interface over a syntax tree node.
pub trait SyntaxNode: Sized {
    /// Grammar kind of the node (e.g. `identifier`, `assignment`).
    fn kind(&self) -> &str;

    /// Identity, stable for the lifetime of the tree.
    fn id(&self) -> usize;

    /// Parent node, `None` at the root.
    fn parent(&self) -> Option<Self>;

    /// Child stored in the given grammar field.
    fn child_by_field_name(&self, field: &str) -> Option<Self>;

    /// Whether `field` of this node holds exactly `child`.
    fn field_is(&self, field: &str, child: &Self) -> bool {
        self.child_by_field_name(field)
            .is_some_and(|c| c.id() == child.id())
    }
}

impl<'tree> SyntaxNode for Node<'tree> {
    fn kind(&self) -> &str {
        Node::kind(self)
    }

    fn id(&self) -> usize {
        Node::id(self)
    }

    fn parent(&self) -> Option<Self> {
        Node::parent(self)
    }

    fn child_by_field_name(&self, field: &str) -> Option<Self> {
        Node::child_by_field_name(self, field)
    }
}

/// Create a tree-sitter parser for Python.
pub fn python_parser(path: &Path) -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::language())
        .map_err(|e| XrefsError::Parse {
            file: path.to_path_buf(),
            message: format!("Failed to set Python language: {:?}", e),
        })?;
    Ok(parser)
}

/// Parse Python source text.
pub fn parse_python(path: &Path, source: &str) -> Result<Tree> {
    python_parser(path)?
        .parse(source, None)
        .ok_or_else(|| XrefsError::Parse {
            file: path.to_path_buf(),
            message: "Parse failed - no tree returned".to_string(),
        })
}

/// Smallest node covering `position`.
///
/// Returns `None` when the position lies outside the tree.
pub fn node_at(tree: &Tree, position: Position) -> Option<Node<'_>> {
    let root = tree.root_node();
    let point = Point::new(position.line, position.column);
    if point < root.start_position() || point > root.end_position() {
        return None;
    }
    root.descendant_for_point_range(point, point)
}

/// Every identifier node in the tree, in document order.
pub fn identifiers(tree: &Tree) -> Vec<Node<'_>> {
    let mut found = Vec::new();
    let mut cursor = tree.walk();
    loop {
        let node = cursor.node();
        if node.kind() == IDENTIFIER {
            found.push(node);
        }
        if cursor.goto_first_child() || cursor.goto_next_sibling() {
            continue;
        }
        loop {
            if !cursor.goto_parent() {
                return found;
            }
            if cursor.goto_next_sibling() {
                break;
            }
        }
    }
}
