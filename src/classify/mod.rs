//! Read/write/import classification of identifier occurrences.
//!
//! Classification is purely syntactic: it looks at where an identifier sits
//! in the tree, never at what the name is bound to.
//!
//! # Algorithm
//! 1. If any ancestor is an import statement, the occurrence is an import.
//! 2. Otherwise walk upward, remembering which child the walk came from,
//!    until an ancestor decides the kind from the field that child occupies.
//! 3. If the root is reached without a decision, the occurrence is a read.

use crate::error::{Result, XrefsError};
use crate::syntax::{SyntaxNode, IDENTIFIER};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an identifier occurrence uses its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XrefKind {
    /// The name is bound or assigned through.
    Write,
    /// The name is only read.
    Read,
    /// The name appears in an import statement.
    Import,
}

impl XrefKind {
    /// Convert to string identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            XrefKind::Write => "write",
            XrefKind::Read => "read",
            XrefKind::Import => "import",
        }
    }
}

impl fmt::Display for XrefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for XrefKind {
    type Err = XrefsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "write" => Ok(XrefKind::Write),
            "read" => Ok(XrefKind::Read),
            "import" => Ok(XrefKind::Import),
            other => Err(XrefsError::Other(format!("Unknown xref kind: {}", other))),
        }
    }
}

/// Ancestor kinds that take part in classification.
///
/// Everything else is `Other` and the walk simply continues past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ancestor {
    Import,
    NamedExpression,
    Assignment,
    AugmentedAssignment,
    ForStatement,
    Call,
    Subscript,
    Attribute,
    Other,
}

impl Ancestor {
    fn of(kind: &str) -> Self {
        match kind {
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                Ancestor::Import
            }
            "named_expression" => Ancestor::NamedExpression,
            "assignment" => Ancestor::Assignment,
            "augmented_assignment" => Ancestor::AugmentedAssignment,
            "for_statement" => Ancestor::ForStatement,
            "call" => Ancestor::Call,
            "subscript" => Ancestor::Subscript,
            "attribute" => Ancestor::Attribute,
            _ => Ancestor::Other,
        }
    }
}

/// Outcome of looking at one ancestor.
enum Step {
    Decided(XrefKind),
    Continue,
}

/// Classify an identifier occurrence.
///
/// # Errors
/// * `InvalidArgument` if `node` is not an identifier.
/// * `ClassificationExhaustion` if a decisive ancestor holds the walk's child
///   in none of the fields the grammar allows there.
///
/// # Examples
///
/// ```
/// # use xrefs::classify::{classify, XrefKind};
/// # use xrefs::location::Position;
/// # use xrefs::syntax::{node_at, parse_python};
/// # use std::path::Path;
/// let tree = parse_python(Path::new("t.py"), "x.a = 1\n")?;
/// let node = node_at(&tree, Position::new(0, 0)).unwrap();
/// assert_eq!(classify(&node)?, XrefKind::Write);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn classify<N: SyntaxNode>(node: &N) -> Result<XrefKind> {
    if node.kind() != IDENTIFIER {
        return Err(XrefsError::InvalidArgument {
            kind: node.kind().to_string(),
        });
    }

    if has_import_ancestor(node) {
        return Ok(XrefKind::Import);
    }

    // `from` is the child the walk arrived from; `None` means the identifier.
    let mut from: Option<N> = None;
    let mut parent = node.parent();
    while let Some(ancestor) = parent {
        let outcome = step(&ancestor, from.as_ref().unwrap_or(node))?;
        if let Step::Decided(kind) = outcome {
            return Ok(kind);
        }
        parent = ancestor.parent();
        from = Some(ancestor);
    }

    Ok(XrefKind::Read)
}

fn has_import_ancestor<N: SyntaxNode>(node: &N) -> bool {
    let mut parent = node.parent();
    while let Some(ancestor) = parent {
        if Ancestor::of(ancestor.kind()) == Ancestor::Import {
            return true;
        }
        parent = ancestor.parent();
    }
    false
}

/// Decide what `ancestor` says about a walk arriving from `child`.
fn step<N: SyntaxNode>(ancestor: &N, child: &N) -> Result<Step> {
    let kind = Ancestor::of(ancestor.kind());
    let decided = match kind {
        Ancestor::NamedExpression => {
            if ancestor.field_is("name", child) {
                XrefKind::Write
            } else if ancestor.field_is("value", child) {
                XrefKind::Read
            } else {
                return Err(exhausted("named_expression", child));
            }
        }
        Ancestor::Assignment => {
            if ancestor.field_is("left", child) {
                XrefKind::Write
            } else if ancestor.field_is("right", child) || ancestor.field_is("type", child) {
                XrefKind::Read
            } else {
                return Err(exhausted("assignment", child));
            }
        }
        Ancestor::AugmentedAssignment | Ancestor::ForStatement => {
            if ancestor.field_is("left", child) {
                XrefKind::Write
            } else {
                XrefKind::Read
            }
        }
        Ancestor::Call => XrefKind::Read,
        Ancestor::Subscript => {
            // Every index is read (`s[i, j]` repeats the `subscript` field);
            // the subscripted value is written through if the subscript
            // itself is a write target further up.
            if ancestor.field_is("value", child) {
                return Ok(Step::Continue);
            }
            XrefKind::Read
        }
        // Imports are settled before the walk starts.
        Ancestor::Import | Ancestor::Attribute | Ancestor::Other => {
            return Ok(Step::Continue)
        }
    };
    Ok(Step::Decided(decided))
}

fn exhausted<N: SyntaxNode>(ancestor: &'static str, child: &N) -> XrefsError {
    XrefsError::ClassificationExhaustion {
        ancestor,
        child: child.kind().to_string(),
    }
}

/// Whether the identifier is written to.
pub fn is_write<N: SyntaxNode>(node: &N) -> Result<bool> {
    Ok(classify(node)? == XrefKind::Write)
}

/// Whether the identifier is only read.
pub fn is_read<N: SyntaxNode>(node: &N) -> Result<bool> {
    Ok(classify(node)? == XrefKind::Read)
}

/// Whether the identifier is part of an import.
pub fn is_import<N: SyntaxNode>(node: &N) -> Result<bool> {
    Ok(classify(node)? == XrefKind::Import)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (kind, parent, fields) per node, indexed by id.
    type FakeTree = Vec<(&'static str, Option<usize>, Vec<(&'static str, usize)>)>;

    /// Hand-built node for exercising the walk without a parser.
    #[derive(Clone)]
    struct FakeNode {
        tree: std::rc::Rc<FakeTree>,
        index: usize,
    }

    impl SyntaxNode for FakeNode {
        fn kind(&self) -> &str {
            self.tree[self.index].0
        }

        fn id(&self) -> usize {
            self.index
        }

        fn parent(&self) -> Option<Self> {
            self.tree[self.index].1.map(|index| FakeNode {
                tree: self.tree.clone(),
                index,
            })
        }

        fn child_by_field_name(&self, field: &str) -> Option<Self> {
            self.tree[self.index]
                .2
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, index)| FakeNode {
                    tree: self.tree.clone(),
                    index: *index,
                })
        }
    }

    fn fake(nodes: FakeTree, index: usize) -> FakeNode {
        FakeNode {
            tree: std::rc::Rc::new(nodes),
            index,
        }
    }

    #[test]
    fn test_rejects_non_identifier() {
        let node = fake(vec![("module", None, vec![])], 0);
        let err = classify(&node).unwrap_err();
        assert!(matches!(err, XrefsError::InvalidArgument { .. }));
    }

    #[test]
    fn test_unknown_ancestors_default_to_read() {
        let node = fake(
            vec![
                ("module", None, vec![]),
                ("expression_statement", Some(0), vec![]),
                ("identifier", Some(1), vec![]),
            ],
            2,
        );
        assert_eq!(classify(&node).unwrap(), XrefKind::Read);
    }

    #[test]
    fn test_assignment_without_matching_field_is_a_defect() {
        let node = fake(
            vec![
                ("assignment", None, vec![("left", 2)]),
                ("identifier", Some(0), vec![]),
                ("identifier", Some(0), vec![]),
            ],
            1,
        );
        let err = classify(&node).unwrap_err();
        assert!(matches!(err, XrefsError::ClassificationExhaustion { .. }));
    }

    #[test]
    fn test_second_subscript_index_is_read() {
        // s[0, a] = 3
        let nodes = vec![
            ("assignment", None, vec![("left", 1)]),
            (
                "subscript",
                Some(0),
                vec![("value", 2), ("subscript", 3), ("subscript", 4)],
            ),
            ("identifier", Some(1), vec![]),
            ("integer", Some(1), vec![]),
            ("identifier", Some(1), vec![]),
        ];
        assert_eq!(classify(&fake(nodes.clone(), 4)).unwrap(), XrefKind::Read);
        assert_eq!(classify(&fake(nodes, 2)).unwrap(), XrefKind::Write);
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [XrefKind::Write, XrefKind::Read, XrefKind::Import] {
            assert_eq!(kind.as_str().parse::<XrefKind>().unwrap(), kind);
        }
        assert!("delete".parse::<XrefKind>().is_err());
    }
}
