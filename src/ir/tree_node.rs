//! Reference host tree
//!
//! A small module-level syntax tree that implements [`SemanticNode`]. Hosts with their own
//! tree representation implement the trait themselves; this one backs the crate's tests,
//! benchmarks, and any host that just needs a plain tree to rewrite.

use std::fmt;
use std::sync::Arc;

use super::semantic_node::SemanticNode;

/// Discriminator for the node shapes of the reference tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root of a compilation unit
    SourceFile,
    /// `const`/`let` statement holding one or more declarations
    VariableStatement,
    /// `name = initializer`
    VariableDeclaration,
    Identifier,
    StringLiteral,
    NumericLiteral,
    /// `export = expression`
    ExportAssignment,
    Block,
    /// `callee(arguments...)`
    CallExpression,
    ExpressionStatement,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::SourceFile => "SourceFile",
            NodeKind::VariableStatement => "VariableStatement",
            NodeKind::VariableDeclaration => "VariableDeclaration",
            NodeKind::Identifier => "Identifier",
            NodeKind::StringLiteral => "StringLiteral",
            NodeKind::NumericLiteral => "NumericLiteral",
            NodeKind::ExportAssignment => "ExportAssignment",
            NodeKind::Block => "Block",
            NodeKind::CallExpression => "CallExpression",
            NodeKind::ExpressionStatement => "ExpressionStatement",
        };
        f.write_str(name)
    }
}

/// A node of the reference tree
///
/// Leaves such as identifiers and literals carry their text; composite nodes carry
/// children. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeNode {
    kind: NodeKind,
    text: Option<String>,
    children: Vec<Arc<TreeNode>>,
}

impl TreeNode {
    /// Creates a node from its parts
    pub fn new(kind: NodeKind, text: Option<String>, children: Vec<Arc<TreeNode>>) -> Arc<Self> {
        Arc::new(TreeNode {
            kind,
            text,
            children,
        })
    }

    /// Creates a leaf carrying `text`
    pub fn leaf(kind: NodeKind, text: impl Into<String>) -> Arc<Self> {
        Self::new(kind, Some(text.into()), Vec::new())
    }

    /// Creates a node without text
    pub fn branch(kind: NodeKind, children: Vec<Arc<TreeNode>>) -> Arc<Self> {
        Self::new(kind, None, children)
    }

    pub fn source_file(statements: Vec<Arc<TreeNode>>) -> Arc<Self> {
        Self::branch(NodeKind::SourceFile, statements)
    }

    pub fn variable_statement(declarations: Vec<Arc<TreeNode>>) -> Arc<Self> {
        Self::branch(NodeKind::VariableStatement, declarations)
    }

    pub fn variable_declaration(name: &str, initializer: Arc<TreeNode>) -> Arc<Self> {
        Self::branch(
            NodeKind::VariableDeclaration,
            vec![Self::identifier(name), initializer],
        )
    }

    pub fn identifier(name: impl Into<String>) -> Arc<Self> {
        Self::leaf(NodeKind::Identifier, name)
    }

    pub fn string_literal(value: impl Into<String>) -> Arc<Self> {
        Self::leaf(NodeKind::StringLiteral, value)
    }

    pub fn numeric_literal(value: impl Into<String>) -> Arc<Self> {
        Self::leaf(NodeKind::NumericLiteral, value)
    }

    pub fn export_assignment(expression: Arc<TreeNode>) -> Arc<Self> {
        Self::branch(NodeKind::ExportAssignment, vec![expression])
    }

    pub fn block(statements: Vec<Arc<TreeNode>>) -> Arc<Self> {
        Self::branch(NodeKind::Block, statements)
    }

    pub fn call_expression(callee: Arc<TreeNode>, arguments: Vec<Arc<TreeNode>>) -> Arc<Self> {
        let mut children = Vec::with_capacity(arguments.len() + 1);
        children.push(callee);
        children.extend(arguments);
        Self::branch(NodeKind::CallExpression, children)
    }

    pub fn expression_statement(expression: Arc<TreeNode>) -> Arc<Self> {
        Self::branch(NodeKind::ExpressionStatement, vec![expression])
    }

    pub fn node_kind(&self) -> NodeKind {
        self.kind
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn child_nodes(&self) -> &[Arc<TreeNode>] {
        &self.children
    }

    /// Returns a copy of this leaf with different text
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        TreeNode {
            kind: self.kind,
            text: Some(text.into()),
            children: self.children.clone(),
        }
    }

    /// Returns the declared name of a `VariableDeclaration`
    pub fn declared_name(&self) -> Option<&str> {
        if self.kind != NodeKind::VariableDeclaration {
            return None;
        }
        self.children.first().and_then(|name| name.text())
    }
}

impl SemanticNode for TreeNode {
    type Kind = NodeKind;

    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn children(&self) -> Vec<Arc<TreeNode>> {
        self.children.clone()
    }

    fn with_children(&self, children: Vec<Arc<TreeNode>>) -> Self {
        TreeNode {
            kind: self.kind,
            text: self.text.clone(),
            children,
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
