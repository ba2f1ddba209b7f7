//! Cyclomatic complexity and structure of Python source via tree-sitter.
//!
//! Every function or method, at any depth, is a block. A block scores 1
//! plus the decision points in its own body; nested definitions are
//! scored separately and do not add to their parent.

use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

use crate::core::{ClassSummary, MethodSummary};
use crate::errors::{Error, Result};

/// Functions spanning more lines than this are reported as long
pub const LONG_FUNCTION_LINES: usize = 50;
/// Functions taking more positional parameters than this are reported
pub const MAX_POSITIONAL_PARAMETERS: usize = 5;

/// One function or method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockComplexity {
    pub name: String,
    /// 1-based line of the `def`
    pub line: usize,
    pub end_line: usize,
    /// Parameters that can be passed positionally, `self` included
    pub parameters: usize,
    pub complexity: u32,
}

impl BlockComplexity {
    pub fn length(&self) -> usize {
        self.end_line - self.line
    }
}

/// Per-file summary used by the hotspot finder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSummary {
    /// Highest block score, 0 when the file defines no functions
    pub max_complexity: u32,
    pub blocks: usize,
    pub issues: Vec<String>,
    pub classes: Vec<ClassSummary>,
}

impl FileSummary {
    pub fn new(blocks: &[BlockComplexity], classes: Vec<ClassSummary>) -> Self {
        Self {
            max_complexity: blocks.iter().map(|b| b.complexity).max().unwrap_or(0),
            blocks: blocks.len(),
            issues: code_issues(blocks),
            classes,
        }
    }
}

pub fn parse_python(source: &str, path: &Path) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| Error::parse(path, format!("failed to load Python grammar: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::parse(path, "parser returned no tree"))?;

    if tree.root_node().has_error() {
        return Err(Error::parse(path, "syntax error"));
    }
    Ok(tree)
}

/// Score every function in `source`. Files with syntax errors are rejected.
pub fn analyze_blocks(source: &str, path: &Path) -> Result<Vec<BlockComplexity>> {
    let tree = parse_python(source, path)?;
    let mut blocks = Vec::new();
    collect_blocks(tree.root_node(), source, &mut blocks);
    Ok(blocks)
}

/// Blocks, code issues and class inventory from a single parse.
pub fn analyze_file(source: &str, path: &Path) -> Result<FileSummary> {
    let tree = parse_python(source, path)?;
    let root = tree.root_node();
    let mut blocks = Vec::new();
    collect_blocks(root, source, &mut blocks);
    Ok(FileSummary::new(&blocks, class_inventory(root, source)))
}

/// Long functions and functions with too many positional parameters, in
/// source order.
pub fn code_issues(blocks: &[BlockComplexity]) -> Vec<String> {
    let mut issues = Vec::new();
    for block in blocks {
        if block.length() > LONG_FUNCTION_LINES {
            issues.push(format!(
                "Long function '{}' ({} lines)",
                block.name,
                block.length()
            ));
        }
        if block.parameters > MAX_POSITIONAL_PARAMETERS {
            issues.push(format!(
                "Function '{}' has too many arguments ({})",
                block.name, block.parameters
            ));
        }
    }
    issues
}

fn node_name(node: Node, source: &str) -> String {
    node.child_by_field_name("name")
        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
        .unwrap_or("<anonymous>")
        .to_string()
}

/// The definition inside a `decorated_definition`, else the node itself
fn undecorated(node: Node) -> Node {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition").unwrap_or(node)
    } else {
        node
    }
}

fn collect_blocks(node: Node, source: &str, blocks: &mut Vec<BlockComplexity>) {
    if node.kind() == "function_definition" {
        let complexity = node
            .child_by_field_name("body")
            .map(|body| 1 + count_decisions(body))
            .unwrap_or(1);
        blocks.push(BlockComplexity {
            name: node_name(node, source),
            line: node.start_position().row + 1,
            end_line: node.end_position().row + 1,
            parameters: positional_parameters(node),
            complexity,
        });
    }

    for child in node.children(&mut node.walk()) {
        collect_blocks(child, source, blocks);
    }
}

fn is_splat(node: Node) -> bool {
    matches!(
        node.kind(),
        "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator"
    )
}

/// Parameters before the first `*`, `*args` or `**kwargs`.
fn positional_parameters(function: Node) -> usize {
    let Some(params) = function.child_by_field_name("parameters") else {
        return 0;
    };

    let mut count = 0;
    for param in params.named_children(&mut params.walk()) {
        let splat_inside = param.kind() == "typed_parameter"
            && param.named_child(0).is_some_and(is_splat);
        if is_splat(param) || splat_inside {
            break;
        }
        if matches!(
            param.kind(),
            "identifier" | "typed_parameter" | "default_parameter" | "typed_default_parameter"
        ) {
            count += 1;
        }
    }
    count
}

/// Module-level classes with their directly defined methods
fn class_inventory(root: Node, source: &str) -> Vec<ClassSummary> {
    let mut classes = Vec::new();
    for child in root.named_children(&mut root.walk()) {
        let class = undecorated(child);
        if class.kind() != "class_definition" {
            continue;
        }

        let mut methods = Vec::new();
        if let Some(body) = class.child_by_field_name("body") {
            for member in body.named_children(&mut body.walk()) {
                let method = undecorated(member);
                if method.kind() == "function_definition" {
                    methods.push(MethodSummary {
                        name: node_name(method, source),
                        line: method.start_position().row + 1,
                        length: method.end_position().row - method.start_position().row,
                    });
                }
            }
        }

        classes.push(ClassSummary {
            name: node_name(class, source),
            line: class.start_position().row + 1,
            methods,
        });
    }
    classes
}

fn count_decisions(node: Node) -> u32 {
    let mut total = 0;

    for child in node.children(&mut node.walk()) {
        match child.kind() {
            // Scored as their own blocks
            "function_definition" | "class_definition" => continue,
            "if_statement" | "elif_clause" | "conditional_expression" => total += 1,
            "for_statement" | "while_statement" => total += 1,
            "except_clause" | "with_statement" | "assert_statement" => total += 1,
            "boolean_operator" => total += 1,
            "for_in_clause" | "if_clause" | "lambda" => total += 1,
            "case_clause" => total += 1,
            "else_clause"
                if matches!(
                    node.kind(),
                    "for_statement" | "while_statement" | "try_statement"
                ) =>
            {
                total += 1
            }
            _ => {}
        }
        total += count_decisions(child);
    }

    total
}
