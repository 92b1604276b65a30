//! Parser for the textual graph description
//!
//! The upstream generator emits plain DOT: a `digraph` wrapper, node
//! statements with attribute lists, and edge statements. Only the
//! structural subset is semantically load-bearing here (ids, the
//! kind-implying `shape`/`label` attributes, numeric weight attributes);
//! every other attribute is carried through untouched so the exported
//! subgraph keeps its original styling. This is deliberately not a full
//! DOT implementation: subgraphs, ports, and HTML labels are out.
//!
//! Parsing is purely structural. Kind inference and weight resolution
//! happen in [`crate::graph`], which consumes the [`ParsedGraph`].

mod lexer;

use indexmap::IndexMap;
use lexer::{Spanned, Token};

use crate::error::{GraphError, GraphResult};

/// A node statement: `ID [key=value, ...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDecl {
    pub id: String,
    /// Attributes in declaration order.
    pub attrs: IndexMap<String, String>,
    pub line: usize,
}

/// A single edge from an edge statement. Chains (`a -> b -> c`) are
/// flattened into one decl per hop, all sharing the statement's
/// attribute list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeDecl {
    pub source: String,
    pub target: String,
    pub attrs: IndexMap<String, String>,
    pub line: usize,
}

/// Statement-level view of a graph description, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ParsedGraph {
    pub name: String,
    pub nodes: Vec<NodeDecl>,
    pub edges: Vec<EdgeDecl>,
}

/// Parse a graph description into node and edge statements.
pub fn parse_dot(src: &str) -> GraphResult<ParsedGraph> {
    let tokens = lexer::tokenize(src)?;
    Parser::new(&tokens).parse()
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse(mut self) -> GraphResult<ParsedGraph> {
        let mut graph = ParsedGraph::default();

        // Header: [strict] digraph [name] {
        let keyword = self.expect_ident("graph description is empty")?;
        let keyword = if keyword.eq_ignore_ascii_case("strict") {
            self.expect_ident("expected 'digraph' after 'strict'")?
        } else {
            keyword
        };
        if keyword.eq_ignore_ascii_case("graph") {
            return Err(self.err("undirected graphs are not supported; expected 'digraph'"));
        }
        if !keyword.eq_ignore_ascii_case("digraph") {
            return Err(self.err(format!("expected 'digraph', found '{}'", keyword)));
        }
        if let Some(Token::Ident(name)) = self.peek() {
            graph.name = name.clone();
            self.pos += 1;
        }
        self.expect(&Token::LBrace)?;

        // Statements until the closing brace.
        loop {
            match self.peek() {
                None => return Err(self.err("unexpected end of input; missing '}'")),
                Some(Token::RBrace) => {
                    self.pos += 1;
                    break;
                }
                Some(Token::Semi) => {
                    self.pos += 1;
                }
                Some(Token::Ident(_)) => self.statement(&mut graph)?,
                Some(other) => {
                    return Err(self.err(format!("unexpected token {} at statement start", other)))
                }
            }
        }

        // Nothing meaningful may follow the closing brace.
        while let Some(tok) = self.peek() {
            if *tok == Token::Semi {
                self.pos += 1;
            } else {
                return Err(self.err(format!("unexpected token {} after closing '}}'", tok)));
            }
        }

        Ok(graph)
    }

    fn statement(&mut self, graph: &mut ParsedGraph) -> GraphResult<()> {
        let line = self.line();
        let id = self.expect_ident("expected identifier")?;

        if id.eq_ignore_ascii_case("subgraph") {
            return Err(self.err("subgraph statements are not supported"));
        }

        match self.peek() {
            // Graph-level attribute: `rankdir=LR` -- styling, ignored.
            Some(Token::Equals) => {
                self.pos += 1;
                self.expect_ident("expected value after '='")?;
                Ok(())
            }
            // Edge statement, possibly chained.
            Some(Token::Arrow) => {
                let mut endpoints = vec![id];
                while let Some(Token::Arrow) = self.peek() {
                    self.pos += 1;
                    endpoints.push(self.expect_ident("expected node id after '->'")?);
                }
                let attrs = self.attr_list_opt()?;
                for pair in endpoints.windows(2) {
                    graph.edges.push(EdgeDecl {
                        source: pair[0].clone(),
                        target: pair[1].clone(),
                        attrs: attrs.clone(),
                        line,
                    });
                }
                Ok(())
            }
            // `node`/`edge`/`graph` default attribute statements are
            // styling for the external renderer, ignored.
            _ if matches!(id.as_str(), "node" | "edge" | "graph") => {
                self.attr_list_opt()?;
                Ok(())
            }
            // Node statement.
            _ => {
                let attrs = self.attr_list_opt()?;
                graph.nodes.push(NodeDecl { id, attrs, line });
                Ok(())
            }
        }
    }

    /// Parse `[key=value, ...]` if present; empty map otherwise.
    fn attr_list_opt(&mut self) -> GraphResult<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();
        if self.peek() != Some(&Token::LBracket) {
            return Ok(attrs);
        }
        self.pos += 1;
        loop {
            match self.peek() {
                Some(Token::RBracket) => {
                    self.pos += 1;
                    return Ok(attrs);
                }
                Some(Token::Comma) | Some(Token::Semi) => {
                    self.pos += 1;
                }
                Some(Token::Ident(_)) => {
                    let key = self.expect_ident("expected attribute name")?;
                    self.expect(&Token::Equals)?;
                    let value = self.expect_ident("expected attribute value")?;
                    // Repeated keys in one list: last declaration wins.
                    attrs.insert(key, value);
                }
                Some(other) => {
                    return Err(self.err(format!("unexpected token {} in attribute list", other)))
                }
                None => return Err(self.err("unterminated attribute list; missing ']'")),
            }
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|s| s.line)
            .unwrap_or(1)
    }

    fn err(&self, reason: impl Into<String>) -> GraphError {
        GraphError::malformed(self.line(), reason)
    }

    fn expect(&mut self, expected: &Token) -> GraphResult<()> {
        match self.peek() {
            Some(tok) if tok == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(other) => Err(self.err(format!("expected {}, found {}", expected, other))),
            None => Err(self.err(format!("expected {}, found end of input", expected))),
        }
    }

    fn expect_ident(&mut self, context: &str) -> GraphResult<String> {
        match self.peek() {
            Some(Token::Ident(value)) => {
                let value = value.clone();
                self.pos += 1;
                Ok(value)
            }
            Some(other) => Err(self.err(format!("{}, found {}", context, other))),
            None => Err(self.err(format!("{}, found end of input", context))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_node_with_attributes() {
        let g = parse_dot(
            r##"digraph G {
                CH_temp [label="temperature [Physical]" shape=ellipse fillcolor="#FFC0CB"]
            }"##,
        )
        .unwrap();
        assert_eq!(g.name, "G");
        assert_eq!(g.nodes.len(), 1);
        let node = &g.nodes[0];
        assert_eq!(node.id, "CH_temp");
        assert_eq!(node.attrs["label"], "temperature [Physical]");
        assert_eq!(node.attrs["shape"], "ellipse");
        // Styling attributes are carried through untouched.
        assert_eq!(node.attrs["fillcolor"], "#FFC0CB");
    }

    #[test]
    fn test_parse_chained_edges_share_attributes() {
        let g = parse_dot("digraph { a -> b -> c [cost=2]; }").unwrap();
        assert_eq!(g.edges.len(), 2);
        assert_eq!(g.edges[0].source, "a");
        assert_eq!(g.edges[0].target, "b");
        assert_eq!(g.edges[1].source, "b");
        assert_eq!(g.edges[1].target, "c");
        assert_eq!(g.edges[0].attrs["cost"], "2");
        assert_eq!(g.edges[1].attrs["cost"], "2");
    }

    #[test]
    fn test_parse_preserves_multi_edges() {
        let g = parse_dot("digraph { a -> b; a -> b [cost=3]; }").unwrap();
        assert_eq!(g.edges.len(), 2);
    }

    #[test]
    fn test_parse_ignores_graph_and_default_statements() {
        let g = parse_dot(
            "digraph G {\n rankdir=LR;\n node [shape=box];\n edge [color=gray];\n a; b; a -> b;\n}",
        )
        .unwrap();
        assert_eq!(g.nodes.len(), 2);
        assert_eq!(g.edges.len(), 1);
    }

    #[test]
    fn test_parse_rejects_undirected_graph() {
        let err = parse_dot("graph { a; }").unwrap_err();
        assert!(err.to_string().contains("undirected"));
    }

    #[test]
    fn test_parse_error_carries_line_number() {
        let err = parse_dot("digraph {\n a -> ;\n}").unwrap_err();
        assert!(err.to_string().contains("line 2"), "got: {}", err);
    }

    #[test]
    fn test_parse_missing_close_brace() {
        assert!(parse_dot("digraph { a").is_err());
    }

    #[test]
    fn test_parse_statement_order_is_preserved() {
        let g = parse_dot("digraph { z; a; m -> z; a -> z; }").unwrap();
        let ids: Vec<&str> = g.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a"]);
        assert_eq!(g.edges[0].source, "m");
        assert_eq!(g.edges[1].source, "a");
    }

    #[test]
    fn test_parse_strict_digraph_header() {
        assert!(parse_dot("strict digraph G { }").is_ok());
    }
}
