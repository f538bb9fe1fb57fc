//! Folds a parse tree into the reference XML fragment format: one tag per
//! line, no indentation, `<`/`>`/`&` escaped inside terminal text.

use crate::ast::Node;

/// Escapes the three characters the Jack symbol alphabet can produce that
/// are meaningful in XML.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders `node` as a sequence of XML-fragment lines.
#[must_use]
pub fn render(node: &Node) -> Vec<String> {
    let mut lines = Vec::new();
    render_into(node, &mut lines);
    lines
}

fn render_into(node: &Node, lines: &mut Vec<String>) {
    match node {
        Node::Terminal { tag, text } => {
            lines.push(format!("<{tag}> {} </{tag}>", escape(text)));
        }
        Node::NonTerminal { tag, children } => {
            lines.push(format!("<{tag}>"));
            for child in children {
                render_into(child, lines);
            }
            lines.push(format!("</{tag}>"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_reserved_characters() {
        assert_eq!(escape("<"), "&lt;");
        assert_eq!(escape(">"), "&gt;");
        assert_eq!(escape("&"), "&amp;");
        assert_eq!(escape("a<b&c>d"), "a&lt;b&amp;c&gt;d");
    }

    #[test]
    fn test_terminal_renders_single_line() {
        let lines = render(&Node::keyword("class"));
        assert_eq!(lines, vec!["<keyword> class </keyword>"]);
    }

    #[test]
    fn test_non_terminal_wraps_children_with_matching_tags() {
        let tree = Node::non_terminal(
            "class",
            vec![Node::keyword("class"), Node::identifier("Main")],
        );
        let lines = render(&tree);
        assert_eq!(
            lines,
            vec![
                "<class>",
                "<keyword> class </keyword>",
                "<identifier> Main </identifier>",
                "</class>",
            ]
        );
    }

    #[test]
    fn test_symbol_escaping_in_context() {
        let lines = render(&Node::symbol('<'));
        assert_eq!(lines, vec!["<symbol> &lt; </symbol>"]);
    }
}
