use crate::parser::{Node, NodeKind, Pattern};
use ptree::{print_tree, TreeBuilder};

#[cfg(test)]
mod tests {
    use super::*;

    fn render(pattern: &str) -> String {
        let tree = build(&pattern.parse().unwrap());
        let mut output = Vec::new();
        ptree::write_tree(&tree, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn labels() {
        let rendered = render(r#""::"? name !(";" | "}")*"#);
        for label in [
            "pattern",
            r#"string "::" ?"#,
            "identifier name",
            "! alternative *",
            r#"string ";""#,
            r#"string "}""#,
        ] {
            assert!(rendered.contains(label), "{:?} not in\n{}", label, rendered);
        }
    }
}

fn label(node: &Node) -> String {
    let mut label = String::new();
    if node.is_negated() {
        label.push_str("! ");
    }
    match node.kind() {
        NodeKind::String(literal) => {
            label.push_str("string ");
            label.push_str(&crate::lexer::quote(literal));
        }
        NodeKind::Identifier(selector) => {
            label.push_str("identifier ");
            label.push_str(&selector.to_string());
        }
        NodeKind::Alternative(_) => label.push_str("alternative"),
        NodeKind::Group(_) => label.push_str("group"),
    }
    let quantifier = node.quantifier().symbol();
    if !quantifier.is_empty() {
        label.push(' ');
        label.push_str(quantifier);
    }
    label
}

fn build_tree(tree: &mut TreeBuilder, node: &Node) {
    match node.kind() {
        NodeKind::Alternative(nodes) | NodeKind::Group(nodes) => {
            tree.begin_child(label(node));
            for node in nodes {
                build_tree(tree, node);
            }
            tree.end_child();
        }
        NodeKind::String(_) | NodeKind::Identifier(_) => {
            tree.add_empty_child(label(node));
        }
    }
}

fn build(pattern: &Pattern) -> ptree::item::StringItem {
    let mut tree = TreeBuilder::new(String::from("pattern"));
    for node in pattern.nodes() {
        build_tree(&mut tree, node);
    }
    tree.build()
}

/// Print `pattern` to the standard output as a tree.
pub fn print_pattern(pattern: &Pattern) -> std::io::Result<()> {
    print_tree(&build(pattern))
}
