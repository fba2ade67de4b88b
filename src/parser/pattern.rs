use crate::error::{Error, Result};
use crate::lexer::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selectors() {
        assert_eq!(
            Selector::parse("keyword:if").unwrap(),
            Selector::new(Some("keyword"), Some("if"))
        );
        assert_eq!(Selector::parse("name").unwrap(), Selector::new(None, Some("name")));
        assert_eq!(Selector::parse("string:").unwrap(), Selector::new(Some("string"), None));
        assert_eq!(Selector::parse(":dec").unwrap(), Selector::new(None, Some("dec")));
        assert_eq!(Selector::parse(":").unwrap(), Selector::new(None, None));
        assert!(Selector::parse("").is_err());
        assert_eq!(Selector::new(Some("int"), None).to_string(), "int:");
        assert_eq!(Selector::new(None, Some("dec")).to_string(), "dec");
        assert_eq!(Selector::new(None, None).to_string(), ":");
    }

    #[test]
    fn validated_construction() {
        assert!(matches!(Node::string(""), Err(Error::Pattern(_))));
        assert!(matches!(Node::group(Vec::new()), Err(Error::Pattern(_))));
        assert!(matches!(Node::alternative(Vec::new()), Err(Error::Pattern(_))));
        assert!(Node::group(vec![Node::identifier("name").unwrap()]).is_ok());
    }

    #[test]
    fn quantifier_symbols() {
        assert_eq!("".parse::<Quantifier>().unwrap(), Quantifier::One);
        assert_eq!("?".parse::<Quantifier>().unwrap(), Quantifier::Optional);
        assert_eq!("*".parse::<Quantifier>().unwrap(), Quantifier::Many);
        assert_eq!("+".parse::<Quantifier>().unwrap(), Quantifier::AtLeastOne);
        assert!("{2}".parse::<Quantifier>().is_err());
        assert_eq!(Quantifier::Many.to_string(), "*");
    }

    #[test]
    fn json_shape() {
        let node = Node::group(vec![
            Node::string("::").unwrap(),
            Node::identifier("name").unwrap().negated(),
        ])
        .unwrap()
        .with(Quantifier::Many);
        let dumped = serde_json::to_value(&node).unwrap();
        assert_eq!(
            dumped,
            json!({
                "type": "group",
                "quantifier": "*",
                "not": false,
                "value": [
                    {"type": "string", "quantifier": "", "not": false, "value": "::"},
                    {"type": "identifier", "quantifier": "", "not": true, "value": "name"},
                ]
            })
        );
        let loaded: Node = serde_json::from_value(dumped).unwrap();
        assert_eq!(loaded, node);
    }

    #[test]
    fn json_defaults_and_validation() {
        let node: Node = serde_json::from_value(json!({"type": "string", "value": "foo"})).unwrap();
        assert_eq!(node, Node::string("foo").unwrap());

        let pattern: Pattern =
            serde_json::from_value(json!([{"type": "identifier", "quantifier": "?", "value": "int:"}]))
                .unwrap();
        assert_eq!(
            pattern,
            Pattern::new(vec![Node::identifier("int:").unwrap().with(Quantifier::Optional)])
        );

        for bad in [
            json!({"type": "group", "value": []}),
            json!({"type": "string", "value": ""}),
            json!({"type": "string", "value": ["x"]}),
            json!({"type": "identifier", "value": [{"type": "string", "value": "x"}]}),
            json!({"type": "rule", "value": "x"}),
            json!({"type": "string", "quantifier": "{3}", "value": "x"}),
        ] {
            assert!(serde_json::from_value::<Node>(bad).is_err());
        }
    }

    #[test]
    fn single_token_tests() {
        let token = Token::new(Default::default(), "if", "if", "keyword");
        assert!(NodeKind::String(String::from("if")).accepts(&token));
        assert!(!NodeKind::String(String::from("else")).accepts(&token));
        assert!(NodeKind::Identifier(Selector::new(Some("keyword"), None)).accepts(&token));
        assert!(NodeKind::Identifier(Selector::new(None, Some("if"))).accepts(&token));
        assert!(!NodeKind::Identifier(Selector::new(Some("name"), Some("if"))).accepts(&token));
    }
}

/// How many times a pattern node must occur.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantifier {
    /// Exactly once.
    #[default]
    #[serde(rename = "")]
    One,
    #[serde(rename = "?")]
    Optional,
    #[serde(rename = "*")]
    Many,
    #[serde(rename = "+")]
    AtLeastOne,
}

impl Quantifier {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::One => "",
            Self::Optional => "?",
            Self::Many => "*",
            Self::AtLeastOne => "+",
        }
    }
}

impl std::str::FromStr for Quantifier {
    type Err = Error;

    fn from_str(symbol: &str) -> Result<Self> {
        match symbol {
            "" => Ok(Self::One),
            "?" => Ok(Self::Optional),
            "*" => Ok(Self::Many),
            "+" => Ok(Self::AtLeastOne),
            other => Err(Error::Pattern(format!("invalid quantifier `{}`", other))),
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Token selector of an identifier node: a group and a type, where a
/// missing component matches anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    group: Option<String>,
    token_type: Option<String>,
}

impl Selector {
    pub fn new(group: Option<&str>, token_type: Option<&str>) -> Self {
        let component = |part: Option<&str>| part.filter(|part| !part.is_empty()).map(String::from);
        Self {
            group: component(group),
            token_type: component(token_type),
        }
    }

    /// Parse `group:type` or a bare `type`.
    pub fn parse(selector: &str) -> Result<Self> {
        if selector.is_empty() {
            return Err(Error::Pattern(String::from("empty identifier selector")));
        }
        Ok(match selector.split_once(':') {
            Some((group, token_type)) => Self::new(Some(group), Some(token_type)),
            None => Self::new(None, Some(selector)),
        })
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    pub fn accepts(&self, token: &Token) -> bool {
        token.is(self.group(), self.token_type())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.group, &self.token_type) {
            (Some(group), Some(token_type)) => write!(f, "{}:{}", group, token_type),
            (Some(group), None) => write!(f, "{}:", group),
            (None, Some(token_type)) => f.write_str(token_type),
            (None, None) => f.write_str(":"),
        }
    }
}

/// What a single occurrence of a [`Node`] looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A token whose value is this literal.
    String(String),
    /// A token of the selected group and type.
    Identifier(Selector),
    /// The first of these nodes that matches.
    Alternative(Vec<Node>),
    /// All of these nodes, in sequence.
    Group(Vec<Node>),
}

impl NodeKind {
    /// Whether a single-token kind accepts `token`. Compound kinds never do.
    pub fn accepts(&self, token: &Token) -> bool {
        match self {
            Self::String(literal) => token.value() == literal,
            Self::Identifier(selector) => selector.accepts(token),
            Self::Alternative(_) | Self::Group(_) => false,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Identifier(_) => "identifier",
            Self::Alternative(_) => "alternative",
            Self::Group(_) => "group",
        }
    }
}

/// # Summary
///
/// A node of a grammar pattern: a [`NodeKind`], a [`Quantifier`] and a
/// negation flag. Nodes are validated when built, so a `Node` never holds
/// an empty literal, group or alternative.
///
/// Negation inverts the result of a single occurrence before the quantifier
/// applies: `!";"*` matches every token up to the next `;`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NodeDefinition", into = "NodeDefinition")]
pub struct Node {
    kind: NodeKind,
    quantifier: Quantifier,
    not: bool,
}

impl Node {
    pub fn new(kind: NodeKind) -> Result<Self> {
        match &kind {
            NodeKind::String(literal) if literal.is_empty() => {
                return Err(Error::Pattern(String::from("empty string literal")));
            }
            NodeKind::Alternative(nodes) | NodeKind::Group(nodes) if nodes.is_empty() => {
                return Err(Error::Pattern(format!("empty {}", kind.name())));
            }
            _ => {}
        }
        Ok(Self {
            kind,
            quantifier: Quantifier::One,
            not: false,
        })
    }

    pub fn string(literal: impl Into<String>) -> Result<Self> {
        Self::new(NodeKind::String(literal.into()))
    }

    /// Build an identifier node from a `group:type` or bare `type` selector.
    pub fn identifier(selector: &str) -> Result<Self> {
        Self::new(NodeKind::Identifier(Selector::parse(selector)?))
    }

    pub fn alternative(nodes: Vec<Node>) -> Result<Self> {
        Self::new(NodeKind::Alternative(nodes))
    }

    pub fn group(nodes: Vec<Node>) -> Result<Self> {
        Self::new(NodeKind::Group(nodes))
    }

    pub fn with(mut self, quantifier: Quantifier) -> Self {
        self.quantifier = quantifier;
        self
    }

    pub fn negated(mut self) -> Self {
        self.not = !self.not;
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    pub fn is_negated(&self) -> bool {
        self.not
    }
}

/// # Summary
///
/// A grammar pattern: an ordered list of [`Node`]s matched in sequence
/// against a token stream.
///
/// Patterns are plain data and can be reused across matches. They are
/// written and read in a compact notation (see [`Pattern::from_str`]) and
/// serialise to JSON as a list of `{type, quantifier, not, value}` nodes.
///
/// [`Pattern::from_str`]: std::str::FromStr::from_str
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern(Vec<Node>);

impl Pattern {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Node>> for Pattern {
    fn from(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }
}

impl AsRef<[Node]> for Pattern {
    fn as_ref(&self) -> &[Node] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NodeType {
    String,
    Identifier,
    Alternative,
    Group,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum NodeValue {
    Text(String),
    Nodes(Vec<NodeDefinition>),
}

/// The JSON shape of a [`Node`]. The value is read without a schema, so
/// nodes only load from self-describing formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeDefinition {
    #[serde(rename = "type")]
    node_type: NodeType,
    #[serde(default)]
    quantifier: Quantifier,
    #[serde(default)]
    not: bool,
    value: NodeValue,
}

impl TryFrom<NodeDefinition> for Node {
    type Error = Error;

    fn try_from(definition: NodeDefinition) -> Result<Self> {
        let kind = match (definition.node_type, definition.value) {
            (NodeType::String, NodeValue::Text(literal)) => NodeKind::String(literal),
            (NodeType::Identifier, NodeValue::Text(selector)) => {
                NodeKind::Identifier(Selector::parse(&selector)?)
            }
            (NodeType::Alternative, NodeValue::Nodes(nodes)) => NodeKind::Alternative(
                nodes.into_iter().map(Node::try_from).collect::<Result<_>>()?,
            ),
            (NodeType::Group, NodeValue::Nodes(nodes)) => NodeKind::Group(
                nodes.into_iter().map(Node::try_from).collect::<Result<_>>()?,
            ),
            (node_type, _) => {
                return Err(Error::Pattern(format!(
                    "wrong value for a node of type {:?}",
                    node_type
                )))
            }
        };
        let node = Node::new(kind)?.with(definition.quantifier);
        Ok(if definition.not { node.negated() } else { node })
    }
}

impl From<Node> for NodeDefinition {
    fn from(node: Node) -> Self {
        let into_definitions =
            |nodes: Vec<Node>| NodeValue::Nodes(nodes.into_iter().map(Self::from).collect());
        let (node_type, value) = match node.kind {
            NodeKind::String(literal) => (NodeType::String, NodeValue::Text(literal)),
            NodeKind::Identifier(selector) => {
                (NodeType::Identifier, NodeValue::Text(selector.to_string()))
            }
            NodeKind::Alternative(nodes) => (NodeType::Alternative, into_definitions(nodes)),
            NodeKind::Group(nodes) => (NodeType::Group, into_definitions(nodes)),
        };
        Self {
            node_type,
            quantifier: node.quantifier,
            not: node.not,
            value,
        }
    }
}
