use std::fmt;

macro_rules! node_kinds {
    ($($variant:ident => $tag:literal),+ $(,)*) => {
        /// Kind tag of a tree node. Tags the analysis does not know about are
        /// carried verbatim in `Other`.
        #[derive(Clone, Debug, Eq, Hash, PartialEq)]
        pub enum NodeKind {
            $($variant,)+
            Other(String),
        }

        impl NodeKind {
            pub fn from_tag(tag: &str) -> NodeKind {
                match tag {
                    $($tag => NodeKind::$variant,)+
                    other => NodeKind::Other(other.to_string()),
                }
            }

            pub fn tag(&self) -> &str {
                match *self {
                    $(NodeKind::$variant => $tag,)+
                    NodeKind::Other(ref tag) => tag.as_str(),
                }
            }
        }
    }
}

node_kinds! {
    ClassDeclaration => "ClassDeclaration",
    Extends => "Extends",
    MethodDeclaration => "MethodDeclaration",
    ParameterList => "ParameterList",
    Parameter => "Parameter",
    VarDeclaration => "VarDeclaration",
    ArrayDeclaration => "ArrayDeclaration",
    IntLiteral => "Int",
    BooleanLiteral => "Boolean",
    Identifier => "Identifier",
    This => "This",
    NewObject => "NewObject",
    NewArray => "NewArray",
    ArrayAccess => "ArrayAccess",
    Length => "Length",
    MethodCall => "MethodCall",
    ExpressionList => "ExpressionList",
    AddExpression => "AddExpression",
    SubExpression => "SubExpression",
    MultExpression => "MultExpression",
    AndExpression => "AndExpression",
    OrExpression => "OrExpression",
    LessThanExpression => "LessThanExpression",
    EqualExpression => "EqualExpression",
    NotExpression => "NotExpression",
    AssignStatement => "AssignStatement",
    ArrayAssignStatement => "ArrayAssignStatement",
    IfStatement => "IfStatement",
    WhileStatement => "WhileStatement",
    PrintStatement => "PrintStatement",
    Return => "Return",
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A node of the parsed program. Children are owned by their parent and
/// their order is meaningful: declarations carry their type annotation
/// first, binary expressions carry the left operand first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    kind: NodeKind,
    value: String,
    lineno: u32,
    children: Vec<Node>,
}

impl Node {
    pub fn new<S>(kind: NodeKind, value: S, lineno: u32) -> Node
        where S: Into<String>
    {
        Node {
            kind: kind,
            value: value.into(),
            lineno: lineno,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: Node) -> Node {
        self.children.push(child);
        self
    }

    pub fn with_children<I>(mut self, children: I) -> Node
        where I: IntoIterator<Item = Node>
    {
        self.children.extend(children);
        self
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn get_kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn get_value(&self) -> &str {
        &self.value
    }

    pub fn get_lineno(&self) -> u32 {
        self.lineno
    }

    pub fn get_children(&self) -> &[Node] {
        &self.children
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.children.first()
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn is(&self, kind: &NodeKind) -> bool {
        &self.kind == kind
    }

    fn write_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        write!(
            f,
            "{}({} \"{}\" {}",
            "  ".repeat(depth),
            self.kind,
            escape(&self.value),
            self.lineno
        )?;
        for child in &self.children {
            writeln!(f)?;
            child.write_indented(f, depth + 1)?;
        }
        write!(f, ")")
    }
}

/// Prints the node in the textual tree format read by `parser`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

#[test]
fn test_known_tags_map_to_kinds() {
    assert_eq!(NodeKind::from_tag("Int"), NodeKind::IntLiteral);
    assert_eq!(NodeKind::from_tag("ArrayAssignStatement"), NodeKind::ArrayAssignStatement);
    assert_eq!(NodeKind::IntLiteral.tag(), "Int");
}

#[test]
fn test_unknown_tags_are_kept() {
    let kind = NodeKind::from_tag("Program");
    assert_eq!(kind, NodeKind::Other("Program".to_string()));
    assert_eq!(kind.tag(), "Program");
}

#[test]
fn test_display_nests_children() {
    let node = Node::new(NodeKind::AssignStatement, "x", 4)
        .with_child(Node::new(NodeKind::IntLiteral, "1", 4));
    assert_eq!(
        node.to_string(),
        "(AssignStatement \"x\" 4\n  (Int \"1\" 4))"
    );
}

#[test]
fn test_display_escapes_payload() {
    let node = Node::new(NodeKind::Other("Text".to_string()), "say \"hi\"", 1);
    assert_eq!(node.to_string(), "(Text \"say \\\"hi\\\"\" 1)");
}
