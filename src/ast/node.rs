use serde::{Deserialize, Serialize};
use std::fmt;

use super::naming::default_classifier;
use crate::runtime::format_number;

/// Classification of a variable reference
///
/// Only the two input kinds are externally suppliable and may appear in an
/// emitted test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarKind {
    /// Vector input (`Vx...`)
    InputVector,
    /// Form-code input (`C123`)
    InputCode,
    /// Constant supplied once from the parameter table (`P18`)
    Parameter,
    /// Defined by an expression in the Variables section
    Derived,
    /// Named aggregate resolved to one delegate input
    Macro,
}

impl VarKind {
    /// True for the kinds that may be emitted in a test case
    pub fn is_input(self) -> bool {
        matches!(self, VarKind::InputVector | VarKind::InputCode)
    }
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithOp {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/), zero divisor yields 0
    Div,
}

impl ArithOp {
    /// Operator symbol
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// Equal (=)
    Eq,
    /// Not equal (≠)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater or equal (>=)
    Ge,
    /// Less than (<)
    Lt,
    /// Less or equal (<=)
    Le,
    /// Membership in an allowed set (IN)
    In,
}

impl CompareOp {
    /// Operator symbol
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "≠",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::In => "IN",
        }
    }

    /// Apply the comparison to two scalars. `IN` against a scalar is equality.
    pub fn holds(self, left: f64, right: f64) -> bool {
        match self {
            CompareOp::Eq | CompareOp::In => left == right,
            CompareOp::Ne => left != right,
            CompareOp::Gt => left > right,
            CompareOp::Ge => left >= right,
            CompareOp::Lt => left < right,
            CompareOp::Le => left <= right,
        }
    }

    /// `>` or `>=`
    pub fn is_lower_bound(self) -> bool {
        matches!(self, CompareOp::Gt | CompareOp::Ge)
    }

    /// `<` or `<=`
    pub fn is_upper_bound(self) -> bool {
        matches!(self, CompareOp::Lt | CompareOp::Le)
    }

    /// Operator reading the same comparison with its sides swapped;
    /// `IN` has none
    pub fn mirrored(self) -> Option<Self> {
        match self {
            CompareOp::Gt => Some(CompareOp::Lt),
            CompareOp::Ge => Some(CompareOp::Le),
            CompareOp::Lt => Some(CompareOp::Gt),
            CompareOp::Le => Some(CompareOp::Ge),
            CompareOp::Eq | CompareOp::Ne => Some(self),
            CompareOp::In => None,
        }
    }
}

/// Logical combinators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicOp {
    /// Conjunction
    And,
    /// Disjunction
    Or,
}

impl LogicOp {
    /// Combinator keyword
    pub fn keyword(self) -> &'static str {
        match self {
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
        }
    }
}

/// Built-in functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Function {
    /// `max(0, x)`
    Pos,
    /// Minimum over all arguments
    Min,
    /// Maximum over all arguments
    Max,
}

impl Function {
    /// Function name as written in rule documents
    pub fn name(self) -> &'static str {
        match self {
            Function::Pos => "POS",
            Function::Min => "MIN",
            Function::Max => "MAX",
        }
    }
}

/// Expression tree node
///
/// Trees are acyclic by construction; sharing happens by cloning subtrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Numeric literal
    Const(f64),
    /// Variable reference
    Ref {
        /// Variable name
        name: String,
        /// Classification assigned by the scanner
        kind: VarKind,
    },
    /// N-ary sum
    Sum(Vec<Node>),
    /// Binary arithmetic
    BinOp {
        /// Operator
        op: ArithOp,
        /// Left operand
        left: Box<Node>,
        /// Right operand
        right: Box<Node>,
    },
    /// Comparison
    Compare {
        /// Operator
        op: CompareOp,
        /// Left side, usually the constrained quantity
        left: Box<Node>,
        /// Right side, usually the threshold
        right: Box<Node>,
    },
    /// AND / OR
    Combine {
        /// Combinator
        kind: LogicOp,
        /// Left operand
        left: Box<Node>,
        /// Right operand
        right: Box<Node>,
    },
    /// Function call
    Call {
        /// Called function
        function: Function,
        /// Arguments in order
        args: Vec<Node>,
    },
    /// `IF(cond; when_true; when_false)`
    Conditional {
        /// Branch condition
        cond: Box<Node>,
        /// Value when the condition holds
        when_true: Box<Node>,
        /// Value otherwise
        when_false: Box<Node>,
    },
    /// Implicit AND-sequence of a block, or the allowed set of an `IN`
    List(Vec<Node>),
}

impl Default for Node {
    fn default() -> Self {
        Node::List(Vec::new())
    }
}

impl Node {
    /// Numeric literal
    pub fn constant(value: f64) -> Self {
        Node::Const(value)
    }

    /// Variable reference classified by the default naming convention
    pub fn var(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = default_classifier().classify(&name);
        Node::Ref { name, kind }
    }

    /// Variable reference with an explicit kind
    pub fn reference(name: impl Into<String>, kind: VarKind) -> Self {
        Node::Ref {
            name: name.into(),
            kind,
        }
    }

    /// N-ary sum
    pub fn sum(terms: Vec<Node>) -> Self {
        Node::Sum(terms)
    }

    /// Binary arithmetic node
    pub fn binary(op: ArithOp, left: Node, right: Node) -> Self {
        Node::BinOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Comparison node
    pub fn compare(op: CompareOp, left: Node, right: Node) -> Self {
        Node::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Logical combination node
    pub fn combine(kind: LogicOp, left: Node, right: Node) -> Self {
        Node::Combine {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Function call node
    pub fn call(function: Function, args: Vec<Node>) -> Self {
        Node::Call { function, args }
    }

    /// Conditional node
    pub fn conditional(cond: Node, when_true: Node, when_false: Node) -> Self {
        Node::Conditional {
            cond: Box::new(cond),
            when_true: Box::new(when_true),
            when_false: Box::new(when_false),
        }
    }

    /// List node
    pub fn list(items: Vec<Node>) -> Self {
        Node::List(items)
    }

    /// `self + rhs`
    pub fn add(self, rhs: Node) -> Self {
        Node::binary(ArithOp::Add, self, rhs)
    }

    /// `self - rhs`
    pub fn sub(self, rhs: Node) -> Self {
        Node::binary(ArithOp::Sub, self, rhs)
    }

    /// `self * rhs`
    pub fn mul(self, rhs: Node) -> Self {
        Node::binary(ArithOp::Mul, self, rhs)
    }

    /// `self / rhs`
    pub fn div(self, rhs: Node) -> Self {
        Node::binary(ArithOp::Div, self, rhs)
    }

    /// `self = rhs`
    pub fn equals(self, rhs: Node) -> Self {
        Node::compare(CompareOp::Eq, self, rhs)
    }

    /// `self ≠ rhs`
    pub fn differs(self, rhs: Node) -> Self {
        Node::compare(CompareOp::Ne, self, rhs)
    }

    /// `self > rhs`
    pub fn gt(self, rhs: Node) -> Self {
        Node::compare(CompareOp::Gt, self, rhs)
    }

    /// `self >= rhs`
    pub fn ge(self, rhs: Node) -> Self {
        Node::compare(CompareOp::Ge, self, rhs)
    }

    /// `self < rhs`
    pub fn lt(self, rhs: Node) -> Self {
        Node::compare(CompareOp::Lt, self, rhs)
    }

    /// `self <= rhs`
    pub fn le(self, rhs: Node) -> Self {
        Node::compare(CompareOp::Le, self, rhs)
    }

    /// `self IN (items...)`
    pub fn is_in(self, items: Vec<Node>) -> Self {
        Node::compare(CompareOp::In, self, Node::List(items))
    }

    /// `self AND rhs`
    pub fn and(self, rhs: Node) -> Self {
        Node::combine(LogicOp::And, self, rhs)
    }

    /// `self OR rhs`
    pub fn or(self, rhs: Node) -> Self {
        Node::combine(LogicOp::Or, self, rhs)
    }

    /// Literal value, if this node is a constant
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Node::Const(v) => Some(*v),
            _ => None,
        }
    }

    /// Variable name, if this node is a plain reference
    pub fn as_var(&self) -> Option<&str> {
        match self {
            Node::Ref { name, .. } => Some(name),
            _ => None,
        }
    }

    /// True for the literal `0`
    pub fn is_zero(&self) -> bool {
        self.as_const() == Some(0.0)
    }

    /// Direct children in left-to-right order
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Const(_) | Node::Ref { .. } => Vec::new(),
            Node::Sum(items) | Node::List(items) => items.iter().collect(),
            Node::Call { args, .. } => args.iter().collect(),
            Node::BinOp { left, right, .. }
            | Node::Compare { left, right, .. }
            | Node::Combine { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Node::Conditional {
                cond,
                when_true,
                when_false,
            } => vec![cond.as_ref(), when_true.as_ref(), when_false.as_ref()],
        }
    }

    /// Every variable reference, depth-first and left to right, duplicates kept
    pub fn leaf_vars(&self) -> Vec<&str> {
        let mut found = Vec::new();
        self.collect_leaf_vars(&mut found);
        found
    }

    fn collect_leaf_vars<'a>(&'a self, found: &mut Vec<&'a str>) {
        if let Node::Ref { name, .. } = self {
            found.push(name);
            return;
        }
        for child in self.children() {
            child.collect_leaf_vars(found);
        }
    }

    /// Every variable reference together with its kind
    pub fn leaf_refs(&self) -> Vec<(&str, VarKind)> {
        let mut found = Vec::new();
        self.collect_leaf_refs(&mut found);
        found
    }

    fn collect_leaf_refs<'a>(&'a self, found: &mut Vec<(&'a str, VarKind)>) {
        if let Node::Ref { name, kind } = self {
            found.push((name, *kind));
            return;
        }
        for child in self.children() {
            child.collect_leaf_refs(found);
        }
    }

    /// All calls to any of `functions`, pre-order (outer calls first)
    pub fn find_calls(&self, functions: &[Function]) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect_calls(functions, &mut found);
        found
    }

    fn collect_calls<'a>(&'a self, functions: &[Function], found: &mut Vec<&'a Node>) {
        if let Node::Call { function, .. } = self {
            if functions.contains(function) {
                found.push(self);
            }
        }
        for child in self.children() {
            child.collect_calls(functions, found);
        }
    }

    /// True if a call to `function` appears anywhere in the tree
    pub fn contains_call(&self, function: Function) -> bool {
        !self.find_calls(&[function]).is_empty()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Const(v) => write!(f, "{}", format_number(*v)),
            Node::Ref { name, .. } => write!(f, "{}", name),
            Node::Sum(terms) => {
                write!(f, "(")?;
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, " + ")?;
                    }
                    write!(f, "{}", term)?;
                }
                write!(f, ")")
            }
            Node::BinOp { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Node::Compare { op, left, right } => {
                write!(f, "{} {} {}", left, op.symbol(), right)
            }
            Node::Combine { kind, left, right } => {
                write!(f, "({} {} {})", left, kind.keyword(), right)
            }
            Node::Call { function, args } => {
                write!(f, "{}(", function.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Node::Conditional {
                cond,
                when_true,
                when_false,
            } => write!(f, "IF({}; {}; {})", cond, when_true, when_false),
            Node::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}
