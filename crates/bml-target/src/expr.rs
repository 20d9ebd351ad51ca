//! Java expressions.

use ordered_float::OrderedFloat;

use crate::types::TypeRef;

/// A Java expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A simple name (local, field, class).
    Name(String),
    This,
    Null,
    /// `int` literal; printed with an `L` suffix only when out of range.
    IntLit(i64),
    /// `long` literal, always printed with an `L` suffix.
    LongLit(i64),
    DoubleLit(OrderedFloat<f64>),
    /// String literal; the value is unescaped.
    StringLit(String),
    BoolLit(bool),
    /// `receiver.name`
    FieldAccess { receiver: Box<Expr>, name: String },
    /// `receiver.name(args)` or `name(args)`
    MethodCall {
        receiver: Option<Box<Expr>>,
        name: String,
        args: Vec<Expr>,
    },
    /// `new Type(args)`
    ObjectCreation { ty: TypeRef, args: Vec<Expr> },
    Binary {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    Unary { op: UnaryOperator, operand: Box<Expr> },
    /// `condition ? then_expr : else_expr`
    Conditional {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    /// `(inner)`
    Enclosed(Box<Expr>),
    Assign {
        target: Box<Expr>,
        op: AssignOperator,
        value: Box<Expr>,
    },
    /// `(params) -> body`
    Lambda { params: Vec<String>, body: Box<Expr> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Or,
    And,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Plus,
    Minus,
    Multiply,
    Divide,
    Remainder,
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Or => "||",
            BinaryOperator::And => "&&",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEquals => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEquals => ">=",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
        }
    }

    /// Java binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 3,
            BinaryOperator::And => 4,
            BinaryOperator::Equals | BinaryOperator::NotEquals => 8,
            BinaryOperator::Less
            | BinaryOperator::LessEquals
            | BinaryOperator::Greater
            | BinaryOperator::GreaterEquals => 9,
            BinaryOperator::Plus | BinaryOperator::Minus => 11,
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Remainder => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `!`
    LogicalComplement,
    /// `-`
    Minus,
}

impl UnaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::LogicalComplement => "!",
            UnaryOperator::Minus => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOperator {
    Assign,
    Plus,
    Minus,
    Multiply,
    Divide,
    Remainder,
}

impl AssignOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOperator::Assign => "=",
            AssignOperator::Plus => "+=",
            AssignOperator::Minus => "-=",
            AssignOperator::Multiply => "*=",
            AssignOperator::Divide => "/=",
            AssignOperator::Remainder => "%=",
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::StringLit(value.into())
    }

    pub fn double(value: f64) -> Self {
        Expr::DoubleLit(OrderedFloat(value))
    }

    pub fn field(receiver: Expr, name: impl Into<String>) -> Self {
        Expr::FieldAccess {
            receiver: Box::new(receiver),
            name: name.into(),
        }
    }

    /// `receiver.name(args)`
    pub fn call(receiver: Expr, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::MethodCall {
            receiver: Some(Box::new(receiver)),
            name: name.into(),
            args,
        }
    }

    /// `Class.name(args)`
    pub fn static_call(class: &str, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::call(Expr::name(class), name, args)
    }

    /// `name(args)` without a receiver.
    pub fn bare_call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::MethodCall {
            receiver: None,
            name: name.into(),
            args,
        }
    }

    pub fn new_object(ty: TypeRef, args: Vec<Expr>) -> Self {
        Expr::ObjectCreation { ty, args }
    }

    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn enclosed(inner: Expr) -> Self {
        Expr::Enclosed(Box::new(inner))
    }

    pub fn assign(target: Expr, op: AssignOperator, value: Expr) -> Self {
        Expr::Assign {
            target: Box::new(target),
            op,
            value: Box::new(value),
        }
    }

    pub fn lambda(params: &[&str], body: Expr) -> Self {
        Expr::Lambda {
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Box::new(body),
        }
    }

    /// Arguments of a method call or object creation, if this is one.
    pub fn call_args(&self) -> Option<&[Expr]> {
        match self {
            Expr::MethodCall { args, .. } | Expr::ObjectCreation { args, .. } => Some(args),
            _ => None,
        }
    }
}
