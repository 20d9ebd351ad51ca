//! Deterministic Java source printer.
//!
//! Output uses four-space indentation. Binary operands are parenthesized only
//! where Java precedence requires it, so lowered trees that never carry
//! explicit [`Expr::Enclosed`] nodes still print with their intended meaning.

use std::fmt::{self, Write};

use crate::decl::{
    Annotation, ClassDecl, CompilationUnit, ConstructorDecl, FieldDecl, Member, MethodDecl,
    Parameter,
};
use crate::expr::{Expr, UnaryOperator};
use crate::stmt::{Block, Stmt};

const INDENT: &str = "    ";

/// Accumulates printed source.
#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start printing at a given indentation depth.
    pub fn with_indent(indent: usize) -> Self {
        Self {
            out: String::new(),
            indent,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    pub fn unit(&mut self, unit: &CompilationUnit) {
        if let Some(package) = &unit.package {
            self.line(&format!("package {};", package));
            self.blank();
        }
        if !unit.imports.is_empty() {
            for import in &unit.imports {
                self.line(&format!("import {};", import));
            }
            self.blank();
        }
        for (i, class) in unit.types.iter().enumerate() {
            if i > 0 {
                self.blank();
            }
            self.class(class);
        }
    }

    pub fn class(&mut self, class: &ClassDecl) {
        let mut header = String::new();
        push_modifiers(&mut header, &class.modifiers.to_string());
        header.push_str("class ");
        header.push_str(&class.name);
        if let Some(parent) = &class.extends {
            let _ = write!(header, " extends {}", parent);
        }
        header.push_str(" {");
        self.line(&header);

        self.indent += 1;
        let mut previous: Option<&Member> = None;
        for member in &class.members {
            let both_fields = matches!(
                (previous, member),
                (Some(Member::Field(_)), Member::Field(_))
            );
            if previous.is_some() && !both_fields {
                self.blank();
            }
            self.member(member);
            previous = Some(member);
        }
        self.indent -= 1;
        self.line("}");
    }

    pub fn member(&mut self, member: &Member) {
        match member {
            Member::Field(field) => self.field(field),
            Member::Constructor(ctor) => self.constructor(ctor),
            Member::Method(method) => self.method(method),
        }
    }

    fn field(&mut self, field: &FieldDecl) {
        let mut text = String::new();
        push_modifiers(&mut text, &field.modifiers.to_string());
        let _ = write!(text, "{} {}", field.ty, field.name);
        if let Some(init) = &field.init {
            let _ = write!(text, " = {}", init);
        }
        text.push(';');
        self.line(&text);
    }

    fn constructor(&mut self, ctor: &ConstructorDecl) {
        let mut header = String::new();
        push_modifiers(&mut header, &ctor.modifiers.to_string());
        let _ = write!(header, "{}({}) {{", ctor.name, params(&ctor.params));
        self.line(&header);
        self.block_body(&ctor.body);
        self.line("}");
    }

    fn method(&mut self, method: &MethodDecl) {
        for annotation in &method.annotations {
            self.line(&annotation_text(annotation));
        }
        let mut header = String::new();
        push_modifiers(&mut header, &method.modifiers.to_string());
        let _ = write!(
            header,
            "{} {}({}) {{",
            method.ret,
            method.name,
            params(&method.params)
        );
        self.line(&header);
        self.block_body(&method.body);
        self.line("}");
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    /// Print the statements of `block` one level deeper, without braces.
    pub fn block_body(&mut self, block: &Block) {
        self.indent += 1;
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        self.indent -= 1;
    }

    pub fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => self.line(&format!("{};", expr)),
            Stmt::LocalVar { ty, name, init } => match init {
                Some(init) => self.line(&format!("{} {} = {};", ty, name, init)),
                None => self.line(&format!("{} {};", ty, name)),
            },
            Stmt::If { .. } => self.if_chain(stmt, ""),
            Stmt::ForEach {
                ty,
                name,
                iterable,
                body,
            } => {
                self.line(&format!("for ({} {} : {}) {{", ty, name, iterable));
                self.block_body(body);
                self.line("}");
            }
            Stmt::Block(block) => {
                self.line("{");
                self.block_body(block);
                self.line("}");
            }
            Stmt::Return(None) => self.line("return;"),
            Stmt::Return(Some(value)) => self.line(&format!("return {};", value)),
        }
    }

    fn if_chain(&mut self, stmt: &Stmt, prefix: &str) {
        let Stmt::If {
            condition,
            then_branch,
            else_branch,
        } = stmt
        else {
            return;
        };
        self.line(&format!("{}if ({}) {{", prefix, condition));
        self.branch(then_branch);
        match else_branch.as_deref() {
            None => self.line("}"),
            Some(nested @ Stmt::If { .. }) => self.if_chain(nested, "} else "),
            Some(other) => {
                self.line("} else {");
                self.branch(other);
                self.line("}");
            }
        }
    }

    fn branch(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.block_body(block),
            other => {
                self.indent += 1;
                self.stmt(other);
                self.indent -= 1;
            }
        }
    }
}

fn push_modifiers(out: &mut String, modifiers: &str) {
    if !modifiers.is_empty() {
        out.push_str(modifiers);
        out.push(' ');
    }
}

fn params(params: &[Parameter]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn annotation_text(annotation: &Annotation) -> String {
    match &annotation.value {
        Some(value) => format!("@{}({})", annotation.name, value),
        None => format!("@{}", annotation.name),
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// Binding strength of an expression when used as an operand.
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Assign { .. } | Expr::Lambda { .. } => 0,
        Expr::Conditional { .. } => 2,
        Expr::Binary { op, .. } => op.precedence(),
        Expr::Unary { .. } => 14,
        _ => 16,
    }
}

fn operand(f: &mut fmt::Formatter<'_>, expr: &Expr, min: u8) -> fmt::Result {
    if precedence(expr) < min {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

fn args(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

/// Escape a string for use inside a Java string literal.
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

fn double_literal(value: f64) -> String {
    let text = format!("{:?}", value);
    if text.contains(['.', 'e', 'E']) {
        text
    } else {
        format!("{}.0", text)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Name(name) => f.write_str(name),
            Expr::This => f.write_str("this"),
            Expr::Null => f.write_str("null"),
            Expr::IntLit(value) => {
                if i32::try_from(*value).is_ok() {
                    write!(f, "{}", value)
                } else {
                    write!(f, "{}L", value)
                }
            }
            Expr::LongLit(value) => write!(f, "{}L", value),
            Expr::DoubleLit(value) => f.write_str(&double_literal(value.into_inner())),
            Expr::StringLit(value) => write!(f, "\"{}\"", escape_string(value)),
            Expr::BoolLit(value) => write!(f, "{}", value),
            Expr::FieldAccess { receiver, name } => {
                operand(f, receiver, 16)?;
                write!(f, ".{}", name)
            }
            Expr::MethodCall {
                receiver,
                name,
                args: call_args,
            } => {
                if let Some(receiver) = receiver {
                    operand(f, receiver, 16)?;
                    f.write_str(".")?;
                }
                write!(f, "{}(", name)?;
                args(f, call_args)?;
                f.write_str(")")
            }
            Expr::ObjectCreation { ty, args: call_args } => {
                write!(f, "new {}(", ty)?;
                args(f, call_args)?;
                f.write_str(")")
            }
            Expr::Binary { left, op, right } => {
                let prec = op.precedence();
                operand(f, left, prec)?;
                write!(f, " {} ", op.as_str())?;
                operand(f, right, prec + 1)
            }
            Expr::Unary { op, operand: inner } => {
                f.write_str(op.as_str())?;
                // `- -x` must not print as the decrement operator
                let doubled_minus = *op == UnaryOperator::Minus
                    && matches!(
                        **inner,
                        Expr::Unary { op: UnaryOperator::Minus, .. }
                            | Expr::IntLit(i64::MIN..0)
                            | Expr::LongLit(i64::MIN..0)
                    );
                if doubled_minus {
                    write!(f, "({})", inner)
                } else {
                    operand(f, inner, 14)
                }
            }
            Expr::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                operand(f, condition, 3)?;
                f.write_str(" ? ")?;
                operand(f, then_expr, 3)?;
                f.write_str(" : ")?;
                operand(f, else_expr, 2)
            }
            Expr::Enclosed(inner) => write!(f, "({})", inner),
            Expr::Assign { target, op, value } => {
                write!(f, "{} {} {}", target, op.as_str(), value)
            }
            Expr::Lambda { params, body } => {
                write!(f, "({}) -> {}", params.join(", "), body)
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::new();
        printer.stmt(self);
        f.write_str(printer.finish().trim_end())
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::new();
        printer.member(self);
        f.write_str(printer.finish().trim_end())
    }
}

impl fmt::Display for CompilationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::new();
        printer.unit(self);
        f.write_str(&printer.finish())
    }
}
