//! Java declarations and compilation units.

use crate::expr::Expr;
use crate::stmt::Block;
use crate::types::{Modifiers, TypeRef};

/// `@Name` or `@Name(value)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub name: String,
    pub value: Option<Expr>,
}

impl Annotation {
    pub fn marker(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn single(name: impl Into<String>, value: Expr) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub ty: TypeRef,
    pub name: String,
}

impl Parameter {
    pub fn new(ty: TypeRef, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDecl {
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub name: String,
    pub init: Option<Expr>,
}

impl FieldDecl {
    pub fn new(modifiers: Modifiers, ty: TypeRef, name: impl Into<String>, init: Option<Expr>) -> Self {
        Self {
            modifiers,
            ty,
            name: name.into(),
            init,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDecl {
    pub annotations: Vec<Annotation>,
    pub modifiers: Modifiers,
    pub ret: TypeRef,
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Block,
}

impl MethodDecl {
    pub fn new(
        modifiers: Modifiers,
        ret: TypeRef,
        name: impl Into<String>,
        params: Vec<Parameter>,
        body: Block,
    ) -> Self {
        Self {
            annotations: Vec::new(),
            modifiers,
            ret,
            name: name.into(),
            params,
            body,
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructorDecl {
    pub modifiers: Modifiers,
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Block,
}

/// A class body member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Member {
    Field(FieldDecl),
    Constructor(ConstructorDecl),
    Method(MethodDecl),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Field(field) => &field.name,
            Member::Constructor(ctor) => &ctor.name,
            Member::Method(method) => &method.name,
        }
    }

    pub fn as_field(&self) -> Option<&FieldDecl> {
        match self {
            Member::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodDecl> {
        match self {
            Member::Method(method) => Some(method),
            _ => None,
        }
    }
}

impl From<FieldDecl> for Member {
    fn from(field: FieldDecl) -> Self {
        Member::Field(field)
    }
}

impl From<MethodDecl> for Member {
    fn from(method: MethodDecl) -> Self {
        Member::Method(method)
    }
}

impl From<ConstructorDecl> for Member {
    fn from(ctor: ConstructorDecl) -> Self {
        Member::Constructor(ctor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassDecl {
    pub modifiers: Modifiers,
    pub name: String,
    pub extends: Option<TypeRef>,
    pub members: Vec<Member>,
}

impl ClassDecl {
    pub fn new(modifiers: Modifiers, name: impl Into<String>) -> Self {
        Self {
            modifiers,
            name: name.into(),
            extends: None,
            members: Vec::new(),
        }
    }

    pub fn extending(mut self, parent: TypeRef) -> Self {
        self.extends = Some(parent);
        self
    }

    pub fn push(&mut self, member: impl Into<Member>) {
        self.members.push(member.into());
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.members
            .iter()
            .filter_map(Member::as_field)
            .find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.members
            .iter()
            .filter_map(Member::as_method)
            .find(|m| m.name == name)
    }
}

/// A `.java` source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CompilationUnit {
    pub package: Option<String>,
    /// Fully qualified import names, in insertion order.
    pub imports: Vec<String>,
    pub types: Vec<ClassDecl>,
}

impl CompilationUnit {
    pub fn new(package: Option<String>) -> Self {
        Self {
            package,
            ..Self::default()
        }
    }

    /// Add an import unless it is already present.
    pub fn add_import(&mut self, import: impl Into<String>) {
        let import = import.into();
        if !self.imports.contains(&import) {
            self.imports.push(import);
        }
    }

    pub fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.types.iter().find(|c| c.name == name)
    }
}
