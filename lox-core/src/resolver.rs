// lox-core - Static resolution pass
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Static lexical resolution.
//!
//! A side-effect-only pass over the AST that records, for every variable
//! use site, how many enclosing scopes the evaluator must walk at runtime
//! to find the binding. Sites with no recorded distance are global
//! lookups. The pass also rejects the static errors the grammar cannot:
//! reading a local in its own initializer, duplicate locals, `return`
//! outside a function, `this`/`super` outside a class, and friends.

use std::collections::HashMap;

use lox_parser::{Expr, FunctionDecl, NodeId, Stmt};

use crate::error::ResolveError;

/// What kind of function body is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    None,
    Function,
    Initializer,
    Method,
}

/// What kind of class body is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassKind {
    None,
    Class,
    Subclass,
}

/// Binding state of a name within a scope.
///
/// A name is `Declared` from its `var` keyword until the initializer has
/// finished, which is the window where reading it is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindingState {
    Declared,
    Defined,
}

/// Resolve a program, producing the use-site distance table.
///
/// All errors are collected; the program must be rejected when any are
/// returned.
pub fn resolve(statements: &[Stmt]) -> Result<HashMap<NodeId, usize>, Vec<ResolveError>> {
    let mut resolver = Resolver {
        scopes: Vec::new(),
        locals: HashMap::new(),
        errors: Vec::new(),
        current_function: FunctionKind::None,
        current_class: ClassKind::None,
    };
    resolver.resolve_statements(statements);
    if resolver.errors.is_empty() {
        Ok(resolver.locals)
    } else {
        Err(resolver.errors)
    }
}

struct Resolver {
    /// Stack of local scopes, innermost last. The global scope is not
    /// represented: names that fall off the stack resolve dynamically in
    /// globals.
    scopes: Vec<HashMap<String, BindingState>>,
    locals: HashMap<NodeId, usize>,
    errors: Vec<ResolveError>,
    current_function: FunctionKind,
    current_class: ClassKind,
}

impl Resolver {
    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_statement(statement);
        }
    }

    fn resolve_statement(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Expression(expr) | Stmt::Print(expr) => self.resolve_expr(expr),
            Stmt::Var {
                name,
                line,
                initializer,
            } => {
                self.declare(name, *line);
                if let Some(initializer) = initializer {
                    self.resolve_expr(initializer);
                }
                self.define(name);
            }
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve_statements(statements);
                self.end_scope();
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_statement(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_statement(body);
            }
            Stmt::Function(decl) => {
                // Declare and define eagerly so the function can recurse.
                self.declare(&decl.name, decl.line);
                self.define(&decl.name);
                self.resolve_function(decl, FunctionKind::Function);
            }
            Stmt::Return { line, value } => {
                if self.current_function == FunctionKind::None {
                    self.error(*line, "return", "Can't return from top-level code.");
                }
                if let Some(value) = value {
                    if self.current_function == FunctionKind::Initializer {
                        self.error(*line, "return", "Can't return a value from an initializer.");
                    }
                    self.resolve_expr(value);
                }
            }
            Stmt::Class {
                name,
                line,
                superclass,
                methods,
            } => self.resolve_class(name, *line, superclass.as_ref(), methods),
        }
    }

    fn resolve_class(
        &mut self,
        name: &str,
        line: u32,
        superclass: Option<&Expr>,
        methods: &[std::rc::Rc<FunctionDecl>],
    ) {
        let enclosing_class = self.current_class;
        self.current_class = ClassKind::Class;

        self.declare(name, line);
        self.define(name);

        if let Some(superclass) = superclass {
            self.current_class = ClassKind::Subclass;
            if let Expr::Variable {
                name: super_name,
                line: super_line,
                ..
            } = superclass
            {
                if super_name == name {
                    self.error(*super_line, super_name, "A class can't inherit from itself.");
                }
            }
            self.resolve_expr(superclass);

            // The methods close over a scope holding `super`.
            self.begin_scope();
            self.define("super");
        }

        self.begin_scope();
        self.define("this");

        for method in methods {
            let kind = if method.name == "init" {
                FunctionKind::Initializer
            } else {
                FunctionKind::Method
            };
            self.resolve_function(method, kind);
        }

        self.end_scope();
        if superclass.is_some() {
            self.end_scope();
        }
        self.current_class = enclosing_class;
    }

    fn resolve_function(&mut self, decl: &FunctionDecl, kind: FunctionKind) {
        let enclosing = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &decl.params {
            self.declare(param, decl.line);
            self.define(param);
        }
        self.resolve_statements(&decl.body);
        self.end_scope();

        self.current_function = enclosing;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Grouping(inner) => self.resolve_expr(inner),
            Expr::Unary { operand, .. } => self.resolve_expr(operand),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Variable { id, name, line } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(name) == Some(&BindingState::Declared) {
                        self.error(
                            *line,
                            name,
                            "Can't read local variable in its own initializer.",
                        );
                    }
                }
                self.resolve_local(*id, name);
            }
            Expr::Assign { id, name, value, .. } => {
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            }
            Expr::Call { callee, args, .. } => {
                self.resolve_expr(callee);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Get { object, .. } => self.resolve_expr(object),
            Expr::Set { object, value, .. } => {
                self.resolve_expr(object);
                self.resolve_expr(value);
            }
            Expr::This { id, line } => {
                if self.current_class == ClassKind::None {
                    self.error(*line, "this", "Can't use 'this' outside of a class.");
                    return;
                }
                self.resolve_local(*id, "this");
            }
            Expr::Super { id, line, .. } => {
                match self.current_class {
                    ClassKind::None => {
                        self.error(*line, "super", "Can't use 'super' outside of a class.");
                    }
                    ClassKind::Class => {
                        self.error(
                            *line,
                            "super",
                            "Can't use 'super' in a class with no superclass.",
                        );
                    }
                    ClassKind::Subclass => {}
                }
                self.resolve_local(*id, "super");
            }
        }
    }

    /// Record the use-site distance: 0 is the innermost scope. Names not
    /// found in any local scope are globals and get no entry.
    fn resolve_local(&mut self, id: NodeId, name: &str) {
        for (distance, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name) {
                self.locals.insert(id, distance);
                return;
            }
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Mark a name declared-but-uninitialised in the current scope. At
    /// global depth this is a no-op: globals may be freely redeclared.
    fn declare(&mut self, name: &str, line: u32) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        if scope.contains_key(name) {
            self.error(line, name, "Already a variable with this name in the scope.");
            return;
        }
        scope.insert(name.to_string(), BindingState::Declared);
    }

    fn define(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), BindingState::Defined);
        }
    }

    fn error(&mut self, line: u32, lexeme: &str, message: &str) {
        self.errors.push(ResolveError::new(line, lexeme, message));
    }
}
