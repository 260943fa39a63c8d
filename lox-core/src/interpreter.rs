// lox-core - Tree-walking evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The tree-walking evaluator.
//!
//! Dispatches over AST nodes by pattern matching. Resolution distances
//! recorded by the resolver drive local variable access; names without a
//! recorded distance are looked up dynamically in the global frame.
//! Program output goes through an injected writer so callers (and tests)
//! can capture it.

use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use lox_parser::{BinaryOp, Expr, Literal, LogicalOp, NodeId, Stmt, UnaryOp};

use crate::builtins::register_builtins;
use crate::class::{LoxClass, LoxInstance};
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::function::LoxFunction;
use crate::value::Value;

/// The tree-walking interpreter.
///
/// Holds the global frame, the current frame, the resolver's distance
/// table and the output sink. One interpreter lives for a whole REPL
/// session: globals and resolution entries accumulate across lines.
pub struct Interpreter<W = io::Stdout> {
    globals: Environment,
    environment: Environment,
    locals: HashMap<NodeId, usize>,
    out: W,
}

impl Interpreter<io::Stdout> {
    /// An interpreter writing program output to stdout.
    pub fn new() -> Self {
        Interpreter::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// An interpreter writing program output to `out`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lox_core::{resolve, Interpreter};
    /// use lox_parser::{NodeIds, Parser, Scanner};
    ///
    /// let (tokens, _) = Scanner::scan_all("print 1 + 2 * 3;");
    /// let mut ids = NodeIds::new();
    /// let program = Parser::new(tokens, &mut ids).parse().unwrap();
    ///
    /// let mut interpreter = Interpreter::with_output(Vec::new());
    /// interpreter.resolve(resolve(&program).unwrap());
    /// interpreter.interpret(&program).unwrap();
    ///
    /// assert_eq!(String::from_utf8(interpreter.into_output()).unwrap(), "7\n");
    /// ```
    pub fn with_output(out: W) -> Self {
        let globals = Environment::new();
        register_builtins(&globals);
        Interpreter {
            environment: globals.clone(),
            globals,
            locals: HashMap::new(),
            out,
        }
    }

    /// Merge a resolver distance table into the interpreter.
    ///
    /// Call once per resolved program; REPL sessions call it per line and
    /// the entries accumulate (node ids are globally unique).
    pub fn resolve(&mut self, locals: HashMap<NodeId, usize>) {
        self.locals.extend(locals);
    }

    /// Execute a resolved program.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        for statement in statements {
            self.execute(statement)?;
        }
        Ok(())
    }

    /// Take back the output sink, consuming the interpreter.
    pub fn into_output(self) -> W {
        self.out
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn execute(&mut self, statement: &Stmt) -> Result<()> {
        match statement {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value).map_err(|e| Error::Output(e.to_string()))?;
            }
            Stmt::Var {
                name, initializer, ..
            } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Value::Nil,
                };
                self.environment.define(name.clone(), value);
            }
            Stmt::Block(statements) => {
                self.execute_block(statements, self.environment.child())?;
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)?;
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
            }
            Stmt::Function(decl) => {
                let function = LoxFunction::new(
                    Rc::clone(decl),
                    self.environment.clone(),
                    false,
                );
                self.environment
                    .define(decl.name.clone(), Value::Function(Rc::new(function)));
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Nil,
                };
                return Err(Error::Return(value));
            }
            Stmt::Class {
                name,
                superclass,
                methods,
                ..
            } => self.execute_class(name, superclass.as_ref(), methods)?,
        }
        Ok(())
    }

    /// Run `statements` in `environment`, restoring the previous frame on
    /// every exit path — including `return` unwinds and runtime errors.
    fn execute_block(&mut self, statements: &[Stmt], environment: Environment) -> Result<()> {
        let previous = std::mem::replace(&mut self.environment, environment);
        let result = statements
            .iter()
            .try_for_each(|statement| self.execute(statement));
        self.environment = previous;
        result
    }

    fn execute_class(
        &mut self,
        name: &str,
        superclass: Option<&Expr>,
        methods: &[Rc<lox_parser::FunctionDecl>],
    ) -> Result<()> {
        let superclass = match superclass {
            Some(expr) => {
                let line = match expr {
                    Expr::Variable { line, .. } => *line,
                    _ => 0,
                };
                match self.evaluate(expr)? {
                    Value::Class(class) => Some(class),
                    _ => return Err(Error::SuperclassMustBeClass { line }),
                }
            }
            None => None,
        };

        self.environment.define(name.to_string(), Value::Nil);

        // Methods close over a frame holding `super` when there is a
        // superclass, mirroring the resolver's synthetic scope.
        let method_closure = match &superclass {
            Some(superclass) => {
                let environment = self.environment.child();
                environment.define("super", Value::Class(Rc::clone(superclass)));
                environment
            }
            None => self.environment.clone(),
        };

        let mut method_table = HashMap::new();
        for method in methods {
            let is_initializer = method.name == "init";
            let function =
                LoxFunction::new(Rc::clone(method), method_closure.clone(), is_initializer);
            method_table.insert(method.name.clone(), Rc::new(function));
        }

        let class = Rc::new(LoxClass {
            name: name.to_string(),
            superclass,
            methods: method_table,
        });
        self.environment.assign(name, Value::Class(class));
        Ok(())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                Literal::Nil => Value::Nil,
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Number(n) => Value::Number(*n),
                Literal::String(s) => Value::Str(Rc::from(s.as_str())),
            }),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Unary { op, line, operand } => {
                let value = self.evaluate(operand)?;
                match op {
                    UnaryOp::Neg => match value {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        _ => Err(Error::OperandMustBeNumber { line: *line }),
                    },
                    UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                }
            }
            Expr::Binary {
                left,
                op,
                line,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.binary(left, *op, *line, right)
            }
            Expr::Logical { left, op, right } => {
                let left = self.evaluate(left)?;
                match op {
                    LogicalOp::Or if left.is_truthy() => Ok(left),
                    LogicalOp::And if !left.is_truthy() => Ok(left),
                    _ => self.evaluate(right),
                }
            }
            Expr::Variable { id, name, line } => self.look_up_variable(*id, name, *line),
            Expr::Assign {
                id,
                name,
                line,
                value,
            } => {
                let value = self.evaluate(value)?;
                let assigned = match self.locals.get(id) {
                    Some(&distance) => {
                        self.environment.assign_at(distance, name, value.clone())
                    }
                    None => self.globals.assign(name, value.clone()),
                };
                if !assigned {
                    return Err(Error::undefined_variable(*line, name));
                }
                Ok(value)
            }
            Expr::Call { callee, line, args } => {
                let callee = self.evaluate(callee)?;
                let mut arguments = Vec::with_capacity(args.len());
                for arg in args {
                    arguments.push(self.evaluate(arg)?);
                }
                self.call_value(callee, arguments, *line)
            }
            Expr::Get { object, name, line } => match self.evaluate(object)? {
                Value::Instance(instance) => instance
                    .get(name)
                    .ok_or_else(|| Error::undefined_property(*line, name)),
                _ => Err(Error::NoProperties { line: *line }),
            },
            Expr::Set {
                object,
                name,
                line,
                value,
            } => {
                // The receiver evaluates before the value.
                let object = self.evaluate(object)?;
                match object {
                    Value::Instance(instance) => {
                        let value = self.evaluate(value)?;
                        instance.set(name.clone(), value.clone());
                        Ok(value)
                    }
                    _ => Err(Error::NoFields { line: *line }),
                }
            }
            Expr::This { id, line } => self.look_up_variable(*id, "this", *line),
            Expr::Super { id, method, line } => self.super_method(*id, method, *line),
        }
    }

    fn binary(&mut self, left: Value, op: BinaryOp, line: u32, right: Value) -> Result<Value> {
        match op {
            BinaryOp::Add => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::Str(a), Value::Str(b)) => {
                    let mut joined = String::with_capacity(a.len() + b.len());
                    joined.push_str(&a);
                    joined.push_str(&b);
                    Ok(Value::Str(Rc::from(joined)))
                }
                _ => Err(Error::AddOperands { line }),
            },
            BinaryOp::Sub => self.numeric(left, right, line, |a, b| Value::Number(a - b)),
            BinaryOp::Mul => self.numeric(left, right, line, |a, b| Value::Number(a * b)),
            BinaryOp::Div => self.numeric(left, right, line, |a, b| Value::Number(a / b)),
            BinaryOp::Less => self.numeric(left, right, line, |a, b| Value::Bool(a < b)),
            BinaryOp::LessEqual => self.numeric(left, right, line, |a, b| Value::Bool(a <= b)),
            BinaryOp::Greater => self.numeric(left, right, line, |a, b| Value::Bool(a > b)),
            BinaryOp::GreaterEqual => self.numeric(left, right, line, |a, b| Value::Bool(a >= b)),
            BinaryOp::Equal => Ok(Value::Bool(left == right)),
            BinaryOp::NotEqual => Ok(Value::Bool(left != right)),
        }
    }

    fn numeric(
        &self,
        left: Value,
        right: Value,
        line: u32,
        apply: fn(f64, f64) -> Value,
    ) -> Result<Value> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(apply(a, b)),
            _ => Err(Error::OperandsMustBeNumbers { line }),
        }
    }

    fn look_up_variable(&self, id: NodeId, name: &str, line: u32) -> Result<Value> {
        let value = match self.locals.get(&id) {
            Some(&distance) => self.environment.get_at(distance, name),
            None => self.globals.get(name),
        };
        value.ok_or_else(|| Error::undefined_variable(line, name))
    }

    fn super_method(&mut self, id: NodeId, method: &str, line: u32) -> Result<Value> {
        let distance = *self
            .locals
            .get(&id)
            .ok_or_else(|| Error::undefined_variable(line, "super"))?;
        let superclass = match self.environment.get_at(distance, "super") {
            Some(Value::Class(class)) => class,
            _ => return Err(Error::undefined_variable(line, "super")),
        };
        // `this` lives in the frame just inside the one holding `super`.
        let receiver = self
            .environment
            .get_at(distance - 1, "this")
            .ok_or_else(|| Error::undefined_variable(line, "this"))?;

        let method_fn = superclass
            .find_method(method)
            .ok_or_else(|| Error::undefined_property(line, method))?;
        Ok(Value::Function(Rc::new(method_fn.bind(receiver))))
    }

    // ========================================================================
    // Calls
    // ========================================================================

    fn call_value(&mut self, callee: Value, args: Vec<Value>, line: u32) -> Result<Value> {
        match callee {
            Value::Native(native) => {
                if args.len() != native.arity {
                    return Err(Error::arity(line, native.arity, args.len()));
                }
                (native.call)(&args)
            }
            Value::Function(function) => self.call_function(&function, args, line),
            Value::Class(class) => self.instantiate(class, args, line),
            _ => Err(Error::NotCallable { line }),
        }
    }

    fn call_function(
        &mut self,
        function: &Rc<LoxFunction>,
        args: Vec<Value>,
        line: u32,
    ) -> Result<Value> {
        if args.len() != function.arity() {
            return Err(Error::arity(line, function.arity(), args.len()));
        }

        let environment = function.closure.child();
        for (param, arg) in function.decl.params.iter().zip(args) {
            environment.define(param.clone(), arg);
        }

        let result = self.execute_block(&function.decl.body, environment);
        let returned = match result {
            Ok(()) => Value::Nil,
            Err(Error::Return(value)) => value,
            Err(err) => return Err(err),
        };

        // An initializer always yields the receiver, even on bare return.
        if function.is_initializer {
            return function
                .closure
                .get_at(0, "this")
                .ok_or_else(|| Error::undefined_variable(line, "this"));
        }
        Ok(returned)
    }

    fn instantiate(&mut self, class: Rc<LoxClass>, args: Vec<Value>, line: u32) -> Result<Value> {
        let instance = Rc::new(LoxInstance::new(Rc::clone(&class)));
        let value = Value::Instance(Rc::clone(&instance));

        match class.find_method("init") {
            Some(init) => {
                let bound = Rc::new(init.bind(value.clone()));
                self.call_function(&bound, args, line)?;
            }
            None => {
                if !args.is_empty() {
                    return Err(Error::arity(line, 0, args.len()));
                }
            }
        }
        Ok(value)
    }
}
