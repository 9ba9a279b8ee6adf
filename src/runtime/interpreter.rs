//! Tree-walking interpreter
//!
//! One [`Interpreter`] owns the shared global environment. Function calls push
//! a local frame; name lookup checks the innermost frame, then globals, then
//! the builtin registry.

use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use tracing::trace;

use super::ast::{Expr, FunctionDef, LogicalOp, Program, Stmt, StmtKind, Target};
use super::builtins::{build_dict, call_method, BUILTINS};
use super::env::Environment;
use super::error::{ErrorKind, ScriptError, ScriptResult};
use super::ops;
use super::parser::parse;
use super::value::Value;
use crate::script_bail;

/// Deepest user function nesting before a RecursionError
pub const MAX_CALL_DEPTH: usize = 200;

/// How a statement finished
#[derive(Debug)]
enum Flow {
    Normal,
    Return(Value),
    Break,
    Continue,
}

pub struct Interpreter {
    globals: Environment,
    frames: Vec<Environment>,
    output: Box<dyn Write>,
}

impl fmt::Debug for Interpreter {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("globals", &self.globals.len())
            .field("frames", &self.frames.len())
            .finish()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Interpreter printing to stdout
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Interpreter printing to the given sink
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Self {
            globals: Environment::new(),
            frames: Vec::new(),
            output,
        }
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    /// Drop every user binding
    pub fn clear(&mut self) {
        self.globals.clear();
        self.frames.clear();
    }

    /// Write program output (used by `print`)
    pub fn write_output(
        &mut self,
        text: &str,
    ) -> ScriptResult<()> {
        self.output
            .write_all(text.as_bytes())
            .and_then(|_| self.output.flush())
            .map_err(|e| ScriptError::new(ErrorKind::OSError, e.to_string()))
    }

    /// Run a snippet. A lone expression yields its value; anything else is
    /// executed for effect and yields `None`.
    pub fn run(
        &mut self,
        source: &str,
    ) -> ScriptResult<Option<Value>> {
        let program = parse(source)?;
        match program.as_expression() {
            Some(expr) => {
                trace!("evaluating expression");
                self.eval_expr(expr).map(Some)
            }
            None => {
                trace!(statements = program.statements.len(), "executing statements");
                self.exec_program(&program).map(|_| None)
            }
        }
    }

    /// Execute statements for effect
    pub fn exec(
        &mut self,
        source: &str,
    ) -> ScriptResult<()> {
        let program = parse(source)?;
        self.exec_program(&program)
    }

    /// Evaluate a single expression
    pub fn eval(
        &mut self,
        source: &str,
    ) -> ScriptResult<Value> {
        let program = parse(source)?;
        match program.as_expression() {
            Some(expr) => self.eval_expr(expr),
            None => Err(ScriptError::syntax("invalid syntax: expected a single expression")),
        }
    }

    fn exec_program(
        &mut self,
        program: &Program,
    ) -> ScriptResult<()> {
        // The parser rejects return/break/continue outside their context
        self.exec_block(&program.statements).map(|_| ())
    }

    fn exec_block(
        &mut self,
        statements: &[Stmt],
    ) -> ScriptResult<Flow> {
        for stmt in statements {
            let flow = self.exec_stmt(stmt).map_err(|e| match e.line {
                Some(_) => e,
                None => e.at_line(stmt.line),
            })?;
            if !matches!(flow, Flow::Normal) {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(
        &mut self,
        stmt: &Stmt,
    ) -> ScriptResult<Flow> {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
            }
            StmtKind::Assign { target, value } => {
                let value = self.eval_expr(value)?;
                self.assign(target, value)?;
            }
            StmtKind::AugAssign { target, op, value } => {
                let current = match target {
                    Target::Name(name) => self.lookup(name)?,
                    Target::Index { object, index } => {
                        let object = self.eval_expr(object)?;
                        let index = self.eval_expr(index)?;
                        ops::get_item(&object, &index)?
                    }
                };
                let rhs = self.eval_expr(value)?;
                let updated = ops::binary(*op, &current, &rhs)?;
                self.assign(target, updated)?;
            }
            StmtKind::Def(def) => {
                self.scope_mut().set(def.name.clone(), Value::Function(def.clone()));
            }
            StmtKind::If { branches, orelse } => {
                for (condition, body) in branches {
                    if self.eval_expr(condition)?.is_truthy() {
                        return self.exec_block(body);
                    }
                }
                return self.exec_block(orelse);
            }
            StmtKind::While { condition, body } => {
                while self.eval_expr(condition)?.is_truthy() {
                    match self.exec_block(body)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {}
                    }
                }
            }
            StmtKind::For {
                var,
                iterable,
                body,
            } => {
                let items = self.eval_expr(iterable)?.iter_values()?;
                for item in items {
                    self.scope_mut().set(var.clone(), item);
                    match self.exec_block(body)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {}
                    }
                }
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::None,
                };
                return Ok(Flow::Return(value));
            }
            StmtKind::Break => return Ok(Flow::Break),
            StmtKind::Continue => return Ok(Flow::Continue),
            StmtKind::Pass => {}
            StmtKind::Del(names) => {
                for name in names {
                    if self.scope_mut().remove(name).is_none() {
                        return Err(ScriptError::name(name));
                    }
                }
            }
        }
        Ok(Flow::Normal)
    }

    /// Innermost scope: the current function frame, or globals
    fn scope_mut(&mut self) -> &mut Environment {
        match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.globals,
        }
    }

    fn assign(
        &mut self,
        target: &Target,
        value: Value,
    ) -> ScriptResult<()> {
        match target {
            Target::Name(name) => {
                self.scope_mut().set(name.clone(), value);
                Ok(())
            }
            Target::Index { object, index } => {
                let object = self.eval_expr(object)?;
                let index = self.eval_expr(index)?;
                ops::set_item(&object, &index, value)
            }
        }
    }

    fn lookup(
        &self,
        name: &str,
    ) -> ScriptResult<Value> {
        if let Some(value) = self.frames.last().and_then(|frame| frame.get(name)) {
            return Ok(value.clone());
        }
        if let Some(value) = self.globals.get(name) {
            return Ok(value.clone());
        }
        match BUILTINS.get(name) {
            Some(builtin) => Ok(Value::Builtin(builtin)),
            None => Err(ScriptError::name(name)),
        }
    }

    fn eval_expr(
        &mut self,
        expr: &Expr,
    ) -> ScriptResult<Value> {
        match expr {
            Expr::None => Ok(Value::None),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Int(i) => Ok(Value::Int(*i)),
            Expr::Float(f) => Ok(Value::Float(*f)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Name(name) => self.lookup(name),
            Expr::List(items) => {
                let items = self.eval_all(items)?;
                Ok(Value::list(items))
            }
            Expr::Dict(pairs) => {
                let mut evaluated = Vec::with_capacity(pairs.len());
                for (key, value) in pairs {
                    let key = self.eval_expr(key)?;
                    let value = self.eval_expr(value)?;
                    evaluated.push((key, value));
                }
                build_dict(evaluated)
            }
            Expr::Unary { op, operand } => {
                let operand = self.eval_expr(operand)?;
                ops::unary(*op, &operand)
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval_expr(lhs)?;
                let rhs = self.eval_expr(rhs)?;
                ops::binary(*op, &lhs, &rhs)
            }
            Expr::Logical { op, lhs, rhs } => {
                let lhs = self.eval_expr(lhs)?;
                match (op, lhs.is_truthy()) {
                    (LogicalOp::And, false) | (LogicalOp::Or, true) => Ok(lhs),
                    _ => self.eval_expr(rhs),
                }
            }
            Expr::Call { callee, args } => {
                let callee = self.eval_expr(callee)?;
                let args = self.eval_all(args)?;
                self.call(callee, args)
            }
            Expr::Method { object, name, args } => {
                let object = self.eval_expr(object)?;
                let args = self.eval_all(args)?;
                call_method(&object, name, args)
            }
            Expr::Index { object, index } => {
                let object = self.eval_expr(object)?;
                let index = self.eval_expr(index)?;
                ops::get_item(&object, &index)
            }
        }
    }

    fn eval_all(
        &mut self,
        exprs: &[Expr],
    ) -> ScriptResult<Vec<Value>> {
        exprs.iter().map(|expr| self.eval_expr(expr)).collect()
    }

    /// Call a function value with evaluated arguments
    pub fn call(
        &mut self,
        callee: Value,
        args: Vec<Value>,
    ) -> ScriptResult<Value> {
        match callee {
            Value::Builtin(builtin) => (builtin.func)(self, args),
            Value::Function(def) => self.call_function(&def, args),
            other => script_bail!(TypeError, "'{}' object is not callable", other.type_name()),
        }
    }

    fn call_function(
        &mut self,
        def: &Rc<FunctionDef>,
        args: Vec<Value>,
    ) -> ScriptResult<Value> {
        if args.len() != def.params.len() {
            script_bail!(
                TypeError,
                "{}() takes {} positional argument{} but {} {} given",
                def.name,
                def.params.len(),
                if def.params.len() == 1 { "" } else { "s" },
                args.len(),
                if args.len() == 1 { "was" } else { "were" }
            );
        }
        if self.frames.len() >= MAX_CALL_DEPTH {
            script_bail!(RecursionError, "maximum recursion depth exceeded");
        }

        let mut frame = Environment::new();
        for (param, arg) in def.params.iter().zip(args) {
            frame.set(param.clone(), arg);
        }
        self.frames.push(frame);
        let outcome = self.exec_block(&def.body);
        self.frames.pop();

        match outcome? {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::None),
        }
    }
}
