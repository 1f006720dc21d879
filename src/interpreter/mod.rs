use std::io::{self, Write};
use std::ops::{Deref, DerefMut};

use log::{debug, trace};

mod environment;
mod error;

pub use environment::Environment;
pub use error::RuntimeError;

use crate::parser::{Expression, Locatable, Operator, Statement};
use environment::ScopeId;

type ExecResult = Result<(), RuntimeError>;
type ValueResult = Result<f64, RuntimeError>;

/// Tree-walking evaluator. Owns the scope chain and the sink that `print`
/// statements write to. Globals survive across [`Interpreter::interpret`]
/// calls on the same instance.
pub struct Interpreter<W: Write = io::Stdout> {
    environment: Environment,
    output: W,
}

impl Interpreter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Interpreter<W> {
    pub fn new(output: W) -> Self {
        Self {
            environment: Environment::new(),
            output,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Value of the innermost visible binding of `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.environment.lookup(name)
    }

    /// Executes `statements` in order. The first runtime error aborts the run;
    /// the scope chain is back at the global scope when this returns.
    pub fn interpret(&mut self, statements: &[Statement]) -> ExecResult {
        debug!("interpreting {} statements", statements.len());
        let result = statements.iter().try_for_each(|s| self.execute(s));
        // a failed flush must not hide the error that stopped the run
        let flushed = self.output.flush();
        result?;
        flushed?;
        Ok(())
    }

    fn execute(&mut self, statement: &Statement) -> ExecResult {
        trace!("line {}: {statement}", statement.line());
        match statement {
            Statement::Expression(expr, _) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Statement::VariableDeclaration(name, initializer, _) => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => 0.0,
                };
                self.environment.define(&name.name, value);
                Ok(())
            }
            Statement::Block(statements, _) => self.block(statements),
            Statement::If(condition, then_branch, else_branch, _) => {
                if is_truthy(self.evaluate(condition)?) {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Statement::While(condition, body, _) => {
                while is_truthy(self.evaluate(condition)?) {
                    self.execute(body)?;
                }
                Ok(())
            }
            Statement::Print(expr, _) => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{value}")?;
                Ok(())
            }
        }
    }

    fn block(&mut self, statements: &[Statement]) -> ExecResult {
        let mut scope = BlockScope::enter(self);
        for statement in statements {
            scope.execute(statement)?;
        }
        Ok(())
    }

    pub fn evaluate(&mut self, expression: &Expression) -> ValueResult {
        match expression {
            Expression::Literal(value, _) => Ok(*value),
            Expression::Variable(name) => self.environment.get(name),
            Expression::Unary(op, operand, span) => {
                let right = self.evaluate(operand)?;
                match op {
                    Operator::Minus => Ok(-right),
                    Operator::Not => Ok(from_bool(!is_truthy(right))),
                    _ => unreachable!("unary operator {op} at line {}", span.start.line),
                }
            }
            Expression::Binary(op, operands, span) => {
                let left = self.evaluate(&operands.0)?;
                let right = self.evaluate(&operands.1)?;
                binary(*op, left, right, span.start.line)
            }
            Expression::Assignment(name, value, _) => {
                let value = self.evaluate(value)?;
                self.environment.assign(name, value)?;
                Ok(value)
            }
        }
    }
}

fn binary(op: Operator, left: f64, right: f64, line: usize) -> ValueResult {
    let value = match op {
        Operator::Plus => left + right,
        Operator::Minus => left - right,
        Operator::Times => left * right,
        Operator::Divide => {
            if right == 0.0 {
                return Err(RuntimeError::DivisionByZero { line });
            }
            left / right
        }
        Operator::GreaterThan => from_bool(left > right),
        Operator::GreaterThanEqual => from_bool(left >= right),
        Operator::LessThan => from_bool(left < right),
        Operator::LessThanEqual => from_bool(left <= right),
        Operator::Equal => from_bool(left == right),
        Operator::NotEqual => from_bool(left != right),
        Operator::Not => unreachable!("binary operator {op} at line {line}"),
    };
    Ok(value)
}

fn is_truthy(value: f64) -> bool {
    value != 0.0
}

fn from_bool(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// A block's scope. Entering opens a fresh scope; dropping the guard returns
/// the interpreter to the enclosing scope, on error paths as well.
struct BlockScope<'i, W: Write> {
    interpreter: &'i mut Interpreter<W>,
    enclosing: ScopeId,
}

impl<'i, W: Write> BlockScope<'i, W> {
    fn enter(interpreter: &'i mut Interpreter<W>) -> Self {
        let enclosing = interpreter.environment.current();
        interpreter.environment.push();
        Self {
            interpreter,
            enclosing,
        }
    }
}

impl<W: Write> Drop for BlockScope<'_, W> {
    fn drop(&mut self) {
        self.interpreter.environment.restore(self.enclosing);
    }
}

impl<W: Write> Deref for BlockScope<'_, W> {
    type Target = Interpreter<W>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl<W: Write> DerefMut for BlockScope<'_, W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}
