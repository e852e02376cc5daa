//! Compiled expressions.
//!
//! [`Lambda`] turns an [`Expr`] into a flat postfix program over an ordered
//! argument list, then evaluates it element-wise over [`Value`]s. Only the
//! arguments the expression actually reads take part in broadcasting, so a
//! constant derivative stays a scalar even when other inputs are arrays.

use crate::errors::{ExprError, ExprResult, MathErrorKind};
use crate::expr::{Expr, Func, Symbol};
use crate::value::{broadcast_len, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Push(f64),
    Load(usize),
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Call(Func),
}

#[derive(Debug, Clone)]
pub struct Lambda {
    expr: Expr,
    args: Vec<Symbol>,
    program: Vec<Op>,
    used: Vec<usize>,
    stack_depth: usize,
}

impl Lambda {
    /// Compiles `expr` over `args`. Every free symbol of `expr` must appear
    /// in `args`; extra arguments are allowed and ignored.
    ///
    /// ```
    /// use physics_core::expr::{parse_expr, symbols};
    /// use physics_core::{Lambda, Value};
    ///
    /// let f = Lambda::new(&parse_expr("a*b").unwrap(), &symbols("a b")).unwrap();
    /// let out = f.call(&[Value::from(vec![1.0, 2.0]), Value::from(3.0)]).unwrap();
    /// assert_eq!(out, Value::from(vec![3.0, 6.0]));
    /// ```
    pub fn new(expr: &Expr, args: &[Symbol]) -> ExprResult<Self> {
        let mut program = Vec::new();
        compile(expr, args, &mut program)?;
        let mut used: Vec<usize> = program
            .iter()
            .filter_map(|op| match op {
                Op::Load(i) => Some(*i),
                _ => None,
            })
            .collect();
        used.sort_unstable();
        used.dedup();
        let stack_depth = max_depth(&program);
        Ok(Self {
            expr: expr.clone(),
            args: args.to_vec(),
            program,
            used,
            stack_depth,
        })
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn args(&self) -> &[Symbol] {
        &self.args
    }

    /// Evaluates with broadcasting over the arguments the expression reads.
    pub fn call(&self, values: &[Value]) -> ExprResult<Value> {
        self.check_arity(values.len())?;
        let operands: Vec<&Value> = self.used.iter().map(|&i| &values[i]).collect();
        let len = broadcast_len(&operands)?;
        let mut stack = Vec::with_capacity(self.stack_depth);
        let out = match len {
            None => Value::Scalar(self.run(&mut stack, |i| values[i].get(0))),
            Some(n) => Value::Array(
                (0..n)
                    .map(|k| self.run(&mut stack, |i| values[i].get(k)))
                    .collect(),
            ),
        };
        Ok(out)
    }

    pub fn call_scalar(&self, values: &[f64]) -> ExprResult<f64> {
        self.check_arity(values.len())?;
        let mut stack = Vec::with_capacity(self.stack_depth);
        Ok(self.run(&mut stack, |i| values[i]))
    }

    /// Evaluates element `k` of a broadcast call. Used by callers that fan
    /// elements out across threads.
    pub fn call_element(&self, values: &[Value], k: usize) -> f64 {
        let mut stack = Vec::with_capacity(self.stack_depth);
        self.run(&mut stack, |i| values[i].get(k))
    }

    fn check_arity(&self, n: usize) -> ExprResult<()> {
        if n != self.args.len() {
            return Err(ExprError::math_error(
                "lambda call",
                MathErrorKind::ArityMismatch,
                &format!("expected {} arguments, got {}", self.args.len(), n),
            ));
        }
        Ok(())
    }

    fn run(&self, stack: &mut Vec<f64>, load: impl Fn(usize) -> f64) -> f64 {
        stack.clear();
        for op in &self.program {
            match *op {
                Op::Push(v) => stack.push(v),
                Op::Load(i) => stack.push(load(i)),
                Op::Neg => {
                    let a = stack.pop().unwrap_or(f64::NAN);
                    stack.push(-a);
                }
                Op::Call(f) => {
                    let a = stack.pop().unwrap_or(f64::NAN);
                    stack.push(f.apply(a));
                }
                Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Pow => {
                    let b = stack.pop().unwrap_or(f64::NAN);
                    let a = stack.pop().unwrap_or(f64::NAN);
                    stack.push(binary(*op, a, b));
                }
            }
        }
        stack.pop().unwrap_or(f64::NAN)
    }
}

#[inline]
fn binary(op: Op, a: f64, b: f64) -> f64 {
    match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => a / b,
        Op::Pow => libm::pow(a, b),
        _ => f64::NAN,
    }
}

fn compile(expr: &Expr, args: &[Symbol], out: &mut Vec<Op>) -> ExprResult<()> {
    match expr {
        Expr::Num(v) => out.push(Op::Push(*v)),
        Expr::Const(c) => out.push(Op::Push(c.value())),
        Expr::Sym(s) => {
            let idx = args
                .iter()
                .position(|a| a == s)
                .ok_or_else(|| ExprError::UnboundSymbol(s.name().to_string()))?;
            out.push(Op::Load(idx));
        }
        Expr::Neg(a) => {
            compile(a, args, out)?;
            out.push(Op::Neg);
        }
        Expr::Call(f, a) => {
            compile(a, args, out)?;
            out.push(Op::Call(*f));
        }
        Expr::Add(a, b) => compile_binary(a, b, Op::Add, args, out)?,
        Expr::Sub(a, b) => compile_binary(a, b, Op::Sub, args, out)?,
        Expr::Mul(a, b) => compile_binary(a, b, Op::Mul, args, out)?,
        Expr::Div(a, b) => compile_binary(a, b, Op::Div, args, out)?,
        Expr::Pow(a, b) => compile_binary(a, b, Op::Pow, args, out)?,
    }
    Ok(())
}

fn compile_binary(a: &Expr, b: &Expr, op: Op, args: &[Symbol], out: &mut Vec<Op>) -> ExprResult<()> {
    compile(a, args, out)?;
    compile(b, args, out)?;
    out.push(op);
    Ok(())
}

fn max_depth(program: &[Op]) -> usize {
    let mut depth: usize = 0;
    let mut max = 0;
    for op in program {
        match op {
            Op::Push(_) | Op::Load(_) => depth += 1,
            Op::Neg | Op::Call(_) => {}
            _ => depth = depth.saturating_sub(1),
        }
        max = max.max(depth);
    }
    max
}
