//! Static evaluation of HCL expressions to strings.
//!
//! Only what can be known without running Terraform is resolved: literals,
//! templates over literals, input variables and locals. Everything else is
//! [`Value::Unknown`].

use hcl_edit::expr::{Expression, TraversalOperator};
use hcl_edit::template::{Element, Template};
use std::collections::HashMap;

/// Nesting limit for `local` and `var` indirection, guards reference cycles.
const MAX_DEPTH: usize = 32;

/// Outcome of evaluating an expression as a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Value {
    /// A known string (numbers and bools are converted).
    String(String),
    /// An explicit `null`.
    Null,
    /// Not statically resolvable.
    Unknown,
    /// Resolvable, but not convertible to a string.
    Mismatch(&'static str),
}

/// Source of an input variable's value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Binding {
    /// Expression from a `default` or a `.tfvars` file.
    Expr(Expression),
    /// Raw string from configuration or the command line.
    Literal(String),
}

/// Evaluates expressions against the variables and locals of one module.
pub(crate) struct Evaluator<'a> {
    pub variables: &'a HashMap<String, Option<Binding>>,
    pub locals: &'a HashMap<String, Expression>,
}

impl Evaluator<'_> {
    pub fn eval(&self, expr: &Expression) -> Value {
        self.eval_at(expr, 0)
    }

    fn eval_at(&self, expr: &Expression, depth: usize) -> Value {
        if depth > MAX_DEPTH {
            return Value::Unknown;
        }

        match expr {
            Expression::String(s) => Value::String(s.as_str().to_owned()),
            Expression::Number(n) => Value::String(n.value().to_string()),
            Expression::Bool(b) => Value::String(b.value().to_string()),
            Expression::Null(_) => Value::Null,
            Expression::StringTemplate(template) => self.eval_template(template, depth),
            Expression::HeredocTemplate(heredoc) => self.eval_template(&heredoc.template, depth),
            Expression::Parenthesis(parens) => self.eval_at(parens.inner(), depth),
            Expression::Traversal(traversal) => {
                let [operator] = traversal.operators.as_slice() else {
                    return Value::Unknown;
                };
                let (Expression::Variable(root), TraversalOperator::GetAttr(attr)) =
                    (&traversal.expr, &**operator)
                else {
                    return Value::Unknown;
                };
                match root.as_str() {
                    "var" => self.eval_variable(attr.as_str(), depth),
                    "local" => self
                        .locals
                        .get(attr.as_str())
                        .map_or(Value::Unknown, |e| self.eval_at(e, depth + 1)),
                    _ => Value::Unknown,
                }
            }
            Expression::Array(_) => Value::Mismatch("tuple"),
            Expression::Object(_) => Value::Mismatch("object"),
            Expression::ForExpr(_) => Value::Mismatch("collection"),
            _ => Value::Unknown,
        }
    }

    fn eval_variable(&self, name: &str, depth: usize) -> Value {
        match self.variables.get(name) {
            Some(Some(Binding::Literal(value))) => Value::String(value.clone()),
            Some(Some(Binding::Expr(expr))) => self.eval_at(expr, depth + 1),
            // Declared without a value, or not declared at all.
            Some(None) | None => Value::Unknown,
        }
    }

    fn eval_template(&self, template: &Template, depth: usize) -> Value {
        let mut out = String::new();
        for element in template.iter() {
            match element {
                Element::Literal(literal) => out.push_str(literal.as_str()),
                Element::Interpolation(interp) => match self.eval_at(&interp.expr, depth + 1) {
                    Value::String(s) => out.push_str(&s),
                    Value::Null => return Value::Mismatch("null"),
                    other => return other,
                },
                // %{if}/%{for} directives depend on runtime values.
                _ => return Value::Unknown,
            }
        }
        Value::String(out)
    }
}
