//! Expression reduction.
//!
//! Expressions are evaluated without any variable scope or function table.
//! References stay references: a traversal like `var.stage` reduces to the
//! text `var.stage`, a call like `join("-", local.parts)` reduces to a
//! rendered form of itself. The goal is a searchable, comparable flat model,
//! not the values the tool itself would compute during a plan.
//!
//! Everything unsupported reduces to empty text and leaves a [Warning]
//! behind, so evaluation is total over the expression tree.

use crate::diagnostics::{Diagnostics, Warning};
use crate::value::Value;
use hcl::expr::FuncCall;
use hcl::template::{Element, Template};
use hcl::{Expression, ObjectKey, Traversal, TraversalOperator};
use indexmap::IndexMap;

/// Reduces expressions to [Value]s, recording anything it cannot express.
#[derive(derive_new::new)]
pub(crate) struct Evaluator<'a> {
    diagnostics: &'a mut Diagnostics,
}

impl Evaluator<'_> {
    /// Reduces one expression.
    ///
    /// Scalars format to text, tuples join their elements with trailing
    /// commas, objects keep structure, everything else falls back to empty
    /// text plus a warning.
    pub(crate) fn evaluate(&mut self, expression: &Expression) -> Value {
        match expression {
            Expression::String(text) => Value::Text(text.clone()),
            Expression::Bool(boolean) => Value::Text(boolean.to_string()),
            Expression::Number(number) => Value::Text(number.to_string()),
            Expression::Variable(variable) => Value::Text(variable.as_str().to_string()),
            Expression::Traversal(traversal) => Value::Text(self.resolve_traversal(traversal)),
            Expression::TemplateExpr(template) => Value::Text(self.evaluate_template(template)),
            Expression::Array(elements) => Value::Text(self.evaluate_tuple(elements)),
            Expression::Object(members) => {
                let mut object = IndexMap::with_capacity(members.len());

                for (key, value) in members {
                    let key = self.evaluate_object_key(key);
                    object.insert(key, self.evaluate(value));
                }

                Value::Object(object)
            }
            Expression::FuncCall(call) => Value::Text(self.evaluate_func_call(call)),
            Expression::Null => {
                self.diagnostics
                    .record(Warning::UnsupportedValue("null".to_string()));
                Value::Text(String::new())
            }
            other => {
                self.diagnostics
                    .record(Warning::UnsupportedExpression(format!("{other:?}")));
                Value::Text(String::new())
            }
        }
    }

    /// Reduces an expression in a position where only text fits.
    ///
    /// Objects have no natural text form; they render like function-argument
    /// objects do, and the coercion is recorded.
    fn evaluate_text(&mut self, expression: &Expression, position: &'static str) -> String {
        match self.evaluate(expression) {
            Value::Text(text) => text,
            Value::Object(members) => {
                self.diagnostics
                    .record(Warning::ObjectInTextPosition(position));
                self.render_object(&members)
            }
        }
    }

    /// Joins the named segments of a traversal with `.`.
    ///
    /// Index, splat and other unnamed segments contribute nothing; `a[0].b`
    /// reduces to `a.b`. Segment order is preserved as written.
    fn resolve_traversal(&mut self, traversal: &Traversal) -> String {
        let mut segments = Vec::with_capacity(traversal.operators.len() + 1);

        let root = self.evaluate_text(&traversal.expr, "traversal root");
        if !root.is_empty() {
            segments.push(root);
        }

        for operator in &traversal.operators {
            if let TraversalOperator::GetAttr(name) = operator {
                segments.push(name.as_str().to_string());
            }
        }

        segments.join(".")
    }

    /// Concatenates the parts of a string template.
    ///
    /// Literal parts pass through, interpolations reduce recursively.
    /// Directives (`%{ if }`, `%{ for }`) are not expanded.
    fn evaluate_template(&mut self, template_expr: &hcl::TemplateExpr) -> String {
        let template = match Template::from_expr(template_expr) {
            Ok(template) => template,
            Err(error) => {
                self.diagnostics
                    .record(Warning::UnsupportedExpression(format!("template: {error}")));
                return String::new();
            }
        };

        let mut text = String::new();

        for element in template.elements() {
            match element {
                Element::Literal(literal) => text.push_str(literal),
                Element::Interpolation(interpolation) => {
                    text.push_str(&self.evaluate_text(&interpolation.expr, "template part"));
                }
                Element::Directive(directive) => {
                    self.diagnostics
                        .record(Warning::UnsupportedExpression(format!("{directive:?}")));
                }
            }
        }

        text
    }

    /// Joins tuple elements into text, each element followed by a comma.
    ///
    /// The trailing comma is part of the format: `["a", "b"]` is `a,b,`.
    fn evaluate_tuple(&mut self, elements: &[Expression]) -> String {
        let mut text = String::new();

        for element in elements {
            text.push_str(&self.evaluate_text(element, "tuple element"));
            text.push(',');
        }

        text
    }

    /// Renders a call as `name(args)` with the arguments concatenated
    /// directly, no separator. Object arguments render inline.
    fn evaluate_func_call(&mut self, call: &FuncCall) -> String {
        let mut args = String::new();

        for argument in &call.args {
            match self.evaluate(argument) {
                Value::Text(text) => args.push_str(&text),
                Value::Object(members) => args.push_str(&self.render_object(&members)),
            }
        }

        format!("{}({args})", call.name)
    }

    fn evaluate_object_key(&mut self, key: &ObjectKey) -> String {
        match key {
            ObjectKey::Identifier(identifier) => identifier.as_str().to_string(),
            ObjectKey::Expression(expression) => self.evaluate_text(expression, "object key"),
            // ObjectKey is non-exhaustive upstream.
            other => {
                self.diagnostics
                    .record(Warning::UnsupportedExpression(format!("{other:?}")));
                String::new()
            }
        }
    }

    /// Renders an already-evaluated object as `{key:text...}`.
    ///
    /// Members whose value is itself an object have no inline form; they
    /// contribute only their key and are recorded.
    fn render_object(&mut self, members: &IndexMap<String, Value>) -> String {
        let mut pairs = String::new();

        for (key, value) in members {
            pairs.push_str(key);

            match value {
                Value::Text(text) => {
                    pairs.push(':');
                    pairs.push_str(text);
                }
                Value::Object(_) => {
                    self.diagnostics
                        .record(Warning::UnsupportedFunctionArg(key.clone()));
                }
            }
        }

        format!("{{{pairs}}}")
    }
}
