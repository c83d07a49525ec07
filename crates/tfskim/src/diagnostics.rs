//! Warning collection.
//!
//! Evaluation and extraction are best-effort: a construct they cannot
//! express becomes a [Warning] and the run keeps going. The collector makes
//! those findings available to callers instead of burying them in log
//! output; every recorded warning is also emitted at warn level.

/// A non-fatal finding. The run continues, usually with an empty text value
/// standing in for whatever could not be expressed.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A literal with no text form, e.g. `null`.
    UnsupportedValue(String),
    /// An expression kind the evaluator does not reduce, e.g. conditionals,
    /// arithmetic or for-expressions.
    UnsupportedExpression(String),
    /// An object member with a non-text value turned up while rendering an
    /// object inline; carries the member key.
    UnsupportedFunctionArg(String),
    /// An object turned up in a position where only text fits and was
    /// rendered inline; carries the position.
    ObjectInTextPosition(&'static str),
    /// A `resource` block without the two labels needed for type and name;
    /// carries the labels that were present. The block is skipped.
    ResourceLabelsMissing(Vec<String>),
    /// A nested block replaced a plain attribute of the same name.
    NestedBlockShadowsAttribute(String),
}

/// Collects [Warning]s across a parse run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn record(&mut self, warning: Warning) {
        tracing::warn!(?warning, "warning recorded");
        self.warnings.push(warning);
    }

    /// All warnings recorded so far, in the order they occurred.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }
}
