//! Field validation
//!
//! Every request DTO is checked before it is sent and every response DTO
//! before it is returned. Rules are declared per type in a `Validate`
//! implementation by chaining calls on a [`Rules`] collector; all violations
//! are gathered and reported together.

use std::fmt;

/// A type whose fields carry declared constraints
pub trait Validate {
    /// Check every declared rule, reporting all violations at once
    fn validate(&self) -> Result<(), ValidationError>;
}

impl<T: Validate> Validate for [T] {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        let mut target = "";
        for (index, item) in self.iter().enumerate() {
            if let Err(err) = item.validate() {
                target = err.target;
                violations.extend(err.violations.into_iter().map(|v| Violation {
                    field: format!("[{index}].{}", v.field),
                    rule: v.rule,
                }));
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { target, violations })
        }
    }
}

/// A violated rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Field must be non-zero / non-empty
    Required,
    /// Field must be one of a fixed set of literals
    OneOf(&'static [&'static str]),
    /// Field is required because another field is set
    RequiredIf(&'static str),
    /// Field must not exceed the bound
    Max(i64),
    /// Field must not be below the bound
    Min(i64),
    /// Element at the index of a list field is zero / empty
    Element(usize),
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "required"),
            Rule::OneOf(allowed) => write!(f, "must be one of [{}]", allowed.join(", ")),
            Rule::RequiredIf(other) => write!(f, "required when '{other}' is set"),
            Rule::Max(bound) => write!(f, "must be <= {bound}"),
            Rule::Min(bound) => write!(f, "must be >= {bound}"),
            Rule::Element(index) => write!(f, "element {index} is required"),
        }
    }
}

/// One field and the rule it broke
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub rule: Rule,
}

/// Aggregate validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the validated type
    pub target: &'static str,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Whether the named field is among the violations
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Names of all violated fields, in declaration order
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation failed: ", self.target)?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "'{}' {}", v.field, v.rule)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Values that have a meaningful "unset" state
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for i64 {
    fn is_present(&self) -> bool {
        *self != 0
    }
}

impl Presence for u32 {
    fn is_present(&self) -> bool {
        *self != 0
    }
}

impl Presence for str {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Presence for String {
    fn is_present(&self) -> bool {
        self.as_str().is_present()
    }
}

impl<T: Presence> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(Presence::is_present)
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Presence + ?Sized> Presence for &T {
    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

/// Collects violations for one value
#[derive(Debug)]
pub struct Rules {
    target: &'static str,
    violations: Vec<Violation>,
}

impl Rules {
    pub fn new(target: &'static str) -> Self {
        Self {
            target,
            violations: Vec::new(),
        }
    }

    fn push(&mut self, field: &str, rule: Rule) {
        self.violations.push(Violation {
            field: field.to_string(),
            rule,
        });
    }

    /// Field must be non-zero / non-empty
    pub fn required<T: Presence + ?Sized>(mut self, field: &str, value: &T) -> Self {
        if !value.is_present() {
            self.push(field, Rule::Required);
        }
        self
    }

    /// Field, when set, must be one of `allowed`
    pub fn one_of(mut self, field: &str, value: &str, allowed: &'static [&'static str]) -> Self {
        if !value.is_empty() && !allowed.contains(&value) {
            self.push(field, Rule::OneOf(allowed));
        }
        self
    }

    /// Numeric enum: field, when non-zero, must be one of `allowed`
    pub fn one_of_num(
        mut self,
        field: &str,
        value: i64,
        allowed: &'static [&'static str],
    ) -> Self {
        if value != 0 && !allowed.contains(&value.to_string().as_str()) {
            self.push(field, Rule::OneOf(allowed));
        }
        self
    }

    /// Field is required when `when_field` is set
    pub fn required_if<T: Presence + ?Sized, W: Presence + ?Sized>(
        mut self,
        field: &str,
        value: &T,
        when_field: &'static str,
        when: &W,
    ) -> Self {
        if when.is_present() && !value.is_present() {
            self.push(field, Rule::RequiredIf(when_field));
        }
        self
    }

    /// Field must not exceed `bound`
    pub fn max(mut self, field: &str, value: i64, bound: i64) -> Self {
        if value > bound {
            self.push(field, Rule::Max(bound));
        }
        self
    }

    /// Field must not be below `bound`
    pub fn min(mut self, field: &str, value: i64, bound: i64) -> Self {
        if value < bound {
            self.push(field, Rule::Min(bound));
        }
        self
    }

    /// Every element of a list field must itself be present
    pub fn each<T: Presence>(mut self, field: &str, values: &[T]) -> Self {
        for (index, value) in values.iter().enumerate() {
            if !value.is_present() {
                self.push(field, Rule::Element(index));
            }
        }
        self
    }

    /// Validate nested values, prefixing their field names
    pub fn nested<T: Validate>(mut self, field: &str, values: &[T]) -> Self {
        for (index, value) in values.iter().enumerate() {
            if let Err(err) = value.validate() {
                for v in err.violations {
                    self.push(&format!("{field}[{index}].{}", v.field), v.rule);
                }
            }
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                target: self.target,
                violations: self.violations,
            })
        }
    }
}
