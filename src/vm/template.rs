//! Variable substitution for generated scripts.
//!
//! Templates use `${variable}` placeholders. Shell expansions that must
//! survive rendering are written `$${...}`, and `$NAME` without braces is
//! left untouched.
//!
//! # Example
//!
//! ```
//! use hostprep::vm::template::{render, TemplateContext};
//!
//! let ctx = TemplateContext::new().with("vm_cores", 4);
//! let out = render("CPU_CORES=\"${vm_cores}\"; run \"$${args[@]}\"", &ctx).unwrap();
//! assert_eq!(out, "CPU_CORES=\"4\"; run \"${args[@]}\"");
//! ```

use crate::error::{HostprepError, Result};
use std::collections::HashMap;
use std::fmt::Display;

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: ${name}
    Variable(String),
}

/// Split a template into literal and variable segments.
pub fn parse_template(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();
    let mut literal = String::new();

    while let Some(c) = chars.next() {
        if c != '$' {
            literal.push(c);
            continue;
        }

        match chars.peek() {
            Some('$') => {
                chars.next();
                if chars.peek() == Some(&'{') {
                    // $${...} renders as a literal ${...}
                    chars.next();
                    literal.push_str("${");
                    for c in chars.by_ref() {
                        literal.push(c);
                        if c == '}' {
                            break;
                        }
                    }
                } else {
                    literal.push('$');
                }
            }
            Some('{') => {
                chars.next();
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }

                let mut name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    name.push(c);
                }
                segments.push(Segment::Variable(name));
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    segments
}

/// Unique variable names referenced by a template.
#[cfg(test)]
pub(crate) fn template_variables(input: &str) -> std::collections::HashSet<String> {
    parse_template(input)
        .into_iter()
        .filter_map(|seg| match seg {
            Segment::Variable(name) => Some(name),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// Values available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    vars: HashMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn with(mut self, name: &str, value: impl Display) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

/// Render a template, substituting every `${name}`.
///
/// # Errors
///
/// Returns `UnresolvedVariable` for a placeholder missing from `context`.
pub fn render(input: &str, context: &TemplateContext) -> Result<String> {
    let mut out = String::with_capacity(input.len());

    for segment in parse_template(input) {
        match segment {
            Segment::Literal(text) => out.push_str(&text),
            Segment::Variable(name) => {
                let value = context
                    .get(&name)
                    .ok_or_else(|| HostprepError::UnresolvedVariable { name: name.clone() })?;
                out.push_str(value);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_literal_only() {
        assert_eq!(
            parse_template("hello world"),
            vec![Segment::Literal("hello world".to_string())]
        );
    }

    #[test]
    fn parse_variable_with_surrounding_text() {
        assert_eq!(
            parse_template("RAM=\"${vm_ram_mb}\"\n"),
            vec![
                Segment::Literal("RAM=\"".to_string()),
                Segment::Variable("vm_ram_mb".to_string()),
                Segment::Literal("\"\n".to_string()),
            ]
        );
    }

    #[test]
    fn parse_adjacent_variables() {
        assert_eq!(
            parse_template("${a}${b}"),
            vec![
                Segment::Variable("a".to_string()),
                Segment::Variable("b".to_string()),
            ]
        );
    }

    #[test]
    fn parse_escaped_expansion() {
        assert_eq!(
            parse_template("qemu \"$${args[@]}\""),
            vec![Segment::Literal("qemu \"${args[@]}\"".to_string())]
        );
    }

    #[test]
    fn bare_shell_variables_stay_literal() {
        assert_eq!(
            parse_template("-m \"$ALLOCATED_RAM\" $$"),
            vec![Segment::Literal("-m \"$ALLOCATED_RAM\" $".to_string())]
        );
    }

    #[test]
    fn parse_empty_string() {
        assert!(parse_template("").is_empty());
    }

    #[test]
    fn variables_are_unique() {
        let vars = template_variables("${a} ${b} ${a} $${c}");
        assert_eq!(vars.len(), 2);
        assert!(vars.contains("a"));
        assert!(vars.contains("b"));
    }

    #[test]
    fn render_substitutes_values() {
        let ctx = TemplateContext::new()
            .with("username", "alice")
            .with("vm_cores", 4);

        let out = render("chown ${username}; cores=${vm_cores}", &ctx).unwrap();
        assert_eq!(out, "chown alice; cores=4");
    }

    #[test]
    fn render_fails_on_missing_variable() {
        let err = render("${missing}", &TemplateContext::new()).unwrap_err();
        match err {
            HostprepError::UnresolvedVariable { name } => assert_eq!(name, "missing"),
            other => panic!("Expected UnresolvedVariable, got {other:?}"),
        }
    }

    #[test]
    fn render_preserves_escapes() {
        let out = render("\"$${args[@]}\"", &TemplateContext::new()).unwrap();
        assert_eq!(out, "\"${args[@]}\"");
    }
}
