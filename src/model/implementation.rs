// Copyright 2025 Cowboy AI, LLC.

//! Implementation variants and their marshalling logic
//!
//! One closed union with a variant per calling convention, so adding a
//! convention forces every match site to handle it.

use crate::model::parameters::{
    Output, PositionParameter, PositionPropertyParameter, PropertyParameter,
};
use crate::model::{ArgumentMap, OutputMap};
use crate::store::Iri;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default shell for process implementations that declare none
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// The marshalling surface shared by every variant
///
/// Position-keyed lists are sorted ascending on construction; the sort is
/// stable, so equal positions keep their stored order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Ordinal arguments, ascending by position
    pub position_parameters: Vec<PositionParameter>,
    /// Named flags, in stored order (the order is semantic for expressions)
    pub property_parameters: Vec<PropertyParameter>,
    /// Ordinal flags, ascending by position
    pub position_property_parameters: Vec<PositionPropertyParameter>,
    /// Declared return slots; only the first is ever populated
    pub outputs: Vec<Output>,
}

impl Signature {
    /// Build a signature, normalizing position order
    pub fn new(
        mut position_parameters: Vec<PositionParameter>,
        property_parameters: Vec<PropertyParameter>,
        mut position_property_parameters: Vec<PositionPropertyParameter>,
        outputs: Vec<Output>,
    ) -> Self {
        position_parameters.sort_by_key(|p| p.position);
        position_property_parameters.sort_by_key(|p| p.position);
        Self {
            position_parameters,
            property_parameters,
            position_property_parameters,
            outputs,
        }
    }

    /// Wrap a result value into the single supported output slot
    ///
    /// Regardless of how many outputs are declared, only `outputs[0]` is
    /// populated. An implementation without outputs yields an empty map.
    pub fn single_output(&self, value: Value) -> OutputMap {
        let mut result = OutputMap::new();
        if let Some(output) = self.outputs.first() {
            result.insert(output.predicate.clone(), value);
        }
        result
    }
}

/// Which calling convention an implementation uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImplementationKind {
    /// Shell subprocess
    ExternalProcess,
    /// Single-expression callable
    ScriptExpression,
    /// Full callable source, not executable today
    ScriptFunction,
}

/// A concrete executable realization of a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Implementation {
    /// Runs a command line under a shell and captures stdout
    ExternalProcess {
        /// The implementation resource iri
        id: Iri,
        /// Marshalling surface
        signature: Signature,
        /// Leading command tokens
        base_command: Vec<String>,
        /// Shell to run under; `DEFAULT_SHELL` when absent
        shell: Option<String>,
    },
    /// Evaluates a registered expression over positionally bound values
    ScriptExpression {
        /// The implementation resource iri
        id: Iri,
        /// Marshalling surface
        signature: Signature,
        /// Opaque expression source text
        source: String,
    },
    /// Carries full callable source; selecting it for execution fails
    ScriptFunction {
        /// The implementation resource iri
        id: Iri,
        /// Marshalling surface
        signature: Signature,
        /// Opaque callable source text
        source: String,
    },
}

impl Implementation {
    /// The implementation resource iri
    pub fn id(&self) -> &str {
        match self {
            Implementation::ExternalProcess { id, .. }
            | Implementation::ScriptExpression { id, .. }
            | Implementation::ScriptFunction { id, .. } => id,
        }
    }

    /// The marshalling surface
    pub fn signature(&self) -> &Signature {
        match self {
            Implementation::ExternalProcess { signature, .. }
            | Implementation::ScriptExpression { signature, .. }
            | Implementation::ScriptFunction { signature, .. } => signature,
        }
    }

    /// Which calling convention this is
    pub fn kind(&self) -> ImplementationKind {
        match self {
            Implementation::ExternalProcess { .. } => ImplementationKind::ExternalProcess,
            Implementation::ScriptExpression { .. } => ImplementationKind::ScriptExpression,
            Implementation::ScriptFunction { .. } => ImplementationKind::ScriptFunction,
        }
    }

    /// Assemble the command line for a process run
    ///
    /// Token order: base command, then position-property flags ascending by
    /// position, then property flags, then bare position values ascending by
    /// position. Arguments absent from the map are silently omitted (they
    /// are treated as optional). Values are rendered verbatim with no
    /// shell-metacharacter escaping; descriptor-supplied values reach the
    /// shell as-is.
    pub fn command_line(&self, args: &ArgumentMap) -> Option<String> {
        let Implementation::ExternalProcess {
            signature,
            base_command,
            ..
        } = self
        else {
            return None;
        };

        let mut tokens: Vec<String> = base_command.clone();
        for p in &signature.position_property_parameters {
            if let Some(value) = args.get(&p.predicate) {
                tokens.push(p.property.clone());
                push_value(&mut tokens, value);
            }
        }
        for p in &signature.property_parameters {
            if let Some(value) = args.get(&p.predicate) {
                tokens.push(p.property.clone());
                push_value(&mut tokens, value);
            }
        }
        for p in &signature.position_parameters {
            if let Some(value) = args.get(&p.predicate) {
                push_value(&mut tokens, value);
            }
        }

        Some(
            tokens
                .into_iter()
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    /// The shell a process run uses
    pub fn shell(&self) -> &str {
        match self {
            Implementation::ExternalProcess { shell, .. } => {
                shell.as_deref().unwrap_or(DEFAULT_SHELL)
            }
            _ => DEFAULT_SHELL,
        }
    }

    /// Bind argument values for an expression invocation
    ///
    /// Values are taken from the map in the stored order of
    /// `property_parameters` and passed positionally - bound by list
    /// position, not by declared property name. This mirrors the documented
    /// behavior of the descriptions this engine consumes; callers relying on
    /// property names being honored will be surprised. Missing arguments
    /// bind as null.
    pub fn positional_values(&self, args: &ArgumentMap) -> Vec<Value> {
        self.signature()
            .property_parameters
            .iter()
            .map(|p| args.get(&p.predicate).cloned().unwrap_or(Value::Null))
            .collect()
    }
}

fn push_value(tokens: &mut Vec<String>, value: &Value) {
    match value {
        Value::String(s) => tokens.push(s.clone()),
        Value::Null => {}
        other => tokens.push(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn position(predicate: &str, position: u32) -> PositionParameter {
        PositionParameter {
            predicate: predicate.to_string(),
            position,
        }
    }

    fn process(signature: Signature, base: &[&str]) -> Implementation {
        Implementation::ExternalProcess {
            id: "impl:proc".to_string(),
            signature,
            base_command: base.iter().map(|s| s.to_string()).collect(),
            shell: None,
        }
    }

    /// Test position lists sort ascending regardless of input order
    #[test]
    fn test_signature_sorts_positions() {
        let signature = Signature::new(
            vec![position("p:b", 2), position("p:a", 0), position("p:c", 1)],
            vec![],
            vec![
                PositionPropertyParameter {
                    predicate: "p:y".to_string(),
                    position: 5,
                    property: "-y".to_string(),
                },
                PositionPropertyParameter {
                    predicate: "p:x".to_string(),
                    position: 1,
                    property: "-x".to_string(),
                },
            ],
            vec![],
        );

        let order: Vec<u32> = signature
            .position_parameters
            .iter()
            .map(|p| p.position)
            .collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(signature.position_property_parameters[0].property, "-x");
    }

    proptest! {
        /// Position sorting is total and deterministic for any input order
        #[test]
        fn prop_position_sort_is_total(positions in proptest::collection::vec(0u32..64, 0..12)) {
            let params: Vec<PositionParameter> = positions
                .iter()
                .enumerate()
                .map(|(i, p)| position(&format!("p:{i}"), *p))
                .collect();

            let a = Signature::new(params.clone(), vec![], vec![], vec![]);
            let mut reversed = params;
            reversed.reverse();
            let b = Signature::new(reversed, vec![], vec![], vec![]);

            let sorted: Vec<u32> = a.position_parameters.iter().map(|p| p.position).collect();
            let mut expected = positions.clone();
            expected.sort();
            prop_assert_eq!(&sorted, &expected);

            let b_sorted: Vec<u32> = b.position_parameters.iter().map(|p| p.position).collect();
            prop_assert_eq!(sorted, b_sorted);
        }
    }

    /// Test `ls ./dir` style command construction
    #[test]
    fn test_command_line_positional() {
        let imp = process(
            Signature::new(vec![position("fns:path", 0)], vec![], vec![], vec![]),
            &["ls"],
        );
        let args = ArgumentMap::from([("fns:path".to_string(), json!("./dir"))]);

        assert_eq!(imp.command_line(&args).unwrap(), "ls ./dir");
    }

    /// Test flag ordering: position-property flags come before bare positions
    #[test]
    fn test_command_line_flag_order() {
        let imp = process(
            Signature::new(
                vec![position("fns:message", 1)],
                vec![],
                vec![PositionPropertyParameter {
                    predicate: "fns:noTrailingNewLine".to_string(),
                    position: 0,
                    property: "-n".to_string(),
                }],
                vec![],
            ),
            &["echo"],
        );
        let args = ArgumentMap::from([
            ("fns:message".to_string(), json!("abc")),
            ("fns:noTrailingNewLine".to_string(), json!("")),
        ]);

        assert_eq!(imp.command_line(&args).unwrap(), "echo -n abc");
    }

    /// Test absent arguments are silently omitted
    #[test]
    fn test_command_line_omits_absent() {
        let imp = process(
            Signature::new(
                vec![position("fns:a", 0), position("fns:b", 1)],
                vec![PropertyParameter {
                    predicate: "fns:verbose".to_string(),
                    property: "-v".to_string(),
                }],
                vec![],
                vec![],
            ),
            &["tool"],
        );
        let args = ArgumentMap::from([("fns:b".to_string(), json!("only-b"))]);

        assert_eq!(imp.command_line(&args).unwrap(), "tool only-b");
    }

    /// Test non-string values render as JSON
    #[test]
    fn test_command_line_renders_numbers() {
        let imp = process(
            Signature::new(vec![position("fns:n", 0)], vec![], vec![], vec![]),
            &["seq"],
        );
        let args = ArgumentMap::from([("fns:n".to_string(), json!(3))]);

        assert_eq!(imp.command_line(&args).unwrap(), "seq 3");
    }

    /// Test positional binding follows stored property order, not names
    #[test]
    fn test_positional_values_by_stored_order() {
        let imp = Implementation::ScriptExpression {
            id: "impl:expr".to_string(),
            signature: Signature::new(
                vec![],
                vec![
                    PropertyParameter {
                        predicate: "fns:second".to_string(),
                        property: "b".to_string(),
                    },
                    PropertyParameter {
                        predicate: "fns:first".to_string(),
                        property: "a".to_string(),
                    },
                ],
                vec![],
                vec![],
            ),
            source: "a + b".to_string(),
        };
        let args = ArgumentMap::from([
            ("fns:first".to_string(), json!(1)),
            ("fns:second".to_string(), json!(2)),
        ]);

        // Stored order is [fns:second, fns:first], so values follow it
        assert_eq!(imp.positional_values(&args), vec![json!(2), json!(1)]);
    }

    /// Test only the first declared output is populated
    #[test]
    fn test_single_output_limitation() {
        let signature = Signature::new(
            vec![],
            vec![],
            vec![],
            vec![
                Output {
                    predicate: "fns:out".to_string(),
                },
                Output {
                    predicate: "fns:ignored".to_string(),
                },
            ],
        );

        let result = signature.single_output(json!("value"));
        assert_eq!(result.len(), 1);
        assert_eq!(result["fns:out"], json!("value"));
    }

    /// Test an implementation without outputs yields an empty map
    #[test]
    fn test_single_output_empty() {
        let signature = Signature::default();
        assert!(signature.single_output(json!("x")).is_empty());
    }

    /// Test shell selection defaults
    #[test]
    fn test_shell_default() {
        let imp = process(Signature::default(), &["true"]);
        assert_eq!(imp.shell(), DEFAULT_SHELL);

        let imp = Implementation::ExternalProcess {
            id: "impl:bash".to_string(),
            signature: Signature::default(),
            base_command: vec!["true".to_string()],
            shell: Some("/bin/bash".to_string()),
        };
        assert_eq!(imp.shell(), "/bin/bash");
    }
}
