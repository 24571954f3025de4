// Copyright 2025 Cowboy AI, LLC.

//! Descriptor load pass
//!
//! Scans the store for resources typed with each implementation class,
//! parses the variant-specific fields, compiles a callable, and loads it
//! into the registry. A single unparseable implementation logs a warning
//! and is skipped; an internally inconsistent classification aborts the
//! whole pass.

use crate::errors::{EngineError, EngineResult};
use crate::exec::{
    run_shell, Callable, ExpressionCompiler, ExpressionFn, ExpressionHandler, ProcessHandler,
    ScriptFunctionHandler,
};
use crate::model::{
    ArgumentMap, ClassifiedParameterMappings, Implementation, Output, PositionParameter,
    PositionPropertyParameter, PropertyParameter, Signature,
};
use crate::registry::ImplementationRegistry;
use crate::store::{DescriptorStore, Iri};
use crate::vocabulary::{doap, ex, fno, fnoi, fnom, rdf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Loads implementations described in the store into the registry
pub struct ImplementationLoader<'a> {
    store: &'a dyn DescriptorStore,
    registry: &'a ImplementationRegistry,
    compiler: Arc<dyn ExpressionCompiler>,
}

impl<'a> ImplementationLoader<'a> {
    /// Create a loader over a store, registry and expression compiler
    pub fn new(
        store: &'a dyn DescriptorStore,
        registry: &'a ImplementationRegistry,
        compiler: Arc<dyn ExpressionCompiler>,
    ) -> Self {
        Self {
            store,
            registry,
            compiler,
        }
    }

    /// Run one load pass over every implementation class
    pub fn load_all(&self) -> EngineResult<()> {
        self.load_class(fnoi::RUNTIME_PROCESS, |loader, id| loader.load_process(id))?;
        self.load_class(fnoi::JAVASCRIPT_EXPRESSION, |loader, id| {
            loader.load_expression(id)
        })?;
        self.load_class(fnoi::JAVASCRIPT_FUNCTION, |loader, id| {
            loader.load_script_function(id)
        })?;
        Ok(())
    }

    fn load_class(
        &self,
        class: &str,
        load: impl Fn(&Self, &str) -> EngineResult<()>,
    ) -> EngineResult<()> {
        for id in self.store.subjects(rdf::TYPE, class) {
            match load(self, &id) {
                Ok(()) => debug!(implementation = %id, class, "implementation loaded"),
                Err(e) if e.is_structural() => return Err(e),
                Err(e) => {
                    warn!(implementation = %id, error = %e, "error while parsing implementation, skipping it");
                }
            }
        }
        Ok(())
    }

    /// Parse and load an external-process implementation
    fn load_process(&self, id: &str) -> EngineResult<()> {
        let signature = self.signature_for(id)?;
        let base_command = self.store.single_object(id, fnoi::BASE_COMMAND)?;
        let shell = self.store.opt_object(id, fnoi::SHELL);

        let implementation = Implementation::ExternalProcess {
            id: id.to_string(),
            signature,
            base_command: vec![base_command],
            shell,
        };
        self.registry.load_implementation(
            id,
            Arc::new(ProcessHandler),
            process_callable(implementation),
        );
        Ok(())
    }

    /// Parse and load a script-expression implementation
    fn load_expression(&self, id: &str) -> EngineResult<()> {
        let signature = self.signature_for(id)?;
        let source = self.source_text(id)?;
        let parameter_names: Vec<String> = signature
            .property_parameters
            .iter()
            .map(|p| p.property.clone())
            .collect();
        let compiled = self.compiler.compile(&source, &parameter_names)?;

        let implementation = Implementation::ScriptExpression {
            id: id.to_string(),
            signature,
            source,
        };
        self.registry.load_implementation(
            id,
            Arc::new(ExpressionHandler),
            expression_callable(implementation, compiled),
        );
        Ok(())
    }

    /// Parse and load a script-function implementation
    ///
    /// The source is carried but there is no way to execute it; the
    /// callable fails explicitly when selected.
    fn load_script_function(&self, id: &str) -> EngineResult<()> {
        // Script functions may exist without a mapping; an absent signature
        // is not an error for a variant that cannot run anyway.
        let signature = match self.signature_for(id) {
            Ok(signature) => signature,
            Err(e) if e.is_structural() => return Err(e),
            Err(_) => Signature::default(),
        };
        let source = self.source_text(id)?;

        let implementation = Implementation::ScriptFunction {
            id: id.to_string(),
            signature,
            source,
        };
        let callable: Callable = Arc::new(move |_args: ArgumentMap| {
            let id = implementation.id().to_string();
            Box::pin(async move {
                Err(EngineError::Unimplemented(format!(
                    "script function {id} cannot be executed"
                )))
            })
        });
        self.registry
            .load_implementation(id, Arc::new(ScriptFunctionHandler), callable);
        Ok(())
    }

    /// Build the marshalling signature from the mapping that references the
    /// implementation
    fn signature_for(&self, implementation: &str) -> EngineResult<Signature> {
        let mappings = self.store.subjects(fno::IMPLEMENTATION, implementation);
        let Some(mapping) = mappings.first() else {
            return Err(EngineError::MissingDescriptor {
                subject: implementation.to_string(),
                predicate: fno::IMPLEMENTATION.to_string(),
            });
        };

        let parameter_mappings = self.store.objects(mapping, fno::PARAMETER_MAPPING);
        let classified =
            ClassifiedParameterMappings::from_store(self.store, implementation, &parameter_mappings)?;

        let mut position_parameters = Vec::new();
        for pm in &classified.position {
            position_parameters.push(PositionParameter {
                predicate: self.parameter_predicate(pm)?,
                position: self.parameter_position(pm)?,
            });
        }

        let mut property_parameters = Vec::new();
        for pm in &classified.property {
            property_parameters.push(PropertyParameter {
                predicate: self.parameter_predicate(pm)?,
                property: self.store.single_object(pm, fnom::IMPLEMENTATION_PROPERTY)?,
            });
        }

        let mut position_property_parameters = Vec::new();
        for pm in &classified.position_property {
            position_property_parameters.push(PositionPropertyParameter {
                predicate: self.parameter_predicate(pm)?,
                position: self.parameter_position(pm)?,
                property: self.store.single_object(pm, fnom::IMPLEMENTATION_PROPERTY)?,
            });
        }

        let mut outputs = Vec::new();
        for rm in self.store.objects(mapping, fno::RETURN_MAPPING) {
            match self.output_predicate(&rm) {
                Ok(predicate) => outputs.push(Output { predicate }),
                Err(e) => {
                    warn!(return_mapping = %rm, error = %e, "skipping unreadable return mapping");
                }
            }
        }

        Ok(Signature::new(
            position_parameters,
            property_parameters,
            position_property_parameters,
            outputs,
        ))
    }

    fn parameter_predicate(&self, parameter_mapping: &str) -> EngineResult<Iri> {
        let parameter = self
            .store
            .single_object(parameter_mapping, fnom::FUNCTION_PARAMETER)?;
        self.store.single_object(&parameter, fno::PREDICATE)
    }

    fn parameter_position(&self, parameter_mapping: &str) -> EngineResult<u32> {
        let position = self
            .store
            .single_object(parameter_mapping, fnom::IMPLEMENTATION_PARAMETER_POSITION)?;
        position
            .parse()
            .map_err(|_| EngineError::MalformedDescriptor {
                subject: parameter_mapping.to_string(),
                reason: format!("position `{position}` is not an unsigned integer"),
            })
    }

    fn output_predicate(&self, return_mapping: &str) -> EngineResult<Iri> {
        let output = self
            .store
            .single_object(return_mapping, fnom::FUNCTION_OUTPUT)?;
        self.store.single_object(&output, fno::PREDICATE)
    }

    /// Resolve source text through the release chain
    fn source_text(&self, implementation: &str) -> EngineResult<String> {
        let release = self.store.single_object(implementation, doap::RELEASE)?;
        let file_release = self.store.single_object(&release, doap::FILE_RELEASE)?;
        self.store.single_object(&file_release, ex::VALUE)
    }
}

/// Compile an external-process implementation into a callable
fn process_callable(implementation: Implementation) -> Callable {
    Arc::new(move |args: ArgumentMap| {
        let implementation = implementation.clone();
        Box::pin(async move {
            let command = implementation
                .command_line(&args)
                .unwrap_or_default();
            let stdout = run_shell(implementation.shell(), &command).await?;
            Ok(implementation.signature().single_output(stdout.into()))
        })
    })
}

/// Compile a script-expression implementation into a callable
fn expression_callable(implementation: Implementation, compiled: ExpressionFn) -> Callable {
    Arc::new(move |args: ArgumentMap| {
        let implementation = implementation.clone();
        let compiled = compiled.clone();
        Box::pin(async move {
            let values = implementation.positional_values(&args);
            let result = compiled(&values)?;
            Ok(implementation.signature().single_output(result))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::StaticExpressionCompiler;
    use crate::store::{MemoryDescriptorStore, Triple};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn echo_graph() -> MemoryDescriptorStore {
        let store = MemoryDescriptorStore::new();
        store.add_graph(
            "g:echo",
            vec![
                Triple::new("fns:echoImpl", rdf::TYPE, fnoi::RUNTIME_PROCESS),
                Triple::new("fns:echoImpl", fnoi::BASE_COMMAND, "echo"),
                Triple::new("fns:echoMapping", fno::IMPLEMENTATION, "fns:echoImpl"),
                Triple::new("fns:echoMapping", fno::PARAMETER_MAPPING, "fns:messageMapping"),
                Triple::new("fns:echoMapping", fno::RETURN_MAPPING, "fns:echoReturn"),
                Triple::new(
                    "fns:messageMapping",
                    rdf::TYPE,
                    fnom::POSITION_PARAMETER_MAPPING,
                ),
                Triple::new("fns:messageMapping", fnom::FUNCTION_PARAMETER, "fns:messageParam"),
                Triple::new("fns:messageMapping", fnom::IMPLEMENTATION_PARAMETER_POSITION, "0"),
                Triple::new("fns:messageParam", fno::PREDICATE, "fns:message"),
                Triple::new("fns:echoReturn", rdf::TYPE, fnom::DEFAULT_RETURN_MAPPING),
                Triple::new("fns:echoReturn", fnom::FUNCTION_OUTPUT, "fns:echoOutput"),
                Triple::new("fns:echoOutput", fno::PREDICATE, "fns:stdout"),
            ],
        );
        store
    }

    fn loader_parts() -> (ImplementationRegistry, Arc<StaticExpressionCompiler>) {
        (
            ImplementationRegistry::new(),
            Arc::new(StaticExpressionCompiler::new()),
        )
    }

    /// Test a process implementation loads and executes end to end
    #[tokio::test]
    async fn test_load_and_run_process() {
        let store = echo_graph();
        let (registry, compiler) = loader_parts();

        ImplementationLoader::new(&store, &registry, compiler)
            .load_all()
            .unwrap();
        assert!(registry.has_implementation("fns:echoImpl"));

        let args = ArgumentMap::from([("fns:message".to_string(), json!("abc"))]);
        let out = registry
            .execute_implementation("fns:echoImpl", &args)
            .await
            .unwrap();
        assert_eq!(out["fns:stdout"], json!("abc\n"));
    }

    /// Test an expression implementation compiles against the registry of
    /// statically registered sources
    #[tokio::test]
    async fn test_load_and_run_expression() {
        let store = MemoryDescriptorStore::new();
        store.add_graph(
            "g:upper",
            vec![
                Triple::new("fns:upperImpl", rdf::TYPE, fnoi::JAVASCRIPT_EXPRESSION),
                Triple::new("fns:upperImpl", doap::RELEASE, "fns:upperRelease"),
                Triple::new("fns:upperRelease", doap::FILE_RELEASE, "fns:upperFile"),
                Triple::new("fns:upperFile", ex::VALUE, "message.toUpperCase()"),
                Triple::new("fns:upperMapping", fno::IMPLEMENTATION, "fns:upperImpl"),
                Triple::new("fns:upperMapping", fno::PARAMETER_MAPPING, "fns:messageMapping"),
                Triple::new("fns:upperMapping", fno::RETURN_MAPPING, "fns:upperReturn"),
                Triple::new(
                    "fns:messageMapping",
                    rdf::TYPE,
                    fnom::PROPERTY_PARAMETER_MAPPING,
                ),
                Triple::new("fns:messageMapping", fnom::FUNCTION_PARAMETER, "fns:messageParam"),
                Triple::new("fns:messageMapping", fnom::IMPLEMENTATION_PROPERTY, "message"),
                Triple::new("fns:messageParam", fno::PREDICATE, "fns:message"),
                Triple::new("fns:upperReturn", rdf::TYPE, fnom::DEFAULT_RETURN_MAPPING),
                Triple::new("fns:upperReturn", fnom::FUNCTION_OUTPUT, "fns:upperOutput"),
                Triple::new("fns:upperOutput", fno::PREDICATE, "fns:result"),
            ],
        );
        let (registry, compiler) = loader_parts();
        compiler.register("message.toUpperCase()", |values| {
            let message = values.first().and_then(|v| v.as_str()).unwrap_or_default();
            Ok(json!(message.to_uppercase()))
        });

        ImplementationLoader::new(&store, &registry, compiler)
            .load_all()
            .unwrap();

        let args = ArgumentMap::from([("fns:message".to_string(), json!("abc"))]);
        let out = registry
            .execute_implementation("fns:upperImpl", &args)
            .await
            .unwrap();
        assert_eq!(out["fns:result"], json!("ABC"));
    }

    /// Test an unregistered expression source is skipped, not fatal
    #[test]
    fn test_unregistered_expression_skipped() {
        let store = MemoryDescriptorStore::new();
        store.add_graph(
            "g:unknown",
            vec![
                Triple::new("fns:evilImpl", rdf::TYPE, fnoi::JAVASCRIPT_EXPRESSION),
                Triple::new("fns:evilImpl", doap::RELEASE, "fns:evilRelease"),
                Triple::new("fns:evilRelease", doap::FILE_RELEASE, "fns:evilFile"),
                Triple::new("fns:evilFile", ex::VALUE, "process.exit(1)"),
                Triple::new("fns:evilMapping", fno::IMPLEMENTATION, "fns:evilImpl"),
            ],
        );
        let (registry, compiler) = loader_parts();

        ImplementationLoader::new(&store, &registry, compiler)
            .load_all()
            .unwrap();
        assert!(!registry.has_implementation("fns:evilImpl"));
    }

    /// Test a script function loads but refuses to execute
    #[tokio::test]
    async fn test_script_function_unimplemented() {
        let store = MemoryDescriptorStore::new();
        store.add_graph(
            "g:sumfn",
            vec![
                Triple::new("fns:sumImpl", rdf::TYPE, fnoi::JAVASCRIPT_FUNCTION),
                Triple::new("fns:sumImpl", doap::RELEASE, "fns:sumRelease"),
                Triple::new("fns:sumRelease", doap::FILE_RELEASE, "fns:sumFile"),
                Triple::new("fns:sumFile", ex::VALUE, "function sum(a, b) { return a + b; }"),
            ],
        );
        let (registry, compiler) = loader_parts();

        ImplementationLoader::new(&store, &registry, compiler)
            .load_all()
            .unwrap();
        assert!(registry.has_implementation("fns:sumImpl"));

        let err = registry
            .execute_implementation("fns:sumImpl", &ArgumentMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Unimplemented(_)));
    }

    /// Test a process implementation without a base command is skipped
    #[test]
    fn test_process_without_base_command_skipped() {
        let store = MemoryDescriptorStore::new();
        store.add_graph(
            "g:broken",
            vec![
                Triple::new("fns:brokenImpl", rdf::TYPE, fnoi::RUNTIME_PROCESS),
                Triple::new("fns:brokenMapping", fno::IMPLEMENTATION, "fns:brokenImpl"),
            ],
        );
        let (registry, compiler) = loader_parts();

        ImplementationLoader::new(&store, &registry, compiler)
            .load_all()
            .unwrap();
        assert!(!registry.has_implementation("fns:brokenImpl"));
    }
}
