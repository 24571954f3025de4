// Copyright 2025 Cowboy AI, LLC.

//! Per-variant execution handlers
//!
//! Handlers are a deliberately thin strategy seam: every variant compiles to
//! a uniform callable, so executing is a one-line indirection. The registry
//! stays agnostic of which calling convention produced the callable.

use crate::errors::EngineResult;
use crate::model::{ArgumentMap, OutputMap};
use crate::registry::HandlerOptions;
use async_trait::async_trait;

/// Strategy adapter invoking a compiled callable with a uniform signature
#[async_trait]
pub trait ImplementationHandler: Send + Sync {
    /// Identifying iri of this handler kind
    fn id(&self) -> &str;

    /// Invoke the compiled callable behind `options` with `args`
    async fn execute_function(
        &self,
        args: ArgumentMap,
        options: &HandlerOptions,
    ) -> EngineResult<OutputMap>;
}

macro_rules! callable_handler {
    ($(#[$doc:meta])* $name:ident, $local:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        #[async_trait]
        impl ImplementationHandler for $name {
            fn id(&self) -> &str {
                concat!("https://w3id.org/function/vocabulary/implementation#", $local)
            }

            async fn execute_function(
                &self,
                args: ArgumentMap,
                options: &HandlerOptions,
            ) -> EngineResult<OutputMap> {
                (options.callable)(args).await
            }
        }
    };
}

callable_handler!(
    /// Handler for external-process implementations
    ProcessHandler,
    "RuntimeProcessHandler"
);
callable_handler!(
    /// Handler for script-expression implementations
    ExpressionHandler,
    "JavaScriptExpressionHandler"
);
callable_handler!(
    /// Handler for script-function implementations
    ScriptFunctionHandler,
    "JavaScriptHandler"
);
