//! Agent capability interface.
//!
//! An agent is an opaque unit exposing a fixed, enumerated set of named
//! operations. Each operation takes named arguments and asynchronously
//! returns text or a fault.
//!
//! Follows the same blanket-impl pattern as `BoxLlmProvider`:
//! 1. `Agent` uses native async fn in traits (RPITIT)
//! 2. Object-safe `AgentDyn` with boxed futures, blanket-implemented for all `T: Agent`
//! 3. `BoxAgent` wraps `Box<dyn AgentDyn>` and delegates

pub mod custom;
pub mod pool;
pub mod registry;

use std::future::Future;
use std::pin::Pin;

use dugout_types::error::AgentError;
use dugout_types::task::TaskArguments;

pub use custom::CustomAgent;
pub use pool::{AgentPool, InitReport};
pub use registry::{AgentConstructor, AgentRegistry};

/// Trait implemented by every concrete agent.
pub trait Agent: Send + Sync {
    /// Registry key of this agent (e.g. "head_coach").
    fn kind(&self) -> &str;

    /// Names of the operations this agent exposes.
    fn operations(&self) -> &'static [&'static str];

    /// Invoke `operation` with `arguments`.
    ///
    /// Implementations parse `operation` into their own operation enum and
    /// return `AgentError::UnknownOperation` when it does not match.
    fn invoke(
        &self,
        operation: &str,
        arguments: &TaskArguments,
    ) -> impl Future<Output = Result<String, AgentError>> + Send;
}

/// Object-safe version of [`Agent`] with boxed futures.
pub trait AgentDyn: Send + Sync {
    fn kind(&self) -> &str;

    fn operations(&self) -> &'static [&'static str];

    fn invoke_boxed<'a>(
        &'a self,
        operation: &'a str,
        arguments: &'a TaskArguments,
    ) -> Pin<Box<dyn Future<Output = Result<String, AgentError>> + Send + 'a>>;
}

impl<T: Agent> AgentDyn for T {
    fn kind(&self) -> &str {
        Agent::kind(self)
    }

    fn operations(&self) -> &'static [&'static str] {
        Agent::operations(self)
    }

    fn invoke_boxed<'a>(
        &'a self,
        operation: &'a str,
        arguments: &'a TaskArguments,
    ) -> Pin<Box<dyn Future<Output = Result<String, AgentError>> + Send + 'a>> {
        Box::pin(self.invoke(operation, arguments))
    }
}

/// Type-erased agent for registry storage and runtime lookup.
pub struct BoxAgent {
    inner: Box<dyn AgentDyn>,
}

impl BoxAgent {
    pub fn new<T: Agent + 'static>(agent: T) -> Self {
        Self {
            inner: Box::new(agent),
        }
    }

    pub fn kind(&self) -> &str {
        self.inner.kind()
    }

    pub fn operations(&self) -> &'static [&'static str] {
        self.inner.operations()
    }

    /// Whether `operation` is one of this agent's operations.
    pub fn supports(&self, operation: &str) -> bool {
        self.inner.operations().contains(&operation)
    }

    pub async fn invoke(
        &self,
        operation: &str,
        arguments: &TaskArguments,
    ) -> Result<String, AgentError> {
        self.inner.invoke_boxed(operation, arguments).await
    }
}

impl std::fmt::Debug for BoxAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxAgent")
            .field("kind", &self.kind())
            .field("operations", &self.operations())
            .finish()
    }
}

/// Fetch a required string argument.
pub fn require_str<'a>(arguments: &'a TaskArguments, name: &str) -> Result<&'a str, AgentError> {
    let value = arguments
        .get(name)
        .ok_or_else(|| AgentError::MissingArgument(name.to_string()))?;
    value.as_str().ok_or_else(|| AgentError::InvalidArgument {
        name: name.to_string(),
        expected: "a string".to_string(),
    })
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted agents shared by the core test modules.

    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use dugout_types::agent::AgentProfile;
    use dugout_types::error::AgentError;
    use dugout_types::llm::LlmError;
    use dugout_types::task::TaskArguments;

    use super::{Agent, require_str};

    /// How a scripted agent answers a given input.
    #[derive(Clone)]
    pub enum Reply {
        Text(String),
        Fault(String),
    }

    /// Agent with one `run(input)` operation and scripted replies.
    ///
    /// Unscripted inputs echo back as `"<kind>:<input>"`. Every call bumps
    /// the shared call counter and sleeps for the input's configured delay.
    #[derive(Clone)]
    pub struct ScriptedAgent {
        pub kind: String,
        pub replies: HashMap<String, Reply>,
        pub delays: HashMap<String, Duration>,
        pub calls: Arc<AtomicUsize>,
        pub in_flight: Arc<AtomicUsize>,
        pub max_in_flight: Arc<AtomicUsize>,
    }

    impl ScriptedAgent {
        pub fn new(kind: &str) -> Self {
            Self {
                kind: kind.to_string(),
                replies: HashMap::new(),
                delays: HashMap::new(),
                calls: Arc::new(AtomicUsize::new(0)),
                in_flight: Arc::new(AtomicUsize::new(0)),
                max_in_flight: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn replying(mut self, input: &str, text: &str) -> Self {
            self.replies
                .insert(input.to_string(), Reply::Text(text.to_string()));
            self
        }

        pub fn failing_on(mut self, input: &str, message: &str) -> Self {
            self.replies
                .insert(input.to_string(), Reply::Fault(message.to_string()));
            self
        }

        pub fn delayed(mut self, input: &str, delay: Duration) -> Self {
            self.delays.insert(input.to_string(), delay);
            self
        }
    }

    impl Agent for ScriptedAgent {
        fn kind(&self) -> &str {
            &self.kind
        }

        fn operations(&self) -> &'static [&'static str] {
            &["run"]
        }

        async fn invoke(
            &self,
            operation: &str,
            arguments: &TaskArguments,
        ) -> Result<String, AgentError> {
            if operation != "run" {
                return Err(AgentError::UnknownOperation(operation.to_string()));
            }
            let input = require_str(arguments, "input")?.to_string();
            self.calls.fetch_add(1, Ordering::SeqCst);

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(&input) {
                tokio::time::sleep(*delay).await;
            } else {
                tokio::task::yield_now().await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.replies.get(&input) {
                Some(Reply::Text(text)) => Ok(text.clone()),
                Some(Reply::Fault(message)) => Err(AgentError::Llm(LlmError::Provider {
                    message: message.clone(),
                })),
                None => Ok(format!("{}:{}", self.kind, input)),
            }
        }
    }

    /// Catalog profile for a single-operation agent.
    pub fn simple_profile(kind: &str, operation: &str, input_argument: &str) -> AgentProfile {
        AgentProfile {
            kind: kind.to_string(),
            name: kind.to_string(),
            role: String::new(),
            description: String::new(),
            capabilities: Vec::new(),
            operations: vec![operation.to_string()],
            default_operation: operation.to_string(),
            input_argument: input_argument.to_string(),
        }
    }

    /// Arguments for a scripted `run` call.
    pub fn input(value: &str) -> TaskArguments {
        let mut args = TaskArguments::new();
        args.insert("input".to_string(), serde_json::json!(value));
        args
    }
}
