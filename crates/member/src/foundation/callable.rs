//! Shared user callables (coercers and other plug-in functions).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::foundation::{ValidationError, Value};

/// Signature of the function wrapped by a [`Callable`].
pub type CallableFn = dyn Fn(&[Value]) -> Result<Value, ValidationError> + Send + Sync;

/// A named, shareable function value.
///
/// Callables compare by identity. An optional arity is checked on every
/// call; a variadic callable accepts any number of arguments.
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_member::foundation::{Callable, Value, ValidationError};
///
/// let parse = Callable::new("parse_int", 1, |args| match &args[0] {
///     Value::Str(s) => s.parse::<i64>().map(Value::Int).map_err(|e| {
///         ValidationError::user("parse_error", e.to_string())
///     }),
///     other => Ok(other.clone()),
/// });
///
/// assert_eq!(parse.call(&["42".into()])?, Value::Int(42));
/// ```
#[derive(Clone)]
pub struct Callable(Arc<CallableInner>);

struct CallableInner {
    name: String,
    arity: Option<usize>,
    func: Box<CallableFn>,
}

impl Callable {
    /// Creates a callable taking exactly `arity` arguments.
    pub fn new<F>(name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ValidationError> + Send + Sync + 'static,
    {
        Self(Arc::new(CallableInner {
            name: name.into(),
            arity: Some(arity),
            func: Box::new(func),
        }))
    }

    /// Creates a callable accepting any number of arguments.
    pub fn variadic<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ValidationError> + Send + Sync + 'static,
    {
        Self(Arc::new(CallableInner {
            name: name.into(),
            arity: None,
            func: Box::new(func),
        }))
    }

    /// Returns the callable's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns the declared arity, or `None` for variadic callables.
    #[must_use]
    pub fn arity(&self) -> Option<usize> {
        self.0.arity
    }

    /// Returns `true` if the callable can be invoked with `count` arguments.
    #[must_use]
    pub fn accepts(&self, count: usize) -> bool {
        self.0.arity.is_none_or(|arity| arity == count)
    }

    /// Invokes the callable.
    ///
    /// Failures raised by the wrapped function are returned unchanged.
    pub fn call(&self, args: &[Value]) -> Result<Value, ValidationError> {
        if !self.accepts(args.len()) {
            return Err(ValidationError::arity(
                self.name().to_owned(),
                self.0.arity.unwrap_or_default(),
                args.len(),
            ));
        }
        (self.0.func)(args)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Callable {}

impl Hash for Callable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name())
    }
}
