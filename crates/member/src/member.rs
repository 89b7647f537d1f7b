//! Member descriptors and the write-time entry point.
//!
//! A [`Member`] is declared once per class attribute and shared by every
//! instance. Declaration runs [`check_context`] and stores the compiled
//! [`Validator`]; after that the mode and context never change.
//!
//! Members may also carry named methods. They back the
//! `member_method_object_old_new` mode and can be rebound at runtime with
//! [`Member::set_method`], since the mode resolves them by name on every
//! write.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::change::ChangeRecord;
use crate::context::check_context;
use crate::foundation::{AtomRef, ConfigurationError, ValidationError, ValidationResult, Value};
use crate::list::ListFactory;
use crate::mode::Mode;
use crate::validators::Validator;

/// A method attached to a member, called as `(member, owner, old, new)`.
pub type MemberMethod =
    Arc<dyn Fn(&Member, &AtomRef, &Value, Value) -> ValidationResult<Value> + Send + Sync>;

// ============================================================================
// MEMBER
// ============================================================================

/// A named attribute descriptor with a validation mode and its context.
pub struct Member {
    name: Arc<str>,
    mode: Mode,
    context: Value,
    validator: Validator,
    methods: RwLock<HashMap<String, MemberMethod>>,
}

impl Member {
    /// Declares a member.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if `context` does not fit `mode`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use nebula_member::prelude::*;
    ///
    /// let age = Member::new("age", Mode::Range, Value::pair(0, 150))?;
    /// assert_eq!(age.mode(), Mode::Range);
    /// ```
    pub fn new(
        name: impl Into<Arc<str>>,
        mode: Mode,
        context: impl Into<Value>,
    ) -> Result<Arc<Self>, ConfigurationError> {
        Self::builder(name).mode(mode).context(context).build()
    }

    /// Starts declaring a member. The mode defaults to [`Mode::NoOp`].
    pub fn builder(name: impl Into<Arc<str>>) -> MemberBuilder {
        MemberBuilder {
            name: name.into(),
            mode: Mode::NoOp,
            context: Value::None,
            methods: HashMap::new(),
            list_factory: None,
        }
    }

    // ==================== Accessors ====================

    /// Returns the member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a shared handle to the member name.
    #[must_use]
    pub fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the context exactly as declared.
    #[must_use]
    pub fn context(&self) -> &Value {
        &self.context
    }

    /// Returns the compiled validator.
    #[must_use]
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    // ==================== Methods ====================

    /// Returns the method bound to `name`.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<MemberMethod> {
        self.methods.read().get(name).cloned()
    }

    /// Binds or rebinds a method, returning the previous one.
    pub fn set_method<F>(&self, name: impl Into<String>, method: F) -> Option<MemberMethod>
    where
        F: Fn(&Member, &AtomRef, &Value, Value) -> ValidationResult<Value> + Send + Sync + 'static,
    {
        self.methods.write().insert(name.into(), Arc::new(method))
    }

    /// Resolves `name` and calls it with `(self, owner, old, new)`.
    ///
    /// The lock is released before the call, so the method may rebind
    /// methods or write through this member again.
    pub fn call_method(
        &self,
        name: &str,
        owner: &AtomRef,
        old: &Value,
        new: Value,
    ) -> ValidationResult<Value> {
        let method = self
            .method(name)
            .ok_or_else(|| ValidationError::missing_method("Member", name.to_owned()))?;
        method(self, owner, old, new)
    }

    // ==================== Validation ====================

    /// Validates a write of `new` over `old` on `owner`.
    ///
    /// Returns the value to store. Failures raised by user code (coercers,
    /// callbacks, delegates) are returned as raised.
    pub fn validate(&self, owner: &AtomRef, old: &Value, new: Value) -> ValidationResult<Value> {
        tracing::trace!(member = %self.name, validator = self.validator.kind(), "validating write");
        self.validator.validate(self, owner, old, new).inspect_err(|error| {
            tracing::debug!(
                member = %self.name,
                owner = owner.atom_type().name(),
                code = %error.code,
                "write rejected"
            );
        })
    }

    /// Validates a write and packages the outcome for observers.
    ///
    /// Produces a `create` record when there was no previous value and an
    /// `update` record otherwise.
    pub fn validate_change(
        &self,
        owner: &AtomRef,
        old: Option<&Value>,
        new: Value,
    ) -> ValidationResult<(Value, ChangeRecord)> {
        let accepted = self.validate(owner, old.unwrap_or(&Value::None), new)?;
        let record = match old {
            None => ChangeRecord::create(owner, self, accepted.clone()),
            Some(old) => ChangeRecord::update(owner, self, old.clone(), accepted.clone()),
        };
        Ok((accepted, record))
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let methods = self.methods.read();
        let mut names: Vec<&str> = methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("validator", &self.validator)
            .field("methods", &names)
            .finish()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder returned by [`Member::builder`].
#[must_use = "builder methods must be chained or built"]
pub struct MemberBuilder {
    name: Arc<str>,
    mode: Mode,
    context: Value,
    methods: HashMap<String, MemberMethod>,
    list_factory: Option<Arc<dyn ListFactory>>,
}

impl MemberBuilder {
    /// Sets the validation mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the mode's context payload.
    pub fn context(mut self, context: impl Into<Value>) -> Self {
        self.context = context.into();
        self
    }

    /// Attaches a named method.
    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&Member, &AtomRef, &Value, Value) -> ValidationResult<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(method));
        self
    }

    /// Replaces the factory that builds this member's lists.
    ///
    /// Only `list` and `container_list` members build lists.
    pub fn list_factory(mut self, factory: impl ListFactory + 'static) -> Self {
        self.list_factory = Some(Arc::new(factory));
        self
    }

    /// Checks the context and declares the member.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the context does not fit the mode,
    /// or if a list factory was given to a mode that builds no list.
    pub fn build(self) -> Result<Arc<Member>, ConfigurationError> {
        let mut validator = check_context(self.mode, &self.context)?;
        if let Some(custom) = self.list_factory {
            let Validator::List { factory, .. } = &mut validator else {
                return Err(ConfigurationError::ListFactoryUnsupported(self.mode));
            };
            *factory = custom;
        }
        tracing::debug!(member = %self.name, mode = %self.mode, "declared member");
        Ok(Arc::new(Member {
            name: self.name,
            mode: self.mode,
            context: self.context,
            validator,
            methods: RwLock::new(self.methods),
        }))
    }
}

// ============================================================================
// TESTS
// ============================================================================
