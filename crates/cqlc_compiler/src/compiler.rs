//! The compiler driver.
//!
//! Declarations are compiled one at a time into a [`Schema`]. Each is
//! atomic: the schema is snapshotted first and restored if the declaration
//! fails, so a failure never leaves a half-built fact type behind.

use tracing::{debug, warn};

use cqlc_foundation::{Error, ErrorKind, Result};
use cqlc_schema::Schema;

use crate::binding::Bindings;
use crate::canonicalize::canonicalize;
use crate::config::{CompilerConfig, ErrorPolicy};
use crate::constraint::compile_constraint;
use crate::declaration::{Clause, Declaration, FactTypeDecl};
use crate::entity::compile_entity;
use crate::fact_type::{CompiledFactType, compile_fact_type, objectify};
use crate::scope::ResolutionScope;
use crate::value_type::compile_value_type;

/// Compiler state: the schema being built and the configuration.
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    /// The metamodel graph.
    schema: Schema,
    /// Behavior switches.
    config: CompilerConfig,
    /// Declarations submitted so far, failed ones included.
    submitted: usize,
}

impl Compiler {
    /// Creates a compiler over an empty schema with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a compiler with the given configuration.
    #[must_use]
    pub fn with_config(config: CompilerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Continues compiling into an existing schema.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// The schema built so far.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Consumes the compiler, returning the schema.
    #[must_use]
    pub fn into_schema(self) -> Schema {
        self.schema
    }

    /// Compiles one declaration.
    ///
    /// On failure the schema is restored to its state before the call and
    /// the error carries the declaration's index and label.
    ///
    /// # Errors
    ///
    /// Any error raised while compiling the declaration.
    pub fn compile(&mut self, declaration: &Declaration) -> Result<()> {
        let index = self.submitted;
        self.submitted += 1;

        let snapshot = self.schema.clone();
        match self.dispatch(declaration) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.schema = snapshot;
                let label = declaration.label();
                warn!(index, declaration = %label, error = %err, "rolled back declaration");
                Err(locate(err, index).in_declaration(&label))
            }
        }
    }

    /// Compiles a sequence of declarations under the configured error policy.
    ///
    /// Returns every error collected; an empty vector means success.
    pub fn compile_all(&mut self, declarations: &[Declaration]) -> Vec<Error> {
        let mut errors = Vec::new();
        for declaration in declarations {
            let Err(err) = self.compile(declaration) else {
                continue;
            };
            errors.push(err);
            match self.config.error_policy {
                ErrorPolicy::StopAtFirst => break,
                ErrorPolicy::Collect if errors.len() >= self.config.max_errors => break,
                ErrorPolicy::Collect => {}
            }
        }
        errors
    }

    /// Checks that every forward reference was eventually declared.
    ///
    /// # Errors
    ///
    /// `UnresolvedForwardReference` listing the undeclared names.
    pub fn finish(&self) -> Result<()> {
        let mut unresolved: Vec<String> = self
            .schema
            .provisional_object_types()
            .map(|ot| ot.name.clone())
            .collect();
        if unresolved.is_empty() {
            return Ok(());
        }
        unresolved.sort();
        Err(Error::new(ErrorKind::UnresolvedForwardReference(unresolved)))
    }

    fn dispatch(&mut self, declaration: &Declaration) -> Result<()> {
        match declaration {
            Declaration::ValueType(decl) => {
                compile_value_type(&mut self.schema, decl)?;
            }
            Declaration::EntityType(decl) => {
                compile_entity(&mut self.schema, decl, &self.config)?;
            }
            Declaration::FactType(decl) => {
                self.compile_fact_type(decl)?;
            }
            Declaration::Constraint(decl) => {
                compile_constraint(&mut self.schema, decl)?;
            }
        }
        Ok(())
    }

    fn compile_fact_type(&mut self, decl: &FactTypeDecl) -> Result<CompiledFactType> {
        let clauses: Vec<&Clause> = decl.clauses.iter().collect();
        let scope = ResolutionScope::prepare(
            &mut self.schema,
            &clauses,
            self.config.allow_forward_references,
        )?;
        let canonical = decl
            .clauses
            .iter()
            .map(|c| canonicalize(c, &scope).map_err(|e| e.in_clause(&c.to_string())))
            .collect::<Result<Vec<_>>>()?;

        let compiled = compile_fact_type(&mut self.schema, &canonical, &mut Bindings::new())?;
        debug!(
            fact_type = %compiled.fact_type,
            created = compiled.created,
            readings = canonical.len(),
            "compiled fact type"
        );
        if let Some(name) = &decl.name {
            objectify(&mut self.schema, name, compiled.fact_type)?;
        }
        Ok(compiled)
    }
}

fn locate(mut err: Error, index: usize) -> Error {
    let context = err.context.take().unwrap_or_default();
    err.context = Some(match context.index {
        Some(_) => context,
        None => context.with_index(index),
    });
    err
}

impl From<Schema> for Compiler {
    fn from(schema: Schema) -> Self {
        Self::new().with_schema(schema)
    }
}

/// Compiles declarations into a fresh schema, stopping at the first error.
///
/// # Errors
///
/// The first failing declaration's error, or `UnresolvedForwardReference`.
pub fn compile_schema(declarations: &[Declaration]) -> Result<Schema> {
    let mut compiler = Compiler::new();
    if let Some(err) = compiler.compile_all(declarations).into_iter().next() {
        return Err(err);
    }
    compiler.finish()?;
    Ok(compiler.into_schema())
}
