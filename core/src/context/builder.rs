//! Resolves a variable table into one flat [`EvalContext`].

use std::sync::Arc;

use ecow::EcoString;
use hashbrown::{HashMap, HashSet};
use tracing::{debug, trace};

use super::{BuildError, VariableMap};
use crate::api::{CompiledExpression, EngineOptions, Value, compile_with_options};
use crate::evaluator::{
    DEFAULT_SEED, EntityContext, EntityQuery, EvalContext, GameState, SeededRandom,
};
use crate::values::RuntimeValue;

/// Inputs for one [`EvalContextBuilder::build`] call.
pub struct BuildOptions<'a> {
    pub game_state: GameState,
    pub variables: &'a VariableMap,
    pub self_entity: Option<EntityContext>,
    pub seed: u32,
    pub entity_query: Option<Arc<dyn EntityQuery>>,
}

impl<'a> BuildOptions<'a> {
    pub fn new(game_state: GameState, variables: &'a VariableMap) -> Self {
        Self {
            game_state,
            variables,
            self_entity: None,
            seed: DEFAULT_SEED,
            entity_query: None,
        }
    }

    pub fn with_self(mut self, entity: EntityContext) -> Self {
        self.self_entity = Some(entity);
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_entity_query(mut self, query: Arc<dyn EntityQuery>) -> Self {
        self.entity_query = Some(query);
        self
    }
}

/// One variable in the dependency graph.
struct Node<'a> {
    value: &'a Value<RuntimeValue>,
    compiled: Option<CompiledExpression>,
    /// Declared variables this one reads, in first-use order.
    dependencies: Vec<EcoString>,
}

/// Builds evaluation contexts from variable tables.
///
/// Every call works on its own dependency graph, so one builder can be
/// reused for any number of builds.
#[derive(Debug, Clone, Default)]
pub struct EvalContextBuilder {
    options: EngineOptions,
}

impl EvalContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self { options }
    }

    /// Resolve every variable and return the finished context.
    ///
    /// Expressions are compiled and the dependency graph is checked for
    /// unknown references and cycles before anything is evaluated.
    /// Variables are then evaluated in dependency order, each one seeing
    /// the ones it depends on as plain values.
    pub fn build(&self, options: BuildOptions<'_>) -> Result<EvalContext, BuildError> {
        let nodes = self.collect_nodes(options.variables)?;
        check_references(options.variables, &nodes)?;
        let order = topological_order(options.variables, &nodes)?;
        debug!(order = ?order, "resolved variable order");

        let mut ctx = EvalContext::with_seed(options.game_state, options.seed);
        ctx.self_entity = options.self_entity;
        ctx.entity_query = options.entity_query;

        for name in order {
            let node = &nodes[name];
            let value = match &node.compiled {
                Some(compiled) => {
                    compiled
                        .evaluate(&ctx)
                        .map_err(|error| BuildError::Evaluation {
                            variable: name.clone(),
                            error,
                        })?
                }
                None => match node.value {
                    Value::Literal(literal) => literal.clone(),
                    // Expressions always carry a compiled form.
                    Value::Expression(_) => continue,
                },
            };
            trace!(variable = %name, value = %value, "resolved variable");
            ctx.variables.insert(name.clone(), value);
        }

        // Hand out a fresh generator so the caller's draws do not depend on
        // how many random calls the variables made.
        ctx.random = Box::new(SeededRandom::new(options.seed));
        Ok(ctx)
    }

    fn collect_nodes<'a>(
        &self,
        variables: &'a VariableMap,
    ) -> Result<HashMap<&'a EcoString, Node<'a>>, BuildError> {
        let mut nodes = HashMap::with_capacity(variables.len());
        for (name, variable) in variables.iter() {
            let value = variable.value();
            let node = match value {
                Value::Literal(_) => Node {
                    value,
                    compiled: None,
                    dependencies: Vec::new(),
                },
                Value::Expression(expression) => {
                    let compiled = compile_with_options(&expression.expr, &self.options)
                        .map_err(|error| BuildError::Compile {
                            variable: name.clone(),
                            error,
                        })?;
                    Node {
                        value,
                        dependencies: compiled.dependencies().to_vec(),
                        compiled: Some(compiled),
                    }
                }
            };
            nodes.insert(name, node);
        }
        Ok(nodes)
    }
}

/// Every dependency must name a declared variable. Reserved globals never
/// appear as dependencies.
fn check_references(
    variables: &VariableMap,
    nodes: &HashMap<&EcoString, Node<'_>>,
) -> Result<(), BuildError> {
    for name in variables.names() {
        for dependency in &nodes[name].dependencies {
            if !variables.contains(dependency) {
                return Err(BuildError::UnknownVariable {
                    variable_name: dependency.clone(),
                    referenced_in: name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Depth-first topological sort in declaration order.
fn topological_order<'a>(
    variables: &'a VariableMap,
    nodes: &HashMap<&'a EcoString, Node<'a>>,
) -> Result<Vec<&'a EcoString>, BuildError> {
    struct Sort<'a, 'n> {
        nodes: &'n HashMap<&'a EcoString, Node<'a>>,
        visited: HashSet<&'a EcoString>,
        /// Current DFS path; doubles as the "visiting" set.
        path: Vec<&'a EcoString>,
        order: Vec<&'a EcoString>,
    }

    impl<'a> Sort<'a, '_> {
        fn visit(&mut self, name: &'a EcoString) -> Result<(), BuildError> {
            if self.visited.contains(name) {
                return Ok(());
            }
            if let Some(start) = self.path.iter().position(|n| *n == name) {
                return Err(BuildError::CyclicDependency {
                    cycle: self.path[start..].iter().map(|n| (*n).clone()).collect(),
                    variable_name: name.clone(),
                });
            }
            let nodes = self.nodes;
            let Some((&key, node)) = nodes.get_key_value(name) else {
                return Ok(());
            };

            self.path.push(key);
            for dependency in &node.dependencies {
                if let Some((&dep_key, _)) = nodes.get_key_value(dependency) {
                    self.visit(dep_key)?;
                }
            }
            self.path.pop();

            self.visited.insert(key);
            self.order.push(key);
            Ok(())
        }
    }

    let mut sort = Sort {
        nodes,
        visited: HashSet::with_capacity(nodes.len()),
        path: Vec::new(),
        order: Vec::with_capacity(nodes.len()),
    };
    for name in variables.names() {
        sort.visit(name)?;
    }
    Ok(sort.order)
}

/// Build a context with a default [`EvalContextBuilder`].
pub fn build_eval_context(options: BuildOptions<'_>) -> Result<EvalContext, BuildError> {
    EvalContextBuilder::new().build(options)
}
