use std::io::BufRead;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use gamexpr::{
    BuildOptions, Error, EvalContext, EvalContextBuilder, ExpressionSource, GameState,
    ValidateOptions, VariableMap, render_error, render_validation_to_string,
    validate_all_expressions, validate_expression,
};
use miette::{IntoDiagnostic, Result, WrapErr, miette};
use serde_json::Value as Json;
use tracing::debug;

/// Gamexpr - expressions for game content
#[derive(Parser, Debug)]
#[command(name = "gamexpr")]
#[command(about = "Evaluate and lint gamexpr expressions", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one expression (reads one per line from stdin if omitted)
    Eval {
        /// Expression to evaluate
        expression: Option<String>,

        /// JSON file with a variable table
        #[arg(long)]
        vars: Option<PathBuf>,

        /// Game state as inline JSON, e.g. '{"score": 100, "wave": 3}'
        #[arg(long)]
        state: Option<String>,

        /// Seed for the random builtins
        #[arg(long, default_value_t = 12345)]
        seed: u32,

        /// Print the parsed AST (for debugging)
        #[arg(long)]
        debug_parse: bool,
    },

    /// Validate every expression in a JSON content file
    Lint {
        /// Content file. Top-level `variables` are checked as a dependency graph.
        file: PathBuf,

        /// Print findings as JSON
        #[arg(long)]
        json: bool,
    },
}

fn read_json(path: &Path) -> Result<Json> {
    let text = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text)
        .into_diagnostic()
        .wrap_err_with(|| format!("parsing {}", path.display()))
}

fn variables_of(document: &Json) -> Result<VariableMap> {
    match document.get("variables") {
        Some(variables) => serde_json::from_value(variables.clone())
            .into_diagnostic()
            .wrap_err("invalid variable table"),
        None => Ok(VariableMap::new()),
    }
}

/// Collect every `{"expr": "..."}` object in the document with its JSON path.
fn collect_expressions(value: &Json, path: &str, out: &mut Vec<ExpressionSource>) {
    match value {
        Json::Object(map) => {
            if let Some(Json::String(source)) = map.get("expr") {
                out.push(ExpressionSource {
                    source: source.clone(),
                    path: path.to_string(),
                });
                return;
            }
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                collect_expressions(child, &child_path, out);
            }
        }
        Json::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                collect_expressions(child, &format!("{path}[{i}]"), out);
            }
        }
        _ => {}
    }
}

fn build_context(vars: Option<&Path>, state: Option<&str>, seed: u32) -> Result<EvalContext> {
    let variables = match vars {
        Some(path) => variables_of(&read_json(path)?)?,
        None => VariableMap::new(),
    };
    let state: GameState = match state {
        Some(json) => serde_json::from_str(json)
            .into_diagnostic()
            .wrap_err("invalid --state")?,
        None => GameState::default(),
    };
    EvalContextBuilder::new()
        .build(BuildOptions::new(state, &variables).with_seed(seed))
        .into_diagnostic()
}

fn eval_one(source: &str, ctx: &EvalContext, debug_parse: bool) -> bool {
    let compiled = match gamexpr::compile(source) {
        Ok(compiled) => compiled,
        Err(e) => {
            render_error(&Error::from(e));
            return false;
        }
    };

    if debug_parse {
        println!("=== Parsed AST ===");
        println!("{:#?}", compiled.ast());
        println!();
    }

    match compiled.evaluate(ctx) {
        Ok(value) => {
            println!("{value}");
            true
        }
        Err(e) => {
            render_error(&Error::runtime(&e, source));
            false
        }
    }
}

fn run_eval(
    expression: Option<&str>,
    vars: Option<&Path>,
    state: Option<&str>,
    seed: u32,
    debug_parse: bool,
) -> Result<()> {
    let ctx = build_context(vars, state, seed)?;
    debug!(variables = ctx.variables.len(), "context ready");

    if let Some(source) = expression {
        return if eval_one(source, &ctx, debug_parse) {
            Ok(())
        } else {
            Err(miette!("evaluation failed"))
        };
    }

    // Pipe mode: one expression per line.
    let stdin = std::io::stdin();
    let mut failures = 0usize;
    for line in stdin.lock().lines() {
        let line = line.into_diagnostic()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !eval_one(line, &ctx, debug_parse) {
            failures += 1;
        }
    }
    if failures > 0 {
        return Err(miette!("{failures} expression(s) failed"));
    }
    Ok(())
}

fn run_lint(file: &Path, json: bool) -> Result<()> {
    let document = read_json(file)?;
    let variables = variables_of(&document)?;

    let mut sources = Vec::new();
    collect_expressions(&document, "", &mut sources);
    debug!(count = sources.len(), "collected expressions");

    let options = ValidateOptions::new().with_known_variables(variables.names().cloned());
    let graph = EvalContextBuilder::new()
        .build(BuildOptions::new(GameState::default(), &variables))
        .err();

    if json {
        let batch = validate_all_expressions(&sources, &options.known_variables);
        let report = serde_json::json!({
            "valid": batch.valid && graph.is_none(),
            "errors": batch.errors,
            "warnings": batch.warnings,
            "variables": graph.as_ref().map(ToString::to_string),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&report).into_diagnostic()?
        );
        return if report["valid"] == Json::Bool(true) {
            Ok(())
        } else {
            Err(miette!("lint failed"))
        };
    }

    let mut errors = 0usize;
    let mut warnings = 0usize;
    for entry in &sources {
        let result = validate_expression(&entry.source, &options.clone().with_path(&entry.path));
        errors += result.errors.len();
        warnings += result.warnings.len();
        if !result.errors.is_empty() || !result.warnings.is_empty() {
            eprintln!("{}:", entry.path);
            eprint!("{}", render_validation_to_string(&entry.source, &result, true));
        }
    }
    if let Some(err) = &graph {
        eprintln!("variables: {err}");
        errors += 1;
    }

    println!(
        "{}: {} expression(s), {errors} error(s), {warnings} warning(s)",
        file.display(),
        sources.len()
    );
    if errors > 0 {
        return Err(miette!("lint failed"));
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG controls the level; default to WARN if not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match args.command {
        Command::Eval {
            expression,
            vars,
            state,
            seed,
            debug_parse,
        } => run_eval(
            expression.as_deref(),
            vars.as_deref(),
            state.as_deref(),
            seed,
            debug_parse,
        ),
        Command::Lint { file, json } => run_lint(&file, json),
    }
}
