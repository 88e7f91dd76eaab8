//! Integration tests running the scripts under `test_scripts/`.
//!
//! Every script ends with an expression whose value is checked here, so a
//! script that silently takes the wrong branch still fails.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use tern::{CallContext, Engine, Value, live_strings};

/// Load a test script from the test_scripts directory.
fn load_script(filename: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_scripts")
        .join(filename);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

/// Compile and run a script on a fresh engine.
fn run_script(engine: &Engine, filename: &str) -> Value {
    let source = load_script(filename);
    let program = engine
        .compile(&source)
        .unwrap_or_else(|e| panic!("{filename}: {}", describe(&e, &source)));
    engine
        .execute(&program)
        .unwrap_or_else(|e| panic!("{filename}: {e}"))
}

fn describe(error: &tern::TernError, source: &str) -> String {
    match error {
        tern::TernError::Parse(parse) => parse.display_with_source(source),
        other => other.to_string(),
    }
}

/// An engine with the natives the scripts expect, plus the lines `log` wrote.
fn host_engine() -> (Engine, Rc<RefCell<Vec<String>>>) {
    let output = Rc::new(RefCell::new(Vec::new()));
    let mut engine = Engine::new();

    engine
        .register_fn("number add(number, number)", |ctx: &CallContext<'_>| {
            Value::Number(ctx.number(0).unwrap_or(0.0) + ctx.number(1).unwrap_or(0.0))
        })
        .unwrap();
    engine
        .register_fn("string str(number)", |ctx: &CallContext<'_>| {
            Value::string(&ctx.number(0).unwrap_or(f64::NAN).to_string())
        })
        .unwrap();
    engine
        .register_fn("number? lookup(number)", |ctx: &CallContext<'_>| {
            match ctx.number(0) {
                Some(key) if key < 5.0 => Value::Number(key * 100.0),
                _ => Value::Null,
            }
        })
        .unwrap();

    let sink = Rc::clone(&output);
    engine
        .register_fn("void log(string, ...)", move |ctx: &CallContext<'_>| {
            let line = ctx
                .args()
                .iter()
                .map(|arg| arg.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            sink.borrow_mut().push(line);
            Value::Null
        })
        .unwrap();

    (engine, output)
}

// =============================================================================
// Scripts
// =============================================================================

#[test]
fn test_arithmetic() {
    assert_eq!(run_script(&Engine::new(), "arithmetic.tern"), Value::Number(13.0));
}

#[test]
fn test_loops() {
    assert_eq!(run_script(&Engine::new(), "loops.tern"), Value::Boolean(true));
}

#[test]
fn test_strings() {
    let result = run_script(&Engine::new(), "strings.tern");
    assert_eq!(result.as_str(), Some("hello, tern!"));
}

#[test]
fn test_scopes() {
    assert_eq!(run_script(&Engine::new(), "scopes.tern"), Value::Number(112.0));
}

#[test]
fn test_fibonacci() {
    assert_eq!(
        run_script(&Engine::new(), "fibonacci.tern"),
        Value::Number(832040.0)
    );
}

#[test]
fn test_natives() {
    let (engine, output) = host_engine();
    let result = run_script(&engine, "natives.tern");
    assert_eq!(result.as_str(), Some("ok"));
    assert_eq!(*output.borrow(), ["total 5", "done"]);
}

#[test]
fn test_natives_need_registration() {
    let source = load_script("natives.tern");
    assert!(Engine::new().compile(&source).is_err());
}

// =============================================================================
// Pipeline checks
// =============================================================================

#[test]
fn test_scripts_release_every_string() {
    let baseline = live_strings();
    for filename in ["strings.tern", "natives.tern", "loops.tern"] {
        let (engine, _) = host_engine();
        drop(run_script(&engine, filename));
    }
    assert_eq!(live_strings(), baseline);
}

#[test]
fn test_scripts_disassemble() {
    let (engine, _) = host_engine();
    for filename in [
        "arithmetic.tern",
        "loops.tern",
        "strings.tern",
        "natives.tern",
        "scopes.tern",
        "fibonacci.tern",
    ] {
        let program = engine.compile(&load_script(filename)).unwrap();
        let listing = program.disassemble();
        assert!(!listing.is_empty(), "{filename}");
        assert!(!listing.contains("<bad"), "{filename}");
        assert!(!listing.contains("<truncated>"), "{filename}");
        assert_eq!(listing, program.chunk().to_string());
    }
}

#[test]
fn test_programs_are_reusable() {
    let engine = Engine::new();
    let program = engine.compile(&load_script("fibonacci.tern")).unwrap();
    for _ in 0..3 {
        assert_eq!(engine.execute(&program).unwrap(), Value::Number(832040.0));
    }
}
