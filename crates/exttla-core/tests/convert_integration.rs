//! End-to-end tests over the full pipeline: source text -> parse
//! events -> module builder -> registry -> resolution -> emission.

use exttla_core::{emit_at, Error, ModuleBuilder, Registry};

const TS: &str = "Tue Jan 06 10:00:00 UTC 2026";

fn registry(sources: &[&str]) -> Registry {
    let mut builder = ModuleBuilder::new();
    for source in sources {
        let events = exttla_syntax::parse(source).expect("parse failed");
        builder.handle_all(events).expect("build failed");
    }
    builder.finish().expect("unterminated module")
}

fn convert(sources: &[&str], name: &str) -> String {
    let mut registry = registry(sources);
    let module = registry.resolve(name).expect("resolution failed");
    emit_at(&module, TS)
}

#[test]
fn base_and_child_end_to_end() {
    let source = r"
module Base {
  var x: {\ Nat \} = 0
  operation Inc {\ x' = x + 1 \}
}
module Child extends Base {
}";
    let text = convert(&[source], "Child");

    assert!(text.contains(" MODULE Child "));
    assert!(text.contains("VARIABLE x\n"));
    assert!(text.contains("vars == <<x>>\n"));
    assert!(text.contains("TypeInv ==\n  /\\ x \\in Nat\n"));
    assert!(text.contains("Inc == x' = x + 1\n  /\\ UNCHANGED <<>>\n"));
    assert!(text.contains("Init ==\n  /\\ x = 0\n"));
    assert!(text.contains("Next ==\n  \\/ Inc\n"));
    assert!(text.contains("Spec == Init /\\ [][Next]_vars\n"));
}

#[test]
fn frame_condition_covers_untouched_variables() {
    let source = r"
module Proto {
  var sent: {\ Nat \} = 0
  var acked: {\ Nat \} = 0
  var log: any = {\ <<>> \}
  operation Send {\ sent' = sent + 1 \}
}";
    let text = convert(&[source], "Proto");
    assert!(text.contains("Send == sent' = sent + 1\n  /\\ UNCHANGED <<acked, log>>\n"));
}

#[test]
fn frame_condition_transitive_through_helper() {
    // deliver primes acked; Recv invokes it as a direct conjunct and
    // additionally primes log, so only sent survives.
    let source = r"
module Proto {
  var sent: any = 0
  var acked: any = 0
  var log: any = {\ <<>> \}
  operation deliver {\ acked' = acked + 1 \}
  operation Recv {\
  /\ deliver
  /\ log' = Append(log, 1)
\}
}";
    let text = convert(&[source], "Proto");
    assert!(text.contains("  /\\ UNCHANGED <<sent>>\n"));
}

#[test]
fn override_across_files() {
    let base = r"
module Base {
  const Limit = 10
  operation Step {\ x' = x + 1 \}
  var x: any = 0
}";
    let child = r"
module Child extends Base {
  override const Limit = 99
  override operation Step {\ x' = x + 2 \}
}";
    let text = convert(&[base, child], "Child");
    assert!(text.contains("Limit == 99\n"));
    assert!(!text.contains("Limit == 10"));
    assert!(text.contains("Step == x' = x + 2\n"));
    assert!(!text.contains("x' = x + 1"));
}

#[test]
fn override_of_unknown_name_aborts() {
    let source = r"
module Base {}
module Child extends Base {
  override const Ghost = 1
}";
    let mut registry = registry(&[source]);
    assert!(matches!(
        registry.resolve("Child").unwrap_err(),
        Error::InvalidOverride { .. }
    ));
}

#[test]
fn grandparent_entities_flow_through() {
    let source = r"
module A {
  var a: any = 0
}
module B extends A {
  var b: any = 0
}
module C extends B {
  var c: any = 0
}";
    let text = convert(&[source], "C");
    assert!(text.contains("vars == <<a, b, c>>\n"));
}

#[test]
fn inherited_enumeration_expands_in_child_body() {
    let source = r"
module Base {
  enum Status { Idle, Busy }
  var st: {\ Status \} = {\ Status.Idle \}
}
module Child extends Base {
  operation Start {\ st' = Status.Busy \}
}";
    let text = convert(&[source], "Child");
    assert!(text.contains("st' = \"Status_Busy\""));
    assert!(text.contains("/\\ st = \"Status_Idle\""));
    assert!(!text.contains("Status.Busy"));
}

#[test]
fn emission_is_idempotent_for_fixed_timestamp() {
    let source = r"
module M {
  var x: {\ Nat \} = 0
  operation Inc {\ x' = x + 1 \}
}";
    let first = convert(&[source], "M");
    let second = convert(&[source], "M");
    assert_eq!(first, second);
}

#[test]
fn leading_comments_survive_to_output() {
    let source = "
module M {
  // number of retries so far
  var retries: {\\ Nat \\} = 0
}";
    let text = convert(&[source], "M");
    assert!(text.contains("\\* number of retries so far\nVARIABLE retries\n"));
}
