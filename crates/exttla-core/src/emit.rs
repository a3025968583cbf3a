//! TLA+ code emission for resolved modules.
//!
//! Rendering is deterministic for a fixed timestamp: section order is
//! fixed, every list is emitted in declaration order, and the final
//! enumeration expansion runs over the fully rendered text so that
//! member references inside operation bodies and assumptions are
//! rewritten too.

use crate::frame::FrameAnalysis;
use crate::model::{Module, Operation};
use std::fmt::Write;

/// Total width of the header/footer banners.
const BANNER_WIDTH: usize = 77;

/// Render a resolved module with the current local time in the footer.
pub fn emit(module: &Module) -> String {
    let timestamp = chrono::Local::now()
        .format("%a %b %d %H:%M:%S %Z %Y")
        .to_string();
    emit_at(module, &timestamp)
}

/// Render a resolved module with an explicit footer timestamp.
pub fn emit_at(module: &Module, timestamp: &str) -> String {
    let mut out = String::new();

    write_header(&mut out, module);

    // EXTENDS line for imported standard modules
    if !module.imports.is_empty() {
        for import in &module.imports {
            out.push_str(&import.comment);
        }
        let names: Vec<&str> = module.imports.iter().map(|i| i.name.as_str()).collect();
        let _ = writeln!(out, "EXTENDS {}", names.join(", "));
    }

    // Enumeration definitions
    for e in &module.enumerations {
        out.push_str(&e.comment);
        let members: Vec<String> = e.members.iter().map(|m| e.member_literal(m)).collect();
        let _ = writeln!(out, "{} == {{\n  {}\n}}", e.name, members.join(",\n  "));
    }

    // Declared constants first, then defined constants
    for c in module.constants.iter().filter(|c| c.value.is_none()) {
        out.push_str(&c.comment);
        let _ = writeln!(out, "CONSTANT {}", c.name);
    }
    for c in &module.constants {
        if let Some(value) = &c.value {
            out.push_str(&c.comment);
            let _ = writeln!(out, "{} == {}", c.name, value.trim());
        }
    }

    // Assumption block
    if !module.assumptions.is_empty() {
        out.push_str("\n\\* Begin assumption definitions\n");
        for a in &module.assumptions {
            out.push_str(&a.comment);
            let _ = writeln!(out, "ASSUME{}", a.expr);
        }
        out.push_str("\n\\* End of assumption definitions\n");
    }

    // Variable declarations and the vars tuple
    for v in &module.variables {
        out.push_str(&v.comment);
        let _ = writeln!(out, "VARIABLE {}", v.name);
    }
    let _ = writeln!(out, "\nvars == <<{}>>", module.variable_names().join(", "));

    out.push('\n');
    write_type_invariant(&mut out, module);
    out.push_str("----\n");

    // Operation definitions with synthesized frame conditions
    let mut frames = FrameAnalysis::new(module);
    for op in &module.operations {
        write_operation(&mut out, op);
        if op.is_public() && !module.is_shadowed(&op.name) {
            let unchanged = frames.unchanged(&op.name);
            let _ = writeln!(out, "  /\\ UNCHANGED <<{}>>", unchanged.join(", "));
        }
    }
    out.push_str("\n----\n\n");

    write_init(&mut out, module);
    write_next(&mut out, module);
    out.push_str("\n----\n");

    // Invariant theorems
    for inv in &module.invariants {
        out.push_str(&inv.comment);
        let _ = writeln!(out, "{}Inv =={}", inv.name, inv.expr);
    }
    out.push('\n');

    // Instantiations
    for inst in &module.instances {
        out.push_str(&inst.comment);
        match &inst.mapping {
            None => {
                let _ = writeln!(out, "{} == INSTANCE {}", inst.name, inst.name);
            }
            Some(mapping) => {
                let _ = writeln!(out, "{} == INSTANCE {} WITH {}", inst.name, inst.name, mapping);
            }
        }
    }

    write_footer(&mut out, timestamp);

    expand_enumerations(out, module)
}

/// Dashed banner of fixed total width centered on ` MODULE <name> `.
fn write_header(out: &mut String, module: &Module) {
    let title = format!(" MODULE {} ", module.name);
    let left = BANNER_WIDTH.saturating_sub(title.len()) / 2;
    let right = BANNER_WIDTH.saturating_sub(left + title.len());
    out.push_str(&"-".repeat(left));
    out.push_str(&title);
    out.push_str(&"-".repeat(right));
    out.push_str(&module.comment);
}

fn write_footer(out: &mut String, timestamp: &str) {
    out.push_str(&"=".repeat(BANNER_WIDTH));
    out.push('\n');
    out.push_str("\\* Modification History\n");
    let _ = writeln!(out, "\\* Generated {} by ExtTLA Converter", timestamp);
}

/// `TypeInv` with one conjunct per typed variable; variables with the
/// `any` sentinel are skipped.
fn write_type_invariant(out: &mut String, module: &Module) {
    out.push_str("TypeInv ==\n");
    for v in module.variables.iter().filter(|v| v.has_type_invariant()) {
        let _ = writeln!(out, "  /\\ {} \\in{}", v.name, v.ty);
    }
    out.push('\n');
}

fn write_operation(out: &mut String, op: &Operation) {
    out.push_str(&op.comment);
    if op.args.is_empty() {
        let _ = writeln!(out, "{} =={}", op.name, op.body);
    } else {
        let names: Vec<&str> = op.args.iter().map(|a| a.name.as_str()).collect();
        let _ = writeln!(out, "{}({}) =={}", op.name, names.join(", "), op.body);
    }
}

fn write_init(out: &mut String, module: &Module) {
    out.push_str("Init ==\n");
    for v in &module.variables {
        let _ = writeln!(out, "  /\\ {} = {}", v.name, v.init);
    }
    out.push('\n');
}

/// `Next` disjoins every public, non-shadowed operation, existentially
/// quantifying each argument over its declared type set.
fn write_next(out: &mut String, module: &Module) {
    out.push_str("Next ==\n");
    for op in module
        .operations
        .iter()
        .filter(|op| op.is_public() && !module.is_shadowed(&op.name))
    {
        out.push_str("  \\/ ");
        for arg in &op.args {
            let _ = write!(out, "\\E {} \\in {}: ", arg.name, arg.ty);
        }
        out.push_str(&op.name);
        if !op.args.is_empty() {
            let names: Vec<&str> = op.args.iter().map(|a| a.name.as_str()).collect();
            let _ = write!(out, "({})", names.join(", "));
        }
        out.push('\n');
    }
    out.push_str("\nSpec == Init /\\ [][Next]_vars\n");
}

/// Replace every `Enum.member` reference in the rendered text with its
/// unique string literal. Runs last, over the whole output, so
/// references inside bodies and assumptions are rewritten too.
fn expand_enumerations(text: String, module: &Module) -> String {
    let mut out = text;
    for e in &module.enumerations {
        for member in &e.members {
            let reference = format!("{}.{}", e.name, member);
            out = out.replace(&reference, &e.member_literal(member));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ModuleBuilder;
    use std::sync::Arc;

    const TS: &str = "Tue Jan 06 10:00:00 UTC 2026";

    fn resolve(source: &str, name: &str) -> Arc<Module> {
        let mut builder = ModuleBuilder::new();
        builder.handle_all(exttla_syntax::parse(source).unwrap()).unwrap();
        builder.finish().unwrap().resolve(name).unwrap()
    }

    #[test]
    fn test_header_banner_width() {
        let module = resolve("module Counter {}", "Counter");
        let text = emit_at(&module, TS);
        let header = text.lines().next().unwrap();
        assert_eq!(header.len(), 77);
        assert!(header.contains(" MODULE Counter "));
        assert!(header.starts_with('-'));
        assert!(header.ends_with('-'));
    }

    #[test]
    fn test_footer_banner_and_history() {
        let module = resolve("module M {}", "M");
        let text = emit_at(&module, TS);
        assert!(text.contains(&"=".repeat(77)));
        assert!(text.ends_with(&format!(
            "\\* Modification History\n\\* Generated {} by ExtTLA Converter\n",
            TS
        )));
    }

    #[test]
    fn test_extends_line() {
        let module = resolve("module M { import Naturals, Sequences }", "M");
        let text = emit_at(&module, TS);
        assert!(text.contains("EXTENDS Naturals, Sequences\n"));
    }

    #[test]
    fn test_constant_two_pass_order() {
        let module = resolve(
            r"module M {
                const Defined = 5
                const Opaque
            }",
            "M",
        );
        let text = emit_at(&module, TS);
        let declared = text.find("CONSTANT Opaque").unwrap();
        let defined = text.find("Defined == 5").unwrap();
        assert!(declared < defined, "declared constants come first");
    }

    #[test]
    fn test_assumption_block_sentinels() {
        let module = resolve(r"module M { assume {\ N > 0 \} }", "M");
        let text = emit_at(&module, TS);
        assert!(text.contains("\\* Begin assumption definitions"));
        assert!(text.contains("ASSUME N > 0"));
        assert!(text.contains("\\* End of assumption definitions"));
    }

    #[test]
    fn test_no_assumption_block_when_empty() {
        let module = resolve("module M {}", "M");
        let text = emit_at(&module, TS);
        assert!(!text.contains("assumption definitions"));
    }

    #[test]
    fn test_type_invariant_skips_any() {
        let module = resolve(
            r"module M {
                var x: {\ Nat \} = 0
                var buf: any = {\ <<>> \}
            }",
            "M",
        );
        let text = emit_at(&module, TS);
        assert!(text.contains("TypeInv ==\n  /\\ x \\in Nat\n\n"));
        assert!(!text.contains("buf \\in"));
    }

    #[test]
    fn test_private_operation_gets_no_unchanged() {
        let module = resolve(
            r"module M {
                var x: any = 0
                operation step {\ x' = 1 \}
            }",
            "M",
        );
        let text = emit_at(&module, TS);
        assert!(text.contains("step == x' = 1\n"));
        assert!(!text.contains("UNCHANGED"));
    }

    #[test]
    fn test_shadowed_operation_excluded_from_next() {
        let module = resolve(
            r"module M {
                var x: any = 0
                operation Tick {\ x' = 1 \}
                operation Internal {\ x' = 2 \}
                shadow Internal
            }",
            "M",
        );
        let text = emit_at(&module, TS);
        // Definition still present, disjunct absent.
        assert!(text.contains("Internal == x' = 2"));
        assert!(text.contains("  \\/ Tick\n"));
        assert!(!text.contains("\\/ Internal"));
    }

    #[test]
    fn test_next_quantifies_arguments() {
        let module = resolve(
            r"module M {
                var x: any = 0
                operation Send(m: {\ Messages \}, n: Nat) {\ x' = n \}
            }",
            "M",
        );
        let text = emit_at(&module, TS);
        assert!(text.contains("  \\/ \\E m \\in Messages: \\E n \\in Nat: Send(m, n)\n"));
        assert!(text.contains("Send(m, n) == x' = n\n"));
    }

    #[test]
    fn test_enumeration_definition_and_expansion() {
        let module = resolve(
            r"module M {
                enum Color { Red, Blue }
                var c: {\ Color \} = {\ Color.Red \}
                operation Flip {\ c' = Color.Blue \}
            }",
            "M",
        );
        let text = emit_at(&module, TS);
        assert!(text.contains("Color == {\n  \"Color_Red\",\n  \"Color_Blue\"\n}"));
        // Expanded everywhere, including Init and operation bodies.
        assert!(text.contains("c = \"Color_Red\""));
        assert!(text.contains("c' = \"Color_Blue\""));
        assert!(!text.contains("Color.Red"));
        assert!(!text.contains("Color.Blue"));
    }

    #[test]
    fn test_enumeration_expansion_injective() {
        let module = resolve(
            r"module M {
                enum Color { Red }
                enum Mood { Red }
                operation Paint {\ x' = Color.Red /\ y' = Mood.Red \}
                var x: any = 0
                var y: any = 0
            }",
            "M",
        );
        let text = emit_at(&module, TS);
        assert!(text.contains("x' = \"Color_Red\""));
        assert!(text.contains("y' = \"Mood_Red\""));
    }

    #[test]
    fn test_invariant_and_instance_sections() {
        let module = resolve(
            r"module M {
                instance Clock with {\ t <- now \}
                invariant Safety {\ x >= 0 \}
                var x: any = 0
            }",
            "M",
        );
        let text = emit_at(&module, TS);
        assert!(text.contains("SafetyInv == x >= 0\n"));
        assert!(text.contains("Clock == INSTANCE Clock WITH t <- now\n"));
    }

    #[test]
    fn test_emission_deterministic() {
        let module = resolve(
            r"module M {
                var x: {\ Nat \} = 0
                operation Inc {\ x' = x + 1 \}
                enum Color { Red, Blue }
            }",
            "M",
        );
        assert_eq!(emit_at(&module, TS), emit_at(&module, TS));
    }
}
