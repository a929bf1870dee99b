//! Full-pipeline tests: parse, flatten, serialize to YAML.

use cdump::doc::{flatten, DocNode, Scalar};
use cdump::parser::parse;
use pretty_assertions::assert_eq;

fn dump(source: &str) -> String {
    let unit = parse(source).expect("parse failed");
    serde_yaml::to_string(&flatten(&unit)).expect("serialization failed")
}

#[test]
fn dumps_a_simple_variable() {
    let yaml = dump("int a;");
    assert_eq!(
        yaml,
        "\
kind: translation_unit
decls:
- kind: var_decl
  name: a
  type:
    kind: named_type
    name: int
  init: null
"
    );
}

#[test]
fn dumps_a_typedef_and_its_use() {
    let yaml = dump("typedef int my_int; my_int x;");
    assert_eq!(
        yaml,
        "\
kind: translation_unit
decls:
- kind: typedef_decl
  name: my_int
  type:
    kind: named_type
    name: int
- kind: var_decl
  name: x
  type:
    kind: named_type
    name: my_int
  init: null
"
    );
}

#[test]
fn dumps_a_function_with_control_flow() {
    let yaml = dump("int f(int x) { if (x) return 1; return 0; }");
    // kind is always the first key of a node
    assert!(yaml.starts_with("kind: translation_unit\n"));
    assert!(yaml.contains("- kind: function_decl\n  name: f\n"));
    assert!(yaml.contains("kind: if_stmt\n"));
    assert!(yaml.contains("kind: return_stmt\n"));
    // the prototype-level param keeps its name
    assert!(yaml.contains("- kind: param\n"));
    assert!(yaml.contains("variadic: false\n"));
}

#[test]
fn mapping_keys_are_never_sorted() {
    // "name" sorts before "type" and "kind" sorts after "init"; field
    // order must come from the model, not from the serializer.
    let yaml = dump("int a;");
    let kind_at = yaml.find("kind: var_decl").unwrap();
    let name_at = yaml.find("name: a").unwrap();
    let type_at = yaml.find("type:").unwrap();
    let init_at = yaml.find("init:").unwrap();
    assert!(kind_at < name_at && name_at < type_at && type_at < init_at);
}

#[test]
fn dump_is_referentially_transparent() {
    let source = "\
enum color { RED, GREEN = 5 };
struct pixel { enum color c; unsigned char alpha; };
struct pixel *buffer;
int blend(struct pixel *dst, struct pixel *src, int n);
";
    let unit = parse(source).expect("parse failed");
    let before = unit.clone();
    let first = flatten(&unit);
    let second = flatten(&unit);
    // flattening does not mutate the AST and is deterministic
    assert_eq!(unit, before);
    assert_eq!(first, second);
    assert_eq!(dump(source), dump(source));
}

#[test]
fn char_and_string_literals_round_trip_decoded() {
    let yaml = dump("char c = 'x'; char nl = '\\n';");
    assert!(yaml.contains("kind: char_literal\n"));
    assert!(yaml.contains("value: x\n"));
    // the decoded newline survives a YAML round trip, whatever scalar
    // style the writer picks for it
    let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).expect("reparse failed");
    assert_eq!(doc["decls"][1]["init"]["value"].as_str(), Some("\n"));
}

#[test]
fn anonymous_members_have_null_names() {
    let unit = parse("struct s { union { int i; char c; }; };").expect("parse failed");
    let doc = flatten(&unit);
    let DocNode::Mapping(entries) = &doc else {
        panic!("expected a mapping");
    };
    let DocNode::Sequence(decls) = &entries[1].1 else {
        panic!("expected decls sequence");
    };
    let DocNode::Mapping(decl) = &decls[0] else {
        panic!("expected struct mapping");
    };
    let DocNode::Sequence(members) = &decl[2].1 else {
        panic!("expected members sequence");
    };
    let DocNode::Mapping(member) = &members[0] else {
        panic!("expected member mapping");
    };
    assert_eq!(member[1], ("name".to_string(), DocNode::Scalar(Scalar::Null)));
}
