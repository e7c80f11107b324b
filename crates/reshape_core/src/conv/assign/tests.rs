use std::sync::Arc;

use crate::conv::capability::{Capabilities, DecodeBinary, DecodeText, Validate};
use crate::conv::{
	AssignError, AssignOptions, Assigner, BoxError, ExactMatcher, Kind, StructType, StructValue, Type, Value, assign, assign_with, is_nil,
};

fn structural_only() -> Assigner<'static> {
	Assigner::new().with_options(AssignOptions {
		fallback_copy: false,
		..AssignOptions::default()
	})
}

fn json_source(json: serde_json::Value) -> Value {
	Value::from_json(&json)
}

fn inner_error(err: AssignError) -> AssignError {
	match err {
		AssignError::Assign { source, .. } => *source,
		other => panic!("expected top-level assign error, got {other:?}"),
	}
}

fn full_name() -> Arc<StructType> {
	StructType::builder("FullName").field("First", Type::String).field("Last", Type::String).build()
}

#[test]
fn nil_arguments_fail_without_panicking() {
	let mut dst = Value::I64(0);
	assert!(matches!(assign(&mut dst, &Value::Null), Err(AssignError::NilValue)));
	assert!(matches!(assign(&mut Value::Null, &Value::I64(1)), Err(AssignError::NilValue)));
}

#[test]
fn same_shape_assignment_is_identity() {
	let name = full_name();
	let person = StructType::builder("Person")
		.field("Name", Type::Struct(name.clone()))
		.field("Tags", Type::seq(Type::String))
		.field("Counts", Type::map(Type::String, Type::I64))
		.build();
	let src: Value = StructValue::new(person.clone())
		.with("Name", StructValue::new(name).with("First", "Ada").expect("field exists"))
		.and_then(|item| item.with("Tags", Value::seq(Type::String, [Value::from("x")])))
		.and_then(|item| item.with("Counts", Value::map(Type::String, Type::I64, [(Value::from("k"), Value::I64(2))])))
		.expect("fields exist")
		.into();

	let base = StructType::builder("Base").field("ID", Type::I64).field("Name", Type::String).build();
	let outer = StructType::builder("Outer").inline("Base", Type::Struct(base.clone())).field("Name", Type::String).build();
	let embedded: Value = StructValue::new(outer.clone())
		.with("Base", StructValue::new(base).with("ID", 7_i64).and_then(|item| item.with("Name", "base")).expect("fields exist"))
		.and_then(|item| item.with("Name", "outer"))
		.expect("fields exist")
		.into();

	for assigner in [Assigner::new(), structural_only()] {
		for (ty, src) in [(&person, &src), (&outer, &embedded)] {
			let mut dst = Type::Struct(ty.clone()).zero();
			let report = assigner.assign(&mut dst, src).expect("assigns");
			assert!(report.is_clean());
			assert_eq!(&dst, src);
		}
	}
}

#[test]
fn nested_maps_populate_nested_structs() {
	let name = full_name();
	let person = StructType::builder("Person")
		.field("Name", Type::ptr(Type::Struct(name)))
		.field("Address", Type::String)
		.build();
	let src = json_source(serde_json::json!({"Name": {"First": "Tom", "Last": "Jim"}, "Address": "Toronto"}));

	let mut dst = Type::Struct(person).zero();
	assign(&mut dst, &src).expect("assigns");

	let name = dst.get("Name").expect("name field");
	assert_eq!(name.get("First").and_then(Value::as_str), Some("Tom"));
	assert_eq!(name.get("Last").and_then(Value::as_str), Some("Jim"));
	assert_eq!(dst.get("Address").and_then(Value::as_str), Some("Toronto"));
}

#[test]
fn snake_case_keys_match_acronym_fields() {
	let ty = StructType::builder("Conn").field("DBUser", Type::String).field("dbUser", Type::String).field("Other", Type::String).build();
	let src = json_source(serde_json::json!({"db_user": "admin", "unrelated": "x"}));

	let mut dst = Type::Struct(ty).zero();
	structural_only().assign(&mut dst, &src).expect("assigns");
	assert_eq!(dst.get("DBUser").and_then(Value::as_str), Some("admin"));
	assert_eq!(dst.get("dbUser").and_then(Value::as_str), Some("admin"));
	assert_eq!(dst.get("Other").and_then(Value::as_str), Some(""));
}

#[test]
fn custom_matcher_replaces_default() {
	let ty = StructType::builder("T").field("Name", Type::String).build();
	let src = json_source(serde_json::json!({"name": "lower", "Name": "exact"}));

	let mut dst = Type::Struct(ty.clone()).zero();
	structural_only().with_matcher(&ExactMatcher).assign(&mut dst, &src).expect("assigns");
	assert_eq!(dst.get("Name").and_then(Value::as_str), Some("exact"));

	let mut dst = Type::Struct(ty).zero();
	let only_lower = json_source(serde_json::json!({"name": "lower"}));
	let never = |_: &str, _: &str| false;
	assign_with(&mut dst, &only_lower, &never).expect("assigns");
	// The round-trip copy ignores the matcher and still fills the field.
	assert_eq!(dst.get("Name").and_then(Value::as_str), Some("lower"));
}

#[test]
fn failed_fields_are_reported_and_skipped() {
	let ty = StructType::builder("Stats").field("Count", Type::U8).field("Label", Type::String).field("Ratio", Type::F64).build();
	let src = json_source(serde_json::json!({"Count": "lots", "Label": "ok", "Ratio": "0.5"}));

	let mut dst = Type::Struct(ty).zero();
	let report = structural_only().assign(&mut dst, &src).expect("partial failure still succeeds");

	assert_eq!(dst.get("Label").and_then(Value::as_str), Some("ok"));
	assert_eq!(dst.get("Ratio"), Some(&Value::F64(0.5)));
	assert_eq!(dst.get("Count"), Some(&Value::U8(0)));
	assert_eq!(report.issues.len(), 1);
	let issue = report.issue_at("Count").expect("count issue");
	assert!(issue.message.contains("lots"), "{}", issue.message);
}

#[test]
fn failed_map_entries_are_skipped() {
	let mut dst = Value::map(Type::String, Type::I64, []);
	let src = json_source(serde_json::json!({"x": "1", "y": "two"}));
	let report = structural_only().assign(&mut dst, &src).expect("assigns");

	let Value::Map(map) = &dst else {
		panic!("expected map");
	};
	assert_eq!(map.get_str("x"), Some(&Value::I64(1)));
	assert!(map.get_str("y").is_none());
	assert!(report.issue_at("y").is_some());
}

#[test]
fn nil_pointer_source_never_overwrites() {
	let src_ty = StructType::builder("Patch").field("Name", Type::ptr(Type::String)).build();
	let dst_ty = StructType::builder("Record").field("Name", Type::String).build();
	let src = Type::Struct(src_ty).zero();
	let mut dst: Value = StructValue::new(dst_ty).with("Name", "keep").expect("field exists").into();

	assign(&mut dst, &src).expect("assigns");
	assert_eq!(dst.get("Name").and_then(Value::as_str), Some("keep"));

	let nil_record = Type::ptr(dst.as_struct().map(|item| Type::Struct(item.ty.clone())).expect("struct")).zero();
	assign(&mut dst, &nil_record).expect("nil pointer source is a no-op");
	assert_eq!(dst.get("Name").and_then(Value::as_str), Some("keep"));
}

#[test]
fn nil_source_keeps_populated_pointer() {
	let record = StructType::builder("Profile").field("Nick", Type::ptr(Type::String)).build();
	let kept = || -> Value { StructValue::new(record.clone()).with("Nick", Value::ptr_to("keep")).expect("field exists").into() };

	let nil_struct = Type::Struct(StructType::builder("Update").field("Nick", Type::ptr(Type::String)).build()).zero();
	let null_entry = json_source(serde_json::json!({"Nick": null}));
	for src in [nil_struct, null_entry] {
		let mut dst = kept();
		Assigner::new().assign(&mut dst, &src).expect("assigns");
		assert_eq!(dst, kept(), "{src:?}");
	}
}

#[test]
fn nil_interface_source_is_nil_value() {
	let mut dst = Value::I64(3);
	assert!(matches!(assign(&mut dst, &Value::Interface(None)), Err(AssignError::NilValue)));
	assert!(matches!(assign(&mut dst, &Value::any(Value::Interface(None))), Err(AssignError::NilValue)));
	assert_eq!(dst, Value::I64(3));

	// Nil items inside a sequence leave zero-valued structs.
	let point = StructType::builder("Point").field("X", Type::I64).build();
	let mut points = Value::seq(Type::Struct(point.clone()), []);
	structural_only().assign(&mut points, &json_source(serde_json::json!([null, {"x": 2}]))).expect("assigns");
	let Value::Seq(seq) = &points else {
		panic!("expected sequence");
	};
	assert_eq!(seq.items[0], Type::Struct(point).zero());
	assert_eq!(seq.items[1].get("X"), Some(&Value::I64(2)));
}

#[test]
fn scalar_width_failures_abort_top_level() {
	let mut dst = Value::I8(0);
	let err = inner_error(assign(&mut dst, &Value::I64(300)).expect_err("out of range"));
	assert!(matches!(err, AssignError::Coerce { kind: Kind::Int, .. }));

	let mut flag = Type::ptr(Type::Bool).zero();
	assign(&mut flag, &Value::from("YES")).expect("bool text");
	assert_eq!(*crate::conv::deref_for_reading(&flag), Value::Bool(true));
}

#[test]
fn sequence_element_failure_reports_index() {
	let mut dst = Value::seq(Type::U8, []);
	let src = Value::seq(Type::I64, [Value::I64(1), Value::I64(-1)]);
	let err = inner_error(structural_only().assign(&mut dst, &src).expect_err("negative"));
	assert!(matches!(err, AssignError::Index { index: 1, .. }));

	let err = inner_error(structural_only().assign(&mut dst, &Value::I64(1)).expect_err("not a sequence"));
	assert!(matches!(err, AssignError::ShapeMismatch { expected: "sequence", found: Kind::Int }));
}

#[test]
fn bytes_destination_accepts_bytes_and_numeric_sequences() {
	let mut dst = Value::Bytes(Vec::new());
	structural_only().assign(&mut dst, &Value::seq(Type::I64, [Value::I64(104), Value::I64(105)])).expect("assigns");
	assert_eq!(dst, Value::Bytes(b"hi".to_vec()));

	let err = inner_error(structural_only().assign(&mut dst, &Value::from("text")).expect_err("string"));
	assert!(matches!(err, AssignError::ShapeMismatch { expected: "bytes", .. }));
}

#[test]
fn map_key_mismatch_uses_round_trip() {
	let mut dst = Value::map(Type::I64, Type::String, []);
	let src = Value::map(Type::String, Type::String, [(Value::from("1"), Value::from("a"))]);
	structural_only().assign(&mut dst, &src).expect("keys parse");
	let Value::Map(map) = &dst else {
		panic!("expected map");
	};
	assert_eq!(map.get(&Value::I64(1)), Some(&Value::from("a")));

	let bad = Value::map(Type::String, Type::String, [(Value::from("x"), Value::from("a"))]);
	let err = structural_only().assign(&mut dst, &bad).expect_err("key cannot parse");
	assert!(matches!(err.root_cause(), AssignError::KeyTypeMismatch { .. }));
}

#[test]
fn struct_requires_string_keys() {
	let ty = StructType::builder("T").field("A", Type::I64).build();
	let src = Value::map(Type::I64, Type::I64, [(Value::I64(1), Value::I64(2))]);
	let mut dst = Type::Struct(ty).zero();
	let err = inner_error(structural_only().assign(&mut dst, &src).expect_err("integer keys"));
	assert!(matches!(err, AssignError::NonStringKeys { .. }));
}

struct Hex;

impl DecodeText for Hex {
	fn decode_text(&self, text: &str, into: &mut StructValue) -> Result<(), BoxError> {
		let value = i64::from_str_radix(text.trim_start_matches('#'), 16)?;
		into.set("Value", value)?;
		Ok(())
	}
}

impl DecodeBinary for Hex {
	fn decode_binary(&self, bytes: &[u8], into: &mut StructValue) -> Result<(), BoxError> {
		into.set("Value", i64::try_from(bytes.len())?)?;
		Ok(())
	}
}

impl Capabilities for Hex {
	fn text_decoder(&self) -> Option<&dyn DecodeText> {
		Some(self)
	}

	fn binary_decoder(&self) -> Option<&dyn DecodeBinary> {
		Some(self)
	}
}

#[test]
fn text_and_binary_capabilities_populate_structs() {
	let color = StructType::builder("Color").field("Value", Type::I64).capabilities(Arc::new(Hex)).build();

	let mut dst = Type::Struct(color.clone()).zero();
	assign(&mut dst, &Value::from("#ff")).expect("decodes text");
	assert_eq!(dst.get("Value"), Some(&Value::I64(255)));

	let mut dst = Type::Struct(color).zero();
	assign(&mut dst, &Value::Bytes(vec![1, 2, 3])).expect("decodes binary");
	assert_eq!(dst.get("Value"), Some(&Value::I64(3)));

	let plain = StructType::builder("Plain").build();
	let mut dst = Type::Struct(plain).zero();
	let err = inner_error(assign(&mut dst, &Value::from("x")).expect_err("no decoder"));
	assert!(matches!(err, AssignError::ShapeMismatch { found: Kind::String, .. }));
}

#[test]
fn interface_destination_keeps_held_type() {
	let mut dst = Value::any(0_i32);
	assign(&mut dst, &Value::from("5")).expect("assigns");
	assert_eq!(dst, Value::any(5_i32));

	let mut empty = Value::Interface(None);
	let err = inner_error(structural_only().assign(&mut empty, &Value::I64(1)).expect_err("nil interface"));
	assert!(matches!(err, AssignError::UnsupportedKind { kind: Kind::Interface }));
}

#[test]
fn embedded_source_fills_only_empty_fields() {
	let base = StructType::builder("Base").field("ID", Type::I64).field("Name", Type::String).build();
	let outer = StructType::builder("Outer").inline("Base", Type::Struct(base.clone())).field("Name", Type::String).build();
	let flat = StructType::builder("Flat").field("ID", Type::I64).field("Name", Type::String).build();

	let base_value = StructValue::new(base).with("ID", 7_i64).and_then(|item| item.with("Name", "base")).expect("fields exist");
	let src: Value = StructValue::new(outer)
		.with("Base", base_value)
		.and_then(|item| item.with("Name", "outer"))
		.expect("fields exist")
		.into();

	let mut dst = Type::Struct(flat).zero();
	let report = structural_only().assign(&mut dst, &src).expect("assigns");
	assert!(report.is_clean());
	assert_eq!(dst.get("ID"), Some(&Value::I64(7)));
	assert_eq!(dst.get("Name").and_then(Value::as_str), Some("outer"));
}

#[test]
fn inline_destination_reads_whole_source() {
	let audit = StructType::builder("Audit").field("CreatedBy", Type::String).build();
	let doc = StructType::builder("Doc").field("Title", Type::String).inline("Audit", Type::ptr(Type::Struct(audit))).build();
	let src = json_source(serde_json::json!({"title": "t", "created_by": "ops"}));

	let mut dst = Type::Struct(doc).zero();
	structural_only().assign(&mut dst, &src).expect("assigns");
	assert_eq!(dst.get("Audit").and_then(|audit| audit.get("CreatedBy")).and_then(Value::as_str), Some("ops"));
}

#[test]
fn private_fields_are_untouched() {
	let ty = StructType::builder("Secretive").field("Public", Type::String).private("secret", Type::String).build();
	let src = json_source(serde_json::json!({"public": "p", "secret": "s"}));
	let mut dst = Type::Struct(ty).zero();
	assign(&mut dst, &src).expect("assigns");
	assert_eq!(dst.get("Public").and_then(Value::as_str), Some("p"));
	assert_eq!(dst.get("secret").and_then(Value::as_str), Some(""));
}

#[test]
fn depth_limit_aborts() {
	let ty = Type::seq(Type::seq(Type::seq(Type::I64)));
	let src = Value::seq(Type::Any, [Value::seq(Type::Any, [Value::seq(Type::I64, [Value::I64(1)])])]);
	let shallow = Assigner::new().with_options(AssignOptions {
		fallback_copy: false,
		max_depth: 2,
	});

	let mut dst = ty.zero();
	let err = shallow.assign(&mut dst, &src).expect_err("too deep");
	assert!(matches!(err.root_cause(), AssignError::DepthExceeded { max_depth: 2 }));

	let mut dst = ty.zero();
	structural_only().assign(&mut dst, &src).expect("default depth suffices");
}

#[test]
fn depth_limit_is_not_recovered_per_field() {
	let leaf = StructType::builder("Leaf").field("V", Type::I64).build();
	let root = StructType::builder("Root").field("Leaf", Type::Struct(leaf)).build();
	let src = json_source(serde_json::json!({"leaf": {"v": 1}}));
	let shallow = Assigner::new().with_options(AssignOptions {
		fallback_copy: false,
		max_depth: 2,
	});

	let mut dst = Type::Struct(root).zero();
	let err = shallow.assign(&mut dst, &src).expect_err("too deep");
	assert!(matches!(err.root_cause(), AssignError::DepthExceeded { .. }));
}

struct Positive;

impl Validate for Positive {
	fn validate(&self, value: &StructValue) -> Result<(), BoxError> {
		match value.field("N") {
			Some(Value::I64(n)) if *n > 0 => Ok(()),
			_ => Err("N must be positive".into()),
		}
	}
}

impl Capabilities for Positive {
	fn validator(&self) -> Option<&dyn Validate> {
		Some(self)
	}
}

#[test]
fn validation_runs_after_assignment() {
	let ty = StructType::builder("Checked").field("N", Type::I64).capabilities(Arc::new(Positive)).build();

	let mut dst = Type::Struct(ty.clone()).zero();
	assign(&mut dst, &json_source(serde_json::json!({"n": 3}))).expect("valid");

	let mut dst = Type::Struct(ty).zero();
	let err = assign(&mut dst, &json_source(serde_json::json!({"n": -3}))).expect_err("invalid");
	let AssignError::Invalid { source, ref to, .. } = err else {
		panic!("expected validation failure, got {err:?}");
	};
	assert_eq!(to.as_str(), "Checked");
	assert!(matches!(*source, AssignError::Validation { ref path, .. } if path == "$"));
	assert!(!is_nil(&dst));
}
