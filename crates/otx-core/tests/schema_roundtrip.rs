//! Serde roundtrip and JsonSchema validation tests for the serialized core types.

use schemars::schema_for;
use otx_core::display::{AttributeModification, DisplayAttribute, Section, Tree};
use otx_core::enums::*;
use otx_core::fixtures::sample_resource_span;
use otx_core::record::*;
use otx_core::result::{ExecutionResult, TransformationFailure, TransformationWarning};
use otx_core::section::SectionId;
use otx_core::transformation::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn span_section() -> SectionId {
    SectionId::span_attributes(0, 0, 0)
}

const URL_PATH: &str = "resourceSpans[0].scopeSpans[0].spans[0].attributes[17]";

roundtrip_and_validate!(
    sample_record_roundtrip,
    ResourceSpan,
    sample_resource_span()
);

roundtrip_and_validate!(
    typed_values_roundtrip,
    KeyValue,
    KeyValue {
        key: "mixed".into(),
        value: AnyValue::KvlistValue(KeyValueList {
            values: vec![
                KeyValue {
                    key: "count".into(),
                    value: AnyValue::IntValue("42".into()),
                },
                KeyValue {
                    key: "ratio".into(),
                    value: AnyValue::DoubleValue(0.5),
                },
                KeyValue {
                    key: "tags".into(),
                    value: AnyValue::ArrayValue(ArrayValue {
                        values: vec![AnyValue::StringValue("a".into()), AnyValue::BoolValue(false)],
                    }),
                },
            ],
        }),
    }
);

roundtrip_and_validate!(
    add_substring_roundtrip,
    Transformation,
    Transformation::with_id(
        "tfm-a3f8b2c1",
        span_section(),
        TransformationParams::AddSubstring(
            AddSubstringParams::new(URL_PATH, "url.full", "host", 7, RangeEnd::End, span_section())
                .unwrap(),
        ),
    )
);

roundtrip_and_validate!(
    mask_roundtrip,
    Transformation,
    Transformation::with_id(
        "tfm-0000beef",
        SectionId::resource(0),
        TransformationParams::Mask(
            MaskParams::new(
                "resourceSpans[0].resource.attributes[6]",
                "test.auth.token",
                0,
                RangeEnd::At(4),
                '#',
            )
            .unwrap(),
        ),
    )
);

roundtrip_and_validate!(
    raw_statement_roundtrip,
    Transformation,
    {
        let mut t = Transformation::with_id(
            "tfm-00000001",
            SectionId::scope_info(0, 0),
            TransformationParams::RawStatement(
                RawStatementParams::new(
                    r#"set(attributes["env"], "prod")"#,
                    SectionId::scope_info(0, 0),
                )
                .unwrap(),
            ),
        );
        t.status = TransformationStatus::Draft;
        t.order = 3;
        t
    }
);

roundtrip_and_validate!(
    tree_roundtrip,
    Tree,
    Tree {
        sections: vec![Section {
            id: span_section(),
            kind: SectionKind::SpanAttributes,
            label: "Span Attributes".into(),
            expanded: true,
            attributes: vec![DisplayAttribute {
                id: "span-0-0-0-attr-0-component-c1".into(),
                path: "resourceSpans[0].scopeSpans[0].spans[0].attributes[0]".into(),
                section_id: span_section(),
                key: "svc".into(),
                value: "proxy".into(),
                value_type: ValueType::String,
                depth: 0,
                modifications: vec![AttributeModification {
                    transformation_id: "tfm-a3f8b2c1".into(),
                    kind: TransformationKind::RenameKey,
                    label: "RENAME KEY".into(),
                    color: ModificationColor::Blue,
                }],
            }],
            update_count: 1,
        }],
    }
);

roundtrip_and_validate!(
    execution_result_roundtrip,
    ExecutionResult,
    ExecutionResult {
        transformed_record: sample_resource_span(),
        transformed_tree: Tree::default(),
        applied_count: 2,
        execution_time_ms: 0.25,
        failures: vec![TransformationFailure {
            transformation_id: "tfm-a3f8b2c1".into(),
            kind: TransformationKind::Delete,
            message: "section span-info-0-0-0 has no attribute collection".into(),
            attribute_path: Some(URL_PATH.into()),
        }],
        warnings: vec![TransformationWarning {
            transformation_id: "tfm-0000beef".into(),
            message: "target attribute 'service.name' not found".into(),
        }],
    }
);

#[test]
fn malformed_section_id_is_rejected_on_deserialize() {
    let raw = r#"{"statement":"x","insertion_section_id":"span-attributes-0"}"#;
    assert!(serde_json::from_str::<RawStatementParams>(raw).is_err());
}
