//! End-to-end engine scenarios against the bundled sample record.

use otx_core::display::Section;
use otx_core::enums::{FailureIsolation, ModificationColor, TransformationKind, TransformationStatus};
use otx_core::fixtures::sample_resource_span;
use otx_core::order::AttributeOrderTable;
use otx_core::record::{AnyValue, ResourceSpan};
use otx_core::result::ExecutionResult;
use otx_core::section::SectionId;
use otx_core::transformation::*;
use otx_engine::{ExecuteOptions, TransformationEngine};
use pretty_assertions::assert_eq;
use rstest::rstest;

const ZONE_PATH: &str = "resourceSpans[0].scopeSpans[0].spans[0].attributes[18]";
const URL_PATH: &str = "resourceSpans[0].scopeSpans[0].spans[0].attributes[17]";
const TOKEN_PATH: &str = "resourceSpans[0].resource.attributes[6]";
const SERVICE_PATH: &str = "resourceSpans[0].resource.attributes[20]";

fn span() -> SectionId {
    SectionId::span_attributes(0, 0, 0)
}

fn resource() -> SectionId {
    SectionId::resource(0)
}

/// Build a log with dense orders and predictable ids.
fn log(entries: Vec<(SectionId, TransformationParams)>) -> Vec<Transformation> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, (section, params))| {
            let mut t = Transformation::with_id(format!("tfm-{i:08x}"), section, params);
            t.order = i;
            t
        })
        .collect()
}

fn run(log: &[Transformation]) -> ExecutionResult {
    run_with(log, &AttributeOrderTable::new(), &ExecuteOptions::default())
}

fn run_with(
    log: &[Transformation],
    order: &AttributeOrderTable,
    options: &ExecuteOptions,
) -> ExecutionResult {
    TransformationEngine::execute(&sample_resource_span(), log, order, options)
}

fn section<'a>(result: &'a ExecutionResult, id: &SectionId) -> &'a Section {
    result.transformed_tree.section(id).unwrap()
}

fn value<'a>(result: &'a ExecutionResult, id: &SectionId, key: &str) -> &'a str {
    &section(result, id).attribute(key).unwrap().value
}

fn delete(path: &str, key: &str) -> TransformationParams {
    TransformationParams::Delete(DeleteParams::new(path, key).unwrap())
}

fn mask(path: &str, key: &str, start: usize, end: RangeEnd) -> TransformationParams {
    TransformationParams::Mask(MaskParams::new(path, key, start, end, '*').unwrap())
}

fn rename(path: &str, old: &str, new: &str) -> TransformationParams {
    TransformationParams::RenameKey(RenameKeyParams::new(path, old, new).unwrap())
}

fn add(key: &str, value: &str, section: SectionId) -> TransformationParams {
    TransformationParams::AddStatic(AddStaticParams::new(key, value, section).unwrap())
}

fn substring(new_key: &str, start: usize, end: RangeEnd) -> TransformationParams {
    TransformationParams::AddSubstring(
        AddSubstringParams::new(URL_PATH, "url.full", new_key, start, end, span()).unwrap(),
    )
}

// ---------------------------------------------------------------------------
// Purity
// ---------------------------------------------------------------------------

#[test]
fn source_record_is_never_mutated() {
    let record = sample_resource_span();
    let snapshot: ResourceSpan = record.clone();
    let log = log(vec![
        (span(), delete(ZONE_PATH, "zone")),
        (resource(), mask(TOKEN_PATH, "test.auth.token", 0, RangeEnd::End)),
        (resource(), rename(SERVICE_PATH, "service.name", "svc")),
        (span(), add("env", "prod", span())),
    ]);

    let result = TransformationEngine::execute(
        &record,
        &log,
        &AttributeOrderTable::new(),
        &ExecuteOptions::default(),
    );

    assert_eq!(record, snapshot);
    assert_ne!(result.transformed_record, record);
}

#[test]
fn empty_log_reproduces_the_source() {
    let result = run(&[]);
    assert_eq!(result.transformed_record, sample_resource_span());
    assert_eq!(result.applied_count, 0);
    assert!(result.is_success());
    assert!(result.execution_time_ms >= 0.0);
}

// ---------------------------------------------------------------------------
// Delete / rename / mask
// ---------------------------------------------------------------------------

#[test]
fn delete_zone_leaves_nineteen_span_attributes() {
    let result = run(&log(vec![(span(), delete(ZONE_PATH, "zone"))]));

    let attributes = &section(&result, &span()).attributes;
    assert_eq!(attributes.len(), 19);
    assert!(attributes.iter().all(|a| a.key != "zone"));
    assert_eq!(result.applied_count, 1);
    assert!(result.warnings.is_empty());
}

#[test]
fn stale_mask_after_rename_is_a_counted_noop() {
    let log = log(vec![
        (resource(), rename(SERVICE_PATH, "service.name", "svc")),
        (resource(), mask(SERVICE_PATH, "service.name", 0, RangeEnd::At(4))),
    ]);
    let result = run(&log);

    // Count reflects attempts, not successes.
    assert_eq!(result.applied_count, 2);
    assert!(result.failures.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].transformation_id, log[1].id);

    assert_eq!(value(&result, &resource(), "svc"), "frontendproxy");
    let svc = section(&result, &resource()).attribute("svc").unwrap();
    assert_eq!(svc.modifications.len(), 1);
    assert_eq!(svc.modifications[0].label, "RENAME KEY");
    assert_eq!(svc.modifications[0].color, ModificationColor::Blue);
    assert!(section(&result, &resource()).attribute("service.name").is_none());
}

#[test]
fn missing_target_warning_can_be_disabled() {
    let log = log(vec![(span(), delete(ZONE_PATH, "no-such-key"))]);
    let options = ExecuteOptions::default().with_missing_target_warnings(false);
    let result = run_with(&log, &AttributeOrderTable::new(), &options);
    assert_eq!(result.applied_count, 1);
    assert!(result.warnings.is_empty());
    assert_eq!(section(&result, &span()).attributes.len(), 20);
}

#[rstest]
#[case(0, RangeEnd::At(4), "*****Xot", "MASK [0\u{2013}4]")]
#[case(0, RangeEnd::End, "*****", "MASK [Entire str]")]
#[case(3, RangeEnd::End, "hxZ*****", "MASK [3\u{2013}end]")]
fn mask_replaces_range_with_fixed_token(
    #[case] start: usize,
    #[case] end: RangeEnd,
    #[case] expected: &str,
    #[case] label: &str,
) {
    let result = run(&log(vec![(resource(), mask(TOKEN_PATH, "test.auth.token", start, end))]));

    let token = section(&result, &resource()).attribute("test.auth.token").unwrap();
    assert_eq!(token.value, expected);
    assert_eq!(token.modifications[0].label, label);
    assert_eq!(token.modifications[0].kind, TransformationKind::Mask);
}

#[test]
fn mask_then_rename_keeps_both_stamps() {
    let result = run(&log(vec![
        (resource(), mask(TOKEN_PATH, "test.auth.token", 0, RangeEnd::End)),
        (resource(), rename(TOKEN_PATH, "test.auth.token", "token")),
    ]));
    let token = section(&result, &resource()).attribute("token").unwrap();
    let labels: Vec<&str> = token.modifications.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, vec!["MASK [Entire str]", "RENAME KEY"]);
}

// ---------------------------------------------------------------------------
// Additions
// ---------------------------------------------------------------------------

#[test]
fn newest_static_add_is_on_top() {
    let result = run(&log(vec![
        (span(), add("first", "1", span())),
        (span(), add("second", "2", span())),
    ]));
    let keys = section(&result, &span()).keys();
    assert_eq!(&keys[..3], &["second", "first", "component"]);
    let first = section(&result, &span()).attribute("first").unwrap();
    assert!(first.is_added());
    assert_eq!(first.modifications[0].label, "ADD");
}

#[test]
fn substring_is_derived_from_source() {
    let result = run(&log(vec![(span(), substring("host", 7, RangeEnd::End))]));
    assert_eq!(value(&result, &span(), "host"), "10.1.217.83:443/ping");
    assert_eq!(section(&result, &span()).keys()[0], "host");
    assert!(result.warnings.is_empty());
}

#[test]
fn substring_goes_empty_when_source_is_deleted_later() {
    let result = run(&log(vec![
        (span(), substring("host", 7, RangeEnd::End)),
        (span(), delete(URL_PATH, "url.full")),
    ]));
    assert_eq!(value(&result, &span(), "host"), "");
    assert!(result.failures.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].transformation_id, "tfm-00000000");
}

#[test]
fn substring_tracks_a_later_mask_of_its_source() {
    let result = run(&log(vec![
        (span(), substring("scheme", 0, RangeEnd::At(4))),
        (span(), mask(URL_PATH, "url.full", 0, RangeEnd::At(7))),
    ]));
    assert_eq!(value(&result, &span(), "url.full"), "*****10.1.217.83:443/ping");
    assert_eq!(value(&result, &span(), "scheme"), "****");
}

#[test]
fn masking_a_substring_pins_its_value() {
    let result = run(&log(vec![
        (span(), substring("host", 7, RangeEnd::End)),
        (span(), mask("", "host", 0, RangeEnd::At(2))),
        (span(), delete(URL_PATH, "url.full")),
    ]));
    assert_eq!(value(&result, &span(), "host"), "*****.1.217.83:443/ping");
    assert!(result.warnings.is_empty());
}

#[test]
fn substring_follows_a_later_rename_of_its_source() {
    let result = run(&log(vec![
        (span(), substring("host", 7, RangeEnd::End)),
        (span(), rename(URL_PATH, "url.full", "url")),
    ]));
    assert_eq!(value(&result, &span(), "url"), "http://10.1.217.83:443/ping");
    assert_eq!(value(&result, &span(), "host"), "10.1.217.83:443/ping");
    assert!(result.warnings.is_empty());
}

#[test]
fn same_key_add_does_not_take_a_substring_value() {
    let result = run(&log(vec![
        (span(), substring("host", 7, RangeEnd::End)),
        (span(), add("host", "static", span())),
    ]));
    let hosts: Vec<&str> = section(&result, &span())
        .attributes
        .iter()
        .filter(|a| a.key == "host")
        .map(|a| a.value.as_str())
        .collect();
    assert_eq!(hosts, vec!["static", "10.1.217.83:443/ping"]);
}

#[test]
fn raw_statement_is_shown_but_never_applied() {
    let statement = r#"set(attributes["env"], "prod")"#;
    let log = log(vec![(
        span(),
        TransformationParams::RawStatement(RawStatementParams::new(statement, span()).unwrap()),
    )]);
    let result = run(&log);

    assert_eq!(result.transformed_record, sample_resource_span());
    let top = &section(&result, &span()).attributes[0];
    assert_eq!(top.key, "OTTL");
    assert_eq!(top.value, statement);
    assert_eq!(top.path, format!("span-attributes-0-0-0.ottl-{}", log[0].id));
    assert_eq!(top.modifications[0].label, "OTTL");
    assert_eq!(top.modifications[0].color, ModificationColor::Green);
    assert_eq!(result.applied_count, 1);
}

// ---------------------------------------------------------------------------
// Status, counts and ordering
// ---------------------------------------------------------------------------

#[test]
fn draft_and_error_entries_are_skipped_and_uncounted() {
    let mut log = log(vec![
        (span(), delete(ZONE_PATH, "zone")),
        (span(), add("env", "prod", span())),
        (span(), add("tier", "web", span())),
    ]);
    log[0].status = TransformationStatus::Draft;
    log[2].status = TransformationStatus::Error;

    let result = run(&log);
    assert_eq!(result.applied_count, 1);
    assert!(section(&result, &span()).attribute("zone").is_some());
    assert!(section(&result, &span()).attribute("tier").is_none());
    assert_eq!(section(&result, &span()).update_count, 3);
}

#[test]
fn execution_follows_order_field() {
    let mut log = log(vec![
        (resource(), mask(SERVICE_PATH, "svc", 0, RangeEnd::End)),
        (resource(), rename(SERVICE_PATH, "service.name", "svc")),
    ]);
    log[0].order = 1;
    log[1].order = 0;

    let result = run(&log);
    assert_eq!(value(&result, &resource(), "svc"), "*****");
    assert!(result.warnings.is_empty());
}

#[test]
fn stored_order_is_applied_with_new_attributes_on_top() {
    let mut order = AttributeOrderTable::new();
    let mut keys: Vec<String> = sample_resource_span().scope_spans[0].spans[0]
        .attributes
        .iter()
        .map(|kv| kv.key.clone())
        .collect();
    keys.reverse();
    order.set(span(), keys);

    let result = run_with(
        &log(vec![(span(), add("env", "prod", span()))]),
        &order,
        &ExecuteOptions::default(),
    );
    let keys = section(&result, &span()).keys();
    assert_eq!(&keys[..3], &["env", "zone", "user_agent"]);
    assert_eq!(keys.last(), Some(&"component"));
}

#[test]
fn stored_order_follows_renames_through_aliases() {
    let mut order = AttributeOrderTable::new();
    order.set(
        resource(),
        vec!["service.name".to_string(), "test.resource.id".to_string()],
    );
    order.aliases_mut().record(&resource(), "service.name", "svc");

    let result = run_with(
        &log(vec![(resource(), rename(SERVICE_PATH, "service.name", "svc"))]),
        &order,
        &ExecuteOptions::default(),
    );
    let keys = section(&result, &resource()).keys();
    assert_eq!(&keys[keys.len() - 2..], &["svc", "test.resource.id"]);
}

// ---------------------------------------------------------------------------
// Failure isolation
// ---------------------------------------------------------------------------

fn failing_log() -> Vec<Transformation> {
    let info = SectionId::span_info(0, 0, 0);
    log(vec![
        (span(), add("env", "prod", span())),
        (info, delete("resourceSpans[0].scopeSpans[0].spans[0].name", "name")),
        (span(), delete(ZONE_PATH, "zone")),
    ])
}

#[test]
fn batch_mode_discards_the_whole_run() {
    let log = failing_log();
    let result = run(&log);

    assert_eq!(result.applied_count, 0);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].transformation_id, log[1].id);
    assert_eq!(result.failures[0].kind, TransformationKind::Delete);
    assert_eq!(result.transformed_record, sample_resource_span());
    assert_eq!(section(&result, &span()).attributes.len(), 20);
    assert!(section(&result, &span()).attribute("env").is_none());
}

#[test]
fn per_transformation_mode_skips_only_the_failure() {
    let log = failing_log();
    let options = ExecuteOptions::default().with_isolation(FailureIsolation::PerTransformation);
    let result = run_with(&log, &AttributeOrderTable::new(), &options);

    assert_eq!(result.applied_count, 2);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].transformation_id, log[1].id);
    assert_eq!(
        result.failures[0].attribute_path.as_deref(),
        Some("resourceSpans[0].scopeSpans[0].spans[0].name")
    );
    let keys = section(&result, &span()).keys();
    assert_eq!(keys[0], "env");
    assert!(!keys.contains(&"zone"));
}

#[test]
fn missing_span_is_a_failure() {
    let ghost = SectionId::span_attributes(0, 0, 5);
    let options = ExecuteOptions::default().with_isolation(FailureIsolation::PerTransformation);
    let result = run_with(
        &log(vec![(ghost.clone(), add("env", "prod", ghost))]),
        &AttributeOrderTable::new(),
        &options,
    );
    assert_eq!(result.applied_count, 0);
    assert_eq!(result.failures.len(), 1);
    assert!(result.failures[0].message.contains("span-attributes-0-0-5"));
}

#[test]
fn result_values_are_plain_strings() {
    let result = run(&log(vec![(resource(), mask(TOKEN_PATH, "test.auth.token", 0, RangeEnd::End))]));
    let token = result
        .transformed_record
        .resource
        .attributes
        .iter()
        .find(|kv| kv.key == "test.auth.token")
        .unwrap();
    assert_eq!(token.value, AnyValue::StringValue("*****".into()));
}
