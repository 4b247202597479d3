//! Record → display tree derivation.
//!
//! Section order per resource span: the resource section, then for each scope
//! span the sections of each of its spans (info, attributes, events, links)
//! followed by the scope's own info section.

use std::sync::atomic::{AtomicU64, Ordering};

use otx_core::display::{DisplayAttribute, Section, Tree};
use otx_core::path::CollectionRef;
use otx_core::record::{AnyValue, KeyValue, ResourceSpan, ScopeSpan, Span};
use otx_core::section::SectionId;
use tracing::debug;

use crate::value::{detect_value_type, value_to_string};

/// Suffix counter making attribute ids unique across every derivation in the process.
static ATTRIBUTE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Derive the display tree of a list of resource spans.
#[must_use]
pub fn parse(resource_spans: &[ResourceSpan]) -> Tree {
    let mut sections = Vec::new();
    for (r, resource_span) in resource_spans.iter().enumerate() {
        push_resource_span(&mut sections, r, resource_span);
    }
    debug!(
        resource_spans = resource_spans.len(),
        sections = sections.len(),
        "derived display tree"
    );
    Tree { sections }
}

/// Derive the display tree of a single resource span at index 0.
#[must_use]
pub fn parse_one(resource_span: &ResourceSpan) -> Tree {
    parse(std::slice::from_ref(resource_span))
}

fn push_resource_span(sections: &mut Vec<Section>, r: usize, resource_span: &ResourceSpan) {
    let resource = CollectionRef::Resource { resource: r };
    sections.push(section(
        resource.section_id(),
        collection_attributes(
            &format!("resource-{r}"),
            resource,
            &resource_span.resource.attributes,
        ),
    ));

    for (ss, scope_span) in resource_span.scope_spans.iter().enumerate() {
        for (s, span) in scope_span.spans.iter().enumerate() {
            push_span(sections, r, ss, s, span);
        }
        sections.push(scope_section(r, ss, scope_span));
    }
}

fn push_span(sections: &mut Vec<Section>, r: usize, ss: usize, s: usize, span: &Span) {
    let span_path = format!("resourceSpans[{r}].scopeSpans[{ss}].spans[{s}]");
    let base = format!("span-{r}-{ss}-{s}");
    let info_id = SectionId::span_info(r, ss, s);
    let field = |name: &str, value: AnyValue| {
        attribute(
            format!("{base}-{name}"),
            format!("{span_path}.{name}"),
            &info_id,
            name,
            &value,
            0,
        )
    };
    let info = vec![
        field("name", AnyValue::StringValue(span.name.clone())),
        field("traceId", AnyValue::StringValue(span.trace_id.clone())),
        field("spanId", AnyValue::StringValue(span.span_id.clone())),
        field("kind", AnyValue::IntValue(span.kind.to_string())),
    ];
    sections.push(section(info_id.clone(), info));

    let collection = CollectionRef::Span {
        resource: r,
        scope: ss,
        span: s,
    };
    sections.push(section(
        collection.section_id(),
        collection_attributes(&base, collection, &span.attributes),
    ));

    let events_id = SectionId::events(r, ss, s);
    let mut events = Vec::new();
    for (e, event) in span.events.iter().enumerate() {
        let event_base = format!("event-{r}-{ss}-{s}-{e}");
        let event_path = format!("{span_path}.events[{e}]");
        events.push(attribute(
            format!("{event_base}-name"),
            format!("{event_path}.name"),
            &events_id,
            "name",
            &AnyValue::StringValue(event.name.clone()),
            0,
        ));
        events.extend(nested_attributes(
            &event_base,
            &event_path,
            &events_id,
            &event.attributes,
        ));
    }
    sections.push(section(events_id, events));

    let links_id = SectionId::links(r, ss, s);
    let mut links = Vec::new();
    for (l, link) in span.links.iter().enumerate() {
        let link_base = format!("link-{r}-{ss}-{s}-{l}");
        let link_path = format!("{span_path}.links[{l}]");
        links.push(attribute(
            format!("{link_base}-traceId"),
            format!("{link_path}.traceId"),
            &links_id,
            "traceId",
            &AnyValue::StringValue(link.trace_id.clone()),
            0,
        ));
        links.extend(nested_attributes(
            &link_base,
            &link_path,
            &links_id,
            &link.attributes,
        ));
    }
    sections.push(section(links_id, links));
}

fn scope_section(r: usize, ss: usize, scope_span: &ScopeSpan) -> Section {
    let collection = CollectionRef::Scope {
        resource: r,
        scope: ss,
    };
    let id = collection.section_id();
    let base = format!("scope-{r}-{ss}");
    let scope_path = format!("resourceSpans[{r}].scopeSpans[{ss}].scope");
    let scope = &scope_span.scope;

    let mut attributes = vec![
        attribute(
            format!("{base}-name"),
            format!("{scope_path}.name"),
            &id,
            "name",
            &AnyValue::StringValue(scope.name.clone()),
            0,
        ),
        attribute(
            format!("{base}-version"),
            format!("{scope_path}.version"),
            &id,
            "version",
            &AnyValue::StringValue(scope.version.clone()),
            0,
        ),
    ];
    attributes.extend(collection_attributes(&base, collection, &scope.attributes));
    section(id, attributes)
}

/// Top-level attributes of an editable collection.
fn collection_attributes(
    base: &str,
    collection: CollectionRef,
    attributes: &[KeyValue],
) -> Vec<DisplayAttribute> {
    let section_id = collection.section_id();
    attributes
        .iter()
        .enumerate()
        .map(|(i, kv)| {
            attribute(
                format!("{base}-attr-{i}-{}", kv.key),
                collection.attribute_path(i),
                &section_id,
                &kv.key,
                &kv.value,
                0,
            )
        })
        .collect()
}

/// Attributes of an event or link, one level below its header row.
fn nested_attributes(
    base: &str,
    parent_path: &str,
    section_id: &SectionId,
    attributes: &[KeyValue],
) -> Vec<DisplayAttribute> {
    attributes
        .iter()
        .enumerate()
        .map(|(i, kv)| {
            attribute(
                format!("{base}-attr-{i}-{}", kv.key),
                format!("{parent_path}.attributes[{i}]"),
                section_id,
                &kv.key,
                &kv.value,
                1,
            )
        })
        .collect()
}

fn section(id: SectionId, attributes: Vec<DisplayAttribute>) -> Section {
    let kind = id.kind();
    Section {
        id,
        kind,
        label: kind.label().to_string(),
        expanded: kind.expanded_by_default(),
        attributes,
        update_count: 0,
    }
}

fn attribute(
    base_id: String,
    path: String,
    section_id: &SectionId,
    key: &str,
    value: &AnyValue,
    depth: u32,
) -> DisplayAttribute {
    let n = ATTRIBUTE_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    DisplayAttribute {
        id: format!("{base_id}-c{n}"),
        path,
        section_id: section_id.clone(),
        key: key.to_string(),
        value: value_to_string(value),
        value_type: detect_value_type(value),
        depth,
        modifications: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otx_core::fixtures::sample_resource_span;
    use otx_core::record::{Event, Link};
    use pretty_assertions::assert_eq;

    #[test]
    fn sample_sections_in_order() {
        let tree = parse_one(&sample_resource_span());
        let ids: Vec<String> = tree.sections.iter().map(|s| s.id.to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "resource-0",
                "span-info-0-0-0",
                "span-attributes-0-0-0",
                "events-0-0-0",
                "links-0-0-0",
                "scope-info-0-0",
            ]
        );
    }

    #[test]
    fn sample_section_sizes_and_flags() {
        let tree = parse_one(&sample_resource_span());
        let sizes: Vec<(usize, bool)> = tree
            .sections
            .iter()
            .map(|s| (s.attributes.len(), s.expanded))
            .collect();
        assert_eq!(
            sizes,
            vec![(22, true), (4, true), (20, true), (0, false), (0, false), (2, false)]
        );
    }

    #[test]
    fn attribute_paths_are_structural() {
        let tree = parse_one(&sample_resource_span());
        let span = tree.section(&SectionId::span_attributes(0, 0, 0)).unwrap();
        let zone = span.attribute("zone").unwrap();
        assert_eq!(
            zone.path,
            "resourceSpans[0].scopeSpans[0].spans[0].attributes[19]"
        );
        assert_eq!(zone.depth, 0);

        let info = tree.section(&SectionId::span_info(0, 0, 0)).unwrap();
        assert_eq!(info.keys(), vec!["name", "traceId", "spanId", "kind"]);
        assert_eq!(info.attribute("kind").unwrap().value, "2");
    }

    #[test]
    fn ids_are_unique_across_derivations() {
        let record = sample_resource_span();
        let first = parse_one(&record);
        let second = parse_one(&record);
        let a = &first.sections[0].attributes[0].id;
        let b = &second.sections[0].attributes[0].id;
        assert!(a.starts_with("resource-0-attr-0-test.resource.id-c"));
        assert_ne!(a, b);
    }

    #[test]
    fn events_and_links_nest_their_attributes() {
        let mut record = sample_resource_span();
        let span = &mut record.scope_spans[0].spans[0];
        span.events.push(Event {
            time_unix_nano: "1".into(),
            name: "retry".into(),
            attributes: vec![KeyValue::string("attempt", "2")],
            dropped_attributes_count: 0,
        });
        span.links.push(Link {
            trace_id: "abc".into(),
            span_id: "def".into(),
            trace_state: None,
            attributes: vec![KeyValue::string("peer", "x")],
            dropped_attributes_count: 0,
        });

        let tree = parse_one(&record);
        let events = tree.section(&SectionId::events(0, 0, 0)).unwrap();
        let depths: Vec<(&str, u32)> = events
            .attributes
            .iter()
            .map(|a| (a.key.as_str(), a.depth))
            .collect();
        assert_eq!(depths, vec![("name", 0), ("attempt", 1)]);
        assert_eq!(
            events.attributes[1].path,
            "resourceSpans[0].scopeSpans[0].spans[0].events[0].attributes[0]"
        );

        let links = tree.section(&SectionId::links(0, 0, 0)).unwrap();
        assert_eq!(links.keys(), vec!["traceId", "peer"]);
    }

    #[test]
    fn empty_input_yields_empty_tree() {
        assert_eq!(parse(&[]), Tree::default());
    }
}
