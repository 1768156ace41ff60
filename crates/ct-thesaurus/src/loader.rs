//! Streaming reader for the RDF/XML flavor of the NCI Thesaurus export.
//!
//! Each `owl:Class` becomes one concept: the `rdf:about` fragment is the
//! symbolic name, `rdfs:subClassOf` references are hierarchy edges, child
//! elements carrying `rdf:resource` are typed associations, and child
//! elements with text content are properties. `FULL_SYN` and
//! `ALT_DEFINITION` values arrive as escaped `ncicp:` payloads and are
//! split into a value plus ordered qualifiers. References may point
//! forward, so loading collects raw references first and links them once
//! the whole document has been read.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, info, warn};

use crate::concept::{AnnotatedProperty, Qualifier, categories};
use crate::error::LoadError;
use crate::store::Thesaurus;

/// Complex-payload children whose text is the property value itself;
/// every other child becomes a qualifier.
const VALUE_CARRIERS: [&str; 2] = ["term-name", "def-definition"];

#[derive(Debug, Default)]
struct PendingConcept {
    name: String,
    properties: Vec<AnnotatedProperty>,
    preferred_name: Option<String>,
    codes: Vec<String>,
    parent_refs: Vec<String>,
    association_refs: Vec<(String, String)>,
}

/// Loads a Thesaurus export from disk.
pub fn load_export(path: impl AsRef<Path>) -> Result<Thesaurus, LoadError> {
    let path = path.as_ref();
    let started = Instant::now();
    let file = File::open(path).map_err(|source| LoadError::io(path, source))?;
    let store = read_export(BufReader::new(file))?;
    info!(
        path = %path.display(),
        concepts = store.concept_count(),
        properties = store.property_count(),
        associations = store.association_count(),
        duration_ms = started.elapsed().as_millis() as u64,
        "loaded thesaurus export"
    );
    Ok(store)
}

/// Loads a Thesaurus export from any buffered reader.
pub fn read_export(input: impl BufRead) -> Result<Thesaurus, LoadError> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut pending: Vec<PendingConcept> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    loop {
        let position = reader.buffer_position();
        match reader
            .read_event_into(&mut buf)
            .map_err(|source| LoadError::xml(position, source))?
        {
            Event::Start(e) => {
                let local = local_name(&e);
                match local.as_str() {
                    "RDF" => {}
                    "Class" => {
                        let start = e.to_owned();
                        if let Some(concept) = read_class(&mut reader, &start, position)? {
                            merge_pending(&mut pending, &mut index_by_name, concept);
                        }
                    }
                    // Ontology header, annotation property declarations,
                    // axiom annotations: not part of the concept model.
                    _ => skip_element(&mut reader, &e.to_owned())?,
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    link(pending)
}

/// Reads one `owl:Class` body; `None` for anonymous classes.
fn read_class<R: BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart<'static>,
    start_position: u64,
) -> Result<Option<PendingConcept>, LoadError> {
    let Some(about) = attribute(start, "rdf:about", start_position)? else {
        skip_element(reader, start)?;
        return Ok(None);
    };

    let mut concept = PendingConcept {
        name: fragment(&about).to_string(),
        ..PendingConcept::default()
    };

    let mut buf = Vec::new();
    loop {
        let position = reader.buffer_position();
        match reader
            .read_event_into(&mut buf)
            .map_err(|source| LoadError::xml(position, source))?
        {
            Event::Start(e) => {
                let local = local_name(&e);
                let resource = attribute(&e, "rdf:resource", position)?;
                let element = e.to_owned();
                if local == "subClassOf" {
                    if let Some(resource) = resource {
                        concept.parent_refs.push(fragment(&resource).to_string());
                    }
                    // restriction axioms under subClassOf carry no
                    // hierarchy information for this report
                    skip_element(reader, &element)?;
                } else if let Some(resource) = resource {
                    concept
                        .association_refs
                        .push((local, fragment(&resource).to_string()));
                    skip_element(reader, &element)?;
                } else {
                    let text = collect_text(reader, position)?;
                    store_property(&mut concept, local, &text);
                }
            }
            Event::Empty(e) => {
                let local = local_name(&e);
                let resource = attribute(&e, "rdf:resource", position)?;
                if local == "subClassOf" {
                    if let Some(resource) = resource {
                        concept.parent_refs.push(fragment(&resource).to_string());
                    }
                } else if let Some(resource) = resource {
                    concept
                        .association_refs
                        .push((local, fragment(&resource).to_string()));
                }
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(LoadError::structure(
                    position,
                    "unexpected end of file inside owl:Class",
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(Some(concept))
}

/// Collects the text content of the element just opened, up to its end tag.
fn collect_text<R: BufRead>(
    reader: &mut Reader<R>,
    start_position: u64,
) -> Result<String, LoadError> {
    let mut text = String::new();
    let mut depth = 0usize;
    let mut buf = Vec::new();
    loop {
        let position = reader.buffer_position();
        match reader
            .read_event_into(&mut buf)
            .map_err(|source| LoadError::xml(position, source))?
        {
            Event::Text(t) => {
                let unescaped = t
                    .unescape()
                    .map_err(|source| LoadError::structure(position, source.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::CData(c) => {
                let decoded = reader
                    .decoder()
                    .decode(&c)
                    .map_err(|source| LoadError::structure(position, source.to_string()))?;
                text.push_str(&decoded);
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Eof => {
                return Err(LoadError::structure(
                    start_position,
                    "unexpected end of file inside property element",
                ));
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

/// Files a property under the pending concept, splitting complex payloads
/// into value plus qualifiers and routing the identity properties into
/// their dedicated slots.
fn store_property(concept: &mut PendingConcept, category: String, text: &str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    match category.as_str() {
        categories::CODE => concept.codes.push(trimmed.to_string()),
        categories::PREFERRED_NAME => {
            if concept.preferred_name.is_none() {
                concept.preferred_name = Some(trimmed.to_string());
            }
        }
        _ if trimmed.starts_with("<ncicp:") => match parse_complex_payload(trimmed) {
            Some((value, qualifiers)) => concept.properties.push(AnnotatedProperty {
                category,
                value,
                qualifiers,
            }),
            None => {
                warn!(
                    concept = %concept.name,
                    category = %category,
                    "unparseable complex payload, keeping raw text"
                );
                concept
                    .properties
                    .push(AnnotatedProperty::new(category, trimmed));
            }
        },
        _ => concept
            .properties
            .push(AnnotatedProperty::new(category, trimmed)),
    }
}

/// Parses an `ncicp:` payload into (value, qualifiers). The child carrying
/// the value is `term-name` for terms and `def-definition` for
/// definitions; remaining children become qualifiers in document order.
fn parse_complex_payload(payload: &str) -> Option<(String, Vec<Qualifier>)> {
    let mut reader = Reader::from_str(payload);
    reader.config_mut().trim_text(true);

    let mut fields: Vec<(String, String)> = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut text = String::new();
    loop {
        match reader.read_event().ok()? {
            Event::Start(e) => {
                open.push(local_name(&e));
                text.clear();
            }
            Event::Text(t) => text.push_str(&t.unescape().ok()?),
            Event::End(_) => {
                let name = open.pop()?;
                if !open.is_empty() {
                    fields.push((name, std::mem::take(&mut text)));
                }
            }
            Event::Empty(e) => {
                if !open.is_empty() {
                    fields.push((local_name(&e), String::new()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let mut value = None;
    let mut qualifiers = Vec::new();
    for (name, field_text) in fields {
        if value.is_none() && VALUE_CARRIERS.contains(&name.as_str()) {
            value = Some(field_text);
        } else {
            qualifiers.push(Qualifier {
                name,
                value: field_text,
            });
        }
    }
    value.map(|value| (value, qualifiers))
}

/// Merges a parsed class into the pending set; exports may split one
/// concept across several `owl:Class` blocks.
fn merge_pending(
    pending: &mut Vec<PendingConcept>,
    index_by_name: &mut HashMap<String, usize>,
    concept: PendingConcept,
) {
    if let Some(&index) = index_by_name.get(&concept.name) {
        let existing = &mut pending[index];
        existing.properties.extend(concept.properties);
        existing.codes.extend(concept.codes);
        existing.parent_refs.extend(concept.parent_refs);
        existing.association_refs.extend(concept.association_refs);
        if existing.preferred_name.is_none() {
            existing.preferred_name = concept.preferred_name;
        }
    } else {
        index_by_name.insert(concept.name.clone(), pending.len());
        pending.push(concept);
    }
}

/// Second phase: register every concept, then resolve hierarchy and
/// association references. Dangling references are dropped with a debug
/// note; the export routinely refers to classes outside the published
/// subset (`Thing` among them).
fn link(pending: Vec<PendingConcept>) -> Result<Thesaurus, LoadError> {
    let mut store = Thesaurus::new();
    let mut handles = Vec::with_capacity(pending.len());
    for concept in &pending {
        let code = sole_code(concept)?;
        let id = store.add_concept(&concept.name, code);
        if let Some(preferred_name) = &concept.preferred_name {
            store.set_preferred_name(id, preferred_name);
        }
        for property in &concept.properties {
            store.add_property(id, property.clone());
        }
        handles.push(id);
    }

    for (concept, &id) in pending.iter().zip(&handles) {
        for parent_ref in &concept.parent_refs {
            match store.resolve(parent_ref) {
                Some(parent) => store.add_parent(id, parent),
                None => debug!(
                    concept = %concept.name,
                    parent = %parent_ref,
                    "dropping subclass reference to unknown concept"
                ),
            }
        }
        for (kind, target_ref) in &concept.association_refs {
            match store.resolve(target_ref) {
                Some(target) => store.add_association(id, kind, target),
                None => debug!(
                    concept = %concept.name,
                    kind = %kind,
                    target = %target_ref,
                    "dropping association to unknown concept"
                ),
            }
        }
    }

    Ok(store)
}

fn sole_code(concept: &PendingConcept) -> Result<&str, LoadError> {
    let mut codes = concept.codes.iter();
    let first = codes.next().ok_or_else(|| LoadError::MissingCode {
        concept: concept.name.clone(),
    })?;
    for other in codes {
        if other != first {
            return Err(LoadError::AmbiguousCode {
                concept: concept.name.clone(),
                first: first.clone(),
                second: other.clone(),
            });
        }
    }
    Ok(first)
}

fn skip_element<R: BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart<'static>,
) -> Result<(), LoadError> {
    let position = reader.buffer_position();
    let mut buf = Vec::new();
    reader
        .read_to_end_into(start.name(), &mut buf)
        .map_err(|source| LoadError::xml(position, source))?;
    Ok(())
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn attribute(
    start: &BytesStart<'_>,
    name: &str,
    position: u64,
) -> Result<Option<String>, LoadError> {
    match start.try_get_attribute(name) {
        Ok(Some(attr)) => match attr.unescape_value() {
            Ok(value) => Ok(Some(value.into_owned())),
            Err(source) => Err(LoadError::structure(position, source.to_string())),
        },
        Ok(None) => Ok(None),
        Err(source) => Err(LoadError::structure(position, source.to_string())),
    }
}

/// Reference fragment: text after `#`, else after the last `/`, else the
/// whole value.
fn fragment(uri: &str) -> &str {
    match uri.rsplit_once('#') {
        Some((_, fragment)) => fragment,
        None => match uri.rsplit_once('/') {
            Some((_, tail)) => tail,
            None => uri,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_takes_tail_of_reference() {
        assert_eq!(
            fragment("http://ncicb.nci.nih.gov/xml/owl/EVS/Thesaurus.owl#C100110"),
            "C100110"
        );
        assert_eq!(fragment("#CDISC_Questionnaire_Terminology"), "CDISC_Questionnaire_Terminology");
        assert_eq!(fragment("Completion_Status"), "Completion_Status");
    }

    #[test]
    fn complex_term_payload_splits_value_and_qualifiers() {
        let payload = "<ncicp:ComplexTerm><ncicp:term-name>ARM</ncicp:term-name>\
                       <ncicp:term-group>PT</ncicp:term-group>\
                       <ncicp:term-source>CDISC</ncicp:term-source></ncicp:ComplexTerm>";
        let (value, qualifiers) = parse_complex_payload(payload).expect("payload parses");
        assert_eq!(value, "ARM");
        assert_eq!(qualifiers.len(), 2);
        assert_eq!(qualifiers[0].name, "term-group");
        assert_eq!(qualifiers[0].value, "PT");
        assert_eq!(qualifiers[1].name, "term-source");
        assert_eq!(qualifiers[1].value, "CDISC");
    }

    #[test]
    fn complex_definition_payload_uses_definition_carrier() {
        let payload = "<ncicp:ComplexDefinition>\
                       <ncicp:def-source>CDISC</ncicp:def-source>\
                       <ncicp:def-definition>Planned path through a study.</ncicp:def-definition>\
                       </ncicp:ComplexDefinition>";
        let (value, qualifiers) = parse_complex_payload(payload).expect("payload parses");
        assert_eq!(value, "Planned path through a study.");
        assert_eq!(qualifiers.len(), 1);
        assert_eq!(qualifiers[0].name, "def-source");
    }

    #[test]
    fn payload_without_carrier_is_rejected() {
        let payload = "<ncicp:ComplexTerm><ncicp:term-group>PT</ncicp:term-group></ncicp:ComplexTerm>";
        assert!(parse_complex_payload(payload).is_none());
    }
}
