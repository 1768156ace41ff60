//! End-to-end extraction over an in-memory thesaurus.

use ct_extract::{MEMBER_OF_CODELIST, extract_report};
use ct_model::FindingKind;
use ct_thesaurus::{AnnotatedProperty, ConceptId, Thesaurus, categories, qualifiers};

fn full_syn(value: &str, source: &str, group: &str) -> AnnotatedProperty {
    AnnotatedProperty::new(categories::FULL_SYN, value)
        .with_qualifier(qualifiers::TERM_SOURCE, source)
        .with_qualifier(qualifiers::TERM_GROUP, group)
}

fn make_codelist(
    kb: &mut Thesaurus,
    root: ConceptId,
    name: &str,
    code: &str,
    sy: &str,
) -> ConceptId {
    let codelist = kb.add_concept(name, code);
    kb.add_parent(codelist, root);
    kb.add_property(codelist, full_syn(sy, "CDISC", "SY"));
    kb.add_property(codelist, full_syn(sy, "CDISC", "PT"));
    kb.add_property(codelist, full_syn(name, "NCI", "PT"));
    kb.add_property(
        codelist,
        AnnotatedProperty::new(categories::EXTENSIBLE_LIST, "No"),
    );
    kb.add_property(
        codelist,
        AnnotatedProperty::new(categories::ALT_DEFINITION, "A codelist.")
            .with_qualifier(qualifiers::DEF_SOURCE, "CDISC"),
    );
    codelist
}

fn make_member(
    kb: &mut Thesaurus,
    codelist: ConceptId,
    name: &str,
    code: &str,
    value: &str,
) -> ConceptId {
    let element = kb.add_concept(name, code);
    kb.add_property(element, full_syn(value, "CDISC", "PT"));
    kb.add_association(element, MEMBER_OF_CODELIST, codelist);
    element
}

/// Three codelists inserted out of order, one with three members.
fn sdtm_fixture() -> (Thesaurus, ConceptId) {
    let mut kb = Thesaurus::new();
    let root = kb.add_concept("CDISC_SDTM_Terminology", "C66830");

    let completed = make_codelist(&mut kb, root, "Completed_List", "C2", "completed");
    make_codelist(&mut kb, root, "Yes_No_List", "C3", "Yes No");
    let arm = make_codelist(&mut kb, root, "Arm_List", "C1", "ARM");

    make_member(&mut kb, arm, "Zeta_Arm", "C13", "zeta");
    make_member(&mut kb, arm, "Alpha_Arm", "C11", "Alpha");
    make_member(&mut kb, arm, "Beta_Arm", "C12", "beta");
    make_member(&mut kb, completed, "Completed", "C21", "COMPLETED");

    (kb, root)
}

#[test]
fn codelists_and_elements_come_out_ordered() {
    let (kb, root) = sdtm_fixture();
    let outcome = extract_report(&kb, root);

    let names: Vec<&str> = outcome
        .report
        .codelists
        .iter()
        .map(|codelist| codelist.name.as_str())
        .collect();
    assert_eq!(names, ["ARM", "completed", "Yes No"]);

    let arm_values: Vec<&str> = outcome.report.codelists[0]
        .elements
        .iter()
        .map(|element| element.submission_value.as_str())
        .collect();
    assert_eq!(arm_values, ["Alpha", "beta", "zeta"]);
}

#[test]
fn stats_count_candidates_rows_and_edges() {
    let (kb, root) = sdtm_fixture();
    let outcome = extract_report(&kb, root);

    assert_eq!(outcome.stats.candidate_count, 3);
    assert_eq!(outcome.stats.codelist_count, 3);
    assert_eq!(outcome.stats.element_count, 4);
    assert_eq!(outcome.stats.membership_edges, 4);
    assert!(outcome.findings.is_empty());
}

#[test]
fn extraction_is_deterministic() {
    let (kb, root) = sdtm_fixture();
    let first = extract_report(&kb, root);
    let second = extract_report(&kb, root);
    assert_eq!(first.report, second.report);
    assert_eq!(first.report.rows(), second.report.rows());
}

#[test]
fn retired_members_are_left_out_of_rows() {
    let (mut kb, root) = sdtm_fixture();
    let arm = kb
        .resolve("Arm_List")
        .expect("fixture codelist missing");
    let retired = make_member(&mut kb, arm, "Retired_Arm", "C14", "RETIRED");
    kb.add_property(
        retired,
        AnnotatedProperty::new(categories::CONCEPT_STATUS, "Retired_Concept"),
    );
    let obsolete = make_member(&mut kb, arm, "Obsolete_Arm", "C15", "OBSOLETE");
    kb.add_property(
        obsolete,
        AnnotatedProperty::new(categories::CONCEPT_STATUS, "Obsolete_Concept"),
    );

    let outcome = extract_report(&kb, root);
    let arm_values: Vec<&str> = outcome.report.codelists[0]
        .elements
        .iter()
        .map(|element| element.submission_value.as_str())
        .collect();
    assert_eq!(arm_values, ["Alpha", "beta", "zeta"]);
}

#[test]
fn subclass_children_are_not_members() {
    let (mut kb, root) = sdtm_fixture();
    let arm = kb
        .resolve("Arm_List")
        .expect("fixture codelist missing");
    let child = kb.add_concept("Arm_Subclass", "C19");
    kb.add_parent(child, arm);
    kb.add_property(child, full_syn("SUBCLASS", "CDISC", "PT"));

    let outcome = extract_report(&kb, root);
    assert!(outcome.report.codelists[0]
        .elements
        .iter()
        .all(|element| element.code != "C19"));
}

#[test]
fn shared_element_appears_under_each_codelist() {
    let (mut kb, root) = sdtm_fixture();
    let arm = kb
        .resolve("Arm_List")
        .expect("fixture codelist missing");
    let yes_no = kb
        .resolve("Yes_No_List")
        .expect("fixture codelist missing");
    let shared = make_member(&mut kb, arm, "Shared_Term", "C30", "SHARED");
    kb.add_association(shared, MEMBER_OF_CODELIST, yes_no);

    let outcome = extract_report(&kb, root);
    let owners: Vec<&str> = outcome
        .report
        .codelists
        .iter()
        .filter(|codelist| codelist.elements.iter().any(|element| element.code == "C30"))
        .map(|codelist| codelist.name.as_str())
        .collect();
    assert_eq!(owners, ["ARM", "Yes No"]);
}

#[test]
fn unresolved_elements_are_dropped_with_a_finding() {
    let (mut kb, root) = sdtm_fixture();
    let arm = kb
        .resolve("Arm_List")
        .expect("fixture codelist missing");
    let bare = kb.add_concept("Bare_Term", "C31");
    kb.add_association(bare, MEMBER_OF_CODELIST, arm);

    let outcome = extract_report(&kb, root);
    assert!(outcome.report.codelists[0]
        .elements
        .iter()
        .all(|element| element.code != "C31"));
    assert_eq!(
        outcome
            .findings
            .of_kind(FindingKind::SubmissionValueUnresolved)
            .count(),
        1
    );
}

#[test]
fn report_rows_interleave_summary_and_elements() {
    let (kb, root) = sdtm_fixture();
    let outcome = extract_report(&kb, root);
    let rows = outcome.report.rows();

    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0][0], "C1");
    assert_eq!(rows[0][1], "");
    assert_eq!(rows[0][3], "ARM");
    assert_eq!(rows[1][0], "C11");
    assert_eq!(rows[1][1], "C1");
    assert_eq!(rows[1][4], "Alpha");
    assert_eq!(rows[4][0], "C2");
    assert_eq!(rows[5][0], "C21");
    assert_eq!(rows[6][0], "C3");
}
