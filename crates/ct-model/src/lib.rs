pub mod findings;
pub mod report;

pub use findings::{Finding, FindingKind, FindingLog, Severity};
pub use report::{Codelist, Element, REPORT_COLUMNS, SYNONYM_SEPARATOR, TerminologyReport};

#[cfg(test)]
mod tests {
    use super::*;

    fn make_element(value: &str) -> Element {
        Element {
            code: "C25301".to_string(),
            codelist_code: "C66767".to_string(),
            submission_value: value.to_string(),
            synonyms: vec!["Moderate".to_string(), "Severe".to_string(), "mild".to_string()],
            definition: None,
            preferred_term: "Day".to_string(),
        }
    }

    #[test]
    fn synonym_cell_joins_sorted_values() {
        let element = make_element("DAYS");
        assert_eq!(element.synonym_cell(), "Moderate; Severe; mild");
    }

    #[test]
    fn summary_row_repeats_codelist_name() {
        let codelist = Codelist {
            code: "C66767".to_string(),
            name: "ACN".to_string(),
            submission_value: Some("ACN".to_string()),
            extensible: Some("No".to_string()),
            definition: Some("Action taken.".to_string()),
            nci_preferred_term: Some("CDISC SDTM Action Terminology".to_string()),
            elements: vec![],
        };
        let row = codelist.summary_row();
        assert_eq!(row[1], "");
        assert_eq!(row[3], "ACN");
        assert_eq!(row[5], "ACN");
    }

    #[test]
    fn report_rows_interleave_summary_and_elements() {
        let report = TerminologyReport {
            root: "CDISC_SDTM_Terminology".to_string(),
            codelists: vec![Codelist {
                code: "C66767".to_string(),
                name: "ACN".to_string(),
                submission_value: None,
                extensible: None,
                definition: None,
                nci_preferred_term: None,
                elements: vec![make_element("DOSE INCREASED")],
            }],
        };
        let rows = report.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "C66767");
        assert_eq!(rows[1][0], "C25301");
        assert_eq!(rows[1][3], "ACN");
        assert_eq!(report.element_count(), 1);
    }

    #[test]
    fn finding_log_counts_by_severity() {
        let mut log = FindingLog::default();
        log.push(
            Finding::warning(FindingKind::ExtensibilityMissing, "no extensible value")
                .with_codelist("C66767"),
        );
        log.push(Finding::warning(
            FindingKind::SubmissionValueUnresolved,
            "no submission value",
        ));
        assert_eq!(log.warning_count(), 2);
        assert_eq!(log.error_count(), 0);
        assert!(!log.has_errors());
        assert_eq!(log.of_kind(FindingKind::ExtensibilityMissing).count(), 1);
    }

    #[test]
    fn finding_serializes_with_lowercase_severity() {
        let finding = Finding::warning(FindingKind::CodelistNameCollision, "duplicate name")
            .with_codelist("C66768")
            .with_concept("Completion_Status");
        let json = serde_json::to_value(&finding).expect("serialize finding");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["kind"], "codelist_name_collision");
    }
}
