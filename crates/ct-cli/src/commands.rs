use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use comfy_table::Table;
use tracing::{info, info_span, warn};

use ct_extract::extract_report;
use ct_report::{RootFindings, convert_to_workbook, write_delimited, write_findings_json};
use ct_thesaurus::load_export;

use crate::cli::{GenerateArgs, InspectArgs};
use crate::summary::apply_table_style;
use crate::types::{GenerateResult, RootSummary};

/// Environment variable consulted when `--output-dir` is absent.
pub const OUTPUT_DIR_ENV: &str = "CT_REPORTWRITER_OUTPUT_DIR";

pub fn run_generate(args: &GenerateArgs) -> Result<GenerateResult> {
    let output_dir = resolve_output_dir(args.output_dir.clone());
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;

    let store = info_span!("load_thesaurus", path = %args.thesaurus.display())
        .in_scope(|| load_export(&args.thesaurus))
        .with_context(|| format!("load {}", args.thesaurus.display()))?;

    let run_start = Instant::now();
    let mut roots = Vec::with_capacity(args.roots.len());
    let mut documents = Vec::with_capacity(args.roots.len());
    for requested in &args.roots {
        let root = store
            .resolve(requested)
            .ok_or_else(|| anyhow!("root concept '{requested}' not found by name or code"))?;
        let root_name = store.name(root);
        let root_span = info_span!("root", root = %root_name);
        let _root_guard = root_span.enter();

        let outcome = extract_report(&store, root);

        let text_path = output_dir.join(format!("{root_name}.txt"));
        write_delimited(&outcome.report, &text_path)?;

        let workbook_path = if args.no_excel {
            None
        } else {
            convert_workbook(&text_path, root_name)
        };

        documents.push(RootFindings::new(&outcome.report, &outcome.findings));
        roots.push(RootSummary {
            root: root_name.to_string(),
            codelist_count: outcome.stats.codelist_count,
            element_count: outcome.stats.element_count,
            findings: outcome.findings,
            text_path,
            workbook_path,
        });
    }

    let findings_json = match &args.findings_json {
        Some(path) => {
            write_findings_json(path, &documents)?;
            Some(path.clone())
        }
        None => None,
    };

    info!(
        roots = roots.len(),
        codelists = roots.iter().map(|r| r.codelist_count).sum::<usize>(),
        elements = roots.iter().map(|r| r.element_count).sum::<usize>(),
        duration_ms = run_start.elapsed().as_millis(),
        "generate complete"
    );

    Ok(GenerateResult {
        thesaurus: args.thesaurus.clone(),
        output_dir,
        roots,
        findings_json,
    })
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let store = info_span!("load_thesaurus", path = %args.thesaurus.display())
        .in_scope(|| load_export(&args.thesaurus))
        .with_context(|| format!("load {}", args.thesaurus.display()))?;
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Count"]);
    apply_table_style(&mut table);
    table.add_row(vec!["Concepts".to_string(), store.concept_count().to_string()]);
    table.add_row(vec![
        "Properties".to_string(),
        store.property_count().to_string(),
    ]);
    table.add_row(vec![
        "Associations".to_string(),
        store.association_count().to_string(),
    ]);
    table.add_row(vec![
        "Deprecated concepts".to_string(),
        store.deprecated_count().to_string(),
    ]);
    println!("{table}");

    let mut roots: Vec<_> = store
        .concepts()
        .filter(|&id| store.name(id).ends_with("_Terminology") && !store.children(id).is_empty())
        .collect();
    roots.sort_by_key(|&id| store.name(id));
    if !roots.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Report root", "Code", "Codelists"]);
        apply_table_style(&mut table);
        for id in roots {
            table.add_row(vec![
                store.name(id).to_string(),
                store.code(id).to_string(),
                store.children(id).len().to_string(),
            ]);
        }
        println!();
        println!("Report roots:");
        println!("{table}");
    }
    Ok(())
}

/// `--output-dir` wins over the environment; both fall back to the current
/// directory.
fn resolve_output_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| env::var_os(OUTPUT_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Converts the delimited report into a workbook next to it. Failures log
/// a warning and yield `None`; the text report stands on its own.
fn convert_workbook(text_path: &Path, sheet_name: &str) -> Option<PathBuf> {
    let target = text_path.with_extension("xls");
    match convert_to_workbook(text_path, &target, sheet_name) {
        Ok(()) => Some(target),
        Err(error) => {
            warn!(path = %target.display(), "workbook conversion failed: {error:#}");
            None
        }
    }
}
