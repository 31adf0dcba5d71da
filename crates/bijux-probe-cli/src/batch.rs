use crate::commands::{PageArgs, RunMode};
use crate::helpers::emit_ok;
use crate::render::{case_detail, check_detail, summary, table_header, table_row};
use crate::transport::{OfflineTransport, ReqwestTransport};
use crate::{corpus_path, CliError, OutputMode};
use bijux_probe_core::ProbeConfig;
use bijux_probe_corpus::{CaseSource, Corpus, OrdinalSelection};
use bijux_probe_verify::{
    run_case, CaseOutcome, CheckName, CheckParams, CheckRegistry, HttpTransport,
    VerificationResult, VerifyOptions,
};
use serde_json::{json, Value};
use std::path::Path;
use tracing::info;

pub(crate) fn run_all(
    config: &ProbeConfig,
    corpus_file: &Path,
    mode: RunMode,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let corpus = Corpus::from_path(corpus_file).map_err(CliError::corpus)?;
    let transport = transport_for(config)?;
    let options = VerifyOptions::from_config(config);
    let streaming_table = mode == RunMode::Table && !output_mode.json;
    if streaming_table {
        println!("{}", table_header());
    }

    let mut outcomes = Vec::with_capacity(corpus.len());
    for ordinal in 1..=corpus.len() {
        let case = corpus.load(ordinal).map_err(CliError::corpus)?;
        let outcome = run_case(transport.as_ref(), config, case, &options);
        if streaming_table {
            println!("{}", table_row(&outcome));
        }
        outcomes.push(outcome);
    }

    if output_mode.json {
        emit_ok(&json!({
            "command": "run",
            "mode": mode.as_str(),
            "total": outcomes.len(),
            "passed": outcomes.iter().filter(|o| o.result.passed()).count(),
            "results": outcomes.iter().map(outcome_payload).collect::<Vec<_>>(),
        }))
        .map_err(|e| CliError::internal(&e))?;
    } else {
        println!("{}", summary(&outcomes));
    }
    finish_batch(&outcomes)
}

pub(crate) fn run_selection(
    config: &ProbeConfig,
    corpus_file: &Path,
    selection: &str,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let selection = OrdinalSelection::parse(selection).map_err(CliError::corpus)?;
    let corpus = Corpus::from_path(corpus_file).map_err(CliError::corpus)?;
    let range = selection
        .resolve(corpus.count().map_err(CliError::corpus)?)
        .map_err(CliError::corpus)?;
    let transport = transport_for(config)?;
    let options = VerifyOptions::from_config(config);

    let mut outcomes = Vec::new();
    for ordinal in range {
        let case = corpus.load(ordinal).map_err(CliError::corpus)?;
        let outcome = run_case(transport.as_ref(), config, case, &options);
        if !output_mode.json {
            println!("{}", case_detail(&outcome, config.verbosity));
        }
        outcomes.push(outcome);
    }

    if output_mode.json {
        emit_ok(&json!({
            "command": "test",
            "selection": selection.to_string(),
            "results": outcomes.iter().map(outcome_payload).collect::<Vec<_>>(),
        }))
        .map_err(|e| CliError::internal(&e))?;
    } else if !selection.is_single() {
        println!("{}", summary(&outcomes));
    }
    finish_batch(&outcomes)
}

pub(crate) fn run_list(corpus_file: &Path, output_mode: OutputMode) -> Result<(), CliError> {
    let corpus = Corpus::from_path(corpus_file).map_err(CliError::corpus)?;
    if output_mode.json {
        let cases: Vec<Value> = corpus
            .keys()
            .map(|(ordinal, key)| json!({"ordinal": ordinal, "key": key}))
            .collect();
        return emit_ok(&json!({"command": "list", "cases": cases}))
            .map_err(|e| CliError::internal(&e));
    }
    for (ordinal, key) in corpus.keys() {
        println!("{ordinal:>4}  {key}");
    }
    Ok(())
}

pub(crate) fn run_paginate(
    config: &ProbeConfig,
    args: &PageArgs,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    run_named_check(config, CheckName::Pagination, args, output_mode)
}

pub(crate) fn run_check(
    config: &ProbeConfig,
    name: &str,
    args: &PageArgs,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let check = CheckRegistry::builtin()
        .resolve(name)
        .map_err(|e| CliError::registry(&e))?;
    run_named_check(config, check, args, output_mode)
}

fn run_named_check(
    config: &ProbeConfig,
    check: CheckName,
    args: &PageArgs,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let expected_total = match (check, args.expected_total) {
        (_, Some(total)) => total,
        (CheckName::Pagination, None) => recorded_total(args)?,
        (CheckName::PastLastPage, None) => 0,
    };
    let params = CheckParams {
        entity: args.entity.trim_matches('/').to_string(),
        page_size: args.page_size,
        expected_total,
    };
    let transport = ReqwestTransport::new(config).map_err(|e| CliError::transport(&e))?;
    info!(check = %check, entity = %params.entity, expected_total, "running check");
    let result = check
        .run(&transport, config, &params)
        .map_err(CliError::pagination)?;

    if output_mode.json {
        emit_ok(&json!({
            "command": "check",
            "check": check.as_str(),
            "entity": params.entity,
            "page_size": params.page_size,
            "expected_total": params.expected_total,
            "result": result,
        }))
        .map_err(|e| CliError::internal(&e))?;
    } else {
        println!("{}", check_detail(&result));
    }
    finish_check(&result)
}

fn recorded_total(args: &PageArgs) -> Result<u64, CliError> {
    let corpus = Corpus::from_path(&corpus_path(args.corpus.clone())).map_err(CliError::corpus)?;
    corpus.expected_total(&args.entity).ok_or_else(|| {
        CliError::usage(&format!(
            "no recorded total for /api/{}; pass --expected-total",
            args.entity.trim_matches('/')
        ))
    })
}

fn transport_for(config: &ProbeConfig) -> Result<Box<dyn HttpTransport>, CliError> {
    if config.live {
        let transport = ReqwestTransport::new(config).map_err(|e| CliError::transport(&e))?;
        Ok(Box::new(transport))
    } else {
        Ok(Box::new(OfflineTransport))
    }
}

fn outcome_payload(outcome: &CaseOutcome) -> Value {
    let case = &outcome.case;
    json!({
        "ordinal": case.ordinal(),
        "key": case.key(),
        "method": case.method(),
        "expected_status": case.expected_status(),
        "actual_status": case.actual_status(),
        "records": case.data().len(),
        "passed": outcome.result.passed(),
        "issues": outcome.result.issues(),
        "notes": outcome.result.notes(),
    })
}

fn finish_batch(outcomes: &[CaseOutcome]) -> Result<(), CliError> {
    let failed: Vec<String> = outcomes
        .iter()
        .filter(|outcome| !outcome.result.passed())
        .map(|outcome| outcome.case.ordinal().to_string())
        .collect();
    if failed.is_empty() {
        return Ok(());
    }
    Err(CliError::validation(&format!(
        "{} of {} cases failed verification",
        failed.len(),
        outcomes.len()
    ))
    .with_detail("failed_ordinals", &failed.join(",")))
}

fn finish_check(result: &VerificationResult) -> Result<(), CliError> {
    if result.passed() {
        return Ok(());
    }
    Err(CliError::validation(&format!(
        "{} failed with {} issue(s)",
        result.subject(),
        result.issues().len()
    )))
}
