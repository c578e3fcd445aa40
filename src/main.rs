//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ats_client` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - JSON output of results and errors
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use std::process;

use ats_client::client::OpportunityPredicate;
use ats_client::config::{Cli, Command};
use ats_client::initialization::{init_client, init_logger_with};
use ats_client::{
    ApiError, ArchivedFilter, AtsClient, Opportunity, OpportunityFilter, PostingFilter,
    RequisitionFilter,
};

#[tokio::main]
async fn main() -> Result<()> {
    // .env in the working directory first, then next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    let client = init_client(&cli.client_config()).context("Failed to initialize API client")?;

    match run(&client, cli.command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            if let Some(api_error) = e.downcast_ref::<ApiError>() {
                println!("{}", api_error.to_payload());
            }
            eprintln!("ats_client error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(client: &AtsClient, command: Command) -> Result<Value> {
    let output = match command {
        Command::Candidates {
            stages,
            posting_id,
            email,
            tags,
            archived,
            search,
            limits,
        } => {
            let limits = limits.limits();
            if archived {
                let filter = ArchivedFilter {
                    posting_id,
                    ..ArchivedFilter::default()
                };
                client
                    .list_archived_opportunities(&filter, limits)
                    .await
                    .context("Failed to list archived candidates")?
                    .to_envelope()
            } else {
                let stage_ids = if stages.is_empty() {
                    Vec::new()
                } else {
                    client
                        .resolve_stage_ids(stages.as_slice())
                        .await
                        .context("Failed to resolve stages")?
                };
                let filter = OpportunityFilter {
                    stage_ids,
                    posting_id,
                    email,
                    tags,
                    ..OpportunityFilter::default()
                };
                let needle = search.map(|s| s.to_lowercase());
                let matches = |o: &Opportunity| match &needle {
                    Some(needle) => [o.name.as_deref(), o.headline.as_deref()]
                        .into_iter()
                        .flatten()
                        .any(|text| text.to_lowercase().contains(needle.as_str())),
                    None => true,
                };
                let predicate: Option<OpportunityPredicate<'_>> =
                    if needle.is_some() { Some(&matches) } else { None };
                client
                    .list_opportunities(&filter, limits, predicate)
                    .await
                    .context("Failed to list candidates")?
                    .to_envelope()
            }
        }
        Command::Candidate { id } => {
            let opportunity = client
                .get_opportunity(&id)
                .await
                .with_context(|| format!("Failed to fetch candidate {id}"))?;
            json!({ "data": opportunity })
        }
        Command::Postings {
            state,
            owner,
            limits,
        } => {
            let limits = limits.limits();
            let collected = match owner {
                Some(owner) => {
                    client
                        .list_postings_by_owner(&owner, Some(state.as_str()), limits)
                        .await
                }
                None => {
                    let filter = PostingFilter {
                        state: Some(state),
                        ..PostingFilter::default()
                    };
                    client.list_postings(&filter, limits).await
                }
            };
            collected.context("Failed to list postings")?.to_envelope()
        }
        Command::Stages => {
            client
                .list_stages()
                .await
                .context("Failed to list stages")?
                .to_envelope()
        }
        Command::ArchiveReasons => {
            client
                .list_archive_reasons()
                .await
                .context("Failed to list archive reasons")?
                .to_envelope()
        }
        Command::Requisitions { status, limits } => {
            let filter = RequisitionFilter {
                status,
                ..RequisitionFilter::default()
            };
            client
                .list_requisitions(&filter, limits.limits())
                .await
                .context("Failed to list requisitions")?
                .to_envelope()
        }
        Command::Requisition { id, code } => {
            let requisition = match (id, code) {
                (_, Some(code)) => client
                    .get_requisition_by_code(&code)
                    .await
                    .with_context(|| format!("Failed to find requisition with code {code}"))?,
                (Some(id), None) => client
                    .get_requisition(&id)
                    .await
                    .with_context(|| format!("Failed to fetch requisition {id}"))?,
                (None, None) => anyhow::bail!("either a requisition id or --code is required"),
            };
            json!({ "data": requisition })
        }
        Command::Interviews {
            opportunity_id,
            limits,
        } => client
            .list_interviews(&opportunity_id, limits.limits())
            .await
            .with_context(|| format!("Failed to list interviews for {opportunity_id}"))?
            .to_envelope(),
    };
    Ok(output)
}
