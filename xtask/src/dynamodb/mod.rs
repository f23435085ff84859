//! DynamoDB table management.

mod client;
mod config;
mod deploy;
mod error;
mod planning;

pub use error::{DynamodbError, Result};

use circles::config::Config;
use circles::storage::dynamodb::{create_client, target_display};
use dialoguer::Confirm;

use crate::prelude::*;

#[derive(Debug, clap::Parser)]
pub struct DynamodbCommand {
    #[command(subcommand)]
    pub action: DynamodbAction,
}

#[derive(Debug, clap::Subcommand)]
pub enum DynamodbAction {
    /// Deploy or destroy the circles table.
    Deploy(DeployCommand),
}

#[derive(Debug, clap::Parser)]
#[command(long_about = "Deploy or destroy the circles DynamoDB table.

Creates the table keyed on `pk` with the two indexes resolving circle names
and mail addresses, or adds whichever index is missing. A plan is shown
before anything is applied.

Environment variables:
  AWS_ENDPOINT_URL      - Use local DynamoDB (e.g., http://localhost:8000)
  AWS_REGION            - AWS region (defaults to us-east-1)
  MAIN_TABLE_GSI1_NAME  - Circle name index (defaults to gsi1)
  MAIN_TABLE_GSI2_NAME  - Mail address index (defaults to gsi2)")]
pub struct DeployCommand {
    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,

    /// Destroy the table instead of creating/updating.
    #[arg(long)]
    pub destroy: bool,

    /// Table name to use.
    #[arg(long, env = "MAIN_TABLE_NAME", default_value = "circles")]
    pub table_name: String,
}

pub async fn run(command: DynamodbCommand, global: crate::Global) -> Result<()> {
    match command.action {
        DynamodbAction::Deploy(deploy_cmd) => run_deploy(deploy_cmd, &global).await,
    }
}

fn confirm(prompt: &str, default: bool) -> Result<()> {
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|err| DynamodbError::Prompt(err.to_string()))?;

    if confirmed {
        Ok(())
    } else {
        Err(DynamodbError::UserCancelled)
    }
}

fn print_plan(global: &crate::Global, title: String, lines: Vec<String>) {
    if global.is_silent() {
        return;
    }
    aprintln!("{title}");
    for line in lines {
        aprintln!("  {}", p_plan(&line));
    }
    aprintln!();
}

async fn run_deploy(cmd: DeployCommand, global: &crate::Global) -> Result<()> {
    let config = Config {
        table_name: cmd.table_name.clone(),
        ..Config::from_env()
    };

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), target_display(&config));
        aprintln!();
    }

    let dynamo_client = create_client(&config).await;
    let current_state = client::get_table_state(&dynamo_client, &config.table_name).await?;

    if cmd.destroy {
        let plan = planning::calculate_destroy_plan(current_state.as_ref(), &config.table_name);
        print_plan(global, p_y("Destroy Plan:"), planning::format_destroy_plan(&plan));

        if matches!(plan, planning::DestroyPlan::AlreadyGone { .. }) {
            if !global.is_silent() {
                aprintln!("{}", p_g("Nothing to destroy."));
            }
            return Ok(());
        }

        if !cmd.force {
            confirm(
                "Are you sure you want to delete this table? ALL DATA WILL BE LOST",
                false,
            )?;
        }

        if !global.is_silent() {
            aprintln!("{}", p_b("Deleting table..."));
        }
        deploy::execute_destroy_plan(&dynamo_client, &plan).await?;

        if !global.is_silent() {
            aprintln!("{}", p_g("Table destroyed successfully."));
        }
        return Ok(());
    }

    let desired = config::circles_table_config(&config);
    let plan = planning::calculate_deploy_plan(current_state.as_ref(), &desired)?;
    print_plan(global, p_c("Deploy Plan:"), planning::format_deploy_plan(&plan));

    if matches!(plan, planning::DeployPlan::NoChanges { .. }) {
        if !global.is_silent() {
            aprintln!("{}", p_g("Table is up to date."));
        }
        return Ok(());
    }

    if !cmd.force {
        confirm("Apply these changes?", true)?;
    }

    if !global.is_silent() {
        aprintln!("{}", p_b("Applying changes..."));
    }
    deploy::execute_deploy_plan(&dynamo_client, &plan).await?;

    if !global.is_silent() {
        aprintln!("{}", p_g("Table deployed successfully."));
    }
    Ok(())
}
