use clap::Parser;
use contract_client::{
    rpc::{domain::Job, HttpApiClient},
    Client,
};

use crate::cli::create_dynamic_table;

#[derive(Default, Debug, Clone, Parser)]
#[clap(about = "View and manage deployment and transaction jobs. Defaults to `list` command.")]
pub struct JobCmd {
    /// List known jobs
    #[clap(short, long, group = "action")]
    list: bool,

    /// Show a single job
    #[clap(short, long, group = "action", value_name = "JOB_ID")]
    show: Option<String>,

    /// Poll a job until it finishes
    #[clap(short, long, group = "action", value_name = "JOB_ID")]
    wait: Option<String>,

    /// Cancel a pending or running job
    #[clap(long, group = "action", value_name = "JOB_ID")]
    cancel: Option<String>,

    /// Show the transaction a job produced
    #[clap(short, long, group = "action", value_name = "TRANSACTION_ID")]
    transaction: Option<String>,
}

impl JobCmd {
    pub async fn execute(&self, client: Client<HttpApiClient>) -> Result<(), String> {
        match self {
            JobCmd { show: Some(job_id), .. } => print_job(&client.get_job(job_id).await?),
            JobCmd { wait: Some(job_id), .. } => print_job(&client.wait_for_job(job_id).await?),
            JobCmd { cancel: Some(job_id), .. } => print_job(&client.cancel_job(job_id).await?),
            JobCmd { transaction: Some(transaction_id), .. } => {
                let transaction = client.get_transaction(transaction_id).await?;
                let output =
                    serde_json::to_string_pretty(&transaction).map_err(|err| err.to_string())?;
                println!("{output}");
            },
            _ => list_jobs(&client).await?,
        }
        Ok(())
    }
}

// LIST JOBS
// ================================================================================================
async fn list_jobs(client: &Client<HttpApiClient>) -> Result<(), String> {
    let jobs = client.list_jobs().await?;

    let mut table = create_dynamic_table(&["ID", "Kind", "Status", "Transaction ID", "Updated At"]);
    for job in jobs {
        table.add_row(vec![
            job.id,
            job.kind.to_string(),
            job.status.to_string(),
            job.transaction_id.unwrap_or_else(|| "-".to_string()),
            job.updated_at.map(|at| at.to_rfc3339()).unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!("{table}");
    Ok(())
}

// HELPERS
// ================================================================================================
pub(crate) fn print_job(job: &Job) {
    println!("Job {} ({}) is {}", job.id, job.kind, job.status);
    if let Some(transaction_id) = &job.transaction_id {
        println!("Transaction: {transaction_id}");
    }
    if let Some(error) = &job.error {
        println!("Error: {error}");
    }
    if let Some(result) = &job.result {
        println!("Result: {result}");
    }
}
