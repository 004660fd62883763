use std::{env::temp_dir, fs, path::PathBuf};

use serde_json::json;
use uuid::Uuid;

use crate::{
    errors::{ClientError, ValidationError},
    mock::{create_test_client, create_test_client_with, mock_contract_ref, MockApiClient},
    rpc::{
        domain::{ContractRef, JobKind, JobStatus},
        RpcError,
    },
    validation::{Arguments, ValueKind},
};

fn args(value: serde_json::Value) -> Arguments {
    serde_json::from_value(value).unwrap()
}

fn create_test_file(extension: &str, contents: &[u8]) -> PathBuf {
    let mut path = temp_dir();
    path.push(format!("{}.{extension}", Uuid::new_v4()));
    fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_list_contracts() {
    let client = create_test_client();

    let contracts = client.list_contracts().await.unwrap();
    assert_eq!(contracts.len(), 1);
    assert_eq!(contracts[0].name, "registry");
    assert_eq!(contracts[0].latest_version.as_deref(), Some("1.0.0"));

    let versions = client.get_contract_versions("registry").await.unwrap();
    assert_eq!(versions.len(), 1);
    assert!(client.get_contract_versions("unknown").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_method_constraints_of_mock_contract() {
    let client = create_test_client();

    let constraints = client.get_method_constraints(&mock_contract_ref()).await.unwrap();
    let set_value = constraints.get("setValue").unwrap();
    assert_eq!(set_value.uint_params(), ["value".to_string()]);

    let nested = constraints.get("nestedArr4").unwrap().array_param("first").unwrap();
    assert_eq!(nested.num_dimensions(), 2);
    assert!(nested.contains_uint());
}

#[tokio::test]
async fn test_unknown_contract_metadata_fails() {
    let client = create_test_client();

    let err = client.get_metadata(&ContractRef::new("registry", "9.9.9")).await.unwrap_err();
    match err {
        ClientError::RpcError(RpcError::ResponseStatus { status, .. }) => assert_eq!(status, 404),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_valid_invocation_is_sent() {
    let client = create_test_client();
    let inputs = args(json!({"first": [[1, 2, 3], [4, 5, 6], [7, 8, 9]]}));

    let job = client.invoke(&mock_contract_ref(), "nestedArr4", &inputs).await.unwrap();
    assert_eq!(job.kind, JobKind::Transaction);
    assert_eq!(job.status, JobStatus::Pending);

    let calls = client.api().invocations();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "nestedArr4");
    assert_eq!(calls[0].args, inputs);
}

#[tokio::test]
async fn test_invalid_invocation_is_not_sent() {
    let client = create_test_client();
    let inputs = args(json!({"first": [1, 2, 3]}));

    let err = client.invoke(&mock_contract_ref(), "nestedArr1", &inputs).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::ValidationError(ValidationError::ArrayLengthMismatch { expected: 5, actual: 3, .. })
    ));
    assert!(client.api().invocations().is_empty());
}

#[tokio::test]
async fn test_negative_uint_argument_is_rejected() {
    let client = create_test_client();
    let inputs = args(json!({"value": -1, "label": "x"}));

    let err = client.invoke(&mock_contract_ref(), "setValue", &inputs).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::ValidationError(ValidationError::NotNonNegative { ref param }) if param == "value"
    ));
    assert!(client.api().invocations().is_empty());
}

#[tokio::test]
async fn test_mixed_array_elements_are_rejected() {
    let client = create_test_client();
    let inputs = args(json!({"flags": [[true, false], ["yes", true], [false, false]]}));

    let err = client.invoke(&mock_contract_ref(), "setFlags", &inputs).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::ValidationError(ValidationError::ArrayElementTypeMismatch {
            first: ValueKind::String,
            second: ValueKind::Bool,
            ..
        })
    ));
}

#[tokio::test]
async fn test_unknown_method_is_forwarded() {
    let client = create_test_client();
    let inputs = args(json!({"anything": [-1, "x"]}));

    client.invoke(&mock_contract_ref(), "notDeclared", &inputs).await.unwrap();
    assert_eq!(client.api().invocations().len(), 1);
}

#[tokio::test]
async fn test_invoke_with_attachments() {
    let client = create_test_client();
    let attachment = create_test_file("json", br#"{"label": "from file"}"#);
    let inputs = args(json!({"label": "x"}));

    client
        .invoke_with_attachments(&mock_contract_ref(), "setLabel", &inputs, &[attachment.clone()])
        .await
        .unwrap();

    let calls = client.api().invocations();
    let file_name = attachment.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(calls[0].attachments, vec![file_name]);

    fs::remove_file(attachment).unwrap();
}

#[tokio::test]
async fn test_missing_attachment_fails_before_sending() {
    let client = create_test_client();
    let missing = temp_dir().join(format!("{}.bin", Uuid::new_v4()));

    let err = client
        .invoke_with_attachments(&mock_contract_ref(), "setLabel", &Arguments::new(), &[missing])
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::AttachmentError(_)));
    assert!(client.api().invocations().is_empty());
}

#[tokio::test]
async fn test_query_is_validated() {
    let client = create_test_client();

    let result = client
        .query(&mock_contract_ref(), "anArr", &args(json!({"first": [1, 2]})))
        .await
        .unwrap();
    assert_eq!(result["method"], "anArr");
    assert_eq!(client.api().queries().len(), 1);

    let err = client
        .query(&mock_contract_ref(), "anArr", &args(json!({"first": [1.5]})))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::ValidationError(ValidationError::ArrayElementNotInt { .. })
    ));
    assert_eq!(client.api().queries().len(), 1);
}

#[tokio::test]
async fn test_deploy_reads_bundle() {
    let client = create_test_client();
    let bundle = create_test_file("zip", b"bundle-bytes");
    let contract = ContractRef::new("registry", "2.0.0");

    let job = client.deploy(&contract, &bundle).await.unwrap();
    assert_eq!(job.kind, JobKind::Deployment);

    let deployments = client.api().deployments();
    assert_eq!(deployments.len(), 1);
    assert_eq!(deployments[0].0, contract);
    assert_eq!(deployments[0].1.bytes, b"bundle-bytes");
    assert_eq!(deployments[0].1.content_type, "application/zip");

    fs::remove_file(bundle).unwrap();
}

#[tokio::test]
async fn test_wait_for_job_succeeds() {
    let api = MockApiClient::new().with_job_statuses([
        JobStatus::Pending,
        JobStatus::Running,
        JobStatus::Succeeded,
    ]);
    let client = create_test_client_with(api);

    let job = client.wait_for_job("invoke-1").await.unwrap();
    assert_eq!(job.status, JobStatus::Succeeded);
    assert_eq!(job.transaction_id.as_deref(), Some("tx-invoke-1"));
}

#[tokio::test]
async fn test_wait_for_job_reports_failure() {
    let api = MockApiClient::new().with_job_statuses([JobStatus::Running, JobStatus::Failed]);
    let client = create_test_client_with(api);

    let err = client.wait_for_job("invoke-1").await.unwrap_err();
    match err {
        ClientError::JobFailed { job_id, status, reason } => {
            assert_eq!(job_id, "invoke-1");
            assert_eq!(status, JobStatus::Failed);
            assert_eq!(reason.as_deref(), Some("execution reverted"));
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_wait_for_cancelled_job_fails() {
    let api = MockApiClient::new().with_job_statuses([JobStatus::Cancelled]);
    let client = create_test_client_with(api);

    let err = client.wait_for_job("invoke-1").await.unwrap_err();
    assert!(matches!(err, ClientError::JobFailed { status: JobStatus::Cancelled, .. }));
}

#[tokio::test]
async fn test_wait_for_job_times_out() {
    let client = create_test_client();

    let err = client.wait_for_job("invoke-1").await.unwrap_err();
    assert!(matches!(err, ClientError::JobTimeout { ref job_id, .. } if job_id == "invoke-1"));
}
