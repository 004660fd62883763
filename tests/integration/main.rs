use std::{env::temp_dir, fs, path::PathBuf};

use contract_client::{
    errors::{ClientError, ValidationError},
    mock::{create_test_client_with, mock_contract_metadata, mock_contract_ref, MockApiClient},
    rpc::domain::JobStatus,
    validation::{validate_arguments, Arguments},
};
use serde_json::json;
use uuid::Uuid;

mod cli_tests;

/// Creates an empty directory under the system temp dir for a single test to run in.
pub fn create_test_dir() -> PathBuf {
    let mut dir = temp_dir();
    dir.push(format!("contract-client-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Writes the mock contract metadata to `dir` and returns the file path.
pub fn write_mock_metadata(dir: &std::path::Path) -> PathBuf {
    let path = dir.join("metadata.json");
    fs::write(&path, serde_json::to_vec_pretty(&mock_contract_metadata()).unwrap()).unwrap();
    path
}

fn args(value: serde_json::Value) -> Arguments {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_invoke_and_wait_for_transaction() {
    let api = MockApiClient::new().with_job_statuses([JobStatus::Running, JobStatus::Succeeded]);
    let client = create_test_client_with(api);
    let contract = mock_contract_ref();

    let inputs = args(json!({"first": [1, 2, 3], "second": [4, 5]}));
    let job = client.invoke(&contract, "twoArrs", &inputs).await.unwrap();

    let job = client.wait_for_job(&job.id).await.unwrap();
    let transaction_id = job.transaction_id.unwrap();

    let transaction = client.get_transaction(&transaction_id).await.unwrap();
    assert_eq!(transaction.id, transaction_id);
    assert_eq!(client.api().invocations().len(), 1);
}

#[tokio::test]
async fn test_rejected_arguments_never_reach_the_platform() {
    let client = create_test_client_with(MockApiClient::new());
    let contract = mock_contract_ref();

    let cases = [
        ("anArr", json!({"first": "hello"})),
        ("anArr", json!({"first": [[[1]]]})),
        ("twoArrs", json!({"first": [1], "second": [1, -1]})),
        ("nestedArr4", json!({"first": [[1, 2, 3], [4, 5, 6]]})),
        ("setValue", json!({"value": 1.5})),
    ];

    for (method, inputs) in cases {
        let err = client.invoke(&contract, method, &args(inputs)).await.unwrap_err();
        assert!(matches!(err, ClientError::ValidationError(_)), "{method}: {err}");
    }
    assert!(client.api().invocations().is_empty());
}

#[test]
fn test_validation_from_metadata_json() {
    let metadata = serde_json::from_value(json!({
        "contract": {
            "name": "matrix",
            "methods": {
                "store": { "params": [{ "name": "grid", "type": "uint[3][40][99725][]" }] },
                "rename": { "params": [{ "name": "label", "type": "string" }] }
            }
        }
    }))
    .unwrap();

    let row = vec![0; 3];
    let grid = json!([[vec![row; 40]]]);
    assert_eq!(
        validate_arguments("store", &args(json!({"grid": grid})), &metadata),
        Err(ValidationError::ArrayLengthMismatch {
            param: "grid".to_string(),
            expected: 99725,
            actual: 1,
        })
    );

    assert!(validate_arguments("rename", &args(json!({"label": [-1]})), &metadata).is_ok());
}
