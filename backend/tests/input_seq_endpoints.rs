//! End-to-end behaviour of `/inputSeq/*` over the stub analysis script.

mod support;

use actix_web::test;
use cap_std::{ambient_authority, fs::Dir};
use futures_util::future::join;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use support::{Harness, build_app, status_and_json};
use virusdecode::test_support::analysis_script::KNOWN_REFERENCE;
use virusdecode::test_support::cap_fs::entry_count;

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

async fn post(harness: &Harness, uri: &str, body: Value) -> (u16, Value) {
    let app = test::init_service(build_app(harness.state())).await;
    let request = test::TestRequest::post().uri(uri).set_json(body).to_request();
    status_and_json(test::call_service(&app, request).await).await
}

#[rstest]
#[actix_web::test]
async fn known_reference_returns_metadata(harness: Harness) {
    let (status, body) = post(
        &harness,
        "/inputSeq/reference",
        json!({"sequenceId": KNOWN_REFERENCE}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["sequence_id"], KNOWN_REFERENCE);
    assert_eq!(body["length"], 29903);
}

#[rstest]
#[actix_web::test]
async fn unknown_reference_is_no_content(harness: Harness) {
    let (status, body) = post(
        &harness,
        "/inputSeq/reference",
        json!({"sequenceId": "XX_999999"}),
    )
    .await;

    assert_eq!(status, 204);
    assert_eq!(body, Value::Null);
}

#[rstest]
#[actix_web::test]
async fn unusable_script_output_is_bad_gateway(harness: Harness) {
    let (status, body) = post(&harness, "/inputSeq/reference", json!({"sequenceId": "BROKEN"})).await;

    assert_eq!(status, 502);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "analysis_failed");
}

#[rstest]
#[actix_web::test]
async fn literal_sequence_is_aligned_from_its_own_text(harness: Harness) {
    let (status, body) = post(
        &harness,
        "/inputSeq/alignment",
        json!({"referenceSequenceId": null, "sequences": {"variant": "ACGT"}, "files": []}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["input"], ">variantACGT");
    assert_eq!(
        entry_count(&harness.script.scratch_dir()).expect("count workspaces"),
        0,
        "request workspace is discarded"
    );
}

#[rstest]
#[actix_web::test]
async fn uploaded_fasta_keeps_its_header(harness: Harness) {
    let (status, body) = post(
        &harness,
        "/inputSeq/alignment",
        json!({"files": [{"name": "upload.fasta", "content": ">MW642250.1\nGGCC\n"}]}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["input"], ">MW642250.1GGCC");
}

#[rstest]
#[actix_web::test]
async fn reference_submission_is_staged_as_marker(harness: Harness) {
    let (status, body) = post(
        &harness,
        "/inputSeq/alignment",
        json!({"referenceSequenceId": KNOWN_REFERENCE}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["input"], KNOWN_REFERENCE);
}

#[rstest]
#[actix_web::test]
async fn frontend_body_aligns_sequences_against_its_reference(harness: Harness) {
    let (status, body) = post(
        &harness,
        "/inputSeq/alignment",
        json!({
            "referenceSequenceId": KNOWN_REFERENCE,
            "sequences": {"omicron": "ACGT"},
            "files": [{"name": "delta.fasta", "content": ">delta\nTTGA\n"}],
        }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["input"], ">omicronACGT>deltaTTGA");
    assert_eq!(body["reference"], KNOWN_REFERENCE);
    assert_eq!(
        entry_count(&harness.script.scratch_dir()).expect("count workspaces"),
        0
    );
}

#[rstest]
#[actix_web::test]
async fn script_without_output_is_no_content(harness: Harness) {
    let (status, _) = post(
        &harness,
        "/inputSeq/alignment",
        json!({"sequences": {"variant": "NODATA"}}),
    )
    .await;

    assert_eq!(status, 204);
}

#[rstest]
#[actix_web::test]
async fn script_failure_is_bad_gateway_not_no_content(harness: Harness) {
    let (status, body) = post(
        &harness,
        "/inputSeq/alignment",
        json!({"sequences": {"variant": "FAIL"}}),
    )
    .await;

    assert_eq!(status, 502);
    assert_eq!(body["code"], "analysis_failed");
    assert!(
        !body["message"].as_str().unwrap_or_default().contains("alignment failed"),
        "script stderr stays in the logs"
    );
}

#[rstest]
#[actix_web::test]
async fn missing_body_is_bad_request(harness: Harness) {
    let app = test::init_service(build_app(harness.state())).await;
    let request = test::TestRequest::post()
        .uri("/inputSeq/alignment")
        .to_request();

    let (status, body) = status_and_json(test::call_service(&app, request).await).await;

    assert_eq!(status, 400);
    assert_eq!(body["status"], "error");
    assert_eq!(body["details"]["code"], "missing_body");
}

#[rstest]
#[actix_web::test]
async fn unwritable_workspace_is_storage_failure(harness: Harness) {
    let root = harness.script.scratch_dir();
    let parent = root.parent().expect("scratch dir has a parent");
    let name = root.file_name().expect("scratch dir has a name");
    Dir::open_ambient_dir(parent, ambient_authority())
        .expect("open parent")
        .remove_dir(name)
        .expect("remove empty workspace root");

    let (status, body) = post(
        &harness,
        "/inputSeq/alignment",
        json!({"sequences": {"variant": "ACGT"}}),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(body["code"], "storage_failed");
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("failed to save submission")),
        "message explains the storage failure: {body}"
    );
}

#[rstest]
#[actix_web::test]
async fn concurrent_alignments_get_their_own_results(harness: Harness) {
    let app = test::init_service(build_app(harness.state())).await;
    let first = test::TestRequest::post()
        .uri("/inputSeq/alignment")
        .set_json(json!({"sequences": {"first": "AAAA"}}))
        .to_request();
    let second = test::TestRequest::post()
        .uri("/inputSeq/alignment")
        .set_json(json!({"sequences": {"second": "CCCC"}}))
        .to_request();

    let (first, second) = join(
        test::call_service(&app, first),
        test::call_service(&app, second),
    )
    .await;
    let (first_status, first_body) = status_and_json(first).await;
    let (second_status, second_body) = status_and_json(second).await;

    assert_eq!((first_status, second_status), (200, 200));
    assert_eq!(first_body["input"], ">firstAAAA");
    assert_eq!(second_body["input"], ">secondCCCC");
    assert_eq!(
        entry_count(&harness.script.scratch_dir()).expect("count workspaces"),
        0
    );
}
