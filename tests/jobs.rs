use std::thread;

use serde_json::json;
use volcano::config::PlotSettings;
use volcano::data::selection::SelectionType;
use volcano::engine::VolcanoEngine;
use volcano::jobs::*;

/// Runs every request on a fresh thread and answers with a fixed payload.
struct ThreadRunner {
    data: serde_json::Value,
}

impl JobRunner for ThreadRunner {
    fn submit(&self, request: JobRequest, on_done: JobCallback) {
        let data = self.data.clone();
        thread::spawn(move || {
            let resp = if request.payload.cmd == "run" {
                StepResponse::Success(StepResult {
                    kind: StepResultType::VolcanoData,
                    data,
                })
            } else {
                StepResponse::Failure {
                    error: format!("unknown command {}", request.payload.cmd),
                }
            };
            on_done(resp);
        });
    }
}

#[test]
fn job_record_follows_worker_messages() {
    let mut job = JobRecord::new("deseq");
    assert_eq!(job.status, JobStatus::Queued);

    let log = WorkerMessage::from_json(r#"{"status":"log","data":{"msg":"fitting","level":"info"}}"#).unwrap();
    assert!(job.apply(log).unwrap().is_none());
    assert_eq!(job.status, JobStatus::Running);
    assert_eq!(job.logs[0].msg, "fitting");

    let done = WorkerMessage::from_json(
        r#"{"status":"success","type":"volcanoData","data":{"log2FoldChange":{"g":1.0},"padj":{"g":0.01}}}"#,
    )
    .unwrap();
    assert!(job.apply(done).unwrap().is_some());
    assert_eq!(job.status, JobStatus::Success);

    let late = WorkerMessage::from_json(r#"{"status":"error","data":"late"}"#).unwrap();
    assert!(job.apply(late).is_err());
}

#[test]
fn worker_error_becomes_failure() {
    let mut job = JobRecord::new("deseq");
    let msg = WorkerMessage::from_json(r#"{"status":"error","data":{"reason":"no counts"}}"#).unwrap();
    match job.apply(msg).unwrap() {
        Some(StepResponse::Failure { error }) => assert!(error.contains("no counts")),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(job.status, JobStatus::Error);
}

#[test]
fn cancel_only_affects_unfinished_jobs() {
    let mut job = JobRecord::new("a");
    job.cancel();
    assert_eq!(job.status, JobStatus::Cancelled);

    let mut done = JobRecord::new("b");
    done.apply(WorkerMessage::from_json(r#"{"status":"error","data":"x"}"#).unwrap())
        .unwrap();
    done.cancel();
    assert_eq!(done.status, JobStatus::Error);
}

#[test]
fn malformed_worker_message_is_an_error() {
    assert!(WorkerMessage::from_json(r#"{"status":"finished"}"#).is_err());
    assert!(WorkerMessage::from_json("not json").is_err());
}

#[test]
fn runner_result_reaches_the_engine_through_a_channel() {
    let runner = ThreadRunner {
        data: json!({
            "log2FoldChange": {"0": 3.0, "1": -0.2},
            "padj": {"0": 1e-6, "1": 0.7},
            "geneID": {"0": "MYC", "1": "ACTB"}
        }),
    };
    let (cb, rx) = channel_callback();
    let genes = vec!["s1".to_string(), "s2".to_string()];
    runner.submit(JobRequest::differential_expression(json!({}), &genes[..1], &genes[1..]), cb);
    let resp = rx.recv().unwrap();
    assert!(resp.is_success());

    let mut e = VolcanoEngine::new(PlotSettings::default());
    e.apply_step_response(resp).unwrap();
    assert_eq!(e.store().len(), 2);
    // select-by-stats runs on load with the default thresholds
    assert!(e.selection(SelectionType::Standard).is_point_selected("MYC"));
    assert!(!e.selection(SelectionType::Standard).is_point_selected("ACTB"));
}

#[test]
fn differential_expression_request_shape() {
    let req = JobRequest::differential_expression(json!({"g": [1, 2]}), &["a".into()], &["b".into()]);
    assert_eq!(req.payload.cmd, "run");
    assert_eq!(req.payload.data["cohortA"], json!(["a"]));
    assert_eq!(req.payload.data["counts"]["g"], json!([1, 2]));
}
