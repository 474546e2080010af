//! Job Runner boundary.
//!
//! The engine only describes work ([`JobRequest`]) and consumes a one-shot
//! [`StepResponse`]. How the work runs (a worker thread, a subprocess, a
//! remote pipeline) belongs to the [`JobRunner`] implementation.

use std::sync::mpsc::{self, Receiver};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, VolcanoError};

/// How to interpret a step result's `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepResultType {
    /// Column dictionary: `{column: {row: value}}`.
    #[serde(rename = "table")]
    Table,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "json")]
    Json,
    /// Column dictionary with `log2FoldChange` and `padj` (and optionally
    /// `geneID`) columns.
    #[serde(rename = "volcanoData")]
    VolcanoData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    #[serde(rename = "type")]
    pub kind: StepResultType,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepResponse {
    Success(StepResult),
    Failure { error: String },
}

impl StepResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, StepResponse::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    pub cmd: String,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    pub script: String,
    pub payload: JobPayload,
}

impl JobRequest {
    /// Differential expression between two cohorts of a counts matrix.
    pub fn differential_expression(counts: Value, cohort_a: &[String], cohort_b: &[String]) -> Self {
        Self {
            script: "differential_expression.py".into(),
            payload: JobPayload {
                cmd: "run".into(),
                data: serde_json::json!({
                    "counts": counts,
                    "cohortA": cohort_a,
                    "cohortB": cohort_b,
                }),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Log,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::Level {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Log => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerLog {
    pub msg: String,
    pub level: LogLevel,
}

/// A message posted by a worker while running a step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WorkerMessage {
    Success {
        data: Value,
        #[serde(rename = "type")]
        kind: StepResultType,
    },
    Error {
        data: Value,
    },
    Log {
        data: WorkerLog,
    },
}

impl WorkerMessage {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Turn a terminal message into a response. Log messages are forwarded
    /// to the `log` facade and yield `None`.
    pub fn into_response(self) -> Result<Option<StepResponse>> {
        match self {
            WorkerMessage::Success { data, kind } => {
                let data = match (kind, data) {
                    (StepResultType::Table | StepResultType::Json, Value::String(s)) => serde_json::from_str(&s)?,
                    (_, d) => d,
                };
                Ok(Some(StepResponse::Success(StepResult { kind, data })))
            }
            WorkerMessage::Error { data } => {
                let error = match data {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                Ok(Some(StepResponse::Failure { error }))
            }
            WorkerMessage::Log { data } => {
                log::log!(target: "volcano::worker", data.level.into(), "{}", data.msg);
                Ok(None)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Success,
    Error,
    Cancelled,
}

/// Bookkeeping for one submitted job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub name: String,
    pub status: JobStatus,
    pub logs: Vec<WorkerLog>,
    pub response: Option<StepResponse>,
}

impl JobRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: JobStatus::Queued,
            logs: Vec::new(),
            response: None,
        }
    }

    /// Fold a worker message into the record. Returns the response once the
    /// job reaches a terminal state.
    pub fn apply(&mut self, msg: WorkerMessage) -> Result<Option<&StepResponse>> {
        if matches!(self.status, JobStatus::Success | JobStatus::Error | JobStatus::Cancelled) {
            return Err(VolcanoError::Job(format!("job '{}' already finished", self.name)));
        }
        if let WorkerMessage::Log { data } = &msg {
            self.status = JobStatus::Running;
            self.logs.push(data.clone());
        }
        match msg.into_response()? {
            Some(resp) => {
                self.status = if resp.is_success() {
                    JobStatus::Success
                } else {
                    JobStatus::Error
                };
                self.response = Some(resp);
                Ok(self.response.as_ref())
            }
            None => Ok(None),
        }
    }

    pub fn cancel(&mut self) {
        if matches!(self.status, JobStatus::Queued | JobStatus::Running) {
            self.status = JobStatus::Cancelled;
        }
    }
}

pub type JobCallback = Box<dyn FnOnce(StepResponse) + Send + 'static>;

/// Executes jobs out of band. The callback is invoked exactly once.
pub trait JobRunner {
    fn submit(&self, request: JobRequest, on_done: JobCallback);
}

/// A callback that forwards its response into a channel the UI can poll.
pub fn channel_callback() -> (JobCallback, Receiver<StepResponse>) {
    let (tx, rx) = mpsc::channel();
    let cb: JobCallback = Box::new(move |resp| {
        if tx.send(resp).is_err() {
            log::warn!("job finished after its receiver was dropped");
        }
    });
    (cb, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_worker_messages() {
        let msg = WorkerMessage::from_json(r#"{"status":"success","type":"json","data":"{\"a\":1}"}"#).unwrap();
        match msg.into_response().unwrap() {
            Some(StepResponse::Success(r)) => {
                assert_eq!(r.kind, StepResultType::Json);
                assert_eq!(r.data["a"], 1);
            }
            other => panic!("unexpected {:?}", other),
        }

        let err = WorkerMessage::from_json(r#"{"status":"error","type":"error","data":"boom"}"#).unwrap();
        assert_eq!(
            err.into_response().unwrap(),
            Some(StepResponse::Failure { error: "boom".into() })
        );
    }

    #[test]
    fn record_tracks_status() {
        let mut rec = JobRecord::new("deseq");
        let log = WorkerMessage::from_json(r#"{"status":"log","data":{"msg":"fitting","level":"info"}}"#).unwrap();
        assert!(rec.apply(log).unwrap().is_none());
        assert_eq!(rec.status, JobStatus::Running);
        let done = WorkerMessage::from_json(r#"{"status":"success","type":"text","data":"ok"}"#).unwrap();
        assert!(rec.apply(done).unwrap().is_some());
        assert_eq!(rec.status, JobStatus::Success);
        assert_eq!(rec.logs.len(), 1);
    }
}
