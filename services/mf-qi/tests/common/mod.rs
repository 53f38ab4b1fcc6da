//! 测试用的端口实现和会话构造

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use mf_qi::application::{ReferenceLoader, ServiceHandler};
use mf_qi::infrastructure::DraftRepository;
use mf_qi::infrastructure::fallback::fallback_matrix;
use qc_adapter_local_store::MemoryStore;
use qc_common::FixedClock;
use qc_config::FormNumberScheme;
use qc_errors::{AppError, AppResult};
use qc_ports::{
    InspectionSubmission, LocalStorePort, PersonnelRoster, ProductionLine, RecentForm, ReferenceDataPort,
    StandardMatrix, SubmissionPort, SubmissionReceipt,
};

/// 参考数据端口，`None` 表示该表请求失败
pub struct MockReference {
    pub matrix: Mutex<Option<StandardMatrix>>,
    pub personnel: Option<PersonnelRoster>,
    pub lines: Option<Vec<ProductionLine>>,
    pub recent: Vec<RecentForm>,
    pub recent_limits: Mutex<Vec<u32>>,
    pub matrix_calls: AtomicUsize,
    /// 第一次读取标准矩阵时的延迟
    pub first_matrix_delay: Option<Duration>,
}

impl MockReference {
    pub fn healthy() -> Self {
        Self {
            matrix: Mutex::new(Some(fallback_matrix())),
            personnel: Some(PersonnelRoster {
                qc_personnel: vec!["Dewi".into(), "Budi".into()],
                ..Default::default()
            }),
            lines: Some(vec![
                ProductionLine::named("Line 1"),
                ProductionLine::named("Line 2"),
                ProductionLine::named("Line 3"),
            ]),
            recent: vec![RecentForm {
                form_number: "QC-00000001".into(),
                ..Default::default()
            }],
            recent_limits: Mutex::new(Vec::new()),
            matrix_calls: AtomicUsize::new(0),
            first_matrix_delay: None,
        }
    }

    pub fn offline() -> Self {
        Self {
            matrix: Mutex::new(None),
            personnel: None,
            lines: None,
            ..Self::healthy()
        }
    }

    pub fn with_matrix(self, matrix: StandardMatrix) -> Self {
        *self.matrix.lock().unwrap() = Some(matrix);
        self
    }

    pub fn set_matrix(&self, matrix: Option<StandardMatrix>) {
        *self.matrix.lock().unwrap() = matrix;
    }
}

fn offline_error(action: &str) -> AppError {
    AppError::external_service(format!("{} failed: connection refused", action))
}

#[async_trait]
impl ReferenceDataPort for MockReference {
    async fn fetch_standard_matrix(&self) -> AppResult<StandardMatrix> {
        let call = self.matrix_calls.fetch_add(1, Ordering::SeqCst);
        let matrix = self.matrix.lock().unwrap().clone();
        if call == 0 {
            if let Some(delay) = self.first_matrix_delay {
                tokio::time::sleep(delay).await;
            }
        }
        matrix.ok_or_else(|| offline_error("getMatrix"))
    }

    async fn fetch_personnel(&self) -> AppResult<PersonnelRoster> {
        self.personnel.clone().ok_or_else(|| offline_error("getPersonnel"))
    }

    async fn fetch_lines(&self) -> AppResult<Vec<ProductionLine>> {
        self.lines.clone().ok_or_else(|| offline_error("getLines"))
    }

    async fn fetch_recent_forms(&self, limit: u32) -> AppResult<Vec<RecentForm>> {
        self.recent_limits.lock().unwrap().push(limit);
        Ok(self.recent.clone())
    }
}

/// 记录所有提交的端口
#[derive(Default)]
pub struct MockSubmitter {
    pub calls: Mutex<Vec<InspectionSubmission>>,
    pub fail: AtomicBool,
    /// 为 true 时请求永不返回
    pub hang: AtomicBool,
}

impl MockSubmitter {
    pub fn failing() -> Self {
        Self {
            fail: AtomicBool::new(true),
            ..Default::default()
        }
    }

    pub fn hanging() -> Self {
        Self {
            hang: AtomicBool::new(true),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<InspectionSubmission> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SubmissionPort for MockSubmitter {
    async fn submit(&self, submission: &InspectionSubmission) -> AppResult<SubmissionReceipt> {
        self.calls.lock().unwrap().push(submission.clone());
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::external_service("submit failed with HTTP 500"));
        }
        Ok(SubmissionReceipt {
            acknowledged: true,
            message: Some("saved".into()),
            form_number: None,
        })
    }
}

/// 读取总是失败的草稿存储
pub struct UnreadableStore;

#[async_trait]
impl LocalStorePort for UnreadableStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Err(AppError::storage(format!("{}: permission denied", key)))
    }

    async fn set(&self, _key: &str, _value: &str) -> AppResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Ok(())
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub struct Harness {
    pub handler: Arc<ServiceHandler>,
    pub store: MemoryStore,
    pub reference: Arc<MockReference>,
    pub submitter: Arc<MockSubmitter>,
    pub clock: Arc<FixedClock>,
}

pub fn harness(reference: MockReference) -> Harness {
    harness_with(reference, MockSubmitter::default(), MemoryStore::new(), FormNumberScheme::Timestamp)
}

pub fn harness_with(
    reference: MockReference,
    submitter: MockSubmitter,
    store: MemoryStore,
    scheme: FormNumberScheme,
) -> Harness {
    let reference = Arc::new(reference);
    let submitter = Arc::new(submitter);
    let clock = Arc::new(FixedClock::new(
        day(2025, 1, 1).and_hms_opt(8, 30, 0).unwrap(),
    ));

    let handler = Arc::new(ServiceHandler::new(
        Arc::new(ReferenceLoader::new(reference.clone())),
        DraftRepository::new(Arc::new(store.clone())),
        submitter.clone(),
        clock.clone(),
        scheme,
    ));

    Harness {
        handler,
        store,
        reference,
        submitter,
        clock,
    }
}
