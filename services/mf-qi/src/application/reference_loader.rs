//! 参考数据加载
//!
//! 三张表各自独立加载，失败时换用内置数据。同一张表重叠加载时，
//! 只有最后发出的请求的响应会被采用

use std::sync::Arc;

use qc_common::{RequestSequence, SequenceNumber};
use qc_errors::AppResult;
use qc_ports::{RecentForm, ReferenceDataPort};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::reference::{DataSource, ReferenceData, ReferenceSources, ReferenceTable};
use crate::infrastructure::fallback::{fallback_lines, fallback_matrix, fallback_personnel};

/// 最近表单默认条数
pub const DEFAULT_RECENT_LIMIT: u32 = 10;
/// 最近表单最大条数
pub const MAX_RECENT_LIMIT: u32 = 100;

pub struct ReferenceLoader {
    port: Arc<dyn ReferenceDataPort>,
    data: RwLock<ReferenceData>,
    products_seq: RequestSequence,
    personnel_seq: RequestSequence,
    lines_seq: RequestSequence,
}

impl ReferenceLoader {
    pub fn new(port: Arc<dyn ReferenceDataPort>) -> Self {
        Self {
            port,
            data: RwLock::new(ReferenceData::default()),
            products_seq: RequestSequence::new(),
            personnel_seq: RequestSequence::new(),
            lines_seq: RequestSequence::new(),
        }
    }

    /// 当前参考数据的副本
    pub async fn snapshot(&self) -> ReferenceData {
        self.data.read().await.clone()
    }

    pub async fn sources(&self) -> ReferenceSources {
        self.data.read().await.sources
    }

    /// 加载产品标准矩阵，空矩阵视为失败
    ///
    /// 响应已被更新的请求取代时返回 None
    pub async fn load_products(&self) -> Option<DataSource> {
        let seq = self.products_seq.issue();
        let fetched = self.port.fetch_standard_matrix().await;
        self.apply(
            ReferenceTable::Products,
            &self.products_seq,
            seq,
            fetched,
            |matrix| !matrix.is_empty(),
            fallback_matrix,
            |data, matrix| data.matrix = matrix,
        )
        .await
    }

    pub async fn load_personnel(&self) -> Option<DataSource> {
        let seq = self.personnel_seq.issue();
        let fetched = self.port.fetch_personnel().await;
        self.apply(
            ReferenceTable::Personnel,
            &self.personnel_seq,
            seq,
            fetched,
            |_| true,
            fallback_personnel,
            |data, roster| data.personnel = roster,
        )
        .await
    }

    pub async fn load_lines(&self) -> Option<DataSource> {
        let seq = self.lines_seq.issue();
        let fetched = self.port.fetch_lines().await;
        self.apply(
            ReferenceTable::Lines,
            &self.lines_seq,
            seq,
            fetched,
            |_| true,
            fallback_lines,
            |data, lines| data.lines = lines,
        )
        .await
    }

    /// 并发加载三张表
    pub async fn load_all(&self) -> ReferenceSources {
        let (products, personnel, lines) =
            tokio::join!(self.load_products(), self.load_personnel(), self.load_lines());
        debug!(?products, ?personnel, ?lines, "Reference load round finished");

        let sources = self.sources().await;
        info!(
            products = ?sources.products,
            personnel = ?sources.personnel,
            lines = ?sources.lines,
            "Reference data ready"
        );
        sources
    }

    /// 最近提交的表单，条数限制在 1..=100
    pub async fn recent_forms(&self, limit: Option<u32>) -> AppResult<Vec<RecentForm>> {
        let limit = limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(1, MAX_RECENT_LIMIT);
        self.port.fetch_recent_forms(limit).await
    }

    #[allow(clippy::too_many_arguments)]
    async fn apply<T>(
        &self,
        table: ReferenceTable,
        sequence: &RequestSequence,
        seq: SequenceNumber,
        fetched: AppResult<T>,
        accept: impl FnOnce(&T) -> bool,
        fallback: impl FnOnce() -> T,
        store: impl FnOnce(&mut ReferenceData, T),
    ) -> Option<DataSource> {
        let (value, source) = match fetched {
            Ok(value) if accept(&value) => (value, DataSource::Remote),
            Ok(_) => {
                warn!(table = %table, "Remote returned an empty table, using built-in data");
                (fallback(), DataSource::Fallback)
            }
            Err(e) => {
                warn!(table = %table, error = %e, "Failed to load reference data, using built-in data");
                (fallback(), DataSource::Fallback)
            }
        };

        // 在写锁内判断，保证两个响应不会交错写入
        let mut data = self.data.write().await;
        if !sequence.is_latest(seq) {
            debug!(
                table = %table,
                seq = %seq,
                latest = %sequence.latest(),
                "Discarding superseded reference response"
            );
            return None;
        }

        if source == DataSource::Fallback {
            qc_telemetry::record_reference_fallback(table.as_str());
        }
        store(&mut data, value);
        data.sources.set(table, source);
        Some(source)
    }
}
