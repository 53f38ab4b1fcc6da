//! 远端表格服务 trait 定义

use async_trait::async_trait;
use qc_errors::AppResult;

use crate::{
    InspectionSubmission, PersonnelRoster, ProductionLine, RecentForm, StandardMatrix,
    SubmissionReceipt,
};

/// 参考数据读取
#[async_trait]
pub trait ReferenceDataPort: Send + Sync {
    /// 读取产品标准矩阵（`action=getMatrix`）
    async fn fetch_standard_matrix(&self) -> AppResult<StandardMatrix>;

    /// 读取人员名单（`action=getPersonnel`）
    async fn fetch_personnel(&self) -> AppResult<PersonnelRoster>;

    /// 读取产线（`action=getLines`）
    async fn fetch_lines(&self) -> AppResult<Vec<ProductionLine>>;

    /// 读取最近提交的表单（`action=getRecentForms&limit=N`）
    async fn fetch_recent_forms(&self, limit: u32) -> AppResult<Vec<RecentForm>>;
}

/// 检查表提交
#[async_trait]
pub trait SubmissionPort: Send + Sync {
    /// 追加一条检查记录
    async fn submit(&self, submission: &InspectionSubmission) -> AppResult<SubmissionReceipt>;
}
