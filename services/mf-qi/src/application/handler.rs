//! 检查表会话
//!
//! 服务只持有一个会话，所有修改在同一把异步锁下串行执行。
//! 提交时先在锁内校验并组装，释放锁后发送，再回到锁内处理结果

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use qc_common::Clock;
use qc_common::utils::hhmm_of;
use qc_config::FormNumberScheme;
use qc_errors::{AppError, AppResult};
use qc_ports::{RecentForm, SubmissionPort};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::entities::{Draft, InspectionForm};
use crate::domain::reference::{ReferenceData, ReferenceSources};
use crate::domain::services::{build_submission, validate_for_submission};
use crate::domain::value_objects::{FormNumber, RowId};
use crate::infrastructure::DraftRepository;

use super::commands::{UpdateHeaderCommand, UpdateRowCommand};
use super::reference_loader::ReferenceLoader;
use super::views::{
    DraftInfo, ExpiryCorrection, FormView, HeaderUpdateOutcome, RowView, SessionPhase,
    SubmitOutcome, line_warning,
};

struct SessionState {
    phase: SessionPhase,
    form: InspectionForm,
}

/// 提交中标记，离开作用域时清除
///
/// 请求在发送途中被取消时也会执行
struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct ServiceHandler {
    reference: Arc<ReferenceLoader>,
    drafts: DraftRepository,
    submitter: Arc<dyn SubmissionPort>,
    clock: Arc<dyn Clock>,
    form_number_scheme: FormNumberScheme,
    state: Mutex<SessionState>,
    submitting: AtomicBool,
}

impl ServiceHandler {
    pub fn new(
        reference: Arc<ReferenceLoader>,
        drafts: DraftRepository,
        submitter: Arc<dyn SubmissionPort>,
        clock: Arc<dyn Clock>,
        form_number_scheme: FormNumberScheme,
    ) -> Self {
        let today = clock.local_now().date();
        Self {
            reference,
            drafts,
            submitter,
            clock,
            form_number_scheme,
            state: Mutex::new(SessionState {
                phase: SessionPhase::Starting,
                form: InspectionForm::fresh(today),
            }),
            submitting: AtomicBool::new(false),
        }
    }

    // ========== 启动与草稿 ==========

    /// 加载参考数据，然后检查草稿
    ///
    /// 草稿读取失败时以新表单开始
    pub async fn startup(&self) -> Option<DraftInfo> {
        self.reference.load_all().await;
        match self.check_for_draft().await {
            Ok(draft) => draft,
            Err(e) => {
                warn!(error = %e, "Failed to read draft, starting a new form");
                let mut state = self.state.lock().await;
                self.start_fresh(&mut state);
                None
            }
        }
    }

    /// 检查是否有草稿
    ///
    /// 有草稿时进入待处理状态；没有时以一行空记录开始编辑
    pub async fn check_for_draft(&self) -> AppResult<Option<DraftInfo>> {
        let mut state = self.state.lock().await;
        match self.drafts.load().await? {
            Some(draft) => {
                let info = DraftInfo::from(&draft);
                info!(
                    saved_at = %info.timestamp,
                    rows = info.row_count,
                    "Found saved draft, waiting for restore or discard"
                );
                state.phase = SessionPhase::PendingDraft(info.clone());
                Ok(Some(info))
            }
            None => {
                self.start_fresh(&mut state);
                Ok(None)
            }
        }
    }

    /// 恢复草稿
    pub async fn restore_draft(&self) -> AppResult<FormView> {
        let mut state = self.state.lock().await;
        if !matches!(state.phase, SessionPhase::PendingDraft(_)) {
            return Err(AppError::failed_precondition("没有待恢复的草稿"));
        }

        match self.drafts.load().await? {
            Some(draft) => {
                let mut form = draft.into_form();
                if form.rows().is_empty() {
                    form.add_row(self.current_hhmm());
                }
                info!(
                    rows = form.rows().len(),
                    last_row_id = form.last_row_id(),
                    product = %form.header().product,
                    "Draft restored"
                );
                state.form = form;
                state.phase = SessionPhase::Editing;
            }
            None => {
                warn!("Pending draft disappeared before restore, starting a new form");
                self.start_fresh(&mut state);
            }
        }

        let reference = self.reference.snapshot().await;
        Ok(FormView::build(&state.phase, &state.form, &reference))
    }

    /// 丢弃草稿
    pub async fn discard_draft(&self) -> AppResult<FormView> {
        let mut state = self.state.lock().await;
        if !matches!(state.phase, SessionPhase::PendingDraft(_)) {
            return Err(AppError::failed_precondition("没有待处理的草稿"));
        }

        self.drafts.delete().await?;
        info!("Draft discarded");
        self.start_fresh(&mut state);

        let reference = self.reference.snapshot().await;
        Ok(FormView::build(&state.phase, &state.form, &reference))
    }

    /// 保存草稿
    pub async fn save_draft(&self) -> AppResult<()> {
        let state = self.state.lock().await;
        if state.phase != SessionPhase::Editing {
            return Err(AppError::failed_precondition("表单尚未进入编辑状态"));
        }
        self.persist(&state).await
    }

    /// 定时自动保存，失败只记录日志
    pub async fn autosave(&self) {
        let state = self.state.lock().await;
        if state.phase != SessionPhase::Editing {
            debug!("Autosave skipped, form is not being edited");
            return;
        }
        if let Err(e) = self.persist(&state).await {
            warn!(error = %e, "Autosave failed");
        }
    }

    // ========== 查询 ==========

    pub async fn form_view(&self) -> FormView {
        let state = self.state.lock().await;
        let reference = self.reference.snapshot().await;
        FormView::build(&state.phase, &state.form, &reference)
    }

    pub async fn reference_data(&self) -> ReferenceData {
        self.reference.snapshot().await
    }

    pub async fn reference_sources(&self) -> ReferenceSources {
        self.reference.sources().await
    }

    /// 重新加载参考数据
    pub async fn refresh_reference(&self) -> ReferenceSources {
        info!("Refreshing reference data");
        self.reference.load_all().await
    }

    pub async fn recent_forms(&self, limit: Option<u32>) -> AppResult<Vec<RecentForm>> {
        self.reference.recent_forms(limit).await
    }

    // ========== 表头 ==========

    /// 修改表头，必要时重新评估日期规则
    pub async fn update_header(&self, cmd: UpdateHeaderCommand) -> AppResult<HeaderUpdateOutcome> {
        let mut state = self.state.lock().await;
        self.ensure_editable(&state)?;
        let reference = self.reference.snapshot().await;

        let touches_date_rule = cmd.touches_date_rule();
        let allow_autofill = cmd.allows_autofill();
        cmd.apply(state.form.header_mut());

        let date_check = if touches_date_rule {
            let shelf_life = reference.shelf_life_of(&state.form.header().product);
            let check = state.form.apply_date_rule(shelf_life, allow_autofill);
            if check.is_rejected() {
                warn!(?check, "Expiry date is not after production date, cleared");
            } else if check.is_mismatch() {
                info!(?check, "Expiry date differs from shelf life");
            }
            Some(check)
        } else {
            None
        };

        let header = state.form.header().clone();
        let warning = line_warning(&header, &reference);
        if let Some(w) = &warning {
            warn!(line = %header.line, product = %header.product, "{}", w);
        }

        self.persist_quietly(&state).await;

        Ok(HeaderUpdateOutcome {
            standards: reference
                .product(&header.product)
                .map(|_| reference.snapshot_for(&header.product)),
            header,
            date_check,
            line_warning: warning,
        })
    }

    /// 接受到期日更正: 到期日 = 生产日期 + 保质期
    pub async fn accept_expiry_correction(&self) -> AppResult<ExpiryCorrection> {
        let mut state = self.state.lock().await;
        self.ensure_editable(&state)?;
        let reference = self.reference.snapshot().await;

        let product = state.form.header().product.clone();
        let shelf_life = reference
            .shelf_life_of(&product)
            .ok_or_else(|| AppError::failed_precondition("未选择有效产品"))?;
        let expiry_date = state
            .form
            .correct_expiry(shelf_life)
            .ok_or_else(|| AppError::failed_precondition("生产日期为空或保质期无效"))?;

        info!(%expiry_date, product = %product, "Expiry date corrected");
        self.persist_quietly(&state).await;
        Ok(ExpiryCorrection { expiry_date })
    }

    /// 清空表单和草稿，以一行空记录重新开始
    pub async fn reset(&self) -> AppResult<FormView> {
        let mut state = self.state.lock().await;
        if self.is_submitting() {
            return Err(AppError::conflict("表单正在提交"));
        }
        self.drafts.delete().await?;
        self.start_fresh(&mut state);
        info!("Form reset");

        let reference = self.reference.snapshot().await;
        Ok(FormView::build(&state.phase, &state.form, &reference))
    }

    // ========== 托盘行 ==========

    /// 追加一行，时间取当前本地时间
    pub async fn add_row(&self) -> AppResult<RowView> {
        let mut state = self.state.lock().await;
        self.ensure_editable(&state)?;

        let time = self.current_hhmm();
        let view = RowView::from(state.form.add_row(time));
        debug!(row = %view.id, "Row added");

        self.persist_quietly(&state).await;
        Ok(view)
    }

    pub async fn remove_row(&self, id: RowId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        self.ensure_editable(&state)?;

        state
            .form
            .remove_row(id)
            .ok_or_else(|| row_not_found(id))?;
        debug!(row = %id, "Row removed");

        self.persist_quietly(&state).await;
        Ok(())
    }

    pub async fn update_row(&self, id: RowId, cmd: UpdateRowCommand) -> AppResult<RowView> {
        let mut state = self.state.lock().await;
        self.ensure_editable(&state)?;

        let row = state.form.row_mut(id).ok_or_else(|| row_not_found(id))?;
        cmd.apply(row)
            .map_err(|e| AppError::validation(e.to_string()))?;
        let view = RowView::from(&*row);

        self.persist_quietly(&state).await;
        Ok(view)
    }

    /// 五项全部置为 OK
    pub async fn mark_all_ok(&self, id: RowId) -> AppResult<RowView> {
        let mut state = self.state.lock().await;
        self.ensure_editable(&state)?;

        let row = state.form.row_mut(id).ok_or_else(|| row_not_found(id))?;
        row.mark_all_ok();
        let view = RowView::from(&*row);

        self.persist_quietly(&state).await;
        Ok(view)
    }

    // ========== 提交 ==========

    /// 校验、组装并发送
    ///
    /// 成功后删除草稿并重置表单；失败时保留草稿，不自动重试
    pub async fn submit(&self) -> AppResult<SubmitOutcome> {
        let (submission, guard) = {
            let state = self.state.lock().await;
            self.ensure_editable(&state)?;

            let reference = self.reference.snapshot().await;
            let validated = validate_for_submission(&state.form, &reference)?;
            let form_number = FormNumber::generate(
                self.form_number_scheme,
                self.clock.now(),
                self.clock.local_now(),
                &state.form.header().line,
            );
            let submission = build_submission(&validated, &form_number, self.clock.now());

            // 先落盘，失败时用户的最新修改仍在草稿里
            self.persist_quietly(&state).await;
            self.submitting.store(true, Ordering::SeqCst);
            (submission, SubmittingGuard(&self.submitting))
        };

        let result = self.submitter.submit(&submission).await;

        let mut state = self.state.lock().await;
        drop(guard);

        match result {
            Ok(receipt) => {
                qc_telemetry::record_submission(true);
                let form_number = receipt
                    .form_number
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| submission.form_number.clone());
                info!(
                    form_number = %form_number,
                    pallets = submission.pallet_checks.len(),
                    acknowledged = receipt.acknowledged,
                    "Inspection form submitted"
                );

                if let Err(e) = self.drafts.delete().await {
                    warn!(error = %e, "Failed to delete draft after submission");
                }
                self.start_fresh(&mut state);

                Ok(SubmitOutcome {
                    form_number,
                    acknowledged: receipt.acknowledged,
                    message: receipt.message,
                })
            }
            Err(e) => {
                qc_telemetry::record_submission(false);
                warn!(
                    form_number = %submission.form_number,
                    error = %e,
                    "Submission failed, draft kept"
                );
                Err(match e {
                    AppError::ExternalService(_) => e,
                    other => AppError::external_service(other.to_string()),
                })
            }
        }
    }

    // ========== 内部 ==========

    fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    fn ensure_editable(&self, state: &SessionState) -> AppResult<()> {
        match state.phase {
            SessionPhase::Editing if self.is_submitting() => {
                Err(AppError::conflict("表单正在提交"))
            }
            SessionPhase::Editing => Ok(()),
            SessionPhase::PendingDraft(_) => Err(AppError::failed_precondition(
                "请先恢复或丢弃已保存的草稿",
            )),
            SessionPhase::Starting => Err(AppError::failed_precondition("服务仍在启动")),
        }
    }

    fn current_hhmm(&self) -> String {
        hhmm_of(self.clock.local_now())
    }

    fn today(&self) -> NaiveDate {
        self.clock.local_now().date()
    }

    /// 新表单 + 一行空记录
    fn start_fresh(&self, state: &mut SessionState) {
        let mut form = InspectionForm::fresh(self.today());
        form.add_row(self.current_hhmm());
        state.form = form;
        state.phase = SessionPhase::Editing;
    }

    async fn persist(&self, state: &SessionState) -> AppResult<()> {
        let draft = Draft::capture(&state.form, self.clock.now());
        self.drafts.save(&draft).await?;
        qc_telemetry::record_draft_saved();
        Ok(())
    }

    /// 编辑操作附带的保存，失败不影响操作本身
    async fn persist_quietly(&self, state: &SessionState) {
        if let Err(e) = self.persist(state).await {
            warn!(error = %e, "Failed to save draft");
        }
    }
}


fn row_not_found(id: RowId) -> AppError {
    AppError::not_found(format!("托盘行 {} 不存在", id))
}
