//! 通用类型定义

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 时钟抽象
///
/// 行号默认时间、表单编号和草稿时间戳都从这里取时间，测试中可替换为固定时钟
pub trait Clock: Send + Sync {
    /// 当前 UTC 时间
    fn now(&self) -> DateTime<Utc>;

    /// 当前本地墙上时间（产线所在时区）
    fn local_now(&self) -> NaiveDateTime;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// 固定时钟，本地时间与 UTC 视为相同
#[derive(Debug, Default)]
pub struct FixedClock {
    at: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self { at: Mutex::new(at) }
    }

    /// 调整时钟
    pub fn set(&self, at: NaiveDateTime) {
        if let Ok(mut guard) = self.at.lock() {
            *guard = at;
        }
    }

    fn get(&self) -> NaiveDateTime {
        self.at.lock().map(|guard| *guard).unwrap_or_default()
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.get().and_utc()
    }

    fn local_now(&self) -> NaiveDateTime {
        self.get()
    }
}

/// 请求序号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[display("#{_0}")]
pub struct SequenceNumber(pub u64);

/// 单调递增的请求序号发生器
///
/// 同一资源的多次重叠请求中，只有最后发出的那个的响应会被接受
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发出新请求时领取序号
    pub fn issue(&self) -> SequenceNumber {
        SequenceNumber(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// 响应到达时判断是否仍为最新请求
    pub fn is_latest(&self, seq: SequenceNumber) -> bool {
        self.latest.load(Ordering::SeqCst) == seq.0
    }

    /// 最近一次发出的序号
    pub fn latest(&self) -> SequenceNumber {
        SequenceNumber(self.latest.load(Ordering::SeqCst))
    }
}
