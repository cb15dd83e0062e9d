//! 会话级资料缓存
//!
//! 短时间内重复挂载应用外壳时直接复用 {profile, modules}，跳过网络请求

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::models::ProfileWithModules;

struct CachedEntry {
    data: ProfileWithModules,
    stored_at: Instant,
}

/// 资料缓存，克隆后共享同一份数据
#[derive(Clone)]
pub struct ProfileCache {
    entry: Arc<Mutex<Option<CachedEntry>>>,
    ttl: Duration,
}

impl ProfileCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: Arc::new(Mutex::new(None)),
            ttl,
        }
    }

    /// 读取未过期的缓存；过期条目会被清除
    pub fn get(&self) -> Option<ProfileWithModules> {
        let mut guard = match self.entry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match guard.as_ref() {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.data.clone()),
            Some(_) => {
                debug!("资料缓存已过期");
                *guard = None;
                None
            }
            None => None,
        }
    }

    pub fn store(&self, data: ProfileWithModules) {
        let mut guard = match self.entry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(CachedEntry {
            data,
            stored_at: Instant::now(),
        });
    }

    pub fn clear(&self) {
        let mut guard = match self.entry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = None;
    }
}
