//! # ReactiveProperty：响应式属性内核
//!
//! 基于 [`tokio::sync::watch`]，下载器用它对外发布阶段与进度。
//! 对外以 [`UnlockReactiveProperty`](super::unlock_reactive::UnlockReactiveProperty) 的名字导出。
//!
//! 所有属性句柄都销毁后，监听器的 [`PropertyWatcher::changed`] 返回 [`ReactivePropertyError::Closed`]。

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::sync::watch::error::RecvError;

// ──────────────────────────── Error ────────────────────────────

/// 响应式属性统一错误类型
#[derive(Debug, Error)]
pub enum ReactivePropertyError {
    /// 所有属性句柄都已销毁，不会再有新值
    #[error("属性已被销毁，不会再有新值: {0}")]
    Closed(#[from] RecvError),
}

// ──────────────────────────── ReactiveProperty ────────────────────────────

/// 响应式属性内核：clone 出来的句柄共享同一个值。
#[derive(Clone, Debug)]
pub struct ReactiveProperty<T: Clone + Send + Sync> {
    sender: Arc<watch::Sender<T>>,
}

impl<T> ReactiveProperty<T>
where
    T: Clone + Send + Sync,
{
    /// 创建一个新的响应式属性。
    pub fn new(value: T) -> Self {
        let (sender, _) = watch::channel(value);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// 更新属性的值，所有监听者都会收到通知。
    ///
    /// 没有监听者时也会更新，`get_current` 能读到最新值。
    pub fn update(&self, new_value: T) -> &Self {
        self.sender.send_replace(new_value);
        self
    }

    /// 使用闭包原地修改当前值（读-改-写在发送端锁内完成）。
    pub fn update_field<F>(&self, updater: F) -> &Self
    where
        F: FnOnce(&mut T),
    {
        self.sender.send_modify(updater);
        self
    }

    /// 获取当前属性值的快照（会 clone）。
    pub fn get_current(&self) -> T {
        self.sender.borrow().clone()
    }

    /// 创建一个监听器，用于异步监听属性值的变化。
    pub fn watch(&self) -> PropertyWatcher<T> {
        PropertyWatcher {
            receiver: self.sender.subscribe(),
        }
    }
}

// ──────────────────────────── PropertyWatcher ────────────────────────────

/// 属性监听器，用于异步接收属性值的变化。不会延长属性本身的生命周期。
pub struct PropertyWatcher<T> {
    receiver: watch::Receiver<T>,
}

impl<T> PropertyWatcher<T>
where
    T: Clone + Send + Sync,
{
    /// 异步等待属性值的变化，返回新值。
    pub async fn changed(&mut self) -> Result<T, ReactivePropertyError> {
        self.receiver.changed().await?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    /// 同步获取当前值的克隆。
    pub fn borrow(&self) -> T {
        self.receiver.borrow().clone()
    }
}
