//! Request/confirm protocol for destructive store operations.
//!
//! # Invariants
//! - At most one action is pending at a time; a new request replaces it.
//! - Confirm and cancel both clear the pending action.

use crate::model::record::RecordId;

/// Destructive operation awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingActionKind {
    /// Delete one record.
    DeleteOne(RecordId),
    /// Delete every record and reset case metadata.
    ClearAll,
}

/// Pending action plus the prompt shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub kind: PendingActionKind,
    pub title: &'static str,
    pub message: &'static str,
}

impl PendingAction {
    pub fn delete_one(id: RecordId) -> Self {
        Self {
            kind: PendingActionKind::DeleteOne(id),
            title: "Удаление записи",
            message: "Вы уверены, что хотите безвозвратно удалить эту запись?",
        }
    }

    pub fn clear_all() -> Self {
        Self {
            kind: PendingActionKind::ClearAll,
            title: "Очистка базы данных",
            message: "ВНИМАНИЕ: Вы собираетесь удалить ВСЕ записи и настройки дела. \
                      Это действие нельзя отменить. Продолжить?",
        }
    }

    /// Record targeted by the action, if any.
    pub fn target(&self) -> Option<&RecordId> {
        match &self.kind {
            PendingActionKind::DeleteOne(id) => Some(id),
            PendingActionKind::ClearAll => None,
        }
    }
}
