//! User-facing notices for dashboard operations

use serde::Serialize;

use crate::errors::BiolinkerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Success,
    Destructive,
}

/// 操作结果提示（成功或失败都有一条）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

/// 仪表盘上的可见操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    AddLink,
    UpdateLink,
    DeleteLink,
    Reorder,
    SaveProfile,
}

impl Operation {
    fn failure_text(self) -> &'static str {
        match self {
            Operation::Load => "Failed to load dashboard",
            Operation::AddLink => "Failed to add link. Please try again.",
            Operation::UpdateLink => "Failed to update link",
            Operation::DeleteLink => "Failed to delete link",
            Operation::Reorder => "Failed to reorder links",
            Operation::SaveProfile => "Failed to update profile. Please try again.",
        }
    }

    fn success_text(self) -> (&'static str, &'static str) {
        match self {
            Operation::Load => ("Dashboard loaded", "Your profile and links are up to date."),
            Operation::AddLink => ("Link added", "Your new link has been added successfully."),
            Operation::UpdateLink => ("Link updated", "Your link has been updated."),
            Operation::DeleteLink => ("Link deleted", "Your link has been deleted successfully."),
            Operation::Reorder => ("Links reordered", "Your links are in their new order."),
            Operation::SaveProfile => (
                "Profile updated",
                "Your profile has been updated successfully.",
            ),
        }
    }
}

impl Notice {
    pub fn success(op: Operation) -> Self {
        let (title, description) = op.success_text();
        Notice {
            title: title.to_string(),
            description: description.to_string(),
            variant: NoticeVariant::Success,
        }
    }

    /// 校验错误显示具体原因，远端错误显示该操作的通用失败文案
    pub fn failure(op: Operation, err: &BiolinkerError) -> Self {
        let (title, description) = match err {
            BiolinkerError::Validation(msg) if msg == super::dashboard::USERNAME_REQUIRED => {
                ("Username required", "Please enter a username for your profile.")
            }
            BiolinkerError::Validation(msg) => ("Error", msg.as_str()),
            BiolinkerError::Conflict(msg) => ("Error", msg.as_str()),
            BiolinkerError::NotFound(_)
                if matches!(op, Operation::UpdateLink | Operation::DeleteLink) =>
            {
                ("Error", "Link not found")
            }
            _ => ("Error", op.failure_text()),
        };

        Notice {
            title: title.to_string(),
            description: description.to_string(),
            variant: NoticeVariant::Destructive,
        }
    }
}
