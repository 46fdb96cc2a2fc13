use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 关联状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/parent_link.ts")]
pub enum LinkStatus {
    Pending,  // 待学生确认
    Active,   // 已关联
    Rejected, // 已拒绝
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkStatus::Pending => write!(f, "pending"),
            LinkStatus::Active => write!(f, "active"),
            LinkStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for LinkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(LinkStatus::Pending),
            "active" => Ok(LinkStatus::Active),
            "rejected" => Ok(LinkStatus::Rejected),
            _ => Err(format!("Invalid link status: {s}")),
        }
    }
}

// 关联来源
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/parent_link.ts")]
pub enum LinkSource {
    Request,    // 家长发起申请
    InviteCode, // 兑换学生邀请码
    Admin,      // 管理员直接关联
}

impl std::fmt::Display for LinkSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkSource::Request => write!(f, "request"),
            LinkSource::InviteCode => write!(f, "invite_code"),
            LinkSource::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for LinkSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "request" => Ok(LinkSource::Request),
            "invite_code" => Ok(LinkSource::InviteCode),
            "admin" => Ok(LinkSource::Admin),
            _ => Err(format!("Invalid link source: {s}")),
        }
    }
}

/// 已有关联与新操作冲突的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkConflict {
    AlreadyConnected,
    RequestAlreadyPending,
}

impl LinkConflict {
    pub fn message(&self) -> &'static str {
        match self {
            LinkConflict::AlreadyConnected => "已与该学生建立关联",
            LinkConflict::RequestAlreadyPending => "已有待确认的关联申请",
        }
    }
}

impl LinkStatus {
    /// 家长发起申请：没有记录或已被拒绝时可重新申请
    pub fn check_request(existing: Option<LinkStatus>) -> Result<LinkStatus, LinkConflict> {
        match existing {
            None | Some(LinkStatus::Rejected) => Ok(LinkStatus::Pending),
            Some(LinkStatus::Pending) => Err(LinkConflict::RequestAlreadyPending),
            Some(LinkStatus::Active) => Err(LinkConflict::AlreadyConnected),
        }
    }

    /// 邀请码或管理员关联：任何非 active 记录直接激活
    pub fn check_direct_link(existing: Option<LinkStatus>) -> Result<LinkStatus, LinkConflict> {
        match existing {
            Some(LinkStatus::Active) => Err(LinkConflict::AlreadyConnected),
            _ => Ok(LinkStatus::Active),
        }
    }

    /// 只有待确认的申请能被学生响应
    pub fn can_respond(&self) -> bool {
        *self == LinkStatus::Pending
    }
}

// 家长-学生关联
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent_link.ts")]
pub struct ParentStudentLink {
    pub id: i64,
    pub parent_id: i64,
    pub student_id: i64,
    pub status: LinkStatus,
    pub source: LinkSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

// 邀请码状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteCodeState {
    Valid,
    Expired,
    Used,
    Revoked,
}

// 学生邀请码
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent_link.ts")]
pub struct InviteCode {
    pub id: i64,
    pub student_id: i64,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used_by: Option<i64>,
    pub used_at: Option<DateTime<Utc>>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl InviteCode {
    pub fn state_at(&self, now: DateTime<Utc>) -> InviteCodeState {
        if self.used_by.is_some() {
            InviteCodeState::Used
        } else if self.revoked {
            InviteCodeState::Revoked
        } else if now >= self.expires_at {
            InviteCodeState::Expired
        } else {
            InviteCodeState::Valid
        }
    }
}

/// 邀请码兑换结果
#[derive(Debug, Clone)]
pub enum RedeemOutcome {
    Linked(ParentStudentLink),
    InvalidCode,
    Expired,
    AlreadyUsed,
    AlreadyConnected,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_conflict_messages() {
        assert_eq!(LinkConflict::AlreadyConnected.message(), "已与该学生建立关联");
        assert_eq!(LinkConflict::RequestAlreadyPending.message(), "已有待确认的关联申请");
    }

    #[test]
    fn test_request_transitions() {
        assert_eq!(LinkStatus::check_request(None), Ok(LinkStatus::Pending));
        assert_eq!(
            LinkStatus::check_request(Some(LinkStatus::Rejected)),
            Ok(LinkStatus::Pending)
        );
        assert_eq!(
            LinkStatus::check_request(Some(LinkStatus::Pending)),
            Err(LinkConflict::RequestAlreadyPending)
        );
        assert_eq!(
            LinkStatus::check_request(Some(LinkStatus::Active)),
            Err(LinkConflict::AlreadyConnected)
        );
    }

    #[test]
    fn test_direct_link_upgrades_non_active() {
        assert_eq!(
            LinkStatus::check_direct_link(Some(LinkStatus::Pending)),
            Ok(LinkStatus::Active)
        );
        assert_eq!(
            LinkStatus::check_direct_link(Some(LinkStatus::Rejected)),
            Ok(LinkStatus::Active)
        );
        assert_eq!(
            LinkStatus::check_direct_link(Some(LinkStatus::Active)),
            Err(LinkConflict::AlreadyConnected)
        );
    }

    #[test]
    fn test_invite_code_state() {
        let now = Utc::now();
        let mut code = InviteCode {
            id: 1,
            student_id: 2,
            code: "ABCD2345".into(),
            expires_at: now + Duration::minutes(10),
            used_by: None,
            used_at: None,
            revoked: false,
            created_at: now,
        };
        assert_eq!(code.state_at(now), InviteCodeState::Valid);
        assert_eq!(
            code.state_at(now + Duration::minutes(10)),
            InviteCodeState::Expired
        );
        code.revoked = true;
        assert_eq!(code.state_at(now), InviteCodeState::Revoked);
        code.used_by = Some(3);
        assert_eq!(code.state_at(now), InviteCodeState::Used);
    }
}
