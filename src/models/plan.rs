use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{ContentCategory, PlanId};

/// Sentinel meaning a category has no quota ceiling.
pub const UNLIMITED: i64 = -1;

/// A used/total counter pair for one content category.
/// `total == -1` means unlimited; `used` is still kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Quota {
    pub used: i64,
    pub total: i64,
}

impl Quota {
    pub fn new(total: i64) -> Self {
        Self { used: 0, total }
    }

    pub fn is_unlimited(&self) -> bool {
        self.total == UNLIMITED
    }

    pub fn has_remaining(&self) -> bool {
        self.is_unlimited() || self.used < self.total
    }
}

/// One user's full usage ledger: every category is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UsageSnapshot {
    pub posts: Quota,
    pub images: Quota,
    pub scripts: Quota,
    pub agents: Quota,
}

impl UsageSnapshot {
    pub fn from_user(user: &crate::entities::users::Model) -> Self {
        Self {
            posts: Quota {
                used: user.posts_used,
                total: user.posts_total,
            },
            images: Quota {
                used: user.images_used,
                total: user.images_total,
            },
            scripts: Quota {
                used: user.scripts_used,
                total: user.scripts_total,
            },
            agents: Quota {
                used: user.agents_used,
                total: user.agents_total,
            },
        }
    }

    pub fn quota(&self, category: ContentCategory) -> Quota {
        match category {
            ContentCategory::Posts => self.posts,
            ContentCategory::Images => self.images,
            ContentCategory::Scripts => self.scripts,
            ContentCategory::Agents => self.agents,
        }
    }
}

impl PlanId {
    /// The static plan catalog: default quotas applied whenever an account
    /// moves onto this plan. Replaced wholesale, never merged.
    pub fn default_quotas(&self) -> UsageSnapshot {
        match self {
            PlanId::Starter => UsageSnapshot {
                posts: Quota::new(10),
                images: Quota::new(2),
                scripts: Quota::new(1),
                agents: Quota::new(0),
            },
            PlanId::Pro => UsageSnapshot {
                posts: Quota::new(2000),
                images: Quota::new(200),
                scripts: Quota::new(50),
                agents: Quota::new(5),
            },
            PlanId::Yearly => UsageSnapshot {
                posts: Quota::new(UNLIMITED),
                images: Quota::new(UNLIMITED),
                scripts: Quota::new(UNLIMITED),
                agents: Quota::new(10),
            },
        }
    }

    /// Feature gating independent of quota: Starter has no access to
    /// scripts or agents even though its catalog carries finite totals.
    pub fn allows(&self, category: ContentCategory) -> bool {
        match self {
            PlanId::Starter => !matches!(
                category,
                ContentCategory::Scripts | ContentCategory::Agents
            ),
            PlanId::Pro | PlanId::Yearly => true,
        }
    }
}

/// Why a consumption request was denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The plan does not include this category at all.
    PlanLocked,
    /// The category exists on this plan but its quota is spent.
    LimitReached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// The entitlement gate. Pure: reads the plan and ledger, mutates nothing.
/// Callers charge quota through the usage ledger only after the downstream
/// action has actually succeeded.
pub fn can_consume(plan: &PlanId, usage: &UsageSnapshot, category: ContentCategory) -> Decision {
    if !plan.allows(category) {
        return Decision::Deny(DenyReason::PlanLocked);
    }
    let quota = usage.quota(category);
    if quota.has_remaining() {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::LimitReached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_matches_published_limits() {
        let starter = PlanId::Starter.default_quotas();
        assert_eq!(starter.posts, Quota { used: 0, total: 10 });
        assert_eq!(starter.images, Quota { used: 0, total: 2 });
        assert_eq!(starter.scripts, Quota { used: 0, total: 1 });
        assert_eq!(starter.agents, Quota { used: 0, total: 0 });

        let pro = PlanId::Pro.default_quotas();
        assert_eq!(pro.posts.total, 2000);
        assert_eq!(pro.images.total, 200);
        assert_eq!(pro.scripts.total, 50);
        assert_eq!(pro.agents.total, 5);

        let yearly = PlanId::Yearly.default_quotas();
        assert!(yearly.posts.is_unlimited());
        assert!(yearly.images.is_unlimited());
        assert!(yearly.scripts.is_unlimited());
        assert_eq!(yearly.agents.total, 10);
    }

    #[test]
    fn allows_within_quota() {
        let usage = PlanId::Starter.default_quotas();
        assert_eq!(
            can_consume(&PlanId::Starter, &usage, ContentCategory::Posts),
            Decision::Allow
        );
    }

    #[test]
    fn denies_when_limit_reached() {
        let mut usage = PlanId::Starter.default_quotas();
        usage.posts.used = usage.posts.total;
        assert_eq!(
            can_consume(&PlanId::Starter, &usage, ContentCategory::Posts),
            Decision::Deny(DenyReason::LimitReached)
        );
    }

    #[test]
    fn starter_scripts_are_plan_locked_not_limit_reached() {
        // Starter carries scripts 0/1 in the catalog but the plan itself
        // locks the category, and that is the reason the user must see.
        let usage = PlanId::Starter.default_quotas();
        assert!(usage.scripts.has_remaining());
        assert_eq!(
            can_consume(&PlanId::Starter, &usage, ContentCategory::Scripts),
            Decision::Deny(DenyReason::PlanLocked)
        );
        assert_eq!(
            can_consume(&PlanId::Starter, &usage, ContentCategory::Agents),
            Decision::Deny(DenyReason::PlanLocked)
        );
    }

    #[test]
    fn unlimited_always_allows() {
        let mut usage = PlanId::Yearly.default_quotas();
        usage.posts.used = 1_000_000;
        assert_eq!(
            can_consume(&PlanId::Yearly, &usage, ContentCategory::Posts),
            Decision::Allow
        );
    }

    #[test]
    fn yearly_agents_are_bounded() {
        let mut usage = PlanId::Yearly.default_quotas();
        usage.agents.used = 10;
        assert_eq!(
            can_consume(&PlanId::Yearly, &usage, ContentCategory::Agents),
            Decision::Deny(DenyReason::LimitReached)
        );
    }

    #[test]
    fn zero_total_has_no_remaining() {
        let q = Quota::new(0);
        assert!(!q.has_remaining());
        assert!(!q.is_unlimited());
    }
}
